//! Lifecycle of one address query: idle, loading, ready or errored.

use log::{debug, warn};

use crate::components::force_graph::GraphData;
use crate::transactions::FetchError;

/// Where the current query stands.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Phase {
	/// No address has been queried yet.
	#[default]
	Idle,
	/// A fetch is in flight.
	Loading,
	/// The latest fetch produced a graph.
	Ready,
	/// The latest fetch failed with this message.
	Errored(String),
}

/// Identifies one fetch; results carrying an outdated token are dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Generation(u64);

/// The `address` query parameter, trimmed; `None` when missing or blank.
pub fn address_param(raw: Option<&str>) -> Option<String> {
	raw.map(str::trim)
		.filter(|address| !address.is_empty())
		.map(str::to_string)
}

/// Component state for the transaction graph page.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryState {
	phase: Phase,
	generation: u64,
	graph: Option<GraphData>,
}

impl QueryState {
	/// Start a new fetch. Clears any previous error; the last graph stays until replaced.
	pub fn begin(&mut self) -> Generation {
		self.generation += 1;
		self.phase = Phase::Loading;
		Generation(self.generation)
	}

	/// Start a fetch only when there is an address. Without one nothing changes:
	/// the phase, the last graph and any error stay as they were.
	pub fn begin_for(&mut self, address: Option<&str>) -> Option<Generation> {
		address.map(|_| self.begin())
	}

	/// Record the outcome of the fetch started with `token`.
	/// Returns false when a newer fetch has started since, leaving state untouched.
	pub fn finish(&mut self, token: Generation, result: Result<GraphData, FetchError>) -> bool {
		if token.0 != self.generation {
			debug!(
				"dropping stale response (generation {} < {})",
				token.0, self.generation
			);
			return false;
		}
		match result {
			Ok(graph) => {
				self.graph = Some(graph);
				self.phase = Phase::Ready;
			}
			Err(err) => {
				warn!("transaction fetch failed: {err}");
				self.phase = Phase::Errored(err.to_string());
			}
		}
		true
	}

	/// Current phase.
	pub fn phase(&self) -> &Phase {
		&self.phase
	}

	/// Whether a fetch is in flight.
	pub fn is_loading(&self) -> bool {
		self.phase == Phase::Loading
	}

	/// Message of the latest failure, if the latest fetch failed.
	pub fn error(&self) -> Option<&str> {
		match &self.phase {
			Phase::Errored(message) => Some(message),
			_ => None,
		}
	}

	/// Most recently built graph.
	pub fn graph(&self) -> Option<&GraphData> {
		self.graph.as_ref()
	}
}

//! Transaction listing endpoint client.

use log::debug;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::config::GraphConfig;

/// Number of transactions requested per query.
pub const PAGE_SIZE: usize = 50;

const GENERIC_FAILURE: &str = "failed to fetch transactions";

/// Why a transaction page could not be obtained. Displays as the bare message.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum FetchError {
	/// Network failure or malformed request URL.
	#[error("{0}")]
	Transport(String),
	/// The endpoint answered with an `error` payload.
	#[error("{0}")]
	Server(String),
	/// The body was neither a transaction list nor an error payload.
	#[error("{0}")]
	Decode(String),
}

impl FetchError {
	fn transport(message: impl Into<String>) -> Self {
		let message = message.into();
		if message.trim().is_empty() {
			Self::Transport(GENERIC_FAILURE.into())
		} else {
			Self::Transport(message)
		}
	}
}

impl From<reqwest::Error> for FetchError {
	fn from(err: reqwest::Error) -> Self {
		Self::transport(err.to_string())
	}
}

impl From<serde_json::Error> for FetchError {
	fn from(err: serde_json::Error) -> Self {
		Self::Decode(format!("invalid transaction response: {err}"))
	}
}

/// One transfer between two addresses.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
	/// Transaction hash.
	pub id: String,
	/// Sender address.
	pub from: String,
	/// Recipient address; absent for contract creations.
	#[serde(default)]
	pub to: Option<String>,
	/// Transferred amount as a decimal string.
	pub value: String,
	/// When the transaction was included, in whatever shape the backend sends.
	#[serde(default)]
	pub timestamp: Option<Value>,
}

const STRING_FIELDS: &[&str] = &["id", "from", "value"];

fn parse_transaction(index: usize, item: Value) -> Result<Transaction, FetchError> {
	if !item.is_object() {
		return Err(FetchError::Decode(format!(
			"transaction {index}: expected an object"
		)));
	}
	let bad_field = STRING_FIELDS
		.iter()
		.copied()
		.find(|field| !item.get(*field).is_some_and(Value::is_string))
		.or_else(|| {
			item.get("to")
				.is_some_and(|to| !to.is_null() && !to.is_string())
				.then_some("to")
		});
	serde_json::from_value(item).map_err(|err| match bad_field {
		Some(field) => FetchError::Decode(format!(
			"transaction {index}: field `{field}` must be a string ({err})"
		)),
		None => FetchError::Decode(format!("transaction {index}: {err}")),
	})
}

/// Interpret a response body: a transaction array, or an object carrying `error`.
pub fn parse_response(body: &str) -> Result<Vec<Transaction>, FetchError> {
	match serde_json::from_str::<Value>(body)? {
		Value::Array(items) => items
			.into_iter()
			.enumerate()
			.map(|(index, item)| parse_transaction(index, item))
			.collect(),
		Value::Object(mut fields) => match fields.remove("error") {
			Some(Value::String(message)) => Err(FetchError::Server(message)),
			Some(other) => Err(FetchError::Server(other.to_string())),
			None => Err(FetchError::Decode(
				"expected a transaction array or an error object".into(),
			)),
		},
		_ => Err(FetchError::Decode(
			"expected a transaction array or an error object".into(),
		)),
	}
}

/// Build `<endpoint>?address=..&offset=..`, resolving relative endpoints against `origin`.
pub fn request_url(
	endpoint: &str,
	origin: Option<&str>,
	address: &str,
	page_size: usize,
) -> Result<Url, FetchError> {
	let mut url = match Url::parse(endpoint) {
		Ok(url) => url,
		Err(_) => {
			let origin = origin.ok_or_else(|| {
				FetchError::transport(format!("cannot resolve relative endpoint {endpoint}"))
			})?;
			Url::parse(origin)
				.and_then(|base| base.join(endpoint))
				.map_err(|err| FetchError::transport(format!("invalid endpoint: {err}")))?
		}
	};
	url.query_pairs_mut()
		.append_pair("address", address)
		.append_pair("offset", &page_size.to_string());
	Ok(url)
}

#[cfg(target_arch = "wasm32")]
fn page_origin() -> Option<String> {
	web_sys::window()?.location().origin().ok()
}

#[cfg(not(target_arch = "wasm32"))]
fn page_origin() -> Option<String> {
	None
}

/// Fetches one fixed-size page of transactions for an address.
#[derive(Clone, Debug)]
pub struct TransactionClient {
	http: Client,
	endpoint: String,
	page_size: usize,
}

impl TransactionClient {
	/// Client for the configured endpoint and page size.
	pub fn new(config: &GraphConfig) -> Self {
		Self {
			http: Client::new(),
			endpoint: config.api_endpoint.clone(),
			page_size: config.page_size,
		}
	}

	/// Request the page for `address`. No retry, no timeout.
	pub async fn fetch(&self, address: &str) -> Result<Vec<Transaction>, FetchError> {
		let url = request_url(
			&self.endpoint,
			page_origin().as_deref(),
			address,
			self.page_size,
		)?;
		debug!("GET {url}");
		let body = self.http.get(url).send().await?.text().await?;
		parse_response(&body)
	}
}

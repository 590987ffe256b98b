//! Folding a transaction page into a counterparty graph.

use std::collections::{HashMap, HashSet};

use log::debug;

use crate::components::force_graph::{GraphData, GraphLink, GraphNode, NodeKind};
use crate::resolver::{AddressResolver, display_label};
use crate::transactions::Transaction;

const COLORS: &[&str] = &[
	"#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
	"#bcbd22", "#17becf",
];

/// Palette colour for an address, stable across runs (FNV-1a over the bytes).
pub fn node_color(address: &str) -> &'static str {
	let hash = address
		.bytes()
		.fold(0xcbf2_9ce4_8422_2325_u64, |hash, byte| {
			(hash ^ byte as u64).wrapping_mul(0x0000_0100_0000_01b3)
		});
	COLORS[(hash % COLORS.len() as u64) as usize]
}

/// Build nodes and links for `query` from one page of transactions.
///
/// A sender starts as [`NodeKind::Out`] and a recipient as [`NodeKind::In`], the query
/// address included; [`classify_bidirectional`] then upgrades anything seen on both ends.
/// Transactions without a recipient (contract creations) add no link.
pub fn build_graph(
	query: &str,
	transactions: &[Transaction],
	resolver: &dyn AddressResolver,
) -> GraphData {
	let mut data = GraphData::default();
	let mut seen = HashSet::new();

	let mut add_node = |nodes: &mut Vec<GraphNode>, id: &str, kind: NodeKind| {
		if seen.insert(id.to_string()) {
			nodes.push(GraphNode {
				id: id.to_string(),
				label: display_label(resolver, id),
				color: node_color(id).to_string(),
				kind,
			});
		}
	};

	for tx in transactions {
		let Some(to) = tx.to.as_deref() else {
			debug!("skipping {}: no recipient", tx.id);
			continue;
		};
		add_node(&mut data.nodes, &tx.from, NodeKind::Out);
		add_node(&mut data.nodes, to, NodeKind::In);

		data.links.push(GraphLink {
			source: tx.from.clone(),
			target: to.to_string(),
			value: tx.value.trim().parse().unwrap_or(f64::NAN),
		});
	}

	classify_bidirectional(&mut data);
	debug!(
		"graph for {query}: {} nodes, {} links",
		data.nodes.len(),
		data.links.len()
	);
	data
}

/// Mark every node that is both a link source and a link target as [`NodeKind::Both`].
/// Returns whether any node changed.
pub fn classify_bidirectional(data: &mut GraphData) -> bool {
	let mut ends: HashMap<&str, (bool, bool)> = HashMap::new();
	for link in &data.links {
		ends.entry(link.source.as_str()).or_default().0 = true;
		ends.entry(link.target.as_str()).or_default().1 = true;
	}
	let both: HashSet<String> = ends
		.into_iter()
		.filter(|(_, (is_source, is_target))| *is_source && *is_target)
		.map(|(id, _)| id.to_string())
		.collect();

	let mut changed = false;
	for node in &mut data.nodes {
		if node.kind != NodeKind::Both && both.contains(&node.id) {
			node.kind = NodeKind::Both;
			changed = true;
		}
	}
	changed
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::resolver::{NoNames, StaticNameTable};

	fn tx(from: &str, to: &str, value: &str) -> Transaction {
		Transaction {
			id: format!("{from}->{to}"),
			from: from.into(),
			to: Some(to.into()),
			value: value.into(),
			timestamp: None,
		}
	}

	fn kind_of(data: &GraphData, id: &str) -> NodeKind {
		data.node(id).unwrap().kind
	}

	#[test]
	fn single_outgoing_transfer() {
		let data = build_graph("0xQUERY", &[tx("0xQUERY", "0xB", "1.5")], &NoNames);

		assert_eq!(data.nodes.len(), 2);
		assert_eq!(kind_of(&data, "0xQUERY"), NodeKind::Out);
		assert_eq!(kind_of(&data, "0xB"), NodeKind::In);
		assert_eq!(
			data.links,
			vec![GraphLink {
				source: "0xQUERY".into(),
				target: "0xB".into(),
				value: 1.5,
			}]
		);
	}

	#[test]
	fn senders_start_out_and_recipients_in() {
		let data = build_graph(
			"0xQUERY",
			&[tx("0xSENDER", "0xQUERY", "2"), tx("0xSENDER", "0xOTHER", "1")],
			&NoNames,
		);
		assert_eq!(kind_of(&data, "0xSENDER"), NodeKind::Out);
		assert_eq!(kind_of(&data, "0xQUERY"), NodeKind::In);
		assert_eq!(kind_of(&data, "0xOTHER"), NodeKind::In);
	}

	#[test]
	fn contract_creation_adds_no_link() {
		let mut creation = tx("0xQUERY", "unused", "0");
		creation.to = None;
		let data = build_graph("0xQUERY", &[creation, tx("0xQUERY", "0xB", "1")], &NoNames);

		assert_eq!(data.links.len(), 1);
		let ids: Vec<&str> = data.nodes.iter().map(|n| n.id.as_str()).collect();
		assert_eq!(ids, ["0xQUERY", "0xB"]);
	}

	#[test]
	fn nodes_are_the_distinct_addresses() {
		let txs = [
			tx("0xA", "0xB", "1"),
			tx("0xB", "0xC", "1"),
			tx("0xA", "0xC", "1"),
			tx("0xC", "0xA", "1"),
			tx("0xD", "0xD", "1"),
		];
		let data = build_graph("0xA", &txs, &NoNames);

		let ids: Vec<&str> = data.nodes.iter().map(|n| n.id.as_str()).collect();
		assert_eq!(ids, ["0xA", "0xB", "0xC", "0xD"]);
		assert_eq!(data.links.len(), txs.len());
		for link in &data.links {
			assert!(data.node(&link.source).is_some());
			assert!(data.node(&link.target).is_some());
		}
	}

	#[test]
	fn both_iff_source_and_target() {
		let txs = [
			tx("0xA", "0xB", "1"),
			tx("0xB", "0xC", "1"),
			tx("0xD", "0xA", "1"),
			tx("0xE", "0xE", "1"),
		];
		let data = build_graph("0xA", &txs, &NoNames);

		for node in &data.nodes {
			let is_source = data.links.iter().any(|l| l.source == node.id);
			let is_target = data.links.iter().any(|l| l.target == node.id);
			assert_eq!(node.kind == NodeKind::Both, is_source && is_target, "{}", node.id);
		}
		assert_eq!(kind_of(&data, "0xC"), NodeKind::In);
		assert_eq!(kind_of(&data, "0xD"), NodeKind::Out);
		assert_eq!(kind_of(&data, "0xE"), NodeKind::Both);
	}

	#[test]
	fn classification_reports_changes_once() {
		let mut data = build_graph("0xA", &[tx("0xA", "0xB", "1")], &NoNames);
		data.links.push(GraphLink {
			source: "0xB".into(),
			target: "0xA".into(),
			value: 1.0,
		});
		assert!(classify_bidirectional(&mut data));
		assert!(!classify_bidirectional(&mut data));
		assert_eq!(kind_of(&data, "0xA"), NodeKind::Both);
		assert_eq!(kind_of(&data, "0xB"), NodeKind::Both);
	}

	#[test]
	fn unparsable_value_becomes_nan() {
		let data = build_graph(
			"0xA",
			&[
				tx("0xA", "0xB", "lots"),
				tx("0xA", "0xB", " 0.25 "),
				tx("0xA", "0xB", "1.5 ETH"),
				tx("0xA", "0xB", "1.5e"),
			],
			&NoNames,
		);
		assert!(data.links[0].value.is_nan());
		assert_eq!(data.links[1].value, 0.25);
		assert!(data.links[2].value.is_nan());
		assert!(data.links[3].value.is_nan());
	}

	#[test]
	fn unparsable_values_do_not_make_graphs_unequal() {
		let txs = [tx("0xA", "0xB", "n/a")];
		assert_eq!(
			build_graph("0xA", &txs, &NoNames),
			build_graph("0xA", &txs, &NoNames)
		);
	}

	#[test]
	fn labels_use_resolver_then_shortening() {
		let usdt = "0xdAC17F958D2ee523a2206206994597C13D831ec7";
		let data = build_graph(
			"0x1234567890",
			&[tx("0x1234567890", usdt, "1")],
			&StaticNameTable,
		);
		assert_eq!(data.node("0x1234567890").unwrap().label, "0x1...90");
		assert_eq!(data.node(usdt).unwrap().label, "Tether: USDT");
	}

	#[test]
	fn colors_are_deterministic() {
		let txs = [tx("0xA", "0xB", "1"), tx("0xB", "0xC", "3")];
		assert_eq!(
			build_graph("0xA", &txs, &NoNames),
			build_graph("0xA", &txs, &NoNames)
		);
		assert_eq!(node_color("0xabc"), node_color("0xabc"));
		assert!(COLORS.contains(&node_color("")));
	}

	#[test]
	fn empty_page_gives_empty_graph() {
		let data = build_graph("0xA", &[], &NoNames);
		assert!(data.is_empty());
		assert!(data.links.is_empty());
	}
}

/// Direction of value flow observed for a node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum NodeKind {
	/// Only seen receiving.
	#[default]
	In,
	/// Only seen sending.
	Out,
	/// Seen on both ends of some links.
	Both,
}

impl NodeKind {
	/// Lowercase name used in legends and logs.
	pub fn as_str(self) -> &'static str {
		match self {
			NodeKind::In => "in",
			NodeKind::Out => "out",
			NodeKind::Both => "both",
		}
	}
}

/// One address in the graph.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphNode {
	/// The raw address.
	pub id: String,
	/// Resolved name or shortened address.
	pub label: String,
	/// Assigned CSS colour.
	pub color: String,
	/// Flow classification.
	pub kind: NodeKind,
}

/// One transaction, directed from sender to recipient.
#[derive(Clone, Debug)]
pub struct GraphLink {
	/// Sender address.
	pub source: String,
	/// Recipient address.
	pub target: String,
	/// Parsed amount; NaN when the decimal string did not parse.
	pub value: f64,
}

// bitwise on `value` so a NaN link still equals itself
impl PartialEq for GraphLink {
	fn eq(&self, other: &Self) -> bool {
		self.source == other.source
			&& self.target == other.target
			&& self.value.to_bits() == other.value.to_bits()
	}
}

/// Nodes in first-seen order plus links in transaction order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphData {
	/// Unique by `id`.
	pub nodes: Vec<GraphNode>,
	/// Every endpoint names a node in `nodes`.
	pub links: Vec<GraphLink>,
}

impl GraphData {
	/// Node with the given address.
	pub fn node(&self, id: &str) -> Option<&GraphNode> {
		self.nodes.iter().find(|node| node.id == id)
	}

	/// True when there is nothing to draw.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}
}

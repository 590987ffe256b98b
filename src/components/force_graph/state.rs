use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use super::types::{GraphData, NodeKind};

pub const HIT_RADIUS: f64 = 8.0;
/// Pointer travel (screen px) below which a press-release counts as a click.
pub const CLICK_SLOP: f64 = 3.0;

/// Drawn radius in graph units.
pub fn node_radius(kind: NodeKind) -> f64 {
	match kind {
		NodeKind::Both => 4.0,
		NodeKind::In | NodeKind::Out => 3.0,
	}
}

/// Fill colour for a flow direction: green in, red out, yellow both.
pub fn kind_color(kind: NodeKind) -> &'static str {
	match kind {
		NodeKind::In => "#4caf7d",
		NodeKind::Out => "#e0605a",
		NodeKind::Both => "#f2c94c",
	}
}

#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	pub id: String,
	pub label: String,
	pub color: String,
	pub kind: NodeKind,
}

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub moved: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<DefaultNodeIdx>,
	pub neighbors: HashSet<DefaultNodeIdx>,
	pub highlight_t: f64,
	pub prev_node: Option<DefaultNodeIdx>,
	pub prev_neighbors: HashSet<DefaultNodeIdx>,
	delay_t: f64,
}

pub struct ForceGraphState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: HoverState,
	pub width: f64,
	pub height: f64,
	pub animation_running: bool,
	pub flow_time: f64,
	edges: Vec<(DefaultNodeIdx, DefaultNodeIdx)>,
	// summed link value per node pair
	edge_values: HashMap<(DefaultNodeIdx, DefaultNodeIdx), f64>,
}

impl ForceGraphState {
	pub fn new(data: &GraphData, width: f64, height: f64) -> Self {
		let mut graph = ForceGraph::new(SimulationParameters {
			force_charge: 120.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
		});
		let mut id_to_idx = HashMap::new();
		let mut edges = Vec::new();
		let mut edge_values: HashMap<_, f64> = HashMap::new();

		for (i, node) in data.nodes.iter().enumerate() {
			let angle = (i as f64) * 2.0 * PI / data.nodes.len() as f64;
			let (x, y) = ((100.0 * angle.cos()) as f32, (100.0 * angle.sin()) as f32);

			let idx = graph.add_node(NodeData {
				x,
				y,
				mass: 10.0,
				is_anchor: false,
				user_data: NodeInfo {
					id: node.id.clone(),
					label: node.label.clone(),
					color: node.color.clone(),
					kind: node.kind,
				},
			});
			id_to_idx.insert(node.id.clone(), idx);
		}

		for link in &data.links {
			let (Some(&src), Some(&tgt)) =
				(id_to_idx.get(&link.source), id_to_idx.get(&link.target))
			else {
				continue;
			};
			// self-transfers count towards classification but are not drawn
			if src == tgt {
				continue;
			}
			let value = if link.value.is_finite() { link.value.max(0.0) } else { 0.0 };
			match edge_values.get_mut(&(src, tgt)) {
				Some(total) => *total += value,
				None => {
					graph.add_edge(src, tgt, EdgeData::default());
					edges.push((src, tgt));
					edge_values.insert((src, tgt), value);
				}
			}
		}

		Self {
			graph,
			edges,
			edge_values,
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			width,
			height,
			animation_running: true,
			flow_time: 0.0,
		}
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn graph_to_screen(&self, gx: f64, gy: f64) -> (f64, f64) {
		(
			gx * self.transform.k + self.transform.x,
			gy * self.transform.k + self.transform.y,
		)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			// HIT_RADIUS is in world-space, scales with zoom like nodes
			if (dx * dx + dy * dy).sqrt() < HIT_RADIUS {
				found = Some(node.index());
			}
		});
		found
	}

	pub fn node_info(&self, idx: DefaultNodeIdx) -> Option<NodeInfo> {
		let mut info = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				info = Some(node.data.user_data.clone());
			}
		});
		info
	}

	/// Total value carried from `src` to `tgt`, zero for unparsable amounts.
	pub fn edge_value(&self, src: DefaultNodeIdx, tgt: DefaultNodeIdx) -> f64 {
		self.edge_values.get(&(src, tgt)).copied().unwrap_or(0.0)
	}

	#[cfg(test)]
	pub fn edge_count(&self) -> usize {
		self.edges.len()
	}

	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>) {
		if self.hover.node == node {
			return;
		}
		let was_hovering = self.hover.node.is_some();

		// Save previous state for fade-out
		if was_hovering && node.is_none() {
			self.hover.prev_node = self.hover.node.take();
			self.hover.prev_neighbors = std::mem::take(&mut self.hover.neighbors);
		} else {
			self.hover.prev_node = None;
			self.hover.prev_neighbors.clear();
		}

		self.hover.node = node;
		self.hover.neighbors.clear();

		if let Some(idx) = node {
			if !was_hovering {
				self.hover.delay_t = 0.0;
			}
			for &(src, tgt) in &self.edges {
				if src == idx {
					self.hover.neighbors.insert(tgt);
				} else if tgt == idx {
					self.hover.neighbors.insert(src);
				}
			}
		}
	}

	pub fn is_highlighted(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx)
			|| self.hover.neighbors.contains(&idx)
			|| self.hover.prev_node == Some(idx)
			|| self.hover.prev_neighbors.contains(&idx)
	}

	pub fn is_hovered(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx) || self.hover.prev_node == Some(idx)
	}

	pub fn has_active_highlight(&self) -> bool {
		self.hover.node.is_some() || self.hover.prev_node.is_some()
	}

	/// Press on a node starts a drag; press on the background starts a pan.
	pub fn press(&mut self, x: f64, y: f64) {
		if let Some(idx) = self.node_at_position(x, y) {
			self.drag.active = true;
			self.drag.moved = false;
			self.drag.node_idx = Some(idx);
			self.drag.start_x = x;
			self.drag.start_y = y;
			let (mut nx, mut ny) = (0.0, 0.0);
			self.graph.visit_nodes(|node| {
				if node.index() == idx {
					(nx, ny) = (node.x(), node.y());
				}
			});
			self.drag.node_start_x = nx;
			self.drag.node_start_y = ny;
		} else {
			self.pan.active = true;
			self.pan.start_x = x;
			self.pan.start_y = y;
			self.pan.transform_start_x = self.transform.x;
			self.pan.transform_start_y = self.transform.y;
		}
	}

	pub fn pointer_move(&mut self, x: f64, y: f64) {
		if !self.drag.active {
			let hovered = self.node_at_position(x, y);
			self.set_hover(hovered);
		}

		if self.drag.active {
			let Some(idx) = self.drag.node_idx else {
				return;
			};
			let (sdx, sdy) = (x - self.drag.start_x, y - self.drag.start_y);
			if !self.drag.moved && (sdx * sdx + sdy * sdy).sqrt() < CLICK_SLOP {
				return;
			}
			self.drag.moved = true;
			let (nx, ny) = (
				self.drag.node_start_x + (sdx / self.transform.k) as f32,
				self.drag.node_start_y + (sdy / self.transform.k) as f32,
			);
			self.graph.visit_nodes_mut(|node| {
				if node.index() == idx {
					node.data.x = nx;
					node.data.y = ny;
					node.data.is_anchor = true;
				}
			});
		} else if self.pan.active {
			self.transform.x = self.pan.transform_start_x + (x - self.pan.start_x);
			self.transform.y = self.pan.transform_start_y + (y - self.pan.start_y);
		}
	}

	/// Ends any drag or pan. Returns the id of the node when the press was a click.
	pub fn release(&mut self) -> Option<String> {
		let clicked = match (self.drag.active, self.drag.moved, self.drag.node_idx) {
			(true, false, Some(idx)) => self.node_info(idx).map(|info| info.id),
			_ => None,
		};
		self.drag.active = false;
		self.drag.moved = false;
		self.drag.node_idx = None;
		self.pan.active = false;
		clicked
	}

	pub fn leave(&mut self) {
		self.release();
		self.set_hover(None);
	}

	pub fn zoom(&mut self, x: f64, y: f64, delta_y: f64) {
		let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
		let new_k = (self.transform.k * factor).clamp(0.1, 10.0);
		let ratio = new_k / self.transform.k;
		self.transform.x = x - (x - self.transform.x) * ratio;
		self.transform.y = y - (y - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	pub fn tick(&mut self, dt: f32) {
		self.graph.update(dt);
		self.flow_time += dt as f64;

		let (target, delay, speed) = if self.hover.node.is_some() {
			(1.0, 0.08, 1.8)
		} else {
			(0.0, 0.0, 1.26)
		};

		if self.hover.node.is_some() {
			self.hover.delay_t = (self.hover.delay_t + dt as f64).min(delay);
			if self.hover.delay_t >= delay {
				self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt as f64;
			}
		} else {
			self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt as f64;
			if self.hover.highlight_t < 0.01 {
				self.hover.highlight_t = 0.0;
				self.hover.prev_node = None;
				self.hover.prev_neighbors.clear();
			}
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::types::{GraphLink, GraphNode};

	fn node(id: &str, kind: NodeKind) -> GraphNode {
		GraphNode {
			id: id.into(),
			label: id.into(),
			color: "#1f77b4".into(),
			kind,
		}
	}

	fn link(source: &str, target: &str, value: f64) -> GraphLink {
		GraphLink {
			source: source.into(),
			target: target.into(),
			value,
		}
	}

	fn single_node() -> ForceGraphState {
		let data = GraphData {
			nodes: vec![node("0xA", NodeKind::Out)],
			links: Vec::new(),
		};
		ForceGraphState::new(&data, 400.0, 300.0)
	}

	#[test]
	fn radius_and_color_follow_kind() {
		assert_eq!(node_radius(NodeKind::Both), 4.0);
		assert_eq!(node_radius(NodeKind::In), 3.0);
		assert_eq!(node_radius(NodeKind::Out), 3.0);
		assert_ne!(kind_color(NodeKind::In), kind_color(NodeKind::Out));
		assert_ne!(kind_color(NodeKind::Both), kind_color(NodeKind::Out));
	}

	#[test]
	fn hit_test_uses_view_transform() {
		let state = single_node();
		// first node starts at (100, 0) in graph space, origin at canvas centre
		let hit = state.node_at_position(300.0, 150.0).unwrap();
		assert_eq!(state.node_info(hit).unwrap().id, "0xA");
		assert!(state.node_at_position(10.0, 10.0).is_none());
	}

	#[test]
	fn press_and_release_in_place_is_a_click() {
		let mut state = single_node();
		state.press(300.0, 150.0);
		state.pointer_move(301.0, 150.0);
		assert_eq!(state.release().as_deref(), Some("0xA"));
		assert!(!state.drag.active);
	}

	#[test]
	fn dragging_is_not_a_click() {
		let mut state = single_node();
		state.press(300.0, 150.0);
		state.pointer_move(340.0, 180.0);
		assert!(state.drag.moved);
		assert_eq!(state.release(), None);
	}

	#[test]
	fn background_press_pans() {
		let mut state = single_node();
		state.press(10.0, 10.0);
		state.pointer_move(30.0, 5.0);
		assert_eq!(state.transform.x, 220.0);
		assert_eq!(state.transform.y, 145.0);
		assert_eq!(state.release(), None);
	}

	#[test]
	fn parallel_links_share_one_edge() {
		let data = GraphData {
			nodes: vec![
				node("0xA", NodeKind::Out),
				node("0xB", NodeKind::Both),
				node("0xC", NodeKind::In),
			],
			links: vec![
				link("0xA", "0xB", 1.0),
				link("0xA", "0xB", 2.5),
				link("0xB", "0xC", f64::NAN),
				link("0xC", "0xC", 1.0),
			],
		};
		let state = ForceGraphState::new(&data, 400.0, 300.0);
		assert_eq!(state.edge_count(), 2);

		let mut idx = HashMap::new();
		state.graph.visit_nodes(|n| {
			idx.insert(n.data.user_data.id.clone(), n.index());
		});
		assert_eq!(state.edge_value(idx["0xA"], idx["0xB"]), 3.5);
		assert_eq!(state.edge_value(idx["0xB"], idx["0xC"]), 0.0);
	}

	#[test]
	fn hover_collects_neighbors() {
		let data = GraphData {
			nodes: vec![
				node("0xA", NodeKind::Out),
				node("0xB", NodeKind::In),
				node("0xC", NodeKind::In),
			],
			links: vec![link("0xA", "0xB", 1.0)],
		};
		let mut state = ForceGraphState::new(&data, 400.0, 300.0);
		let mut idx = HashMap::new();
		state.graph.visit_nodes(|n| {
			idx.insert(n.data.user_data.id.clone(), n.index());
		});
		state.set_hover(Some(idx["0xA"]));
		assert!(state.is_highlighted(idx["0xB"]));
		assert!(!state.is_highlighted(idx["0xC"]));
	}
}

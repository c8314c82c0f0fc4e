use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};
use log::debug;

use super::types::{EdgeStyle, NodeInfo};
use crate::graph::{GraphSnapshot, NodeId, VisualOverrides};

/// Extra world-space slack around a node for hit testing.
pub const HIT_PADDING: f64 = 4.0;
/// Pointer travel, in screen pixels, below which a press counts as a click.
pub const CLICK_TOLERANCE: f64 = 4.0;

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
	pub moved: bool,
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
	pub overrides: VisualOverrides,
	pub width: f64,
	pub height: f64,
	pub animation_running: bool,
	pub flow_time: f64,
	edges: Vec<(DefaultNodeIdx, DefaultNodeIdx)>,
	edge_styles: HashMap<(DefaultNodeIdx, DefaultNodeIdx), EdgeStyle>,
	ids: HashMap<DefaultNodeIdx, NodeId>,
}

fn simulation() -> SimulationParameters {
	SimulationParameters {
		force_charge: 150.0,
		force_spring: 0.05,
		force_max: 100.0,
		node_speed: 3000.0,
		damping_factor: 0.9,
	}
}

impl ForceGraphState {
	pub fn new(snapshot: &GraphSnapshot, width: f64, height: f64) -> Self {
		let mut state = Self {
			graph: ForceGraph::new(simulation()),
			edges: Vec::new(),
			edge_styles: HashMap::new(),
			ids: HashMap::new(),
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			overrides: VisualOverrides::new(),
			width,
			height,
			animation_running: true,
			flow_time: 0.0,
		};
		state.rebuild(snapshot);
		state
	}

	/// Loads a new snapshot into the layout engine.
	///
	/// Nodes whose id survives keep their position and anchoring; new nodes
	/// start on a ring around the origin.
	pub fn rebuild(&mut self, snapshot: &GraphSnapshot) {
		let mut previous: HashMap<NodeId, (f32, f32, bool)> = HashMap::with_capacity(self.ids.len());
		self.graph.visit_nodes(|node| {
			previous.insert(
				node.data.user_data.id.clone(),
				(node.x(), node.y(), node.data.is_anchor),
			);
		});

		let mut graph = ForceGraph::new(simulation());
		let mut id_to_idx = HashMap::new();
		self.ids.clear();
		self.edges.clear();
		self.edge_styles.clear();

		let count = snapshot.nodes().len().max(1) as f64;
		for (i, node) in snapshot.nodes().iter().enumerate() {
			let (x, y, is_anchor) = previous.get(&node.id).copied().unwrap_or_else(|| {
				let angle = (i as f64) * 2.0 * PI / count;
				((100.0 * angle.cos()) as f32, (100.0 * angle.sin()) as f32, false)
			});

			let idx = graph.add_node(NodeData {
				x,
				y,
				mass: 10.0,
				is_anchor,
				user_data: NodeInfo::from(node),
			});
			id_to_idx.insert(node.id.clone(), idx);
			self.ids.insert(idx, node.id.clone());
		}

		for edge in snapshot.edges() {
			if let (Some(&src), Some(&tgt)) = (id_to_idx.get(&edge.source), id_to_idx.get(&edge.target)) {
				graph.add_edge(src, tgt, EdgeData::default());
				self.edges.push((src, tgt));
				self.edge_styles.insert((src, tgt), EdgeStyle::from(edge));
			}
		}

		debug!(
			"layout rebuilt: {} nodes ({} kept in place), {} edges",
			self.ids.len(),
			snapshot.nodes().iter().filter(|n| previous.contains_key(&n.id)).count(),
			self.edges.len()
		);

		self.graph = graph;
		self.hover = HoverState::default();
		self.drag = DragState::default();
		self.animation_running = true;
	}

	pub fn node_id(&self, idx: DefaultNodeIdx) -> Option<&NodeId> {
		self.ids.get(&idx)
	}

	pub fn edge_style(&self, src: DefaultNodeIdx, tgt: DefaultNodeIdx) -> Option<&EdgeStyle> {
		self.edge_styles.get(&(src, tgt))
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			// world-space, scales with zoom like the nodes themselves
			if (dx * dx + dy * dy).sqrt() < node.data.user_data.radius + HIT_PADDING {
				found = Some(node.index());
			}
		});
		found
	}

	/// Returns `true` when the hovered node changed.
	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>) -> bool {
		if self.hover.node == node {
			return false;
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
		true
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
	use crate::graph::{NormalizeConfig, RawContentRecord, RawRelation, normalize};

	fn snapshot(ids: &[&str], relations: &[(&str, &str)]) -> GraphSnapshot {
		let records: Vec<_> = ids.iter().map(|id| RawContentRecord::with_id(*id)).collect();
		let relations: Vec<_> = relations
			.iter()
			.map(|(s, t)| RawRelation::between(*s, *t))
			.collect();
		normalize(&records, &relations, &NormalizeConfig::default()).snapshot
	}

	fn position_of(state: &ForceGraphState, id: &str) -> Option<(f32, f32)> {
		let mut pos = None;
		state.graph.visit_nodes(|node| {
			if node.data.user_data.id.as_str() == id {
				pos = Some((node.x(), node.y()));
			}
		});
		pos
	}

	#[test]
	fn rebuild_keeps_positions_of_surviving_nodes() {
		let mut state = ForceGraphState::new(&snapshot(&["a", "b"], &[("a", "b")]), 800.0, 600.0);
		state.graph.visit_nodes_mut(|node| {
			if node.data.user_data.id.as_str() == "a" {
				node.data.x = 42.0;
				node.data.y = -7.0;
			}
		});
		state.rebuild(&snapshot(&["a", "c"], &[]));
		assert_eq!(position_of(&state, "a"), Some((42.0, -7.0)));
		assert!(position_of(&state, "b").is_none());
		assert!(position_of(&state, "c").is_some());
	}

	#[test]
	fn hit_testing_maps_back_to_ids() {
		let state = ForceGraphState::new(&snapshot(&["only"], &[]), 800.0, 600.0);
		// A single node sits at (100, 0) in world space; the view is centered.
		let idx = state.node_at_position(400.0 + 100.0, 300.0);
		assert_eq!(idx.and_then(|i| state.node_id(i)).map(NodeId::as_str), Some("only"));
		assert!(state.node_at_position(0.0, 0.0).is_none());
	}

	#[test]
	fn hover_tracks_neighbors() {
		let mut state = ForceGraphState::new(&snapshot(&["a", "b", "c"], &[("a", "b")]), 800.0, 600.0);
		let a = state.node_at_position(500.0, 300.0);
		assert!(state.set_hover(a));
		assert!(!state.set_hover(a));
		assert_eq!(state.hover.neighbors.len(), 1);
		assert!(state.set_hover(None));
		assert!(state.has_active_highlight());
	}

	#[test]
	fn edge_styles_come_from_the_snapshot() {
		let snap = snapshot(&["a", "b"], &[("a", "b")]);
		let state = ForceGraphState::new(&snap, 800.0, 600.0);
		let &(src, tgt) = state.edges.first().unwrap();
		assert_eq!(state.edge_style(src, tgt), Some(&EdgeStyle::from(&snap.edges()[0])));
	}
}

use crate::graph::{GraphEdge, GraphNode, NodeId};

/// Per-node data carried through the layout engine.
#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	pub id: NodeId,
	pub label: String,
	pub color: String,
	pub radius: f64,
}

impl From<&GraphNode> for NodeInfo {
	fn from(node: &GraphNode) -> Self {
		Self {
			id: node.id.clone(),
			label: node.label.clone(),
			color: node.color.to_string(),
			radius: node.size,
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeStyle {
	pub opacity: f64,
	/// Multiplier on the zoom-adjusted base line width.
	pub width: f64,
}

impl From<&GraphEdge> for EdgeStyle {
	fn from(edge: &GraphEdge) -> Self {
		Self {
			opacity: edge.opacity,
			width: edge.weight,
		}
	}
}

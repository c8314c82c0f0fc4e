//! Immutable graph snapshots and their assembly.

use std::collections::HashMap;
use std::sync::Arc;

use log::debug;
use serde::Serialize;

use super::cluster::ClusterLabel;
use super::types::{NodeId, RawContentRecord};

/// A classified content node ready for rendering.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GraphNode {
	/// Identifier of the source record.
	pub id: NodeId,
	/// Display label, already truncated.
	pub label: String,
	/// Assigned by the classifier.
	pub cluster: ClusterLabel,
	/// Radius handed to the renderer, always within the configured bounds.
	pub size: f64,
	/// Fill color of the cluster.
	pub color: &'static str,
	/// The record this node was derived from, for detail views.
	#[serde(skip)]
	pub record: Arc<RawContentRecord>,
}

impl GraphNode {
	/// Expandable nodes carry topic sub-items.
	pub fn has_sub_items(&self) -> bool {
		!self.record.topics.is_empty()
	}

	/// Topics shown when the node is expanded.
	pub fn sub_items(&self) -> &[String] {
		&self.record.topics
	}
}

/// A validated relation between two nodes of the same snapshot.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GraphEdge {
	/// One endpoint.
	pub source: NodeId,
	/// The other endpoint.
	pub target: NodeId,
	/// Stroke width, within the configured bounds.
	pub weight: f64,
	/// Stroke alpha in `[min_opacity, 1]`.
	pub opacity: f64,
	/// Topics the two records share.
	pub shared_topics: Vec<String>,
}

/// One complete, immutable instance of the derived graph.
///
/// Clones share storage. Equality compares nodes and edges by value, so two
/// recomputations over identical input compare equal.
#[derive(Clone, Debug, Default)]
pub struct GraphSnapshot {
	nodes: Arc<[GraphNode]>,
	edges: Arc<[GraphEdge]>,
	index: Arc<HashMap<NodeId, usize>>,
}

impl PartialEq for GraphSnapshot {
	fn eq(&self, other: &Self) -> bool {
		self.nodes == other.nodes && self.edges == other.edges
	}
}

impl GraphSnapshot {
	/// Builds a snapshot, enforcing id uniqueness and edge integrity.
	///
	/// Duplicate node ids resolve last-writer-wins while keeping the slot of
	/// the first occurrence. Edges are re-validated against the final node
	/// set: self-loops, blank ids and dangling endpoints are dropped.
	pub fn assemble(nodes: Vec<GraphNode>, edges: Vec<GraphEdge>) -> Self {
		let mut index: HashMap<NodeId, usize> = HashMap::with_capacity(nodes.len());
		let mut kept: Vec<GraphNode> = Vec::with_capacity(nodes.len());
		let mut duplicates = 0usize;

		for node in nodes {
			if let Some(&slot) = index.get(&node.id) {
				kept[slot] = node;
				duplicates += 1;
			} else {
				index.insert(node.id.clone(), kept.len());
				kept.push(node);
			}
		}

		let edge_count = edges.len();
		let edges: Vec<GraphEdge> = edges
			.into_iter()
			.filter(|e| {
				!e.source.is_blank()
					&& !e.target.is_blank()
					&& e.source != e.target
					&& index.contains_key(&e.source)
					&& index.contains_key(&e.target)
			})
			.collect();

		if duplicates > 0 || edges.len() != edge_count {
			debug!(
				"assemble: {} duplicate node(s) replaced, {} invalid edge(s) dropped",
				duplicates,
				edge_count - edges.len()
			);
		}

		Self {
			nodes: kept.into(),
			edges: edges.into(),
			index: Arc::new(index),
		}
	}

	/// Nodes in first-seen order.
	pub fn nodes(&self) -> &[GraphNode] {
		&self.nodes
	}

	/// Edges in input order.
	pub fn edges(&self) -> &[GraphEdge] {
		&self.edges
	}

	/// Looks a node up by id.
	pub fn node(&self, id: &str) -> Option<&GraphNode> {
		self.index.get(id).map(|&i| &self.nodes[i])
	}

	/// Whether a node with `id` exists.
	pub fn contains(&self, id: &str) -> bool {
		self.index.contains_key(id)
	}

	/// No nodes.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Ids adjacent to `id`, in edge order. May repeat for parallel edges.
	pub fn neighbors<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a NodeId> + 'a {
		self.edges.iter().filter_map(move |e| {
			if e.source.as_str() == id {
				Some(&e.target)
			} else if e.target.as_str() == id {
				Some(&e.source)
			} else {
				None
			}
		})
	}

	/// `true` when both values share the same storage.
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.nodes, &other.nodes) && Arc::ptr_eq(&self.edges, &other.edges)
	}
}

#[cfg(test)]
pub(crate) mod tests {
	use super::*;

	pub(crate) fn node(id: &str, cluster: ClusterLabel) -> GraphNode {
		GraphNode {
			id: id.into(),
			label: id.to_string(),
			cluster,
			size: 10.0,
			color: cluster.color(),
			record: Arc::new(RawContentRecord::with_id(id)),
		}
	}

	pub(crate) fn edge(source: &str, target: &str) -> GraphEdge {
		GraphEdge {
			source: source.into(),
			target: target.into(),
			weight: 1.0,
			opacity: 0.5,
			shared_topics: vec![],
		}
	}

	#[test]
	fn duplicate_ids_keep_last_writer_in_first_slot() {
		let mut second = node("a", ClusterLabel::Python);
		second.label = "second".into();
		let snap = GraphSnapshot::assemble(
			vec![node("a", ClusterLabel::General), node("b", ClusterLabel::General), second],
			vec![],
		);
		assert_eq!(snap.nodes().len(), 2);
		assert_eq!(snap.nodes()[0].label, "second");
		assert_eq!(snap.node("a").map(|n| n.cluster), Some(ClusterLabel::Python));
	}

	#[test]
	fn invalid_edges_are_dropped() {
		let snap = GraphSnapshot::assemble(
			vec![node("a", ClusterLabel::General), node("b", ClusterLabel::General)],
			vec![edge("a", "b"), edge("a", "a"), edge("a", "zz"), edge("", "b"), edge("b", "a")],
		);
		assert_eq!(snap.edges().len(), 2);
		assert!(
			snap.edges()
				.iter()
				.all(|e| snap.contains(e.source.as_str()) && snap.contains(e.target.as_str()))
		);
	}

	#[test]
	fn blank_endpoints_are_dropped_on_either_side() {
		let snap = GraphSnapshot::assemble(
			vec![node("a", ClusterLabel::General), node(" ", ClusterLabel::General)],
			vec![edge("a", " "), edge(" ", "a")],
		);
		assert!(snap.edges().is_empty());
	}

	#[test]
	fn older_snapshots_are_unaffected_by_new_ones() {
		let old = GraphSnapshot::assemble(vec![node("a", ClusterLabel::General)], vec![]);
		let held = old.clone();
		let _new = GraphSnapshot::assemble(vec![node("b", ClusterLabel::General)], vec![]);
		assert!(held.ptr_eq(&old));
		assert!(held.contains("a"));
		assert!(!held.contains("b"));
	}

	#[test]
	fn equality_is_by_value() {
		let make = || {
			GraphSnapshot::assemble(
				vec![node("a", ClusterLabel::General), node("b", ClusterLabel::General)],
				vec![edge("a", "b")],
			)
		};
		let (x, y) = (make(), make());
		assert_eq!(x, y);
		assert!(!x.ptr_eq(&y));
	}

	#[test]
	fn neighbors_follow_both_directions() {
		let snap = GraphSnapshot::assemble(
			vec![
				node("a", ClusterLabel::General),
				node("b", ClusterLabel::General),
				node("c", ClusterLabel::General),
			],
			vec![edge("a", "b"), edge("c", "a")],
		);
		let n: Vec<&str> = snap.neighbors("a").map(NodeId::as_str).collect();
		assert_eq!(n, vec!["b", "c"]);
	}
}

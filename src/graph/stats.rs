//! Legend counts and network statistics derived from a snapshot.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use super::cluster::ClusterLabel;
use super::snapshot::GraphSnapshot;
use super::types::NodeId;

/// Number of legend entries shown when the caller does not ask otherwise.
pub const DEFAULT_TOP_N: usize = 8;

/// One legend entry.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ClusterCount {
	/// The cluster counted.
	pub cluster: ClusterLabel,
	/// Swatch color.
	pub color: &'static str,
	/// Nodes in the cluster.
	pub count: usize,
}

/// Read-only summary for legend and statistics panels.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ClusterSummary {
	/// Descending by count, ties in cluster declaration order.
	pub clusters: Vec<ClusterCount>,
	/// Nodes in the snapshot.
	pub total_nodes: usize,
	/// Edges in the snapshot.
	pub total_edges: usize,
	/// Edges as a percentage of all possible undirected pairs, one decimal.
	pub density: f64,
}

impl ClusterSummary {
	/// The `n` largest clusters.
	pub fn top(&self, n: usize) -> &[ClusterCount] {
		&self.clusters[..n.min(self.clusters.len())]
	}
}

fn round_to(value: f64, decimals: i32) -> f64 {
	let f = 10f64.powi(decimals);
	(value * f).round() / f
}

/// Groups nodes by cluster and computes totals and density.
pub fn summarize(snapshot: &GraphSnapshot) -> ClusterSummary {
	let mut counts: BTreeMap<ClusterLabel, usize> = BTreeMap::new();
	for node in snapshot.nodes() {
		*counts.entry(node.cluster).or_default() += 1;
	}

	let mut clusters: Vec<ClusterCount> = counts
		.into_iter()
		.map(|(cluster, count)| ClusterCount {
			cluster,
			color: cluster.color(),
			count,
		})
		.collect();
	// Stable sort keeps the BTreeMap's declaration order among equal counts.
	clusters.sort_by(|a, b| b.count.cmp(&a.count));

	let n = snapshot.nodes().len();
	let e = snapshot.edges().len();
	let max_edges = n.saturating_sub(1) * n / 2;
	let density = if max_edges == 0 {
		0.0
	} else {
		round_to(e as f64 / max_edges as f64 * 100.0, 1)
	};

	ClusterSummary {
		clusters,
		total_nodes: n,
		total_edges: e,
		density,
	}
}

/// Structural statistics of the content network.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct NetworkStats {
	/// Connected components, isolated nodes included.
	pub components: usize,
	/// Node count of the biggest component.
	pub largest_component: usize,
	/// Mean node degree, two decimals.
	pub average_degree: f64,
	/// Highest-degree nodes, descending; ties in snapshot order.
	pub central_nodes: Vec<(NodeId, usize)>,
}

/// Connected components and degree centrality of `snapshot`.
pub fn analyze_network(snapshot: &GraphSnapshot, top_n: usize) -> NetworkStats {
	let nodes = snapshot.nodes();
	if nodes.is_empty() {
		return NetworkStats::default();
	}

	let slot: HashMap<&str, usize> = nodes
		.iter()
		.enumerate()
		.map(|(i, n)| (n.id.as_str(), i))
		.collect();
	let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
	for e in snapshot.edges() {
		let (s, t) = (slot[e.source.as_str()], slot[e.target.as_str()]);
		adjacency[s].push(t);
		adjacency[t].push(s);
	}

	let mut component_of = vec![usize::MAX; nodes.len()];
	let mut sizes = Vec::new();
	for start in 0..nodes.len() {
		if component_of[start] != usize::MAX {
			continue;
		}
		let id = sizes.len();
		let mut stack = vec![start];
		let mut size = 0;
		component_of[start] = id;
		while let Some(v) = stack.pop() {
			size += 1;
			for &w in &adjacency[v] {
				if component_of[w] == usize::MAX {
					component_of[w] = id;
					stack.push(w);
				}
			}
		}
		sizes.push(size);
	}

	let total_degree: usize = adjacency.iter().map(Vec::len).sum();
	let mut central: Vec<(NodeId, usize)> = nodes
		.iter()
		.zip(&adjacency)
		.map(|(n, adj)| (n.id.clone(), adj.len()))
		.collect();
	central.sort_by(|a, b| b.1.cmp(&a.1));
	central.truncate(top_n);

	NetworkStats {
		components: sizes.len(),
		largest_component: sizes.iter().copied().max().unwrap_or(0),
		average_degree: round_to(total_degree as f64 / nodes.len() as f64, 2),
		central_nodes: central,
	}
}

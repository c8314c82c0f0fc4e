//! Raw records and relations to classified nodes and validated edges.

use std::collections::HashSet;
use std::sync::Arc;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::cluster::classify;
use super::snapshot::{GraphEdge, GraphNode, GraphSnapshot};
use super::types::{NodeId, RawContentRecord, RawRelation};

/// Tunable constants for deriving visual attributes.
///
/// Only the clamping and the monotonicity of the transforms matter to
/// consumers; the values themselves are presentation choices.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeConfig {
	/// Smallest node radius.
	pub min_size: f64,
	/// Largest node radius.
	pub max_size: f64,
	/// Radius at quality zero, before clamping.
	pub size_base: f64,
	/// Radius gained per quality point.
	pub size_slope: f64,
	/// Used when a record has no (finite) quality score.
	pub default_quality: f64,
	/// Labels longer than this are cut and get an ellipsis.
	pub label_max_chars: usize,
	/// Raw weight of relations that carry none.
	pub default_weight: f64,
	/// Multiplier from raw weight to edge width.
	pub weight_scale: f64,
	/// Thinnest edge.
	pub min_weight: f64,
	/// Thickest edge.
	pub max_weight: f64,
	/// Similarity of relations that carry none.
	pub default_similarity: f64,
	/// Multiplier from similarity to edge opacity.
	pub opacity_scale: f64,
	/// Edges never fade below this, so they stay visible.
	pub min_opacity: f64,
}

impl Default for NormalizeConfig {
	fn default() -> Self {
		Self {
			min_size: 4.0,
			max_size: 20.0,
			size_base: 4.0,
			size_slope: 1.5,
			default_quality: 5.0,
			label_max_chars: 30,
			default_weight: 1.0,
			weight_scale: 1.5,
			min_weight: 0.5,
			max_weight: 4.0,
			default_similarity: 0.5,
			opacity_scale: 0.8,
			min_opacity: 0.15,
		}
	}
}

/// Data-quality findings from one normalization pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Diagnostic {
	/// The record at `index` had no usable identifier and was skipped.
	MissingIdentifier {
		/// Position in the record list.
		index: usize,
	},
	/// The relation at `index` was dropped.
	DroppedRelation {
		/// Position in the relation list.
		index: usize,
		/// What was wrong with it.
		reason: DropReason,
	},
}

/// Why a relation did not become an edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropReason {
	/// An endpoint was missing or blank.
	BlankEndpoint,
	/// Both endpoints were the same node.
	SelfLoop,
	/// An endpoint named no node of this pass.
	DanglingEndpoint,
}

/// Output of [`normalize`].
#[derive(Clone, Debug, Default)]
pub struct Normalized {
	/// The assembled graph.
	pub snapshot: GraphSnapshot,
	/// Everything that was excluded, in input order.
	pub diagnostics: Vec<Diagnostic>,
}

impl Normalized {
	/// Records skipped for lack of an identifier.
	pub fn excluded_records(&self) -> usize {
		self.diagnostics
			.iter()
			.filter(|d| matches!(d, Diagnostic::MissingIdentifier { .. }))
			.count()
	}

	/// Relations that did not become edges.
	pub fn dropped_relations(&self) -> usize {
		self.diagnostics
			.iter()
			.filter(|d| matches!(d, Diagnostic::DroppedRelation { .. }))
			.count()
	}
}

fn clamp(value: f64, min: f64, max: f64) -> f64 {
	value.max(min).min(max)
}

fn finite_or(value: Option<f64>, fallback: f64) -> f64 {
	value.filter(|v| v.is_finite()).unwrap_or(fallback)
}

/// Node radius for a quality score, always within `[min_size, max_size]`.
pub fn node_size(quality: Option<f64>, config: &NormalizeConfig) -> f64 {
	let q = finite_or(quality, config.default_quality);
	clamp(config.size_base + q * config.size_slope, config.min_size, config.max_size)
}

/// Truncates to `max_chars` characters, marking the cut with an ellipsis.
pub fn truncate_label(text: &str, max_chars: usize) -> String {
	let mut chars = text.chars();
	let head: String = chars.by_ref().take(max_chars).collect();
	if chars.next().is_some() {
		format!("{}…", head.trim_end())
	} else {
		head
	}
}

fn display_title(record: &RawContentRecord, id: &NodeId) -> String {
	match record.title.as_deref().map(str::trim) {
		Some(t) if !t.is_empty() => t.to_string(),
		_ => format!("Untitled {}", id),
	}
}

fn build_node(record: &RawContentRecord, id: &NodeId, config: &NormalizeConfig) -> GraphNode {
	let cluster = classify(record);
	let mut stored = record.clone();
	// A snapshot must compare equal to itself, and NaN never does.
	stored.quality_score = stored.quality_score.filter(|q| !q.is_nan());
	GraphNode {
		id: id.clone(),
		label: truncate_label(&display_title(record, id), config.label_max_chars),
		cluster,
		size: node_size(record.quality_score, config),
		color: cluster.color(),
		record: Arc::new(stored),
	}
}

fn build_edge(relation: &RawRelation, source: &NodeId, target: &NodeId, config: &NormalizeConfig) -> GraphEdge {
	let weight = finite_or(relation.weight, config.default_weight);
	let similarity = finite_or(relation.similarity, config.default_similarity);
	GraphEdge {
		source: source.clone(),
		target: target.clone(),
		weight: clamp(weight * config.weight_scale, config.min_weight, config.max_weight),
		opacity: clamp(similarity * config.opacity_scale, config.min_opacity, 1.0),
		shared_topics: relation.shared_topics.clone(),
	}
}

/// Converts one full export into a snapshot.
///
/// Never fails on data quality: records without an id are excluded and
/// reported, relations that cannot be resolved against this pass's nodes
/// are dropped.
pub fn normalize(records: &[RawContentRecord], relations: &[RawRelation], config: &NormalizeConfig) -> Normalized {
	let mut diagnostics = Vec::new();
	let mut nodes = Vec::with_capacity(records.len());
	let mut known: HashSet<&str> = HashSet::with_capacity(records.len());

	for (index, record) in records.iter().enumerate() {
		let Some(id) = record.valid_id() else {
			warn!(
				"normalize: record #{} ({:?}) has no identifier, skipped",
				index,
				record.title.as_deref().unwrap_or("untitled")
			);
			diagnostics.push(Diagnostic::MissingIdentifier { index });
			continue;
		};
		known.insert(id.as_str());
		nodes.push(build_node(record, id, config));
	}

	let mut edges = Vec::with_capacity(relations.len());
	for (index, relation) in relations.iter().enumerate() {
		let endpoints = (
			relation.source.as_ref().filter(|id| !id.is_blank()),
			relation.target.as_ref().filter(|id| !id.is_blank()),
		);
		let reason = match endpoints {
			(Some(s), Some(t)) if s == t => Some(DropReason::SelfLoop),
			(Some(s), Some(t)) if known.contains(s.as_str()) && known.contains(t.as_str()) => {
				edges.push(build_edge(relation, s, t, config));
				None
			}
			(Some(_), Some(_)) => Some(DropReason::DanglingEndpoint),
			_ => Some(DropReason::BlankEndpoint),
		};
		if let Some(reason) = reason {
			diagnostics.push(Diagnostic::DroppedRelation { index, reason });
		}
	}

	debug!(
		"normalize: {} record(s) -> {} node(s), {} relation(s) -> {} edge(s)",
		records.len(),
		nodes.len(),
		relations.len(),
		edges.len()
	);

	Normalized {
		snapshot: GraphSnapshot::assemble(nodes, edges),
		diagnostics,
	}
}

#[cfg(test)]
mod tests {
	use proptest::prelude::*;

	use super::*;
	use crate::graph::cluster::ClusterLabel;

	fn cfg() -> NormalizeConfig {
		NormalizeConfig::default()
	}

	#[test]
	fn dangling_relation_is_dropped() {
		let records = vec![RawContentRecord::with_id("1"), RawContentRecord::with_id("2")];
		let relations = vec![RawRelation::between("1", "2"), RawRelation::between("1", "99")];
		let out = normalize(&records, &relations, &cfg());
		assert_eq!(out.snapshot.nodes().len(), 2);
		assert_eq!(out.snapshot.edges().len(), 1);
		assert_eq!(
			out.diagnostics,
			vec![Diagnostic::DroppedRelation {
				index: 1,
				reason: DropReason::DanglingEndpoint
			}]
		);
	}

	#[test]
	fn self_loops_and_blank_endpoints_are_dropped() {
		let records = vec![RawContentRecord::with_id("a"), RawContentRecord::with_id("b")];
		let relations = vec![
			RawRelation::between("a", "a"),
			RawRelation::between("", "b"),
			RawRelation {
				source: Some("a".into()),
				..RawRelation::default()
			},
		];
		let out = normalize(&records, &relations, &cfg());
		assert!(out.snapshot.edges().is_empty());
		assert_eq!(out.dropped_relations(), 3);
		assert!(out.diagnostics.contains(&Diagnostic::DroppedRelation {
			index: 0,
			reason: DropReason::SelfLoop
		}));
	}

	#[test]
	fn records_without_id_are_excluded_not_fatal() {
		let records = vec![
			RawContentRecord {
				title: Some("no id".into()),
				..RawContentRecord::default()
			},
			RawContentRecord::with_id("ok"),
		];
		let out = normalize(&records, &[], &cfg());
		assert_eq!(out.snapshot.nodes().len(), 1);
		assert_eq!(out.excluded_records(), 1);
		assert_eq!(out.diagnostics[0], Diagnostic::MissingIdentifier { index: 0 });
	}

	#[test]
	fn missing_fields_are_defaulted() {
		let out = normalize(&[RawContentRecord::with_id("7")], &[], &cfg());
		let node = &out.snapshot.nodes()[0];
		assert_eq!(node.label, "Untitled 7");
		assert_eq!(node.cluster, ClusterLabel::General);
		assert_eq!(node.color, ClusterLabel::General.color());
		assert_eq!(node.size, node_size(Some(5.0), &cfg()));
	}

	#[test]
	fn long_titles_are_truncated() {
		assert_eq!(truncate_label("short", 30), "short");
		assert_eq!(truncate_label("abcdef", 3), "abc…");
		assert_eq!(truncate_label("ab cd", 3), "ab…");
		assert_eq!(truncate_label("ééééé", 5), "ééééé");
	}

	#[test]
	fn size_is_monotonic_in_quality() {
		let c = cfg();
		assert!(node_size(Some(2.0), &c) < node_size(Some(8.0), &c));
		assert_eq!(node_size(Some(1_000.0), &c), c.max_size);
		assert_eq!(node_size(Some(-50.0), &c), c.min_size);
		assert_eq!(node_size(Some(f64::NAN), &c), node_size(None, &c));
	}

	#[test]
	fn nan_quality_still_yields_equal_snapshots() {
		let records = vec![RawContentRecord {
			quality_score: Some(f64::NAN),
			..RawContentRecord::with_id("n")
		}];
		let first = normalize(&records, &[], &cfg()).snapshot;
		let second = normalize(&records, &[], &cfg()).snapshot;
		assert_eq!(first, second);
		assert_eq!(first.nodes()[0].record.quality_score, None);
	}

	#[test]
	fn edge_attributes_are_clamped_and_defaulted() {
		let c = cfg();
		let records = vec![RawContentRecord::with_id("a"), RawContentRecord::with_id("b")];
		let relations = vec![
			RawRelation::between("a", "b"),
			RawRelation {
				weight: Some(100.0),
				similarity: Some(0.0),
				shared_topics: vec!["rust".into()],
				..RawRelation::between("b", "a")
			},
		];
		let out = normalize(&records, &relations, &c);
		let edges = out.snapshot.edges();
		assert_eq!(edges[0].weight, c.default_weight * c.weight_scale);
		assert_eq!(edges[0].opacity, c.default_similarity * c.opacity_scale);
		assert_eq!(edges[1].weight, c.max_weight);
		assert_eq!(edges[1].opacity, c.min_opacity);
		assert_eq!(edges[1].shared_topics, vec!["rust".to_string()]);
	}

	#[test]
	fn parallel_relations_are_kept() {
		let records = vec![RawContentRecord::with_id("a"), RawContentRecord::with_id("b")];
		let relations = vec![RawRelation::between("a", "b"), RawRelation::between("a", "b")];
		assert_eq!(normalize(&records, &relations, &cfg()).snapshot.edges().len(), 2);
	}

	fn arb_record() -> impl Strategy<Value = RawContentRecord> {
		(
			proptest::option::of("[a-e]{0,2}"),
			proptest::option::of(proptest::num::f64::ANY),
			proptest::option::of("[a-z ]{0,40}"),
		)
			.prop_map(|(id, quality_score, title)| RawContentRecord {
				id: id.map(NodeId::from),
				quality_score,
				title,
				..RawContentRecord::default()
			})
	}

	fn arb_relation() -> impl Strategy<Value = RawRelation> {
		(
			proptest::option::of("[a-f]{0,2}"),
			proptest::option::of("[a-f]{0,2}"),
			proptest::option::of(proptest::num::f64::ANY),
		)
			.prop_map(|(s, t, similarity)| RawRelation {
				source: s.map(NodeId::from),
				target: t.map(NodeId::from),
				similarity,
				..RawRelation::default()
			})
	}

	proptest! {
		#[test]
		fn snapshot_is_referentially_consistent(
			records in proptest::collection::vec(arb_record(), 0..20),
			relations in proptest::collection::vec(arb_relation(), 0..40),
		) {
			let c = cfg();
			let out = normalize(&records, &relations, &c);
			let snap = &out.snapshot;
			for e in snap.edges() {
				prop_assert!(snap.contains(e.source.as_str()));
				prop_assert!(snap.contains(e.target.as_str()));
				prop_assert_ne!(&e.source, &e.target);
				prop_assert!(e.opacity >= c.min_opacity && e.opacity <= 1.0);
			}
			for n in snap.nodes() {
				prop_assert!(n.size >= c.min_size && n.size <= c.max_size);
				prop_assert!(n.label.chars().count() <= c.label_max_chars + 1);
			}
			let again = normalize(&records, &relations, &c);
			prop_assert_eq!(snap, &again.snapshot);
		}
	}
}

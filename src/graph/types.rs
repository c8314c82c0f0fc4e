//! Wire types received from the content API.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Identifier of a content record and of the graph node derived from it.
///
/// The backend serves integer ids while fixtures and tests use strings, so
/// both JSON numbers and strings deserialize into the same textual form.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
	/// Wraps an identifier without validation.
	pub fn new(id: impl Into<String>) -> Self {
		Self(id.into())
	}

	/// The identifier as text.
	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// `true` for identifiers that are empty or whitespace only.
	pub fn is_blank(&self) -> bool {
		self.0.trim().is_empty()
	}
}

impl fmt::Display for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl Borrow<str> for NodeId {
	fn borrow(&self) -> &str {
		&self.0
	}
}

impl AsRef<str> for NodeId {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

impl From<&str> for NodeId {
	fn from(id: &str) -> Self {
		Self(id.to_owned())
	}
}

impl From<String> for NodeId {
	fn from(id: String) -> Self {
		Self(id)
	}
}

impl From<i64> for NodeId {
	fn from(id: i64) -> Self {
		Self(id.to_string())
	}
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireId {
	Int(i64),
	Float(f64),
	Text(String),
}

impl<'de> Deserialize<'de> for NodeId {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		Ok(match WireId::deserialize(deserializer)? {
			WireId::Int(n) => Self(n.to_string()),
			WireId::Float(n) => Self(n.to_string()),
			WireId::Text(s) => Self(s),
		})
	}
}

fn nullable<'de, T: Deserialize<'de>, D: Deserializer<'de>>(
	deserializer: D,
) -> Result<Vec<T>, D::Error> {
	Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

fn nullable_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
	nullable(deserializer)
}

fn nullable_records<'de, D: Deserializer<'de>>(
	deserializer: D,
) -> Result<Vec<RawContentRecord>, D::Error> {
	nullable(deserializer)
}

fn nullable_relations<'de, D: Deserializer<'de>>(
	deserializer: D,
) -> Result<Vec<RawRelation>, D::Error> {
	nullable(deserializer)
}

/// One processed piece of browsing content, as exported by the backend.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawContentRecord {
	/// Missing or `null` ids are tolerated on the wire and filtered out later.
	pub id: Option<NodeId>,
	/// Page title; blank titles get a placeholder label.
	pub title: Option<String>,
	/// Category assigned by content analysis, e.g. `Tutorial`.
	pub content_type: Option<String>,
	/// Nominally 1..=10; anything else is clamped downstream.
	pub quality_score: Option<f64>,
	/// Short description of the content.
	#[serde(alias = "description")]
	pub summary: Option<String>,
	/// Key topics; these are the node's expandable sub-items.
	#[serde(alias = "key_topics", alias = "key_details", deserialize_with = "nullable_list")]
	pub topics: Vec<String>,
	/// Source URL.
	pub url: Option<String>,
	/// Time of the last visit, as sent by the backend.
	#[serde(alias = "last_visit")]
	pub visit_timestamp: Option<String>,
}

impl RawContentRecord {
	/// Record with only an identifier set.
	pub fn with_id(id: impl Into<NodeId>) -> Self {
		Self {
			id: Some(id.into()),
			..Self::default()
		}
	}

	/// The identifier, if present and not blank.
	pub fn valid_id(&self) -> Option<&NodeId> {
		self.id.as_ref().filter(|id| !id.is_blank())
	}
}

/// A pairwise relation between two content records.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawRelation {
	/// One endpoint.
	pub source: Option<NodeId>,
	/// The other endpoint; relations are undirected.
	pub target: Option<NodeId>,
	/// Raw strength, scaled and clamped into the edge width.
	pub weight: Option<f64>,
	/// Nominally 0..=1.
	pub similarity: Option<f64>,
	/// Topics both records have in common.
	#[serde(deserialize_with = "nullable_list")]
	pub shared_topics: Vec<String>,
}

impl RawRelation {
	/// Relation with both endpoints set and no optional attributes.
	pub fn between(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
		Self {
			source: Some(source.into()),
			target: Some(target.into()),
			..Self::default()
		}
	}
}

/// Export metadata attached by the backend; informational only.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportMetadata {
	/// Node count reported by the backend.
	pub total_nodes: Option<usize>,
	/// Edge count reported by the backend.
	pub total_edges: Option<usize>,
	/// Export timestamp.
	pub exported_at: Option<String>,
}

/// Full payload of `GET /api/knowledge-graph/export`.
///
/// Every export is a full replacement of the previous one, never a delta.
/// `nodes` and `edges` are required: the backend answers `{}` when the
/// export fails, and that must not decode as an empty graph.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphExport {
	/// Content records, one per node.
	#[serde(deserialize_with = "nullable_records")]
	pub nodes: Vec<RawContentRecord>,
	/// Relations between records.
	#[serde(deserialize_with = "nullable_relations")]
	pub edges: Vec<RawRelation>,
	/// Optional summary counts.
	#[serde(default)]
	pub metadata: Option<ExportMetadata>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn numeric_and_string_ids_deserialize_alike() {
		let a: NodeId = serde_json::from_str("42").unwrap();
		let b: NodeId = serde_json::from_str("\"42\"").unwrap();
		assert_eq!(a, b);
	}

	#[test]
	fn backend_export_shape_is_accepted() {
		let json = r#"{
			"nodes": [
				{"id": 1, "title": "Intro to Rust", "summary": "ownership",
				 "content_type": "Tutorial", "key_topics": ["rust"], "quality_score": 8,
				 "url": "https://example.org"},
				{"id": null, "title": "orphan", "key_topics": null}
			],
			"edges": [{"source": 1, "target": 2, "shared_topics": ["rust"]}],
			"metadata": {"total_nodes": 2, "total_edges": 1, "exported_at": "2025-06-14T10:00:00"}
		}"#;
		let export: GraphExport = serde_json::from_str(json).unwrap();
		assert_eq!(export.nodes.len(), 2);
		assert_eq!(export.nodes[0].topics, vec!["rust"]);
		assert_eq!(export.nodes[0].quality_score, Some(8.0));
		assert!(export.nodes[1].valid_id().is_none());
		assert_eq!(export.edges[0].target, Some(NodeId::from("2")));
	}

	#[test]
	fn failure_payload_is_not_an_export() {
		assert!(serde_json::from_str::<GraphExport>("{}").is_err());
		assert!(serde_json::from_str::<GraphExport>(r#"{"nodes": []}"#).is_err());
		let empty: GraphExport = serde_json::from_str(r#"{"nodes": [], "edges": null}"#).unwrap();
		assert!(empty.nodes.is_empty() && empty.metadata.is_none());
	}

	#[test]
	fn blank_ids_are_not_valid() {
		let record = RawContentRecord::with_id("  ");
		assert!(record.valid_id().is_none());
	}
}

//! End-to-end checks of the graph pipeline through the public API.

use mind_canvas::api::FetchError;
use mind_canvas::graph::{
	ClusterLabel, GraphExport, GraphSession, NodeId, NormalizeConfig, RawContentRecord, RawRelation,
	SnapshotUpdate, classify, normalize, summarize,
};

fn record(id: &str, title: &str, topics: &[&str]) -> RawContentRecord {
	RawContentRecord {
		title: Some(title.into()),
		topics: topics.iter().map(|t| t.to_string()).collect(),
		..RawContentRecord::with_id(id)
	}
}

fn backend_export() -> GraphExport {
	serde_json::from_str(
		r#"{
		"nodes": [
			{"id": 1, "title": "React Hooks Tutorial", "key_topics": ["react", "hooks"],
			 "content_type": "Tutorial", "quality_score": 9, "summary": "useState and useEffect"},
			{"id": 2, "title": "Django REST framework", "key_topics": ["python", "api"],
			 "content_type": "Documentation", "quality_score": 7},
			{"id": 3, "title": "Postgres indexing deep dive", "key_topics": ["database", "sql"],
			 "quality_score": 6},
			{"title": "record without id"}
		],
		"edges": [
			{"source": 1, "target": 2, "shared_topics": ["api"]},
			{"source": 2, "target": 3, "similarity": 0.9},
			{"source": 3, "target": 3},
			{"source": 1, "target": 404}
		],
		"metadata": {"total_nodes": 4, "total_edges": 4}
	}"#,
	)
	.unwrap()
}

#[test]
fn react_hooks_tutorial_classifies_as_javascript() {
	let a = record("a", "React Hooks Tutorial", &["react", "hooks"]);
	assert_eq!(classify(&a), ClusterLabel::JavaScript);
}

#[test]
fn dangling_edge_to_unknown_node_is_dropped() {
	let records = vec![RawContentRecord::with_id("1"), RawContentRecord::with_id("2")];
	let relations = vec![RawRelation::between("1", "2"), RawRelation::between("1", "99")];
	let snapshot = normalize(&records, &relations, &NormalizeConfig::default()).snapshot;
	assert_eq!(snapshot.nodes().len(), 2);
	assert_eq!(snapshot.edges().len(), 1);
}

#[test]
fn selection_is_cleared_when_its_node_disappears() {
	let mut session = GraphSession::default();
	session.apply_export(Ok(GraphExport {
		nodes: vec![RawContentRecord::with_id("x"), RawContentRecord::with_id("y")],
		..GraphExport::default()
	}));
	session.on_node_select("x").unwrap();
	assert_eq!(session.interaction().selected(), Some(&NodeId::from("x")));

	session.apply_export(Ok(GraphExport {
		nodes: vec![RawContentRecord::with_id("y")],
		..GraphExport::default()
	}));
	assert_eq!(session.interaction().selected(), None);
}

#[test]
fn even_cluster_split_is_ordered_by_declaration() {
	let records = vec![
		record("1", "Kubernetes operators", &[]),
		record("2", "Pandas groupby", &[]),
		record("3", "TypeScript generics", &[]),
		record("4", "Docker compose", &[]),
		record("5", "Flask blueprints", &[]),
		record("6", "Svelte stores", &[]),
	];
	let summary = summarize(&normalize(&records, &[], &NormalizeConfig::default()).snapshot);
	let order: Vec<(ClusterLabel, usize)> =
		summary.clusters.iter().map(|c| (c.cluster, c.count)).collect();
	assert_eq!(
		order,
		vec![
			(ClusterLabel::JavaScript, 2),
			(ClusterLabel::Python, 2),
			(ClusterLabel::DevOps, 2)
		]
	);
}

#[test]
fn backend_export_flows_through_the_session() {
	let mut session = GraphSession::default();
	assert_eq!(session.apply_export(Ok(backend_export())), SnapshotUpdate::Replaced);

	let snapshot = session.snapshot();
	assert_eq!(snapshot.nodes().len(), 3);
	assert_eq!(snapshot.edges().len(), 2);
	assert_eq!(session.diagnostics().len(), 3);

	let clusters: Vec<ClusterLabel> = snapshot.nodes().iter().map(|n| n.cluster).collect();
	assert_eq!(
		clusters,
		vec![ClusterLabel::JavaScript, ClusterLabel::Python, ClusterLabel::Database]
	);

	let summary = session.summary();
	assert_eq!(summary.total_nodes, 3);
	assert_eq!(summary.total_edges, 2);
	assert_eq!(summary.density, 66.7);

	let stats = session.network_stats(1);
	assert_eq!(stats.components, 1);
	assert_eq!(stats.central_nodes, vec![(NodeId::from("2"), 2)]);
}

#[test]
fn resubmitting_the_same_export_is_stable() {
	let mut session = GraphSession::default();
	session.apply_export(Ok(backend_export()));
	let first = session.snapshot().clone();
	session.on_node_hover(Some("1")).unwrap();
	session.on_node_select("2").unwrap();

	assert_eq!(session.apply_export(Ok(backend_export())), SnapshotUpdate::Unchanged);
	assert!(session.snapshot().ptr_eq(&first));
	assert_eq!(session.interaction().hovered(), None);
	assert_eq!(session.interaction().selected(), Some(&NodeId::from("2")));
	assert_eq!(session.revision(), 1);
}

#[test]
fn failed_refresh_serves_the_last_good_graph() {
	let mut session = GraphSession::default();
	session.apply_export(Ok(backend_export()));
	let update = session.apply_export(Err(FetchError::Network {
		url: "http://127.0.0.1:8090/api/knowledge-graph/export".into(),
		message: "connection refused".into(),
	}));
	assert_eq!(update, SnapshotUpdate::Retained);
	assert_eq!(session.snapshot().nodes().len(), 3);

	session.apply_export(Ok(GraphExport::default()));
	assert!(session.snapshot().is_empty());
	assert!(session.last_error().is_none());
}

#[test]
fn empty_object_from_a_failed_export_is_not_a_graph() {
	let mut session = GraphSession::default();
	session.apply_export(Ok(backend_export()));
	session.on_node_select("1").unwrap();

	let decoded = serde_json::from_str::<GraphExport>("{}").map_err(|e| FetchError::Decode {
		url: "http://127.0.0.1:8090/api/knowledge-graph/export".into(),
		message: e.to_string(),
	});
	assert_eq!(session.apply_export(decoded), SnapshotUpdate::Retained);
	assert_eq!(session.snapshot().nodes().len(), 3);
	assert_eq!(session.interaction().selected(), Some(&NodeId::from("1")));
}

//! The stateful owner tying the pipeline to interaction state.

use log::{debug, info, warn};

use super::interaction::{InteractionError, InteractionState, VisualOverrides, visual_overrides_for};
use super::normalize::{Diagnostic, NormalizeConfig, normalize};
use super::snapshot::{GraphNode, GraphSnapshot};
use super::stats::{ClusterSummary, NetworkStats, analyze_network, summarize};
use super::types::{GraphExport, RawContentRecord};
use crate::api::FetchError;

/// What [`GraphSession::apply_export`] did with the current snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SnapshotUpdate {
	/// New data differed; the snapshot was swapped.
	Replaced,
	/// New data produced an equal snapshot; the old value was kept.
	Unchanged,
	/// The fetch failed; the last valid snapshot was kept.
	Retained,
}

/// One viewing session: the current snapshot plus its interaction state.
#[derive(Clone, Debug, Default)]
pub struct GraphSession {
	config: NormalizeConfig,
	snapshot: GraphSnapshot,
	interaction: InteractionState,
	diagnostics: Vec<Diagnostic>,
	last_error: Option<FetchError>,
	revision: u64,
}

impl GraphSession {
	/// Empty session that normalizes with `config`.
	pub fn new(config: NormalizeConfig) -> Self {
		Self {
			config,
			..Self::default()
		}
	}

	/// The snapshot currently on screen.
	pub fn snapshot(&self) -> &GraphSnapshot {
		&self.snapshot
	}

	/// Current selection, expansion and hover.
	pub fn interaction(&self) -> &InteractionState {
		&self.interaction
	}

	/// Findings from the most recent successful recomputation.
	pub fn diagnostics(&self) -> &[Diagnostic] {
		&self.diagnostics
	}

	/// Error of the most recent fetch, cleared by the next success.
	pub fn last_error(&self) -> Option<&FetchError> {
		self.last_error.as_ref()
	}

	/// Bumped every time the snapshot is replaced.
	pub fn revision(&self) -> u64 {
		self.revision
	}

	/// Feeds the outcome of one export fetch into the session.
	///
	/// Every successful export is a full replacement. Hover is cancelled
	/// even when the data turns out unchanged; selection survives only if
	/// its node does.
	pub fn apply_export(&mut self, result: Result<GraphExport, FetchError>) -> SnapshotUpdate {
		let export = match result {
			Ok(export) => export,
			Err(err) => {
				warn!(
					"graph export unavailable, keeping revision {}: {}",
					self.revision, err
				);
				self.last_error = Some(err);
				return SnapshotUpdate::Retained;
			}
		};
		self.last_error = None;

		let out = normalize(&export.nodes, &export.edges, &self.config);
		self.diagnostics = out.diagnostics;
		self.interaction.on_snapshot(&out.snapshot);

		if out.snapshot == self.snapshot {
			debug!("graph export unchanged at revision {}", self.revision);
			return SnapshotUpdate::Unchanged;
		}
		self.snapshot = out.snapshot;
		self.revision += 1;
		info!(
			"graph revision {}: {} nodes, {} edges ({} diagnostics)",
			self.revision,
			self.snapshot.nodes().len(),
			self.snapshot.edges().len(),
			self.diagnostics.len()
		);
		SnapshotUpdate::Replaced
	}

	/// Renderer callback: a node was clicked.
	pub fn on_node_select(&mut self, id: &str) -> Result<(), InteractionError> {
		self.interaction.select(&self.snapshot, Some(id))
	}

	/// Renderer callback: empty canvas was clicked.
	pub fn on_background_click(&mut self) {
		self.interaction.select(&self.snapshot, None).ok();
	}

	/// Renderer callback: pointer entered a node, or left all nodes.
	pub fn on_node_hover(&mut self, id: Option<&str>) -> Result<(), InteractionError> {
		self.interaction.set_hover(&self.snapshot, id)
	}

	/// Renderer callback: pan or zoom moved the view.
	pub fn on_viewport_change(&mut self) {
		self.interaction.on_viewport_change();
	}

	/// Shows or hides the topics of `id`.
	pub fn toggle_expand(&mut self, id: &str) -> Result<bool, InteractionError> {
		self.interaction.toggle_expand(&self.snapshot, id)
	}

	/// Drops all interaction state; the snapshot stays.
	pub fn reset(&mut self) {
		self.interaction.reset();
	}

	/// The selected node of the current snapshot.
	pub fn selected_node(&self) -> Option<&GraphNode> {
		self.interaction
			.selected()
			.and_then(|id| self.snapshot.node(id.as_str()))
	}

	/// Border overrides for the renderer.
	pub fn overrides(&self) -> VisualOverrides {
		visual_overrides_for(&self.snapshot, &self.interaction)
	}

	/// Legend counts for the current snapshot.
	pub fn summary(&self) -> ClusterSummary {
		summarize(&self.snapshot)
	}

	/// Network statistics with the `top_n` most connected nodes.
	pub fn network_stats(&self, top_n: usize) -> NetworkStats {
		analyze_network(&self.snapshot, top_n)
	}

	/// Nodes of the current snapshot matching fetched related content.
	pub fn related_in_snapshot<'a>(&'a self, related: &[RawContentRecord]) -> Vec<&'a GraphNode> {
		related
			.iter()
			.filter_map(|r| r.valid_id())
			.filter_map(|id| self.snapshot.node(id.as_str()))
			.collect()
	}
}

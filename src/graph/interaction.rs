//! Selection, expansion and hover state.
//!
//! Transitions:
//!
//! | operation            | selected            | expanded            | hovered  |
//! |----------------------|---------------------|---------------------|----------|
//! | `select(Some(id))`   | `id` (if present)   | -                   | -        |
//! | `select(None)`       | cleared             | -                   | -        |
//! | `toggle_expand(id)`  | -                   | flips `id`          | -        |
//! | `set_hover(..)`      | -                   | -                   | replaced |
//! | `on_viewport_change` | -                   | -                   | cleared  |
//! | `on_snapshot(s)`     | kept iff in `s`     | pruned to `s`       | cleared  |
//! | `reset()`            | cleared             | cleared             | cleared  |
//!
//! Operations on ids absent from the snapshot leave the state untouched.

use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;

use super::snapshot::GraphSnapshot;
use super::types::NodeId;

const SELECTED_BORDER: (f64, &str) = (4.0, "#ffd54f");
const HOVERED_BORDER: (f64, &str) = (2.5, "#ffffff");
const EXPANDED_BORDER: (f64, &str) = (2.5, "#4fc3f7");
const NEIGHBOR_BORDER: (f64, &str) = (1.5, "#ffe082");

/// Caller passed an identifier no node could ever have.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InteractionError {
	/// An empty or whitespace id reached `operation`.
	#[error("{operation} called with an empty node id")]
	EmptyNodeId {
		/// Name of the rejected operation.
		operation: &'static str,
	},
}

/// Per-node styling to merge over the base render style.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisualOverride {
	/// Stroke width in pixels.
	pub border_width: f64,
	/// CSS color of the stroke.
	pub border_color: &'static str,
}

impl From<(f64, &'static str)> for VisualOverride {
	fn from((border_width, border_color): (f64, &'static str)) -> Self {
		Self {
			border_width,
			border_color,
		}
	}
}

/// Overrides keyed by node id.
pub type VisualOverrides = BTreeMap<NodeId, VisualOverride>;

/// Session-local view state. Holds ids only, never records.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InteractionState {
	selected: Option<NodeId>,
	expanded: BTreeSet<NodeId>,
	hovered: Option<NodeId>,
}

fn require_id<'a>(id: &'a str, operation: &'static str) -> Result<&'a str, InteractionError> {
	if id.trim().is_empty() {
		Err(InteractionError::EmptyNodeId { operation })
	} else {
		Ok(id)
	}
}

impl InteractionState {
	/// Nothing selected, expanded or hovered.
	pub fn new() -> Self {
		Self::default()
	}

	/// The selected node, if any.
	pub fn selected(&self) -> Option<&NodeId> {
		self.selected.as_ref()
	}

	/// The node under the pointer, if any.
	pub fn hovered(&self) -> Option<&NodeId> {
		self.hovered.as_ref()
	}

	/// Nodes whose sub-items are shown.
	pub fn expanded(&self) -> &BTreeSet<NodeId> {
		&self.expanded
	}

	/// Whether the sub-items of `id` are shown.
	pub fn is_expanded(&self, id: &str) -> bool {
		self.expanded.contains(id)
	}

	/// Replaces the selection, or clears it with `None`.
	///
	/// Selecting an id that is not in `snapshot` keeps the current selection.
	pub fn select(&mut self, snapshot: &GraphSnapshot, id: Option<&str>) -> Result<(), InteractionError> {
		match id {
			None => self.selected = None,
			Some(id) => {
				let id = require_id(id, "select")?;
				if let Some(node) = snapshot.node(id) {
					self.selected = Some(node.id.clone());
				}
			}
		}
		Ok(())
	}

	/// Flips expansion of a node with sub-items. Returns whether it is now
	/// expanded; leaf and unknown nodes stay collapsed.
	pub fn toggle_expand(&mut self, snapshot: &GraphSnapshot, id: &str) -> Result<bool, InteractionError> {
		let id = require_id(id, "toggle_expand")?;
		let Some(node) = snapshot.node(id).filter(|n| n.has_sub_items()) else {
			return Ok(false);
		};
		if self.expanded.remove(id) {
			Ok(false)
		} else {
			self.expanded.insert(node.id.clone());
			Ok(true)
		}
	}

	/// Replaces the hovered node, or clears it with `None`.
	pub fn set_hover(&mut self, snapshot: &GraphSnapshot, id: Option<&str>) -> Result<(), InteractionError> {
		match id {
			None => self.hovered = None,
			Some(id) => {
				let id = require_id(id, "set_hover")?;
				if let Some(node) = snapshot.node(id) {
					self.hovered = Some(node.id.clone());
				}
			}
		}
		Ok(())
	}

	/// Pan or zoom invalidates on-screen hover positions.
	pub fn on_viewport_change(&mut self) {
		self.hovered = None;
	}

	/// Reconciles with a freshly computed snapshot.
	pub fn on_snapshot(&mut self, snapshot: &GraphSnapshot) {
		self.hovered = None;
		if self.selected.as_ref().is_some_and(|id| !snapshot.contains(id.as_str())) {
			self.selected = None;
		}
		self.expanded.retain(|id| {
			snapshot
				.node(id.as_str())
				.is_some_and(|n| n.has_sub_items())
		});
	}

	/// Clears selection, expansion and hover.
	pub fn reset(&mut self) {
		self.selected = None;
		self.expanded.clear();
		self.hovered = None;
	}
}

/// Border overrides implied by `state`, restricted to nodes of `snapshot`.
///
/// Precedence: selected, hovered, expanded, neighbor of the selection.
pub fn visual_overrides_for(snapshot: &GraphSnapshot, state: &InteractionState) -> VisualOverrides {
	let mut out = VisualOverrides::new();
	let mut put = |id: &NodeId, style: (f64, &'static str)| {
		if snapshot.contains(id.as_str()) {
			out.insert(id.clone(), style.into());
		}
	};

	if let Some(selected) = &state.selected {
		for n in snapshot.neighbors(selected.as_str()) {
			put(n, NEIGHBOR_BORDER);
		}
	}
	for id in &state.expanded {
		put(id, EXPANDED_BORDER);
	}
	if let Some(id) = &state.hovered {
		put(id, HOVERED_BORDER);
	}
	if let Some(id) = &state.selected {
		put(id, SELECTED_BORDER);
	}
	out
}

//! Content graph pipeline: classification, normalization, assembly,
//! interaction state and summaries.
//!
//! ```text
//! records + relations ─▶ normalize (classify) ─▶ GraphSnapshot ─┬─▶ InteractionState
//!                                                               └─▶ summarize
//! ```
//!
//! Everything here is synchronous and free of I/O. [`GraphSession`] is the
//! only stateful piece.

pub mod cluster;
pub mod interaction;
pub mod normalize;
pub mod session;
pub mod snapshot;
pub mod stats;
pub mod types;

pub use cluster::{ClusterLabel, classify};
pub use interaction::{
	InteractionError, InteractionState, VisualOverride, VisualOverrides, visual_overrides_for,
};
pub use normalize::{Diagnostic, DropReason, NormalizeConfig, Normalized, normalize};
pub use session::{GraphSession, SnapshotUpdate};
pub use snapshot::{GraphEdge, GraphNode, GraphSnapshot};
pub use stats::{ClusterCount, ClusterSummary, DEFAULT_TOP_N, NetworkStats, analyze_network, summarize};
pub use types::{GraphExport, NodeId, RawContentRecord, RawRelation};

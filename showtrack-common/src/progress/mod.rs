//! Watch-progress aggregation
//!
//! Joins a scope's episodes against a viewer's watched markers, filters and
//! orders them for display, and derives completion state per show and per
//! universe. Nothing here touches the store; see [`crate::tracker`] for the
//! loading and toggle side.

pub mod board;
pub mod filter;
pub mod order;
pub mod status;
pub mod updating;

pub use board::{EpisodeRow, ProgressBoard, Scope};
pub use filter::{EpisodeFilter, ScopeKind, StatusFilter};
pub use status::{ProgressSummary, ShowProgress, UniverseProgress, WatchStatus};
pub use updating::UpdatingRows;

//! # showtrack common library
//!
//! Shared code for the showtrack crates:
//! - Database schema and row models
//! - Store capability and its SQLite implementation
//! - Watch-progress aggregation (filtering, ordering, completion status)
//! - Watched-marker toggling with per-row in-flight locking
//! - Configuration loading

pub mod config;
pub mod db;
pub mod error;
pub mod progress;
pub mod store;
pub mod time;
pub mod tracker;

pub use error::{Error, Result};
pub use tracker::{ProgressError, ToggleOutcome, WatchTracker};

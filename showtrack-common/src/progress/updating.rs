//! Per-row in-flight toggle flags

use std::collections::HashMap;

use crate::db::EpisodeId;

/// Episode id -> "a toggle for this row is in flight"
///
/// Only the row being toggled is locked; every other row stays available.
#[derive(Debug, Clone, Default)]
pub struct UpdatingRows {
    rows: HashMap<EpisodeId, bool>,
}

impl UpdatingRows {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `episode_id` as in flight
    ///
    /// Returns `false` (and changes nothing) if it already was.
    pub fn begin(&mut self, episode_id: EpisodeId) -> bool {
        let flag = self.rows.entry(episode_id).or_insert(false);
        if *flag {
            return false;
        }
        *flag = true;
        true
    }

    pub fn finish(&mut self, episode_id: EpisodeId) {
        self.rows.remove(&episode_id);
    }

    pub fn is_updating(&self, episode_id: EpisodeId) -> bool {
        self.rows.get(&episode_id).copied().unwrap_or(false)
    }

    pub fn is_empty(&self) -> bool {
        !self.rows.values().any(|v| *v)
    }
}

//! Loading progress boards and toggling watched markers
//!
//! The viewer is always passed in explicitly. `None` means the request is
//! unauthenticated: boards load with every episode unwatched and toggles are
//! refused before the store is touched.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::db::{Episode, EpisodeId, Show, ShowId, Universe, UniverseId, Viewer};
use crate::progress::{ProgressBoard, Scope, UpdatingRows};
use crate::store::WatchStore;
use crate::time::now;

/// Failures of a single toggle; none of them alter stored or local state
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProgressError {
    /// No viewer identity; rejected before any store call
    #[error("You must be signed in to track episodes")]
    Unauthenticated,

    /// Another toggle for the same row has not finished yet
    #[error("Watch status for episode {0} is already being updated")]
    ToggleInFlight(EpisodeId),

    /// The store rejected the write
    #[error("Failed to update watch status: {0}")]
    RequestFailed(String),
}

/// Confirmed result of a toggle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToggleOutcome {
    pub episode_id: EpisodeId,
    pub watched: bool,
    /// Server-assigned when marking watched
    pub watched_at: Option<DateTime<Utc>>,
}

type InFlightMap = Mutex<HashMap<Uuid, UpdatingRows>>;

/// Holds one row's in-flight flag; clears it on drop
pub struct RowLock<'a> {
    rows: &'a InFlightMap,
    viewer_id: Uuid,
    episode_id: EpisodeId,
}

impl Drop for RowLock<'_> {
    fn drop(&mut self) {
        let mut map = self.rows.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(rows) = map.get_mut(&self.viewer_id) {
            rows.finish(self.episode_id);
            if rows.is_empty() {
                map.remove(&self.viewer_id);
            }
        }
    }
}

/// Store handle plus the per-viewer in-flight toggle map
pub struct WatchTracker<S> {
    store: Arc<S>,
    in_flight: InFlightMap,
}

impl<S: WatchStore> WatchTracker<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The show and a board over all of its episodes
    pub async fn load_show(
        &self,
        viewer: Option<&Viewer>,
        show_id: ShowId,
    ) -> crate::Result<(Show, ProgressBoard)> {
        let show = self.store.show(show_id).await?;
        let episodes = self.store.episodes_for_show(show_id).await?;
        let board = self.build_board(viewer, Scope::Show(show_id), episodes).await?;
        Ok((show, board))
    }

    /// The universe and a board over all episodes of every member show
    ///
    /// Member shows without episodes still appear in the board's breakdown.
    pub async fn load_universe(
        &self,
        viewer: Option<&Viewer>,
        universe_id: UniverseId,
    ) -> crate::Result<(Universe, ProgressBoard)> {
        let universe = self.store.universe(universe_id).await?;
        let members = self.store.shows_in_universe(universe_id).await?;
        let episodes = self.store.episodes_for_universe(universe_id).await?;
        let board = self
            .build_board(viewer, Scope::Universe(universe_id), episodes)
            .await?
            .with_members(members.into_iter().map(|s| (s.id, s.title)));
        Ok((universe, board))
    }

    async fn build_board(
        &self,
        viewer: Option<&Viewer>,
        scope: Scope,
        episodes: Vec<Episode>,
    ) -> crate::Result<ProgressBoard> {
        let watched = match viewer {
            Some(viewer) => {
                let ids: Vec<EpisodeId> = episodes.iter().map(|e| e.id).collect();
                self.store.watched_episode_ids(viewer, &ids).await?
            }
            None => Vec::new(),
        };

        debug!(
            "Loaded {:?}: {} episodes, {} watched",
            scope,
            episodes.len(),
            watched.len()
        );
        Ok(ProgressBoard::new(scope, episodes, watched))
    }

    /// Snapshot of the viewer's in-flight rows
    pub fn updating_rows(&self, viewer: Option<&Viewer>) -> UpdatingRows {
        let Some(viewer) = viewer else {
            return UpdatingRows::new();
        };
        let map = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        map.get(&viewer.id).cloned().unwrap_or_default()
    }

    /// Mark a row in flight for `viewer`
    ///
    /// Fails with `ToggleInFlight` if it already is. The flag is cleared
    /// when the returned lock is dropped.
    pub fn lock_row(
        &self,
        viewer: &Viewer,
        episode_id: EpisodeId,
    ) -> Result<RowLock<'_>, ProgressError> {
        let mut map = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if !map.entry(viewer.id).or_default().begin(episode_id) {
            return Err(ProgressError::ToggleInFlight(episode_id));
        }

        Ok(RowLock {
            rows: &self.in_flight,
            viewer_id: viewer.id,
            episode_id,
        })
    }

    /// Set the viewer's watched state for one episode
    ///
    /// `true` upserts the marker with a fresh `watched_at`; `false` deletes it
    /// (a missing marker is fine). Both are idempotent.
    pub async fn set_watched(
        &self,
        viewer: Option<&Viewer>,
        episode_id: EpisodeId,
        desired: bool,
    ) -> Result<ToggleOutcome, ProgressError> {
        let viewer = viewer.ok_or(ProgressError::Unauthenticated)?;
        let _lock = self.lock_row(viewer, episode_id)?;

        let watched_at = desired.then(now);
        let result = match watched_at {
            Some(at) => self.store.upsert_watched(viewer, episode_id, at).await,
            None => self.store.delete_watched(viewer, episode_id).await,
        };

        if let Err(e) = result {
            warn!(
                "Watch status update failed for episode {} (viewer {}): {}",
                episode_id, viewer.id, e
            );
            return Err(ProgressError::RequestFailed(e.to_string()));
        }

        info!(
            "Episode {} marked {} for viewer {}",
            episode_id,
            if desired { "watched" } else { "unwatched" },
            viewer.id
        );

        Ok(ToggleOutcome {
            episode_id,
            watched: desired,
            watched_at,
        })
    }

    /// Toggle through the store, then apply the confirmed state to `board`
    ///
    /// On failure the board is left exactly as it was.
    pub async fn toggle_on_board(
        &self,
        viewer: Option<&Viewer>,
        board: &mut ProgressBoard,
        episode_id: EpisodeId,
    ) -> Result<ToggleOutcome, ProgressError> {
        let desired = !board.is_watched(episode_id);
        let outcome = self.set_watched(viewer, episode_id, desired).await?;
        board.apply_toggle(outcome.episode_id, outcome.watched);
        Ok(outcome)
    }
}

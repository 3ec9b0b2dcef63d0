//! Persistent store capability
//!
//! The aggregator only ever sees the store through [`WatchStore`]: read-all
//! queries for a scope and single-row marker mutations. [`SqliteStore`] is
//! the implementation used by the service and the tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::db::{Episode, EpisodeId, Show, ShowId, Universe, UniverseId, Viewer, WatchMarker};
use crate::Result;

mod sqlite;

pub use sqlite::{NewEpisode, NewShow, NewUniverse, SqliteStore};

#[async_trait]
pub trait WatchStore: Send + Sync {
    async fn show(&self, show_id: ShowId) -> Result<Show>;

    async fn universe(&self, universe_id: UniverseId) -> Result<Universe>;

    /// All episodes of one show, season/episode order
    async fn episodes_for_show(&self, show_id: ShowId) -> Result<Vec<Episode>>;

    /// All episodes of every show with a membership row for the universe
    async fn episodes_for_universe(&self, universe_id: UniverseId) -> Result<Vec<Episode>>;

    /// Subset of `episode_ids` the viewer has marked watched
    async fn watched_episode_ids(
        &self,
        viewer: &Viewer,
        episode_ids: &[EpisodeId],
    ) -> Result<Vec<EpisodeId>>;

    /// Every marker the viewer holds
    async fn markers(&self, viewer: &Viewer) -> Result<Vec<WatchMarker>>;

    /// Insert or refresh the (viewer, episode) marker
    async fn upsert_watched(
        &self,
        viewer: &Viewer,
        episode_id: EpisodeId,
        watched_at: DateTime<Utc>,
    ) -> Result<()>;

    /// Remove the (viewer, episode) marker; absent marker is not an error
    async fn delete_watched(&self, viewer: &Viewer, episode_id: EpisodeId) -> Result<()>;

    /// Public shows, newest first
    async fn public_shows(&self) -> Result<Vec<Show>>;

    async fn tracked_show_ids(&self, viewer: &Viewer) -> Result<Vec<ShowId>>;

    /// Add a show to the viewer's tracking list (idempotent)
    async fn track_show(&self, viewer: &Viewer, show_id: ShowId) -> Result<()>;

    /// All universes, newest first
    async fn universes(&self) -> Result<Vec<Universe>>;

    async fn shows_in_universe(&self, universe_id: UniverseId) -> Result<Vec<Show>>;

    /// Shows that could still be added to the universe, newest first
    async fn shows_not_in_universe(&self, universe_id: UniverseId) -> Result<Vec<Show>>;

    /// Link a show to a universe (idempotent)
    async fn add_show_to_universe(&self, show_id: ShowId, universe_id: UniverseId) -> Result<()>;

    /// Creator-only
    async fn set_universe_public(
        &self,
        viewer: &Viewer,
        universe_id: UniverseId,
        is_public: bool,
    ) -> Result<()>;

    /// Creator-only; memberships are removed with the universe
    async fn delete_universe(&self, viewer: &Viewer, universe_id: UniverseId) -> Result<()>;
}

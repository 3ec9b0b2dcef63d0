//! Show and universe dashboards
//!
//! Each request loads the full episode pool for the scope, joins the viewer's
//! markers, then applies the filter and ordering. Summaries always cover the
//! full pool, not the filtered view.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use showtrack_common::progress::{
    EpisodeFilter, EpisodeRow, ProgressSummary, ShowProgress, StatusFilter,
};

use super::{ApiError, MaybeViewer};
use crate::AppState;

/// Query parameters shared by both dashboards
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    /// Case-insensitive substring
    #[serde(default)]
    pub search: String,

    /// Exact show title or "all"; universe dashboard only
    pub show: Option<String>,

    /// "all", "watched" or "unwatched"
    #[serde(default)]
    pub status: String,
}

impl DashboardQuery {
    fn filter(&self) -> Result<EpisodeFilter, ApiError> {
        let status: StatusFilter = self.status.parse()?;
        Ok(EpisodeFilter::new(&self.search, self.show.as_deref(), status))
    }
}

#[derive(Debug, Serialize)]
pub struct ShowDashboard {
    pub show_id: Uuid,
    pub title: String,
    pub summary: ProgressSummary,
    pub episodes: Vec<EpisodeRow>,
}

#[derive(Debug, Serialize)]
pub struct UniverseDashboard {
    pub universe_id: Uuid,
    pub name: String,
    pub summary: ProgressSummary,
    /// One entry per member show, sorted by title
    pub shows: Vec<ShowProgress>,
    /// Values accepted by the `show` query parameter besides "all"
    pub show_options: Vec<String>,
    pub episodes: Vec<EpisodeRow>,
}

/// GET /api/shows/:id/dashboard
pub async fn show_dashboard(
    State(state): State<AppState>,
    viewer: MaybeViewer,
    Path(show_id): Path<Uuid>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<ShowDashboard>, ApiError> {
    let filter = query.filter()?;
    let (show, board) = state.tracker.load_show(viewer.get(), show_id).await?;

    let updating = state.tracker.updating_rows(viewer.get());
    let episodes = board.view(&filter, &updating);
    debug!(
        "Show dashboard {}: {} of {} episodes shown",
        show_id,
        episodes.len(),
        board.episodes().len()
    );

    Ok(Json(ShowDashboard {
        show_id,
        title: show.title,
        summary: board.summary(),
        episodes,
    }))
}

/// GET /api/universes/:id/dashboard
pub async fn universe_dashboard(
    State(state): State<AppState>,
    viewer: MaybeViewer,
    Path(universe_id): Path<Uuid>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<UniverseDashboard>, ApiError> {
    let filter = query.filter()?;
    let (universe, board) = state
        .tracker
        .load_universe(viewer.get(), universe_id)
        .await?;

    let updating = state.tracker.updating_rows(viewer.get());
    let episodes = board.view(&filter, &updating);
    let (summary, shows) = match board.universe_progress() {
        Some(progress) => (progress.summary, progress.shows),
        None => (board.summary(), board.show_breakdown()),
    };

    Ok(Json(UniverseDashboard {
        universe_id,
        name: universe.name,
        summary,
        shows,
        show_options: board.show_options(),
        episodes,
    }))
}

//! Universe listing, membership and creator-only management

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use showtrack_common::db::{Show, Universe};
use showtrack_common::store::WatchStore;

use super::{ApiError, MaybeViewer};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct AddShowRequest {
    pub show_id: Uuid,
}

#[derive(Debug, Default, Deserialize)]
pub struct AvailableShowsQuery {
    /// Case-insensitive title substring
    #[serde(default)]
    pub search: String,
}

#[derive(Debug, Deserialize)]
pub struct VisibilityRequest {
    pub is_public: bool,
}

/// GET /api/universes
///
/// Public universes plus any private ones the viewer created.
pub async fn list_universes(
    State(state): State<AppState>,
    viewer: MaybeViewer,
) -> Result<Json<Vec<Universe>>, ApiError> {
    let universes = state
        .store()
        .universes()
        .await?
        .into_iter()
        .filter(|u| u.is_public || viewer.get().is_some_and(|v| u.is_owned_by(v)))
        .collect();
    Ok(Json(universes))
}

/// GET /api/universes/:id/available-shows?search=
pub async fn available_shows(
    State(state): State<AppState>,
    Path(universe_id): Path<Uuid>,
    Query(query): Query<AvailableShowsQuery>,
) -> Result<Json<Vec<Show>>, ApiError> {
    let store = state.store();
    store.universe(universe_id).await?;

    let needle = query.search.trim().to_lowercase();
    let shows = store
        .shows_not_in_universe(universe_id)
        .await?
        .into_iter()
        .filter(|s| needle.is_empty() || s.title.to_lowercase().contains(&needle))
        .collect();
    Ok(Json(shows))
}

/// POST /api/universes/:id/shows
pub async fn add_show_to_universe(
    State(state): State<AppState>,
    viewer: MaybeViewer,
    Path(universe_id): Path<Uuid>,
    Json(request): Json<AddShowRequest>,
) -> Result<StatusCode, ApiError> {
    let viewer = viewer.0.ok_or(ApiError::Unauthenticated)?;
    state
        .store()
        .add_show_to_universe(request.show_id, universe_id)
        .await?;
    info!(
        "Viewer {} added show {} to universe {}",
        viewer.id, request.show_id, universe_id
    );
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/universes/:id/visibility
pub async fn set_universe_visibility(
    State(state): State<AppState>,
    viewer: MaybeViewer,
    Path(universe_id): Path<Uuid>,
    Json(request): Json<VisibilityRequest>,
) -> Result<StatusCode, ApiError> {
    let viewer = viewer.0.ok_or(ApiError::Unauthenticated)?;
    state
        .store()
        .set_universe_public(&viewer, universe_id, request.is_public)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/universes/:id
pub async fn delete_universe(
    State(state): State<AppState>,
    viewer: MaybeViewer,
    Path(universe_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let viewer = viewer.0.ok_or(ApiError::Unauthenticated)?;
    state.store().delete_universe(&viewer, universe_id).await?;
    info!("Viewer {} deleted universe {}", viewer.id, universe_id);
    Ok(StatusCode::NO_CONTENT)
}

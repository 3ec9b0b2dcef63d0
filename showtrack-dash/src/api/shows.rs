//! Public show catalog and per-viewer tracking

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::info;
use uuid::Uuid;

use showtrack_common::db::Show;
use showtrack_common::store::WatchStore;

use super::{ApiError, MaybeViewer};
use crate::pagination::{calculate_pagination, PAGE_SIZE};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    pub page: i64,
}

fn default_page() -> i64 {
    1
}

#[derive(Debug, Serialize)]
pub struct CatalogShow {
    #[serde(flatten)]
    pub show: Show,
    /// Already on the viewer's tracking list; always false when anonymous
    pub tracked: bool,
}

#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub shows: Vec<CatalogShow>,
}

/// GET /api/shows/public
pub async fn list_public_shows(
    State(state): State<AppState>,
    viewer: MaybeViewer,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<CatalogResponse>, ApiError> {
    let store = state.store();
    let all = store.public_shows().await?;

    let tracked: HashSet<Uuid> = match viewer.get() {
        Some(viewer) => store.tracked_show_ids(viewer).await?.into_iter().collect(),
        None => HashSet::new(),
    };

    let pagination = calculate_pagination(all.len(), query.page);
    let shows = pagination
        .slice(&all)
        .iter()
        .map(|show| CatalogShow {
            tracked: tracked.contains(&show.id),
            show: show.clone(),
        })
        .collect();

    Ok(Json(CatalogResponse {
        total: all.len(),
        page: pagination.page,
        page_size: PAGE_SIZE,
        total_pages: pagination.total_pages,
        shows,
    }))
}

/// POST /api/shows/:id/track
pub async fn track_show(
    State(state): State<AppState>,
    viewer: MaybeViewer,
    Path(show_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let viewer = viewer.0.ok_or(ApiError::Unauthenticated)?;
    state.store().track_show(&viewer, show_id).await?;
    info!("Viewer {} tracking show {}", viewer.id, show_id);
    Ok(StatusCode::NO_CONTENT)
}

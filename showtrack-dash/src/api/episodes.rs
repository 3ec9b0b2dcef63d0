//! Watched toggle for a single episode

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use showtrack_common::{ProgressError, ToggleOutcome};

use super::MaybeViewer;
use crate::AppState;

/// Body of PUT /api/episodes/:id/watched
#[derive(Debug, Deserialize)]
pub struct WatchedRequest {
    pub watched: bool,
}

/// PUT /api/episodes/:id/watched
///
/// Sets the viewer's watched state explicitly rather than flipping it, so a
/// repeated request is harmless.
pub async fn set_episode_watched(
    State(state): State<AppState>,
    viewer: MaybeViewer,
    Path(episode_id): Path<Uuid>,
    Json(request): Json<WatchedRequest>,
) -> Result<Json<ToggleOutcome>, ToggleError> {
    let outcome = state
        .tracker
        .set_watched(viewer.get(), episode_id, request.watched)
        .await?;
    Ok(Json(outcome))
}

/// Toggle failure as an HTTP response
#[derive(Debug)]
pub struct ToggleError(pub ProgressError);

impl From<ProgressError> for ToggleError {
    fn from(e: ProgressError) -> Self {
        ToggleError(e)
    }
}

impl IntoResponse for ToggleError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            ProgressError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ProgressError::ToggleInFlight(_) => StatusCode::CONFLICT,
            ProgressError::RequestFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.0.to_string(),
        }));

        (status, body).into_response()
    }
}

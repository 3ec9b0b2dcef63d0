//! Viewer identity extraction
//!
//! Identity arrives in the `x-viewer-id` header as a UUID. A missing header
//! means the request is anonymous; a malformed one is rejected.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use uuid::Uuid;

use showtrack_common::db::Viewer;

pub const VIEWER_HEADER: &str = "x-viewer-id";

/// The requesting viewer, if any
#[derive(Debug, Clone, Copy)]
pub struct MaybeViewer(pub Option<Viewer>);

impl MaybeViewer {
    pub fn get(&self) -> Option<&Viewer> {
        self.0.as_ref()
    }
}

/// Rejection for an unparseable viewer header
#[derive(Debug)]
pub struct InvalidViewerHeader(String);

impl IntoResponse for InvalidViewerHeader {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": format!("Invalid {} header: {}", VIEWER_HEADER, self.0),
        }));
        (StatusCode::BAD_REQUEST, body).into_response()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for MaybeViewer
where
    S: Send + Sync,
{
    type Rejection = InvalidViewerHeader;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(VIEWER_HEADER) else {
            return Ok(MaybeViewer(None));
        };

        let text = value
            .to_str()
            .map_err(|_| InvalidViewerHeader("not valid ASCII".to_string()))?
            .trim();

        if text.is_empty() {
            return Ok(MaybeViewer(None));
        }

        let id = Uuid::parse_str(text).map_err(|e| InvalidViewerHeader(e.to_string()))?;
        Ok(MaybeViewer(Some(Viewer::new(id))))
    }
}

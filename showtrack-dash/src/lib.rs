//! showtrack-dash library - watch-progress dashboards over HTTP
//!
//! Serves show and universe dashboards (filtered, ordered episode lists with
//! completion summaries) and the mutations behind them: watched toggles,
//! show tracking, and universe membership.

use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use showtrack_common::store::SqliteStore;
use showtrack_common::WatchTracker;

pub mod api;
pub mod pagination;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Store handle plus per-viewer in-flight toggle rows
    pub tracker: Arc<WatchTracker<SqliteStore>>,
}

impl AppState {
    pub fn new(store: SqliteStore) -> Self {
        Self {
            tracker: Arc::new(WatchTracker::new(Arc::new(store))),
        }
    }

    pub fn store(&self) -> &SqliteStore {
        self.tracker.store()
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{delete, get, post, put};

    let api = Router::new()
        .route("/api/shows/public", get(api::list_public_shows))
        .route("/api/shows/:id/track", post(api::track_show))
        .route("/api/shows/:id/dashboard", get(api::show_dashboard))
        .route("/api/universes", get(api::list_universes))
        .route("/api/universes/:id", delete(api::delete_universe))
        .route("/api/universes/:id/dashboard", get(api::universe_dashboard))
        .route("/api/universes/:id/available-shows", get(api::available_shows))
        .route("/api/universes/:id/shows", post(api::add_show_to_universe))
        .route("/api/universes/:id/visibility", put(api::set_universe_visibility))
        .route("/api/episodes/:id/watched", put(api::set_episode_watched));

    Router::new()
        .merge(api)
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

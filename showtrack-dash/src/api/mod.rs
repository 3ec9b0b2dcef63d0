//! HTTP API handlers for showtrack-dash

pub mod dashboard;
pub mod episodes;
pub mod error;
pub mod health;
pub mod shows;
pub mod universes;
pub mod viewer;

pub use dashboard::{show_dashboard, universe_dashboard};
pub use episodes::set_episode_watched;
pub use error::ApiError;
pub use health::health_routes;
pub use shows::{list_public_shows, track_show};
pub use universes::{
    add_show_to_universe, available_shows, delete_universe, list_universes,
    set_universe_visibility,
};
pub use viewer::{MaybeViewer, VIEWER_HEADER};

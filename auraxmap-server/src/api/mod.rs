//! HTTP surface of the map service.
//!
//! Thin routing layer over [`auraxmap::query::QueryService`]: every
//! handler validates its inputs through the service and serializes the
//! returned payloads. No domain logic lives here.

mod error;
mod handlers;
mod statics;

pub use error::ApiError;

use std::path::PathBuf;
use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use auraxmap::query::QueryService;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// The read API over the loaded world
    pub query: Arc<QueryService>,
    /// Root directory of the static tile/hex assets
    pub asset_dir: PathBuf,
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/continents", get(handlers::continents))
        .route("/continents/tracked", get(handlers::continents_tracked))
        .route("/continents/:id/bases", get(handlers::bases))
        .route("/continents/:id/lattice", get(handlers::lattice))
        .route("/continents/:id/ownership", get(handlers::ownership))
        .route("/servers", get(handlers::servers))
        .route("/servers/tracked", get(handlers::servers_tracked))
        .route("/static/tile/:code/:filename", get(statics::tile))
        .route("/static/hex/:filename", get(statics::hex))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

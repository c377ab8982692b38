//! JSON endpoint handlers.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use auraxmap::map::{Base, Continent, ContinentId, LatticeLink, Server, ServerId};
use auraxmap::query::OwnershipView;

use super::{ApiError, AppState};

/// Service banner for the root path.
pub async fn root() -> Json<Value> {
    Json(json!({
        "name": "auraxmap",
        "version": auraxmap::VERSION,
    }))
}

/// All known continents.
///
/// Static data; consumers are encouraged to cache it aggressively as it
/// only changes with major game updates.
pub async fn continents(State(state): State<AppState>) -> Json<Vec<Continent>> {
    Json(state.query.get_continents())
}

/// Continents restricted to the operator's tracked subset.
pub async fn continents_tracked(State(state): State<AppState>) -> Json<Vec<Continent>> {
    Json(state.query.get_tracked_continents())
}

/// Bases of one continent.
pub async fn bases(
    State(state): State<AppState>,
    Path(continent_id): Path<ContinentId>,
) -> Result<Json<Vec<Base>>, ApiError> {
    Ok(Json(state.query.get_bases(continent_id)?))
}

/// Lattice links of one continent.
pub async fn lattice(
    State(state): State<AppState>,
    Path(continent_id): Path<ContinentId>,
) -> Result<Json<Vec<LatticeLink>>, ApiError> {
    Ok(Json(state.query.get_lattice(continent_id)?))
}

/// Query parameters of the ownership endpoint.
#[derive(Debug, Deserialize)]
pub struct OwnershipParams {
    /// Server to return the ownership digest for
    pub server_id: ServerId,
}

/// Current base ownership for one continent on one server.
pub async fn ownership(
    State(state): State<AppState>,
    Path(continent_id): Path<ContinentId>,
    Query(params): Query<OwnershipParams>,
) -> Result<Json<OwnershipView>, ApiError> {
    Ok(Json(state.query.get_ownership(continent_id, params.server_id)?))
}

/// All known servers.
pub async fn servers(State(state): State<AppState>) -> Json<Vec<Server>> {
    Json(state.query.get_servers())
}

/// Servers restricted to the operator's tracked subset.
pub async fn servers_tracked(State(state): State<AppState>) -> Json<Vec<Server>> {
    Json(state.query.get_tracked_servers())
}

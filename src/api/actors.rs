use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use super::{ApiError, api_error};
use crate::AppState;
use crate::catalog::ActorDescriptor;

#[derive(Debug, Deserialize)]
pub struct ActorsQuery {
    /// Optional search filter.
    #[serde(default)]
    pub q: Option<String>,
}

/// GET /api/actors - Catalog listing, optionally filtered with `?q=`.
pub async fn list_actors(
    State(state): State<AppState>,
    Query(query): Query<ActorsQuery>,
) -> Json<Vec<ActorDescriptor>> {
    let actors: Vec<ActorDescriptor> = match query.q.as_deref() {
        Some(q) => state.catalog.search(q).into_iter().cloned().collect(),
        None => state.catalog.list().to_vec(),
    };
    Json(actors)
}

/// GET /api/actors/:actorId - Single catalog entry.
pub async fn get_actor(
    State(state): State<AppState>,
    Path(actor_id): Path<String>,
) -> Result<Json<ActorDescriptor>, ApiError> {
    state
        .catalog
        .get(&actor_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, format!("unknown actor {actor_id}")))
}

//! JSON API consumed by the console UI.
//!
//! | Method | Path                        | Handler                     |
//! |--------|-----------------------------|-----------------------------|
//! | GET    | `/api/actors`               | [`actors::list_actors`]     |
//! | GET    | `/api/actors/{actorId}`     | [`actors::get_actor`]       |
//! | POST   | `/api/run`                  | [`runs::start_run`]         |
//! | GET    | `/api/status/{runId}`       | [`runs::run_status`]        |
//! | GET    | `/api/dataset/{datasetId}`  | [`runs::dataset_items`]     |
//! | GET    | `/api/poll/{runId}`         | [`runs::poll_run`]          |
//!
//! Remote outcomes are relayed with status 200 whatever the remote said;
//! callers inspect the `status`/`data` or `error` fields.

pub mod actors;
pub mod runs;

use axum::{
    Json, Router,
    http::StatusCode,
    routing::{get, post},
};
use serde::Serialize;

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/actors", get(actors::list_actors))
        .route("/api/actors/{actor_id}", get(actors::get_actor))
        .route("/api/run", post(runs::start_run))
        .route("/api/status/{run_id}", get(runs::run_status))
        .route("/api/dataset/{dataset_id}", get(runs::dataset_items))
        .route("/api/poll/{run_id}", get(runs::poll_run))
}

/// Error body returned by the console itself (not relayed from the remote).
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub(crate) fn api_error(status: StatusCode, error: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
}

use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
};

use super::{ApiError, api_error};
use crate::AppState;
use crate::remote::ApiOutcome;
use crate::tracker::{PollProgress, PollStep, RunRequest};

/// POST /api/run - Start a run. Body: `{"actorId": "user~name", "input": {...}}`.
///
/// The body is parsed regardless of `Content-Type`; unparseable bodies get a
/// 400 with the parser message.
pub async fn start_run(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ApiOutcome>, ApiError> {
    let req: RunRequest = serde_json::from_slice(&body)
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, e.to_string()))?;

    tracing::info!(actor_id = %req.actor_id, "Received run request");

    let outcome = state
        .remote
        .start_run(&req.actor_id, &req.input_body())
        .await;
    Ok(Json(outcome))
}

/// GET /api/status/:runId - Raw run status from the remote.
pub async fn run_status(
    State(state): State<AppState>,
    Path(run_id): Path<String>,
) -> Json<ApiOutcome> {
    Json(state.remote.get_run_status(&run_id).await)
}

/// GET /api/dataset/:datasetId - First page of dataset items.
///
/// Not tied to any run: the console keeps no record of which runs succeeded.
pub async fn dataset_items(
    State(state): State<AppState>,
    Path(dataset_id): Path<String>,
) -> Json<ApiOutcome> {
    Json(state.remote.get_dataset_items(&dataset_id).await)
}

/// GET /api/poll/:runId?attempt=N&elapsedMs=T - One classified poll step,
/// fetching the dataset once the run has succeeded.
///
/// The browser echoes back the `attempt` of the last pending step and the time
/// since submission; past `max_polls` or the deadline the step is `gaveUp`.
pub async fn poll_run(
    State(state): State<AppState>,
    Path(run_id): Path<String>,
    Query(progress): Query<PollProgress>,
) -> Json<PollStep> {
    Json(state.tracker.poll_run(&run_id, progress).await)
}

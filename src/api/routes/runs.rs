//! Run inspection endpoints.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::get,
    Router,
};

use crate::api::error::{ApiError, ApiResult};
use crate::pipeline::{RunRegistry, RunSnapshot};

#[derive(Clone)]
pub struct RunsState {
    pub runs: RunRegistry,
}

pub fn router(state: RunsState) -> Router {
    Router::new()
        .route("/runs", get(list_runs))
        .route("/runs/:id", get(get_run))
        .with_state(state)
}

/// GET /runs - List pipeline runs, newest first.
async fn list_runs(State(state): State<RunsState>) -> Json<Vec<RunSnapshot>> {
    Json(state.runs.list().await)
}

/// GET /runs/:id - Get a single run.
async fn get_run(
    Path(id): Path<String>,
    State(state): State<RunsState>,
) -> ApiResult<Json<RunSnapshot>> {
    let run = state
        .runs
        .get(&id)
        .await
        .ok_or_else(|| ApiError::not_found(format!("Run {} not found", id)))?;

    Ok(Json(run))
}

//! Meeting read endpoints.
//!
//! Meeting records are created by the calling system when a recorded
//! call starts; this API only reads them and derives pipeline progress
//! from the two stamps.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::meeting::{Meeting, MeetingStore};

#[derive(Clone)]
pub struct MeetingsState {
    pub meetings: Arc<dyn MeetingStore>,
}

/// Query parameters for the meeting list.
#[derive(Debug, Deserialize, Default)]
pub struct MeetingsQueryParams {
    /// Only meetings recorded against this alert
    pub alert_id: Option<String>,
    /// Maximum results (default 20)
    pub limit: Option<usize>,
}

pub fn router(state: MeetingsState) -> Router {
    Router::new()
        .route("/meetings", get(list_meetings))
        .route("/meetings/:id", get(get_meeting))
        .with_state(state)
}

/// GET /meetings - List meetings, newest first.
async fn list_meetings(
    Query(params): Query<MeetingsQueryParams>,
    State(state): State<MeetingsState>,
) -> ApiResult<Json<Value>> {
    let meetings = match params.alert_id {
        Some(alert_id) => state
            .meetings
            .find_all_by_alert_id(&alert_id)
            .await
            .map_err(ApiError::from)?,
        None => state
            .meetings
            .list(params.limit.unwrap_or(20))
            .await
            .map_err(ApiError::from)?,
    };

    let entries: Vec<Value> = meetings.iter().map(meeting_json).collect();
    Ok(Json(json!({ "meetings": entries })))
}

/// GET /meetings/:id - Get a single meeting.
async fn get_meeting(
    Path(id): Path<String>,
    State(state): State<MeetingsState>,
) -> ApiResult<Json<Value>> {
    let meeting = state
        .meetings
        .find_by_id(&id)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(meeting_json(&meeting)))
}

fn meeting_json(meeting: &Meeting) -> Value {
    json!({
        "id": meeting.id,
        "alertId": meeting.alert_id,
        "capturePipelineArn": meeting.capture_pipeline_arn,
        "concatPipelineArn": meeting.concat_pipeline_arn,
        "createdAt": meeting.created_at,
        "concatenatedAt": meeting.concatenated_at,
        "summarizedAt": meeting.summarized_at,
        "status": meeting.status().as_str(),
    })
}

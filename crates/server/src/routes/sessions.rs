//! Session completion and statistics endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;
use serde_json::{Value, json};

use reps_core::stats::StatsSnapshot;
use services::SessionReport;

use crate::error::ApiError;
use crate::state::AppContext;

#[derive(Debug, Deserialize)]
pub struct SessionCompleteRequest {
    #[serde(default)]
    pub profile_code: String,
    #[serde(default)]
    pub correct: u32,
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub duration_sec: u32,
    #[serde(default)]
    pub tz_offset_min: i32,
}

/// `POST /api/session/complete`: persist a finished session and return the
/// refreshed statistics, flattened into the response object.
pub async fn session_complete(
    State(ctx): State<Arc<AppContext>>,
    Json(body): Json<SessionCompleteRequest>,
) -> Result<Json<Value>, ApiError> {
    let saved = ctx
        .recorder
        .record_session_complete(&SessionReport {
            profile_code: body.profile_code,
            correct: body.correct,
            total: body.total,
            duration_sec: body.duration_sec,
            tz_offset_min: body.tz_offset_min,
        })
        .await?;

    let mut response = stats_body(&saved.stats)?;
    response["ok"] = json!(true);
    response["saved_local_date"] = json!(saved.saved_local_date);
    Ok(Json(response))
}

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    #[serde(default)]
    pub profile_code: String,
    #[serde(default)]
    pub tz_offset_min: i32,
}

/// `GET /api/stats?profile_code=...&tz_offset_min=...`
pub async fn stats(
    State(ctx): State<Arc<AppContext>>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<Value>, ApiError> {
    let snapshot = ctx
        .recorder
        .stats(&query.profile_code, query.tz_offset_min)
        .await?;

    let mut response = stats_body(&snapshot)?;
    response["ok"] = json!(true);
    Ok(Json(response))
}

fn stats_body(snapshot: &StatsSnapshot) -> Result<Value, ApiError> {
    serde_json::to_value(snapshot).map_err(|err| ApiError::Internal(err.to_string()))
}

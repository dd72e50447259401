//! Fire-and-forget telemetry endpoints used by the player.
//!
//! These mirror what the client actually sends: absent fields default rather
//! than reject, because the client never reads the response body anyway.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde::Deserialize;
use serde_json::{Value, json};

use services::AttemptEvent;

use crate::error::ApiError;
use crate::state::AppContext;

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub item_id: String,
    #[serde(default)]
    pub item_type: String,
    #[serde(default)]
    pub correct: u8,
    #[serde(default)]
    pub response: String,
}

/// `POST /submit`: persist one per-item attempt.
pub async fn submit(
    State(ctx): State<Arc<AppContext>>,
    Json(body): Json<SubmitRequest>,
) -> Result<Json<Value>, ApiError> {
    ctx.recorder
        .record_attempt(&AttemptEvent {
            play_id: body.session_id,
            item_id: body.item_id,
            item_type: body.item_type,
            correct: body.correct != 0,
            response: body.response,
        })
        .await?;
    Ok(Json(json!({ "ok": true })))
}

#[derive(Debug, Deserialize)]
pub struct CompleteRequest {
    #[serde(default)]
    pub session_id: String,
}

/// `POST /complete`: mark a played sequence finished. Idempotent.
pub async fn complete(
    State(ctx): State<Arc<AppContext>>,
    Json(body): Json<CompleteRequest>,
) -> Result<Json<Value>, ApiError> {
    ctx.recorder.record_play_complete(&body.session_id).await?;
    Ok(Json(json!({ "ok": true })))
}

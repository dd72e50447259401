//! Daily plan endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde_json::{Value, json};

use services::PlanBuilder;

use crate::error::ApiError;
use crate::state::AppContext;

/// `GET /api/daily`: a freshly sampled plan. Stateless: every call draws a
/// new selection from the seed pools.
pub async fn daily(State(ctx): State<Arc<AppContext>>) -> Result<Json<Value>, ApiError> {
    let items = PlanBuilder::new(&ctx.catalog)
        .build()
        .map_err(|err| ApiError::Internal(err.to_string()))?;

    let records: Vec<_> = items.iter().map(|item| item.to_record()).collect();
    Ok(Json(json!({ "items": records })))
}

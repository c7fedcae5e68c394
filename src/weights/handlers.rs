use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use super::dto::{WeightRequest, WeightsResponse};
use super::repo_types::WeightLog;
use super::services::{logged_at_for, summarize, sync_profile_weight};
use crate::{auth::AuthUser, state::AppState};

// --- public routers ---

pub fn read_router() -> Router<AppState> {
    Router::new().route("/weights", get(list_weights))
}

pub fn write_router() -> Router<AppState> {
    Router::new()
        .route("/weights", post(log_weight))
        .route("/weights/:id", delete(delete_weight))
}

// --- handlers ---

#[instrument(skip(state))]
pub async fn list_weights(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<WeightsResponse>, (StatusCode, String)> {
    let logs = state.weights.list_weights(user_id).await.map_err(|e| {
        error!(error = %e, %user_id, "list weights failed");
        internal(e)
    })?;
    Ok(Json(WeightsResponse {
        summary: summarize(&logs),
        logs,
    }))
}

/// POST /weights
/// Stores the weigh-in and copies it onto the profile. A failed profile
/// update is logged and does not undo the weigh-in.
#[instrument(skip(state, body))]
pub async fn log_weight(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<WeightRequest>,
) -> Result<(StatusCode, Json<WeightLog>), (StatusCode, String)> {
    if let Err(msg) = body.validate() {
        warn!(%user_id, %msg, "invalid weight log");
        return Err((StatusCode::BAD_REQUEST, msg));
    }
    let now = OffsetDateTime::now_utc();
    let day = body.date.unwrap_or_else(|| state.today(now));
    let logged_at = logged_at_for(day, state.config.calendar_offset);

    let log = state
        .weights
        .insert_weight(user_id, body.weight_kg, logged_at, body.notes())
        .await
        .map_err(|e| {
            error!(error = %e, %user_id, "log weight failed");
            internal(e)
        })?;
    info!(%user_id, weight_id = %log.id, weight_kg = log.weight_kg, "weight logged");

    if let Err(e) = sync_profile_weight(state.profiles.as_ref(), user_id, log.weight_kg, now).await {
        warn!(error = %e, %user_id, "profile weight not updated");
    }

    Ok((StatusCode::CREATED, Json(log)))
}

#[instrument(skip(state))]
pub async fn delete_weight(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    match state.weights.delete_weight(user_id, id).await {
        Ok(true) => Ok(StatusCode::NO_CONTENT),
        Ok(false) => Err((StatusCode::NOT_FOUND, "Weight log not found".into())),
        Err(e) => {
            error!(error = %e, %user_id, %id, "delete weight failed");
            Err(internal(e))
        }
    }
}

fn internal<E: std::fmt::Display>(e: E) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

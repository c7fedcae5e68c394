use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use super::dto::{CreatedEntryResponse, EntryRequest, RangeQuery};
use super::repo_types::FoodLogEntry;
use super::services::resolve_range;
use crate::{
    achievements::services::evaluate_with_timeout, auth::AuthUser, state::AppState,
};

// --- public routers ---

pub fn read_router() -> Router<AppState> {
    Router::new().route("/food-logs", get(list_entries))
}

pub fn write_router() -> Router<AppState> {
    Router::new()
        .route("/food-logs", post(create_entry))
        .route("/food-logs/:id", put(update_entry).delete(delete_entry))
}

// --- handlers ---

#[instrument(skip(state))]
pub async fn list_entries(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<RangeQuery>,
) -> Result<Json<Vec<FoodLogEntry>>, (StatusCode, String)> {
    let today = state.today(OffsetDateTime::now_utc());
    let (from, to) = resolve_range(&q, today).map_err(|e| (StatusCode::BAD_REQUEST, e))?;
    let entries = state
        .entries
        .entries_between(user_id, from, to)
        .await
        .map_err(|e| {
            error!(error = %e, %user_id, "list entries failed");
            internal(e)
        })?;
    Ok(Json(entries))
}

/// POST /food-logs
/// Stores the entry, then runs an achievement pass so the response can carry
/// anything the entry unlocked.
#[instrument(skip(state, body))]
pub async fn create_entry(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<EntryRequest>,
) -> Result<(StatusCode, HeaderMap, Json<CreatedEntryResponse>), (StatusCode, String)> {
    if let Err(msg) = body.fields.validate() {
        warn!(%user_id, %msg, "invalid food log");
        return Err((StatusCode::BAD_REQUEST, msg));
    }
    let now = OffsetDateTime::now_utc();
    let logged_at = body.logged_at.unwrap_or(now);

    let entry = state
        .entries
        .insert_entry(user_id, logged_at, &body.fields)
        .await
        .map_err(|e| {
            error!(error = %e, %user_id, "create entry failed");
            internal(e)
        })?;
    info!(%user_id, entry_id = %entry.id, calories = entry.calories, "food logged");

    let new_achievements = evaluate_with_timeout(
        &state.engine(),
        user_id,
        now,
        state.config.achievement_eval_timeout,
    )
    .await;

    let mut headers = HeaderMap::new();
    if let Ok(location) = format!("/api/v1/food-logs/{}", entry.id).parse::<HeaderValue>() {
        headers.insert(axum::http::header::LOCATION, location);
    }

    Ok((
        StatusCode::CREATED,
        headers,
        Json(CreatedEntryResponse {
            entry,
            new_achievements,
        }),
    ))
}

#[instrument(skip(state, body))]
pub async fn update_entry(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<EntryRequest>,
) -> Result<Json<FoodLogEntry>, (StatusCode, String)> {
    body.fields
        .validate()
        .map_err(|msg| (StatusCode::BAD_REQUEST, msg))?;

    match state
        .entries
        .update_entry(user_id, id, body.logged_at, &body.fields)
        .await
    {
        Ok(Some(entry)) => Ok(Json(entry)),
        Ok(None) => Err((StatusCode::NOT_FOUND, "Entry not found".into())),
        Err(e) => {
            error!(error = %e, %user_id, %id, "update entry failed");
            Err(internal(e))
        }
    }
}

#[instrument(skip(state))]
pub async fn delete_entry(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    match state.entries.delete_entry(user_id, id).await {
        Ok(true) => Ok(StatusCode::NO_CONTENT),
        Ok(false) => Err((StatusCode::NOT_FOUND, "Entry not found".into())),
        Err(e) => {
            error!(error = %e, %user_id, %id, "delete entry failed");
            Err(internal(e))
        }
    }
}

fn internal<E: std::fmt::Display>(e: E) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

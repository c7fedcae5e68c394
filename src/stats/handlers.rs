use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use time::OffsetDateTime;
use tracing::{error, instrument, warn};
use uuid::Uuid;

use super::services::{self, Analytics, StreakView, TodayView, View};
use crate::{auth::AuthUser, nutrition::Targets, state::AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stats/today", get(today))
        .route("/stats/analytics", get(analytics))
        .route("/stats/streak", get(streak))
}

#[derive(Debug, Deserialize)]
pub struct AnalyticsQuery {
    #[serde(default)]
    pub view: View,
}

#[instrument(skip(state))]
pub async fn today(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<TodayView>, (StatusCode, String)> {
    let today = state.today(OffsetDateTime::now_utc());
    let targets = targets_for(&state, user_id).await;
    services::today_view(state.entries.as_ref(), user_id, today, targets)
        .await
        .map(Json)
        .map_err(|e| {
            error!(error = %e, %user_id, "today view failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })
}

#[instrument(skip(state))]
pub async fn analytics(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<AnalyticsQuery>,
) -> Result<Json<Analytics>, (StatusCode, String)> {
    let today = state.today(OffsetDateTime::now_utc());
    let targets = targets_for(&state, user_id).await;
    services::analytics(state.entries.as_ref(), user_id, q.view, today, targets)
        .await
        .map(Json)
        .map_err(|e| {
            error!(error = %e, %user_id, view = ?q.view, "analytics failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })
}

#[instrument(skip(state))]
pub async fn streak(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<StreakView>, (StatusCode, String)> {
    let today = state.today(OffsetDateTime::now_utc());
    services::streak_view(
        state.entries.as_ref(),
        user_id,
        today,
        state.config.streak_lookback_days,
    )
    .await
    .map(Json)
    .map_err(|e| {
        error!(error = %e, %user_id, "streak view failed");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })
}

/// Targets from the user's profile. Views still render without them.
async fn targets_for(state: &AppState, user_id: Uuid) -> Option<Targets> {
    match state.profiles.find_profile(user_id).await {
        Ok(p) => p.map(|p| p.targets),
        Err(e) => {
            warn!(error = %e, %user_id, "profile lookup failed, rendering without targets");
            None
        }
    }
}

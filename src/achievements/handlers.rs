use axum::{extract::State, http::StatusCode, routing::{get, post}, Json, Router};
use time::OffsetDateTime;
use tracing::{error, info, instrument};

use super::repo_types::{Achievement, EarnedAchievement, UserAchievement};
use super::services::evaluate_with_timeout;
use crate::{auth::AuthUser, state::AppState};

// --- public routers ---

/// Catalog is readable without a token.
pub fn public_router() -> Router<AppState> {
    Router::new().route("/achievements", get(list_catalog))
}

pub fn user_router() -> Router<AppState> {
    Router::new()
        .route("/me/achievements", get(list_earned))
        .route("/achievements/evaluate", post(evaluate))
}

// --- handlers ---

#[instrument(skip(state))]
pub async fn list_catalog(
    State(state): State<AppState>,
) -> Result<Json<Vec<Achievement>>, (StatusCode, String)> {
    state.achievements.catalog().await.map(Json).map_err(|e| {
        error!(error = %e, "catalog load failed");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })
}

#[instrument(skip(state))]
pub async fn list_earned(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<EarnedAchievement>>, (StatusCode, String)> {
    state
        .achievements
        .earned_for_user(user_id)
        .await
        .map(Json)
        .map_err(|e| {
            error!(error = %e, %user_id, "earned achievements load failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })
}

/// POST /achievements/evaluate
/// Failures inside the pass are logged and yield an empty list.
#[instrument(skip(state))]
pub async fn evaluate(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Json<Vec<UserAchievement>> {
    let awarded = evaluate_with_timeout(
        &state.engine(),
        user_id,
        OffsetDateTime::now_utc(),
        state.config.achievement_eval_timeout,
    )
    .await;
    info!(%user_id, awarded = awarded.len(), "manual evaluation finished");
    Json(awarded)
}

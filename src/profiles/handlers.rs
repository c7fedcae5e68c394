use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, patch, post, put},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use super::dto::OnboardRequest;
use super::repo_types::{BodyMetrics, GoalProfile};
use super::services::{self, validate_metrics, validate_targets};
use crate::{auth::AuthUser, nutrition::Targets, state::AppState};

// --- public routers ---

pub fn read_router() -> Router<AppState> {
    Router::new().route("/profile", get(get_profile))
}

pub fn write_router() -> Router<AppState> {
    Router::new()
        .route("/profile", put(onboard))
        .route("/profile/metrics", patch(update_metrics))
        .route("/profile/goal/toggle", post(toggle_goal))
        .route("/profile/targets", put(override_targets))
}

// --- handlers ---

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<GoalProfile>, (StatusCode, String)> {
    load(&state, user_id).await.map(Json)
}

/// PUT /profile
/// Creates or resets the profile; targets always come from the formula.
#[instrument(skip(state, body))]
pub async fn onboard(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<OnboardRequest>,
) -> Result<Json<GoalProfile>, (StatusCode, String)> {
    validate_metrics(&body.metrics).map_err(bad_request)?;
    let profile = services::onboard(user_id, body.metrics, body.goal, OffsetDateTime::now_utc());
    let saved = save(&state, &profile).await?;
    info!(%user_id, goal = %saved.goal, calories = saved.targets.calories, "profile onboarded");
    Ok(Json(saved))
}

#[instrument(skip(state, body))]
pub async fn update_metrics(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<BodyMetrics>,
) -> Result<Json<GoalProfile>, (StatusCode, String)> {
    validate_metrics(&body).map_err(bad_request)?;
    let current = load(&state, user_id).await?;
    let profile = services::apply_metrics(current, body, OffsetDateTime::now_utc());
    save(&state, &profile).await.map(Json)
}

#[instrument(skip(state))]
pub async fn toggle_goal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<GoalProfile>, (StatusCode, String)> {
    let current = load(&state, user_id).await?;
    let profile = services::toggle_goal(current, OffsetDateTime::now_utc());
    let saved = save(&state, &profile).await?;
    info!(%user_id, goal = %saved.goal, calories = saved.targets.calories, "goal toggled");
    Ok(Json(saved))
}

#[instrument(skip(state, body))]
pub async fn override_targets(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<Targets>,
) -> Result<Json<GoalProfile>, (StatusCode, String)> {
    validate_targets(&body).map_err(bad_request)?;
    let current = load(&state, user_id).await?;
    let profile = services::override_targets(current, body, OffsetDateTime::now_utc());
    save(&state, &profile).await.map(Json)
}

async fn load(state: &AppState, user_id: Uuid) -> Result<GoalProfile, (StatusCode, String)> {
    match state.profiles.find_profile(user_id).await {
        Ok(Some(p)) => Ok(p),
        Ok(None) => Err((StatusCode::NOT_FOUND, "Profile not found".into())),
        Err(e) => {
            error!(error = %e, %user_id, "load profile failed");
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

async fn save(state: &AppState, p: &GoalProfile) -> Result<GoalProfile, (StatusCode, String)> {
    state.profiles.upsert_profile(p).await.map_err(|e| {
        error!(error = %e, user_id = %p.user_id, "save profile failed");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })
}

fn bad_request(msg: String) -> (StatusCode, String) {
    warn!(%msg, "rejected profile input");
    (StatusCode::BAD_REQUEST, msg)
}

use std::time::Duration;

use time::OffsetDateTime;
use tracing::warn;
use uuid::Uuid;

use super::engine::AchievementEngine;
use super::repo_types::UserAchievement;

/// Runs an evaluation pass, giving up after `limit`. A pass that times out
/// awards nothing to the caller; rows it already inserted stay earned.
pub async fn evaluate_with_timeout(
    engine: &AchievementEngine,
    user_id: Uuid,
    now: OffsetDateTime,
    limit: Duration,
) -> Vec<UserAchievement> {
    match tokio::time::timeout(limit, engine.evaluate(user_id, now)).await {
        Ok(awarded) => awarded,
        Err(_) => {
            warn!(%user_id, timeout_ms = limit.as_millis() as u64, "achievement evaluation timed out");
            Vec::new()
        }
    }
}

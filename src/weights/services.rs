use serde::Serialize;
use time::macros::time;
use time::{Date, OffsetDateTime, UtcOffset};
use uuid::Uuid;

use super::repo_types::WeightLog;
use crate::profiles::repo_types::BodyMetrics;
use crate::profiles::services::apply_metrics;
use crate::stats::aggregator::round1;
use crate::stats::trend::Direction;
use crate::store::{ProfileStore, StoreError};

/// Weigh-ins are pinned to midday so an offset shift never moves them to
/// the neighbouring day.
pub fn logged_at_for(day: Date, offset: UtcOffset) -> OffsetDateTime {
    day.with_time(time!(12:00)).assume_offset(offset)
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct WeightTrend {
    pub direction: Direction,
    /// Absolute change in kg, one decimal.
    pub change_kg: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WeightSummary {
    pub current_kg: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub current_logged_at: OffsetDateTime,
    pub average_kg: f64,
    pub entry_count: usize,
    /// Latest against oldest; absent with a single weigh-in.
    pub trend: Option<WeightTrend>,
}

/// Summary over logs ordered newest first. `None` when there are none.
pub fn summarize(logs: &[WeightLog]) -> Option<WeightSummary> {
    let latest = logs.first()?;
    let oldest = logs.last()?;
    let total: f64 = logs.iter().map(|l| l.weight_kg).sum();

    let trend = (logs.len() >= 2).then(|| {
        let diff = latest.weight_kg - oldest.weight_kg;
        let direction = if diff < 0.0 {
            Direction::Down
        } else if diff > 0.0 {
            Direction::Up
        } else {
            Direction::Stable
        };
        WeightTrend {
            direction,
            change_kg: round1(diff.abs()),
        }
    });

    Some(WeightSummary {
        current_kg: latest.weight_kg,
        current_logged_at: latest.logged_at,
        average_kg: round1(total / logs.len() as f64),
        entry_count: logs.len(),
        trend,
    })
}

/// Copies a new weigh-in onto the profile, keeping its targets.
/// Returns `false` when the user has no profile yet.
pub async fn sync_profile_weight(
    profiles: &dyn ProfileStore,
    user_id: Uuid,
    weight_kg: f64,
    now: OffsetDateTime,
) -> Result<bool, StoreError> {
    let Some(current) = profiles.find_profile(user_id).await? else {
        return Ok(false);
    };
    let metrics = BodyMetrics {
        weight_kg,
        ..current.metrics
    };
    profiles
        .upsert_profile(&apply_metrics(current, metrics, now))
        .await?;
    Ok(true)
}

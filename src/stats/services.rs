use serde::{Deserialize, Serialize};
use time::Date;
use uuid::Uuid;

use super::aggregator::{
    aggregate, summarize, weekly_averages, DailyTotal, GoalProgress, RangeSummary, WeeklyAverage,
};
use super::streak::{current_streak, day_presence, week_strip, window_start, StripDay};
use super::trend::{compute_trend, Metric, Trend};
use crate::nutrition::Targets;
use crate::store::{EntryStore, StoreError};

/// Days shown in the streak strip.
pub const STRIP_LEN: u32 = 7;

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Week,
    Month,
}

impl View {
    pub fn days(self) -> u32 {
        match self {
            View::Week => 7,
            View::Month => 30,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TodayView {
    #[serde(flatten)]
    pub totals: DailyTotal,
    pub progress: Option<GoalProgress>,
}

#[derive(Debug, Serialize)]
pub struct MetricTrend {
    pub metric: Metric,
    pub trend: Option<Trend>,
}

#[derive(Debug, Serialize)]
pub struct Analytics {
    pub view: View,
    pub start: Date,
    pub end: Date,
    pub days: Vec<DailyTotal>,
    pub summary: RangeSummary,
    pub trends: Vec<MetricTrend>,
    /// Only filled for the month view.
    pub weekly: Vec<WeeklyAverage>,
    pub targets: Option<Targets>,
}

#[derive(Debug, Serialize)]
pub struct StreakView {
    pub current_streak: u32,
    pub lookback_days: u32,
    pub days: Vec<StripDay>,
}

pub async fn today_view(
    entries: &dyn EntryStore,
    user_id: Uuid,
    today: Date,
    targets: Option<Targets>,
) -> Result<TodayView, StoreError> {
    let logged = entries.entries_between(user_id, today, today).await?;
    let totals = aggregate(&logged, today, today)
        .into_iter()
        .next()
        .unwrap_or_else(|| DailyTotal::empty(today));
    Ok(TodayView {
        progress: targets.map(|t| totals.progress(&t)),
        totals,
    })
}

pub async fn analytics(
    entries: &dyn EntryStore,
    user_id: Uuid,
    view: View,
    today: Date,
    targets: Option<Targets>,
) -> Result<Analytics, StoreError> {
    let start = window_start(today, view.days());
    let logged = entries.entries_between(user_id, start, today).await?;
    let days = aggregate(&logged, start, today);

    let trends = [Metric::Calories, Metric::Protein]
        .into_iter()
        .map(|metric| MetricTrend {
            metric,
            trend: compute_trend(&days, metric),
        })
        .collect();
    let weekly = match view {
        View::Week => Vec::new(),
        View::Month => weekly_averages(&days),
    };

    Ok(Analytics {
        view,
        start,
        end: today,
        summary: summarize(&days),
        trends,
        weekly,
        targets,
        days,
    })
}

/// Current streak over the look-back window plus the trailing strip.
///
/// The streak only counts when today is logged; a gap today reads as zero.
pub async fn streak_view(
    entries: &dyn EntryStore,
    user_id: Uuid,
    today: Date,
    lookback_days: u32,
) -> Result<StreakView, StoreError> {
    let lookback_days = lookback_days.max(STRIP_LEN);
    let start = window_start(today, lookback_days);
    let logged = entries.logged_days(user_id, start, today).await?;

    Ok(StreakView {
        current_streak: current_streak(&day_presence(&logged, start, today)),
        lookback_days,
        days: week_strip(&logged, today, STRIP_LEN),
    })
}

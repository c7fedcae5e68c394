use std::sync::Arc;

use time::{Date, Month, OffsetDateTime, UtcOffset};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::repo_types::{Achievement, Award, Criteria, UserAchievement};
use crate::stats::streak::{day_presence, streak_met, window_start};
use crate::store::{AchievementStore, EntryStore, StoreError};

/// Awards catalog achievements whose criteria a user has met.
///
/// Achievements move one way, from not earned to earned. Each pass checks the
/// unearned ones in catalog order and records the met ones; a record that
/// another pass inserted first counts as already earned. A store failure while
/// checking or recording one achievement skips only that achievement.
#[derive(Clone)]
pub struct AchievementEngine {
    entries: Arc<dyn EntryStore>,
    achievements: Arc<dyn AchievementStore>,
    offset: UtcOffset,
}

impl AchievementEngine {
    pub fn new(
        entries: Arc<dyn EntryStore>,
        achievements: Arc<dyn AchievementStore>,
        offset: UtcOffset,
    ) -> Self {
        Self {
            entries,
            achievements,
            offset,
        }
    }

    /// Runs one pass and returns the records inserted by it. Failures are
    /// logged, never returned.
    pub async fn evaluate(&self, user_id: Uuid, now: OffsetDateTime) -> Vec<UserAchievement> {
        match self.try_evaluate(user_id, now).await {
            Ok(awarded) => awarded,
            Err(e) => {
                warn!(error = %e, %user_id, "achievement evaluation aborted");
                Vec::new()
            }
        }
    }

    async fn try_evaluate(
        &self,
        user_id: Uuid,
        now: OffsetDateTime,
    ) -> Result<Vec<UserAchievement>, StoreError> {
        let mut catalog = self.achievements.catalog().await?;
        catalog.sort_by_key(|a| a.criteria_value);
        let earned = self.achievements.earned_ids(user_id).await?;
        let today = now.to_offset(self.offset).date();

        let mut awarded = Vec::new();
        for achievement in catalog.iter().filter(|a| !earned.contains(&a.id)) {
            match self.check_and_award(user_id, achievement, today).await {
                Ok(Some(record)) => {
                    info!(%user_id, achievement = %achievement.name, "achievement earned");
                    awarded.push(record);
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(
                        error = %e,
                        %user_id,
                        achievement_id = %achievement.id,
                        "skipping achievement"
                    );
                }
            }
        }
        Ok(awarded)
    }

    async fn check_and_award(
        &self,
        user_id: Uuid,
        achievement: &Achievement,
        today: Date,
    ) -> Result<Option<UserAchievement>, StoreError> {
        if !self.is_met(user_id, achievement.criteria(), today).await? {
            return Ok(None);
        }
        match self.achievements.award(user_id, achievement.id).await? {
            Award::Inserted(record) => Ok(Some(record)),
            Award::AlreadyEarned => {
                debug!(%user_id, achievement_id = %achievement.id, "already earned elsewhere");
                Ok(None)
            }
        }
    }

    pub async fn is_met(
        &self,
        user_id: Uuid,
        criteria: Criteria,
        today: Date,
    ) -> Result<bool, StoreError> {
        match criteria {
            Criteria::FirstEntry => Ok(self.entries.count_entries(user_id, None).await? >= 1),
            Criteria::Streak { days } => self.streak_window_met(user_id, days, today).await,
            Criteria::TotalEntries { count } => {
                Ok(self.entries.count_entries(user_id, None).await? >= i64::from(count))
            }
            // Presence in the window, not a count.
            Criteria::MonthlyEntries { months } => {
                let since = months_before(today, months)
                    .map(|d| d.midnight().assume_offset(self.offset));
                Ok(self.entries.count_entries(user_id, since).await? >= 1)
            }
        }
    }

    /// Whether each of the `days` calendar days ending on `today` has an
    /// entry. A window of zero days is trivially met.
    pub async fn streak_window_met(
        &self,
        user_id: Uuid,
        days: i32,
        today: Date,
    ) -> Result<bool, StoreError> {
        let days = u32::try_from(days).unwrap_or(0);
        if days == 0 {
            return Ok(true);
        }
        // An empty today fails every window; skip the range fetch.
        if !self.entries.entry_exists_on(user_id, today).await? {
            return Ok(false);
        }
        let start = window_start(today, days);
        let logged = self.entries.logged_days(user_id, start, today).await?;
        if logged.len() < days as usize {
            return Ok(false);
        }
        Ok(streak_met(&day_presence(&logged, start, today)))
    }
}

/// Same day-of-month `months` calendar months earlier, clamped to the length
/// of the target month. `None` when the result falls outside the supported
/// date range.
fn months_before(day: Date, months: i32) -> Option<Date> {
    let index =
        i64::from(day.year()) * 12 + i64::from(u8::from(day.month())) - 1 - i64::from(months);
    let year = i32::try_from(index.div_euclid(12)).ok()?;
    let month = Month::try_from(u8::try_from(index.rem_euclid(12) + 1).ok()?).ok()?;
    let dom = day.day().min(month.length(year));
    Date::from_calendar_date(year, month, dom).ok()
}

use std::collections::{BTreeSet, HashSet};

use async_trait::async_trait;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::achievements::repo_types::{Achievement, Award, EarnedAchievement};
use crate::food_logs::repo_types::{EntryFields, FoodLogEntry};
use crate::profiles::repo_types::GoalProfile;
use crate::weights::repo_types::WeightLog;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("unknown achievement criteria type: {0}")]
    UnknownCriteria(String),
    #[error("invalid row: {0}")]
    InvalidRow(String),
}

/// A user's food log, bucketed on the store's calendar.
#[async_trait]
pub trait EntryStore: Send + Sync {
    async fn insert_entry(
        &self,
        user_id: Uuid,
        logged_at: OffsetDateTime,
        fields: &EntryFields,
    ) -> Result<FoodLogEntry, StoreError>;

    /// Rewrites an entry owned by `user_id`; `None` if there is no such entry.
    /// A missing `logged_at` keeps the stored one.
    async fn update_entry(
        &self,
        user_id: Uuid,
        entry_id: Uuid,
        logged_at: Option<OffsetDateTime>,
        fields: &EntryFields,
    ) -> Result<Option<FoodLogEntry>, StoreError>;

    /// `false` when the user owns no entry with that id.
    async fn delete_entry(&self, user_id: Uuid, entry_id: Uuid) -> Result<bool, StoreError>;

    /// Entries logged on the inclusive day range, oldest first, with
    /// timestamps expressed in the calendar offset.
    async fn entries_between(
        &self,
        user_id: Uuid,
        start: Date,
        end: Date,
    ) -> Result<Vec<FoodLogEntry>, StoreError>;

    async fn count_entries(
        &self,
        user_id: Uuid,
        since: Option<OffsetDateTime>,
    ) -> Result<i64, StoreError>;

    async fn entry_exists_on(&self, user_id: Uuid, day: Date) -> Result<bool, StoreError>;

    /// Days in the inclusive range with at least one entry.
    async fn logged_days(
        &self,
        user_id: Uuid,
        start: Date,
        end: Date,
    ) -> Result<BTreeSet<Date>, StoreError> {
        let entries = self.entries_between(user_id, start, end).await?;
        Ok(entries.iter().map(|e| e.logged_at.date()).collect())
    }
}

#[async_trait]
pub trait AchievementStore: Send + Sync {
    /// Full catalog, lowest threshold first.
    async fn catalog(&self) -> Result<Vec<Achievement>, StoreError>;

    async fn earned_ids(&self, user_id: Uuid) -> Result<HashSet<Uuid>, StoreError>;

    /// Records the achievement for the user unless it is already there.
    async fn award(&self, user_id: Uuid, achievement_id: Uuid) -> Result<Award, StoreError>;

    /// Earned achievements with their catalog entries, newest first.
    async fn earned_for_user(&self, user_id: Uuid) -> Result<Vec<EarnedAchievement>, StoreError>;
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn find_profile(&self, user_id: Uuid) -> Result<Option<GoalProfile>, StoreError>;

    /// Inserts or replaces the profile and returns what was stored.
    async fn upsert_profile(&self, profile: &GoalProfile) -> Result<GoalProfile, StoreError>;
}

#[async_trait]
pub trait WeightStore: Send + Sync {
    async fn insert_weight(
        &self,
        user_id: Uuid,
        weight_kg: f64,
        logged_at: OffsetDateTime,
        notes: Option<&str>,
    ) -> Result<WeightLog, StoreError>;

    /// All of the user's weigh-ins, newest first.
    async fn list_weights(&self, user_id: Uuid) -> Result<Vec<WeightLog>, StoreError>;

    async fn delete_weight(&self, user_id: Uuid, weight_id: Uuid) -> Result<bool, StoreError>;
}

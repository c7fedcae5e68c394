use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use super::repo_types::{EntryFields, FoodLogEntry};
use crate::achievements::repo_types::UserAchievement;

#[derive(Debug, Deserialize)]
pub struct EntryRequest {
    #[serde(flatten)]
    pub fields: EntryFields,
    /// Defaults to now on create and to the stored value on update.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub logged_at: Option<OffsetDateTime>,
}

#[derive(Debug, Serialize)]
pub struct CreatedEntryResponse {
    pub entry: FoodLogEntry,
    pub new_achievements: Vec<UserAchievement>,
}

/// Inclusive day range; both ends default to today.
#[derive(Debug, Default, Deserialize)]
pub struct RangeQuery {
    pub from: Option<Date>,
    pub to: Option<Date>,
}

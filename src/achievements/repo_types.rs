use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::store::StoreError;

/// Catalog row as stored.
#[derive(Debug, Clone, FromRow)]
pub struct AchievementRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub criteria_type: String,
    pub criteria_value: i32,
}

/// Kind of rule an achievement uses to decide eligibility.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CriteriaType {
    FirstEntry,
    Streak,
    TotalEntries,
    MonthlyEntries,
}

impl FromStr for CriteriaType {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first_entry" => Ok(Self::FirstEntry),
            "streak" => Ok(Self::Streak),
            "total_entries" => Ok(Self::TotalEntries),
            "monthly_entries" => Ok(Self::MonthlyEntries),
            other => Err(StoreError::UnknownCriteria(other.to_string())),
        }
    }
}

/// Eligibility predicate with its threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Criteria {
    /// At least one entry ever.
    FirstEntry,
    /// Each of the last `days` calendar days, today included, has an entry.
    Streak { days: i32 },
    /// Lifetime entry count reaches `count`.
    TotalEntries { count: i32 },
    /// Any entry within the last `months` calendar months.
    MonthlyEntries { months: i32 },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Achievement {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub criteria_type: CriteriaType,
    pub criteria_value: i32,
}

impl Achievement {
    pub fn criteria(&self) -> Criteria {
        let value = self.criteria_value;
        match self.criteria_type {
            CriteriaType::FirstEntry => Criteria::FirstEntry,
            CriteriaType::Streak => Criteria::Streak { days: value },
            CriteriaType::TotalEntries => Criteria::TotalEntries { count: value },
            CriteriaType::MonthlyEntries => Criteria::MonthlyEntries { months: value },
        }
    }
}

impl TryFrom<AchievementRow> for Achievement {
    type Error = StoreError;

    fn try_from(r: AchievementRow) -> Result<Self, Self::Error> {
        Ok(Self {
            criteria_type: r.criteria_type.parse()?,
            id: r.id,
            name: r.name,
            description: r.description,
            icon: r.icon,
            criteria_value: r.criteria_value,
        })
    }
}

/// Earned record; one per (user, achievement).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct UserAchievement {
    pub id: Uuid,
    pub user_id: Uuid,
    pub achievement_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub earned_at: OffsetDateTime,
}

/// Earned record joined with its catalog entry.
#[derive(Debug, Clone, Serialize)]
pub struct EarnedAchievement {
    #[serde(flatten)]
    pub record: UserAchievement,
    pub achievement: Achievement,
}

/// Outcome of an idempotent award.
#[derive(Debug, Clone, PartialEq)]
pub enum Award {
    Inserted(UserAchievement),
    AlreadyEarned,
}

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::nutrition::{Goal, Targets};
use crate::store::StoreError;

/// Profile row in the database.
#[derive(Debug, Clone, FromRow)]
pub struct GoalProfileRow {
    pub user_id: Uuid,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age_years: i32,
    pub goal: String,
    pub daily_calories: i32,
    pub daily_protein: i32,
    pub daily_carbs: i32,
    pub daily_fats: i32,
    pub targets_overridden: bool,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BodyMetrics {
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age_years: i32,
}

/// A user's body metrics, goal and daily targets.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GoalProfile {
    pub user_id: Uuid,
    #[serde(flatten)]
    pub metrics: BodyMetrics,
    pub goal: Goal,
    pub targets: Targets,
    /// Set when targets were entered by hand rather than derived.
    pub targets_overridden: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl TryFrom<GoalProfileRow> for GoalProfile {
    type Error = StoreError;

    fn try_from(r: GoalProfileRow) -> Result<Self, Self::Error> {
        let goal = r.goal.parse::<Goal>().map_err(StoreError::InvalidRow)?;
        Ok(Self {
            user_id: r.user_id,
            metrics: BodyMetrics {
                weight_kg: r.weight_kg,
                height_cm: r.height_cm,
                age_years: r.age_years,
            },
            goal,
            targets: Targets {
                calories: r.daily_calories,
                protein_g: r.daily_protein,
                carbs_g: r.daily_carbs,
                fats_g: r.daily_fats,
            },
            targets_overridden: r.targets_overridden,
            updated_at: r.updated_at,
        })
    }
}

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{GoalProfile, GoalProfileRow};
use crate::store::{ProfileStore, StoreError};

#[derive(Clone)]
pub struct PgProfileStore {
    db: PgPool,
}

impl PgProfileStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn find_profile(&self, user_id: Uuid) -> Result<Option<GoalProfile>, StoreError> {
        let row = sqlx::query_as::<_, GoalProfileRow>(
            r#"
            SELECT user_id, weight_kg, height_cm, age_years, goal,
                   daily_calories, daily_protein, daily_carbs, daily_fats,
                   targets_overridden, updated_at
              FROM user_profiles
             WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;

        row.map(GoalProfile::try_from).transpose()
    }

    async fn upsert_profile(&self, p: &GoalProfile) -> Result<GoalProfile, StoreError> {
        let row = sqlx::query_as::<_, GoalProfileRow>(
            r#"
            INSERT INTO user_profiles (user_id, weight_kg, height_cm, age_years, goal,
                                       daily_calories, daily_protein, daily_carbs, daily_fats,
                                       targets_overridden)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (user_id) DO UPDATE
               SET weight_kg = EXCLUDED.weight_kg,
                   height_cm = EXCLUDED.height_cm,
                   age_years = EXCLUDED.age_years,
                   goal = EXCLUDED.goal,
                   daily_calories = EXCLUDED.daily_calories,
                   daily_protein = EXCLUDED.daily_protein,
                   daily_carbs = EXCLUDED.daily_carbs,
                   daily_fats = EXCLUDED.daily_fats,
                   targets_overridden = EXCLUDED.targets_overridden,
                   updated_at = now()
            RETURNING user_id, weight_kg, height_cm, age_years, goal,
                      daily_calories, daily_protein, daily_carbs, daily_fats,
                      targets_overridden, updated_at
            "#,
        )
        .bind(p.user_id)
        .bind(p.metrics.weight_kg)
        .bind(p.metrics.height_cm)
        .bind(p.metrics.age_years)
        .bind(p.goal.as_str())
        .bind(p.targets.calories)
        .bind(p.targets.protein_g)
        .bind(p.targets.carbs_g)
        .bind(p.targets.fats_g)
        .bind(p.targets_overridden)
        .fetch_one(&self.db)
        .await?;

        GoalProfile::try_from(row)
    }
}

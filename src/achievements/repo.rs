use std::collections::HashSet;

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use tracing::warn;
use uuid::Uuid;

use super::repo_types::{
    Achievement, AchievementRow, Award, EarnedAchievement, UserAchievement,
};
use crate::store::{AchievementStore, StoreError};

#[derive(Clone)]
pub struct PgAchievementStore {
    db: PgPool,
}

impl PgAchievementStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[derive(Debug, FromRow)]
struct EarnedRow {
    id: Uuid,
    user_id: Uuid,
    achievement_id: Uuid,
    earned_at: OffsetDateTime,
    name: String,
    description: String,
    icon: String,
    criteria_type: String,
    criteria_value: i32,
}

impl TryFrom<EarnedRow> for EarnedAchievement {
    type Error = StoreError;

    fn try_from(r: EarnedRow) -> Result<Self, Self::Error> {
        let achievement = Achievement::try_from(AchievementRow {
            id: r.achievement_id,
            name: r.name,
            description: r.description,
            icon: r.icon,
            criteria_type: r.criteria_type,
            criteria_value: r.criteria_value,
        })?;
        Ok(Self {
            record: UserAchievement {
                id: r.id,
                user_id: r.user_id,
                achievement_id: r.achievement_id,
                earned_at: r.earned_at,
            },
            achievement,
        })
    }
}

#[async_trait]
impl AchievementStore for PgAchievementStore {
    async fn catalog(&self) -> Result<Vec<Achievement>, StoreError> {
        let rows = sqlx::query_as::<_, AchievementRow>(
            r#"
            SELECT id, name, description, icon, criteria_type, criteria_value
              FROM achievements
             ORDER BY criteria_value ASC, created_at ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .filter_map(|row| {
                let id = row.id;
                Achievement::try_from(row)
                    .map_err(|e| warn!(error = %e, achievement_id = %id, "catalog row rejected"))
                    .ok()
            })
            .collect())
    }

    async fn earned_ids(&self, user_id: Uuid) -> Result<HashSet<Uuid>, StoreError> {
        let ids = sqlx::query_scalar::<_, Uuid>(
            r#"SELECT achievement_id FROM user_achievements WHERE user_id = $1"#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;
        Ok(ids.into_iter().collect())
    }

    async fn award(&self, user_id: Uuid, achievement_id: Uuid) -> Result<Award, StoreError> {
        let inserted = sqlx::query_as::<_, UserAchievement>(
            r#"
            INSERT INTO user_achievements (id, user_id, achievement_id)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, achievement_id) DO NOTHING
            RETURNING id, user_id, achievement_id, earned_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(achievement_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(match inserted {
            Some(record) => Award::Inserted(record),
            None => Award::AlreadyEarned,
        })
    }

    async fn earned_for_user(&self, user_id: Uuid) -> Result<Vec<EarnedAchievement>, StoreError> {
        let rows = sqlx::query_as::<_, EarnedRow>(
            r#"
            SELECT ua.id, ua.user_id, ua.achievement_id, ua.earned_at,
                   a.name, a.description, a.icon, a.criteria_type, a.criteria_value
              FROM user_achievements ua
              JOIN achievements a ON a.id = ua.achievement_id
             WHERE ua.user_id = $1
             ORDER BY ua.earned_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(decode_earned(rows))
    }
}

/// Drops rows whose catalog entry no longer decodes, so one bad achievement
/// does not hide the rest of a user's list.
fn decode_earned(rows: Vec<EarnedRow>) -> Vec<EarnedAchievement> {
    rows.into_iter()
        .filter_map(|row| {
            let id = row.id;
            EarnedAchievement::try_from(row)
                .map_err(|e| warn!(error = %e, user_achievement_id = %id, "earned row rejected"))
                .ok()
        })
        .collect()
}

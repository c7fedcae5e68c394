use std::collections::BTreeSet;

use async_trait::async_trait;
use sqlx::PgPool;
use time::{Date, OffsetDateTime, UtcOffset};
use uuid::Uuid;

use super::repo_types::{EntryFields, FoodLogEntry};
use crate::store::{EntryStore, StoreError};

/// Postgres food log, bucketed into days of a fixed calendar offset.
#[derive(Clone)]
pub struct PgEntryStore {
    db: PgPool,
    offset: UtcOffset,
}

impl PgEntryStore {
    pub fn new(db: PgPool, offset: UtcOffset) -> Self {
        Self { db, offset }
    }

    /// Half-open instant range `[start 00:00, day after end 00:00)`.
    fn bounds(&self, start: Date, end: Date) -> (OffsetDateTime, OffsetDateTime) {
        let upper = end.next_day().unwrap_or(end);
        (
            start.midnight().assume_offset(self.offset),
            upper.midnight().assume_offset(self.offset),
        )
    }
}

#[async_trait]
impl EntryStore for PgEntryStore {
    async fn entries_between(
        &self,
        user_id: Uuid,
        start: Date,
        end: Date,
    ) -> Result<Vec<FoodLogEntry>, StoreError> {
        let (lower, upper) = self.bounds(start, end);
        let rows = sqlx::query_as::<_, FoodLogEntry>(
            r#"
            SELECT id, user_id, food_name, description, serving_size, logged_at,
                   calories, protein, carbs, fats, fiber, sugar, sodium, created_at
              FROM food_logs
             WHERE user_id = $1 AND logged_at >= $2 AND logged_at < $3
             ORDER BY logged_at ASC
            "#,
        )
        .bind(user_id)
        .bind(lower)
        .bind(upper)
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|mut e| {
                e.logged_at = e.logged_at.to_offset(self.offset);
                e
            })
            .collect())
    }

    async fn count_entries(
        &self,
        user_id: Uuid,
        since: Option<OffsetDateTime>,
    ) -> Result<i64, StoreError> {
        let n = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
              FROM food_logs
             WHERE user_id = $1
               AND ($2::timestamptz IS NULL OR logged_at >= $2)
            "#,
        )
        .bind(user_id)
        .bind(since)
        .fetch_one(&self.db)
        .await?;
        Ok(n)
    }

    async fn entry_exists_on(&self, user_id: Uuid, day: Date) -> Result<bool, StoreError> {
        let (lower, upper) = self.bounds(day, day);
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM food_logs
                 WHERE user_id = $1 AND logged_at >= $2 AND logged_at < $3
            )
            "#,
        )
        .bind(user_id)
        .bind(lower)
        .bind(upper)
        .fetch_one(&self.db)
        .await?;
        Ok(exists)
    }

    async fn logged_days(
        &self,
        user_id: Uuid,
        start: Date,
        end: Date,
    ) -> Result<BTreeSet<Date>, StoreError> {
        let (lower, upper) = self.bounds(start, end);
        let days = sqlx::query_scalar::<_, Date>(
            r#"
            SELECT DISTINCT ((logged_at AT TIME ZONE 'UTC') + make_interval(secs => $4))::date
              FROM food_logs
             WHERE user_id = $1 AND logged_at >= $2 AND logged_at < $3
            "#,
        )
        .bind(user_id)
        .bind(lower)
        .bind(upper)
        .bind(f64::from(self.offset.whole_seconds()))
        .fetch_all(&self.db)
        .await?;
        Ok(days.into_iter().collect())
    }

    async fn insert_entry(
        &self,
        user_id: Uuid,
        logged_at: OffsetDateTime,
        f: &EntryFields,
    ) -> Result<FoodLogEntry, StoreError> {
        let entry = sqlx::query_as::<_, FoodLogEntry>(
            r#"
            INSERT INTO food_logs (id, user_id, food_name, description, serving_size, logged_at,
                                   calories, protein, carbs, fats, fiber, sugar, sodium)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING id, user_id, food_name, description, serving_size, logged_at,
                      calories, protein, carbs, fats, fiber, sugar, sodium, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(f.food_name.trim())
        .bind(&f.description)
        .bind(&f.serving_size)
        .bind(logged_at)
        .bind(f.calories)
        .bind(f.protein)
        .bind(f.carbs)
        .bind(f.fats)
        .bind(f.fiber)
        .bind(f.sugar)
        .bind(f.sodium)
        .fetch_one(&self.db)
        .await?;
        Ok(entry)
    }

    async fn update_entry(
        &self,
        user_id: Uuid,
        entry_id: Uuid,
        logged_at: Option<OffsetDateTime>,
        f: &EntryFields,
    ) -> Result<Option<FoodLogEntry>, StoreError> {
        let entry = sqlx::query_as::<_, FoodLogEntry>(
            r#"
            UPDATE food_logs
               SET food_name = $3, description = $4, serving_size = $5,
                   logged_at = COALESCE($6, logged_at),
                   calories = $7, protein = $8, carbs = $9, fats = $10,
                   fiber = $11, sugar = $12, sodium = $13
             WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, food_name, description, serving_size, logged_at,
                      calories, protein, carbs, fats, fiber, sugar, sodium, created_at
            "#,
        )
        .bind(entry_id)
        .bind(user_id)
        .bind(f.food_name.trim())
        .bind(&f.description)
        .bind(&f.serving_size)
        .bind(logged_at)
        .bind(f.calories)
        .bind(f.protein)
        .bind(f.carbs)
        .bind(f.fats)
        .bind(f.fiber)
        .bind(f.sugar)
        .bind(f.sodium)
        .fetch_optional(&self.db)
        .await?;
        Ok(entry)
    }

    async fn delete_entry(&self, user_id: Uuid, entry_id: Uuid) -> Result<bool, StoreError> {
        let res = sqlx::query(r#"DELETE FROM food_logs WHERE id = $1 AND user_id = $2"#)
            .bind(entry_id)
            .bind(user_id)
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}

use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::WeightLog;
use crate::store::{StoreError, WeightStore};

#[derive(Clone)]
pub struct PgWeightStore {
    db: PgPool,
}

impl PgWeightStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl WeightStore for PgWeightStore {
    async fn insert_weight(
        &self,
        user_id: Uuid,
        weight_kg: f64,
        logged_at: OffsetDateTime,
        notes: Option<&str>,
    ) -> Result<WeightLog, StoreError> {
        let log = sqlx::query_as::<_, WeightLog>(
            r#"
            INSERT INTO weight_logs (id, user_id, weight_kg, logged_at, notes)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, weight_kg, logged_at, notes, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(weight_kg)
        .bind(logged_at)
        .bind(notes)
        .fetch_one(&self.db)
        .await?;
        Ok(log)
    }

    async fn list_weights(&self, user_id: Uuid) -> Result<Vec<WeightLog>, StoreError> {
        let logs = sqlx::query_as::<_, WeightLog>(
            r#"
            SELECT id, user_id, weight_kg, logged_at, notes, created_at
              FROM weight_logs
             WHERE user_id = $1
             ORDER BY logged_at DESC, created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;
        Ok(logs)
    }

    async fn delete_weight(&self, user_id: Uuid, weight_id: Uuid) -> Result<bool, StoreError> {
        let res = sqlx::query(r#"DELETE FROM weight_logs WHERE id = $1 AND user_id = $2"#)
            .bind(weight_id)
            .bind(user_id)
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}

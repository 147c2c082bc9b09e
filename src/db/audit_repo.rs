// src/db/audit_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::audit::{ActivityLog, LogQuery, NewActivity},
};

// Append-only: there is no update or delete here
#[derive(Clone)]
pub struct AuditRepository {
    pool: PgPool,
}

impl AuditRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn append(&self, entry: &NewActivity) -> Result<ActivityLog, AppError> {
        let log = sqlx::query_as::<_, ActivityLog>(
            r#"
            INSERT INTO activity_logs (
                id, user_id, user_name, user_role, action, resource,
                resource_id, details, ip_address
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(entry.user_id)
        .bind(&entry.user_name)
        .bind(&entry.user_role)
        .bind(&entry.action)
        .bind(&entry.resource)
        .bind(&entry.resource_id)
        .bind(&entry.details)
        .bind(&entry.ip_address)
        .fetch_one(&self.pool)
        .await?;
        Ok(log)
    }

    /// One page of logs, newest first, plus the total matching count.
    pub async fn page(&self, query: &LogQuery) -> Result<(Vec<ActivityLog>, i64), AppError> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM activity_logs
            WHERE ($1::text IS NULL OR resource = $1)
              AND ($2::text IS NULL OR action = $2)
            "#,
        )
        .bind(&query.resource)
        .bind(&query.action)
        .fetch_one(&self.pool)
        .await?;

        let logs = sqlx::query_as::<_, ActivityLog>(
            r#"
            SELECT * FROM activity_logs
            WHERE ($1::text IS NULL OR resource = $1)
              AND ($2::text IS NULL OR action = $2)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(&query.resource)
        .bind(&query.action)
        .bind(query.limit())
        .bind(query.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok((logs, total))
    }
}

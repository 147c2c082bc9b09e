// src/db/analytics_repo.rs

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::analytics::{AnalyticsEvent, DailyStats, TrackEventPayload},
};

#[derive(Clone)]
pub struct AnalyticsRepository {
    pool: PgPool,
}

impl AnalyticsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Bumps the day's visit counter and the per-page counter in one upsert.
    pub async fn track_visit(&self, date: NaiveDate, page: &str) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO daily_stats (date, total_visits, page_views, last_updated)
            VALUES ($1, 1, jsonb_build_object($2::text, 1), NOW())
            ON CONFLICT (date) DO UPDATE SET
                total_visits = daily_stats.total_visits + 1,
                page_views = jsonb_set(
                    daily_stats.page_views,
                    ARRAY[$2::text],
                    to_jsonb(COALESCE((daily_stats.page_views ->> $2::text)::bigint, 0) + 1)
                ),
                last_updated = NOW()
            "#,
        )
        .bind(date)
        .bind(page)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn record_event(&self, event: &TrackEventPayload) -> Result<AnalyticsEvent, AppError> {
        let created = sqlx::query_as::<_, AnalyticsEvent>(
            r#"
            INSERT INTO analytics_events (id, category, action, label)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&event.category)
        .bind(&event.action)
        .bind(&event.label)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    /// The latest `days` rows, returned in chronological order.
    pub async fn recent_stats(&self, days: i64) -> Result<Vec<DailyStats>, AppError> {
        let stats = sqlx::query_as::<_, DailyStats>(
            r#"
            SELECT * FROM (
                SELECT * FROM daily_stats ORDER BY date DESC LIMIT $1
            ) AS recent
            ORDER BY date ASC
            "#,
        )
        .bind(days)
        .fetch_all(&self.pool)
        .await?;
        Ok(stats)
    }
}

// src/db/review_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{common::error::AppError, models::review::Review};

#[derive(Clone)]
pub struct ReviewRepository {
    pool: PgPool,
}

impl ReviewRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, review: &Review) -> Result<Review, AppError> {
        let created = sqlx::query_as::<_, Review>(
            r#"
            INSERT INTO reviews (
                id, guest_name, guest_email, rating, comment, reservation_id,
                is_visible, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(review.id)
        .bind(&review.guest_name)
        .bind(&review.guest_email)
        .bind(review.rating)
        .bind(&review.comment)
        .bind(review.reservation_id)
        .bind(review.is_visible)
        .bind(review.created_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    pub async fn list(&self, visible_only: bool, limit: i64) -> Result<Vec<Review>, AppError> {
        let reviews = sqlx::query_as::<_, Review>(
            r#"
            SELECT * FROM reviews
            WHERE is_visible OR NOT $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(visible_only)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(reviews)
    }

    pub async fn set_visibility(&self, id: Uuid, is_visible: bool) -> Result<Option<Review>, AppError> {
        let review = sqlx::query_as::<_, Review>(
            "UPDATE reviews SET is_visible = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(is_visible)
        .fetch_optional(&self.pool)
        .await?;
        Ok(review)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

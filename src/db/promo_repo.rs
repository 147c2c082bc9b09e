// src/db/promo_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::{AppError, on_unique_violation},
    db::store::PromoStore,
    models::promo::PromoCode,
};

#[derive(Clone)]
pub struct PromoRepository {
    pool: PgPool,
}

impl PromoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PromoStore for PromoRepository {
    async fn list_promos(&self) -> Result<Vec<PromoCode>, AppError> {
        let promos =
            sqlx::query_as::<_, PromoCode>("SELECT * FROM promo_codes ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;
        Ok(promos)
    }

    async fn find_promo(&self, id: Uuid) -> Result<Option<PromoCode>, AppError> {
        let promo = sqlx::query_as::<_, PromoCode>("SELECT * FROM promo_codes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(promo)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<PromoCode>, AppError> {
        let promo = sqlx::query_as::<_, PromoCode>("SELECT * FROM promo_codes WHERE code = $1")
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;
        Ok(promo)
    }

    async fn insert_promo(&self, promo: &PromoCode) -> Result<PromoCode, AppError> {
        sqlx::query_as::<_, PromoCode>(
            r#"
            INSERT INTO promo_codes (
                id, code, discount_type, discount_value, max_usage, current_usage,
                room_type_ids, valid_days, valid_from, valid_until, is_active,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *
            "#,
        )
        .bind(promo.id)
        .bind(&promo.code)
        .bind(promo.discount_type)
        .bind(promo.discount_value)
        .bind(promo.max_usage)
        .bind(promo.current_usage)
        .bind(&promo.room_type_ids)
        .bind(&promo.valid_days)
        .bind(promo.valid_from)
        .bind(promo.valid_until)
        .bind(promo.is_active)
        .bind(promo.created_at)
        .bind(promo.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| on_unique_violation(e, || AppError::PromoCodeAlreadyExists(promo.code.clone())))
    }

    async fn update_promo(&self, promo: &PromoCode) -> Result<Option<PromoCode>, AppError> {
        // current_usage is owned by consume/release and never written here
        sqlx::query_as::<_, PromoCode>(
            r#"
            UPDATE promo_codes SET
                code = $2, discount_type = $3, discount_value = $4, max_usage = $5,
                room_type_ids = $6, valid_days = $7, valid_from = $8, valid_until = $9,
                is_active = $10, updated_at = $11
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(promo.id)
        .bind(&promo.code)
        .bind(promo.discount_type)
        .bind(promo.discount_value)
        .bind(promo.max_usage)
        .bind(&promo.room_type_ids)
        .bind(&promo.valid_days)
        .bind(promo.valid_from)
        .bind(promo.valid_until)
        .bind(promo.is_active)
        .bind(promo.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| on_unique_violation(e, || AppError::PromoCodeAlreadyExists(promo.code.clone())))
    }

    async fn delete_promo(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM promo_codes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn consume_usage(&self, id: Uuid) -> Result<Option<PromoCode>, AppError> {
        let promo = sqlx::query_as::<_, PromoCode>(
            r#"
            UPDATE promo_codes
            SET current_usage = current_usage + 1, updated_at = NOW()
            WHERE id = $1 AND current_usage < max_usage
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(promo)
    }

    async fn release_usage(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE promo_codes
            SET current_usage = current_usage - 1, updated_at = NOW()
            WHERE id = $1 AND current_usage > 0
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

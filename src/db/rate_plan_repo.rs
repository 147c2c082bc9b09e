// src/db/rate_plan_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{common::error::AppError, db::store::RatePlanStore, models::rate_plan::RatePlan};

#[derive(Clone)]
pub struct RatePlanRepository {
    pool: PgPool,
}

impl RatePlanRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RatePlanStore for RatePlanRepository {
    async fn list_plans(
        &self,
        active_only: bool,
        room_type_id: Option<Uuid>,
    ) -> Result<Vec<RatePlan>, AppError> {
        let plans = sqlx::query_as::<_, RatePlan>(
            r#"
            SELECT * FROM rate_plans
            WHERE (is_active OR NOT $1)
              AND ($2::uuid IS NULL OR room_type_id IS NULL OR room_type_id = $2)
            ORDER BY created_at DESC
            "#,
        )
        .bind(active_only)
        .bind(room_type_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(plans)
    }

    async fn find_plan(&self, id: Uuid) -> Result<Option<RatePlan>, AppError> {
        let plan = sqlx::query_as::<_, RatePlan>("SELECT * FROM rate_plans WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(plan)
    }

    async fn insert_plan(&self, plan: &RatePlan) -> Result<RatePlan, AppError> {
        let created = sqlx::query_as::<_, RatePlan>(
            r#"
            INSERT INTO rate_plans (
                id, room_type_id, name, description, price_modifier_type,
                price_modifier_val, is_active, conditions, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(plan.id)
        .bind(plan.room_type_id)
        .bind(&plan.name)
        .bind(&plan.description)
        .bind(plan.price_modifier_type)
        .bind(plan.price_modifier_val)
        .bind(plan.is_active)
        .bind(&plan.conditions)
        .bind(plan.created_at)
        .bind(plan.updated_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn update_plan(&self, plan: &RatePlan) -> Result<Option<RatePlan>, AppError> {
        let updated = sqlx::query_as::<_, RatePlan>(
            r#"
            UPDATE rate_plans SET
                room_type_id = $2, name = $3, description = $4, price_modifier_type = $5,
                price_modifier_val = $6, is_active = $7, conditions = $8, updated_at = $9
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(plan.id)
        .bind(plan.room_type_id)
        .bind(&plan.name)
        .bind(&plan.description)
        .bind(plan.price_modifier_type)
        .bind(plan.price_modifier_val)
        .bind(plan.is_active)
        .bind(&plan.conditions)
        .bind(plan.updated_at)
        .fetch_optional(&self.pool)
        .await?;
        Ok(updated)
    }

    async fn delete_plan(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM rate_plans WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

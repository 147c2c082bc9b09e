// src/services/rate_plan_service.rs

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::Stores,
    models::rate_plan::{CreateRatePlanPayload, RatePlan, UpdateRatePlanPayload},
};

#[derive(Clone)]
pub struct RatePlanService {
    stores: Stores,
}

impl RatePlanService {
    pub fn new(stores: Stores) -> Self {
        Self { stores }
    }

    /// Active plans; for a room, the global plans plus the ones scoped to it.
    pub async fn list_public(&self, room_type_id: Option<Uuid>) -> Result<Vec<RatePlan>, AppError> {
        self.stores.rate_plans.list_plans(true, room_type_id).await
    }

    pub async fn list_all(&self) -> Result<Vec<RatePlan>, AppError> {
        self.stores.rate_plans.list_plans(false, None).await
    }

    pub async fn get(&self, id: Uuid) -> Result<RatePlan, AppError> {
        self.stores
            .rate_plans
            .find_plan(id)
            .await?
            .ok_or(AppError::NotFound("Rate plan"))
    }

    pub async fn create(&self, payload: CreateRatePlanPayload) -> Result<RatePlan, AppError> {
        payload.validate()?;
        let plan = RatePlan::new(payload, Utc::now());
        self.stores.rate_plans.insert_plan(&plan).await
    }

    pub async fn update(
        &self,
        id: Uuid,
        patch: UpdateRatePlanPayload,
    ) -> Result<(RatePlan, RatePlan), AppError> {
        patch.validate()?;
        let before = self.get(id).await?;
        let mut after = before.clone();
        after.apply(patch, Utc::now());
        let saved = self
            .stores
            .rate_plans
            .update_plan(&after)
            .await?
            .ok_or(AppError::NotFound("Rate plan"))?;
        Ok((before, saved))
    }

    pub async fn delete(&self, id: Uuid) -> Result<RatePlan, AppError> {
        let plan = self.get(id).await?;
        if !self.stores.rate_plans.delete_plan(id).await? {
            return Err(AppError::NotFound("Rate plan"));
        }
        Ok(plan)
    }

    /// Plan chosen on the booking form. `""` and `"standard"` mean room only.
    pub async fn resolve_for_booking(
        &self,
        rate_plan_id: &str,
        room_type_id: Uuid,
    ) -> Result<Option<RatePlan>, AppError> {
        let raw = rate_plan_id.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case("standard") {
            return Ok(None);
        }
        let id = Uuid::parse_str(raw)
            .map_err(|_| AppError::field("rate_plan_id", "Unknown rate plan."))?;
        match self.stores.rate_plans.find_plan(id).await? {
            Some(plan) if plan.applies_to(room_type_id) => Ok(Some(plan)),
            Some(_) => Err(AppError::field(
                "rate_plan_id",
                "This rate plan is not offered for the selected room.",
            )),
            None => Err(AppError::field("rate_plan_id", "Unknown rate plan.")),
        }
    }
}

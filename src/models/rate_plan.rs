// src/models/rate_plan.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "rate_modifier_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ModifierType {
    /// `rate * (1 + value / 100)` on every night
    Percent,
    /// `rate + value` on every night
    AbsoluteAdd,
    /// `value` added once to the stay total
    AbsoluteTotal,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct RatePlan {
    pub id: Uuid,
    // None = every room type
    pub room_type_id: Option<Uuid>,
    #[schema(example = "Breakfast Included")]
    pub name: String,
    pub description: String,
    pub price_modifier_type: ModifierType,
    // Signed, negative values are discounts
    #[schema(example = "-10")]
    pub price_modifier_val: Decimal,
    pub is_active: bool,
    pub conditions: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RatePlan {
    pub fn applies_to(&self, room_type_id: Uuid) -> bool {
        self.is_active && self.room_type_id.is_none_or(|id| id == room_type_id)
    }

    /// Effective nightly price under this plan. `absolute_total` leaves the
    /// nightly rate alone, see [`RatePlan::stay_adjustment`].
    pub fn nightly_price(&self, rate: Decimal) -> Decimal {
        match self.price_modifier_type {
            ModifierType::Percent => {
                rate * (Decimal::ONE + self.price_modifier_val / Decimal::ONE_HUNDRED)
            }
            ModifierType::AbsoluteAdd => rate + self.price_modifier_val,
            ModifierType::AbsoluteTotal => rate,
        }
    }

    /// Amount added once per stay, independent of the night count.
    pub fn stay_adjustment(&self) -> Decimal {
        match self.price_modifier_type {
            ModifierType::AbsoluteTotal => self.price_modifier_val,
            _ => Decimal::ZERO,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateRatePlanPayload {
    pub room_type_id: Option<Uuid>,
    #[validate(length(min = 1, message = "Name is required."))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price_modifier_type: ModifierType,
    pub price_modifier_val: Decimal,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub conditions: Vec<String>,
}

fn default_true() -> bool {
    true
}

/// Partial update. `room_type_id: null` explicitly widens the plan to all rooms,
/// while an absent key keeps the current scope.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateRatePlanPayload {
    #[serde(default, deserialize_with = "crate::models::double_option")]
    #[schema(value_type = Option<Uuid>)]
    pub room_type_id: Option<Option<Uuid>>,
    #[validate(length(min = 1, message = "Name cannot be empty."))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub price_modifier_type: Option<ModifierType>,
    pub price_modifier_val: Option<Decimal>,
    pub is_active: Option<bool>,
    pub conditions: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct RatePlanQuery {
    pub room_type_id: Option<Uuid>,
}

impl RatePlan {
    pub fn new(payload: CreateRatePlanPayload, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            room_type_id: payload.room_type_id,
            name: payload.name,
            description: payload.description,
            price_modifier_type: payload.price_modifier_type,
            price_modifier_val: payload.price_modifier_val,
            is_active: payload.is_active,
            conditions: payload.conditions,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, patch: UpdateRatePlanPayload, now: DateTime<Utc>) {
        if let Some(room_type_id) = patch.room_type_id {
            self.room_type_id = room_type_id;
        }
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(kind) = patch.price_modifier_type {
            self.price_modifier_type = kind;
        }
        if let Some(val) = patch.price_modifier_val {
            self.price_modifier_val = val;
        }
        if let Some(is_active) = patch.is_active {
            self.is_active = is_active;
        }
        if let Some(conditions) = patch.conditions {
            self.conditions = conditions;
        }
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(kind: ModifierType, val: i64) -> RatePlan {
        RatePlan::new(
            CreateRatePlanPayload {
                room_type_id: None,
                name: "Plan".into(),
                description: String::new(),
                price_modifier_type: kind,
                price_modifier_val: Decimal::from(val),
                is_active: true,
                conditions: vec![],
            },
            Utc::now(),
        )
    }

    #[test]
    fn percent_discount_on_nightly_rate() {
        let p = plan(ModifierType::Percent, -10);
        assert_eq!(p.nightly_price(Decimal::from(500_000)), Decimal::from(450_000));
        assert_eq!(p.stay_adjustment(), Decimal::ZERO);
    }

    #[test]
    fn absolute_add_is_per_night_and_total_is_once() {
        let add = plan(ModifierType::AbsoluteAdd, 100_000);
        assert_eq!(add.nightly_price(Decimal::from(500_000)), Decimal::from(600_000));

        let total = plan(ModifierType::AbsoluteTotal, 250_000);
        assert_eq!(total.nightly_price(Decimal::from(500_000)), Decimal::from(500_000));
        assert_eq!(total.stay_adjustment(), Decimal::from(250_000));
    }

    #[test]
    fn scope_and_active_flag_gate_applicability() {
        let room = Uuid::new_v4();
        let mut p = plan(ModifierType::Percent, 5);
        assert!(p.applies_to(room));

        p.room_type_id = Some(Uuid::new_v4());
        assert!(!p.applies_to(room));

        p.room_type_id = Some(room);
        assert!(p.applies_to(room));

        p.is_active = false;
        assert!(!p.applies_to(room));
    }

    #[test]
    fn explicit_null_scope_widens_plan() {
        let mut p = plan(ModifierType::Percent, 5);
        p.room_type_id = Some(Uuid::new_v4());
        let patch: UpdateRatePlanPayload =
            serde_json::from_str(r#"{ "room_type_id": null }"#).unwrap();
        p.apply(patch, Utc::now());
        assert_eq!(p.room_type_id, None);

        let untouched: UpdateRatePlanPayload = serde_json::from_str(r#"{ "name": "X" }"#).unwrap();
        assert!(untouched.room_type_id.is_none());
    }
}

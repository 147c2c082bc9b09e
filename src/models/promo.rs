// src/models/promo.rs

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::room::validate_not_negative;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "discount_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DiscountType {
    Percent,
    Fixed,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct PromoCode {
    pub id: Uuid,
    #[schema(example = "WEEKEND10")]
    pub code: String,
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
    pub max_usage: i32,
    pub current_usage: i32,
    // Empty = every room type
    pub room_type_ids: Vec<Uuid>,
    // 0 = Sunday .. 6 = Saturday, empty = every day
    pub valid_days: Vec<i16>,
    pub valid_from: NaiveDate,
    pub valid_until: NaiveDate,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Why a code cannot be used for a given check-in date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromoRejection {
    Inactive,
    UsageExhausted,
    OutsideWindow,
    WeekdayExcluded,
}

impl PromoRejection {
    pub fn message(self) -> &'static str {
        match self {
            PromoRejection::Inactive => "Promo code is not active.",
            PromoRejection::UsageExhausted => "Promo code usage limit reached.",
            PromoRejection::OutsideWindow => "Promo code is not valid for the selected dates.",
            PromoRejection::WeekdayExcluded => "Promo code is not valid on the check-in day.",
        }
    }
}

pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

impl PromoCode {
    /// Pure eligibility check, the usage counter is not touched.
    pub fn check(&self, check_in: NaiveDate) -> Result<(), PromoRejection> {
        if !self.is_active {
            return Err(PromoRejection::Inactive);
        }
        if self.current_usage >= self.max_usage {
            return Err(PromoRejection::UsageExhausted);
        }
        if check_in < self.valid_from || check_in > self.valid_until {
            return Err(PromoRejection::OutsideWindow);
        }
        let weekday = check_in.weekday().num_days_from_sunday() as i16;
        if !self.valid_days.is_empty() && !self.valid_days.contains(&weekday) {
            return Err(PromoRejection::WeekdayExcluded);
        }
        Ok(())
    }

    pub fn covers_room(&self, room_type_id: Uuid) -> bool {
        self.room_type_ids.is_empty() || self.room_type_ids.contains(&room_type_id)
    }

    /// Price after the discount. Rooms outside the allow-list keep their price.
    pub fn discounted_price(&self, room_type_id: Uuid, price: Decimal) -> Decimal {
        if !self.covers_room(room_type_id) {
            return price;
        }
        let discounted = match self.discount_type {
            DiscountType::Percent => price - price * self.discount_value / Decimal::ONE_HUNDRED,
            DiscountType::Fixed => price - self.discount_value,
        };
        discounted.max(Decimal::ZERO)
    }
}

fn validate_weekdays(days: &Vec<i16>) -> Result<(), ValidationError> {
    if days.iter().any(|d| !(0..=6).contains(d)) {
        let mut err = ValidationError::new("range");
        err.message = Some("Weekdays must be between 0 (Sunday) and 6 (Saturday).".into());
        return Err(err);
    }
    Ok(())
}

fn check_rules(
    discount_type: DiscountType,
    discount_value: Decimal,
    valid_from: NaiveDate,
    valid_until: NaiveDate,
) -> Result<(), ValidationError> {
    if discount_type == DiscountType::Percent && discount_value > Decimal::ONE_HUNDRED {
        let mut err = ValidationError::new("discount_value");
        err.message = Some("A percent discount cannot exceed 100.".into());
        return Err(err);
    }
    if valid_from > valid_until {
        let mut err = ValidationError::new("valid_until");
        err.message = Some("valid_until must not be before valid_from.".into());
        return Err(err);
    }
    Ok(())
}

fn validate_create_rules(payload: &CreatePromoPayload) -> Result<(), ValidationError> {
    check_rules(
        payload.discount_type,
        payload.discount_value,
        payload.valid_from,
        payload.valid_until,
    )
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_create_rules", skip_on_field_errors = false))]
pub struct CreatePromoPayload {
    #[validate(length(min = 1, message = "Code is required."))]
    pub code: String,
    pub discount_type: DiscountType,
    #[validate(custom(function = "validate_not_negative"))]
    pub discount_value: Decimal,
    #[validate(range(min = 0, message = "max_usage cannot be negative."))]
    pub max_usage: i32,
    #[serde(default)]
    pub room_type_ids: Vec<Uuid>,
    #[serde(default)]
    #[validate(custom(function = "validate_weekdays"))]
    pub valid_days: Vec<i16>,
    pub valid_from: NaiveDate,
    pub valid_until: NaiveDate,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdatePromoPayload {
    #[validate(length(min = 1, message = "Code cannot be empty."))]
    pub code: Option<String>,
    pub discount_type: Option<DiscountType>,
    #[validate(custom(function = "validate_not_negative"))]
    pub discount_value: Option<Decimal>,
    #[validate(range(min = 0, message = "max_usage cannot be negative."))]
    pub max_usage: Option<i32>,
    pub room_type_ids: Option<Vec<Uuid>>,
    #[validate(custom(function = "validate_weekdays"))]
    pub valid_days: Option<Vec<i16>>,
    pub valid_from: Option<NaiveDate>,
    pub valid_until: Option<NaiveDate>,
    pub is_active: Option<bool>,
}

impl PromoCode {
    pub fn new(payload: CreatePromoPayload, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            code: normalize_code(&payload.code),
            discount_type: payload.discount_type,
            discount_value: payload.discount_value,
            max_usage: payload.max_usage,
            current_usage: 0,
            room_type_ids: payload.room_type_ids,
            valid_days: payload.valid_days,
            valid_from: payload.valid_from,
            valid_until: payload.valid_until,
            is_active: payload.is_active,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies a partial update, re-checking the cross-field rules on the merged record.
    pub fn apply(
        &mut self,
        patch: UpdatePromoPayload,
        now: DateTime<Utc>,
    ) -> Result<(), ValidationError> {
        if let Some(code) = patch.code {
            self.code = normalize_code(&code);
        }
        if let Some(kind) = patch.discount_type {
            self.discount_type = kind;
        }
        if let Some(value) = patch.discount_value {
            self.discount_value = value;
        }
        if let Some(max_usage) = patch.max_usage {
            self.max_usage = max_usage;
        }
        if let Some(room_type_ids) = patch.room_type_ids {
            self.room_type_ids = room_type_ids;
        }
        if let Some(valid_days) = patch.valid_days {
            self.valid_days = valid_days;
        }
        if let Some(valid_from) = patch.valid_from {
            self.valid_from = valid_from;
        }
        if let Some(valid_until) = patch.valid_until {
            self.valid_until = valid_until;
        }
        if let Some(is_active) = patch.is_active {
            self.is_active = is_active;
        }
        self.updated_at = now;
        check_rules(
            self.discount_type,
            self.discount_value,
            self.valid_from,
            self.valid_until,
        )
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct VerifyPromoPayload {
    pub code: String,
    // Defaults to today when absent
    pub check_in: Option<NaiveDate>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VerifyPromoResponse {
    pub valid: bool,
    pub code: String,
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
    pub room_type_ids: Vec<Uuid>,
    pub message: String,
}

impl From<&PromoCode> for VerifyPromoResponse {
    fn from(promo: &PromoCode) -> Self {
        Self {
            valid: true,
            code: promo.code.clone(),
            discount_type: promo.discount_type,
            discount_value: promo.discount_value,
            room_type_ids: promo.room_type_ids.clone(),
            message: "Promo code applied.".into(),
        }
    }
}

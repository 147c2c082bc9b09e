// src/models/inventory.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::room::validate_not_negative;

/// Allotment assumed for any date without an override row.
pub const DEFAULT_ALLOTMENT: i32 = 5;

// --- Override row of the calendar (one per room and date) ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct InventoryDay {
    pub room_type_id: Uuid,
    #[schema(example = "2025-03-01")]
    pub date: NaiveDate,
    pub allotment: i32,
    pub rate: Decimal,
    pub is_closed: bool,
}

impl InventoryDay {
    pub fn is_open(&self) -> bool {
        !self.is_closed && self.allotment > 0
    }
}

/// A calendar cell after merging the override row (if any) with the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ResolvedDay {
    #[serde(flatten)]
    pub day: InventoryDay,
    // true when no override row exists for the date
    pub is_default: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum InventoryField {
    Allotment,
    Rate,
    IsClosed,
}

/// A single-field edit on one calendar cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellEdit {
    Allotment(i32),
    Rate(Decimal),
    Closed(bool),
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CellEditPayload {
    pub room_type_id: Uuid,
    pub date: NaiveDate,
    pub field: InventoryField,
    #[schema(value_type = Object)]
    pub value: serde_json::Value,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SetDayPayload {
    pub room_type_id: Uuid,
    pub date: NaiveDate,
    #[validate(range(min = 0, message = "Allotment cannot be negative."))]
    pub allotment: i32,
    #[validate(custom(function = "validate_not_negative"))]
    pub rate: Decimal,
    #[serde(default)]
    pub is_closed: bool,
}

/// Range update over `[start_date, end_date]` (inclusive). `None` fields are left
/// untouched; an empty or absent weekday list means every day.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct BulkUpdateRequest {
    pub room_type_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[validate(range(min = 0, message = "Allotment cannot be negative."))]
    pub allotment: Option<i32>,
    #[validate(custom(function = "validate_not_negative"))]
    pub rate: Option<Decimal>,
    pub is_closed: Option<bool>,
    // 0 = Sunday .. 6 = Saturday
    pub days_of_week: Option<Vec<u8>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BulkUpdateSummary {
    pub room_type_id: Uuid,
    pub updated_days: usize,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct InventoryQuery {
    pub room_type_id: Option<Uuid>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub resolved: bool,
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: Option<i32>,
}

/// One room type offered for a stay.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RoomAvailability {
    #[serde(flatten)]
    pub room: crate::models::room::RoomType,
    // Every night open with allotment left
    pub available: bool,
    pub nights: i64,
    pub nightly_rates: Vec<Decimal>,
    pub total_rate: Decimal,
    pub average_rate: Decimal,
    pub min_rate: Decimal,
    // "from" price shown by the public listing
    pub available_rate: Decimal,
}

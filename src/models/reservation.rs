// src/models/reservation.rs

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "reservation_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    CheckedIn,
    CheckedOut,
    Cancelled,
}

impl ReservationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::CheckedIn => "checked_in",
            ReservationStatus::CheckedOut => "checked_out",
            ReservationStatus::Cancelled => "cancelled",
        }
    }

    /// Forward moves along pending → confirmed → checked_in → checked_out, plus
    /// cancellation from any state before checked_out.
    pub fn can_transition_to(self, next: ReservationStatus) -> bool {
        use ReservationStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed)
                | (Confirmed, CheckedIn)
                | (CheckedIn, CheckedOut)
                | (Pending | Confirmed | CheckedIn, Cancelled)
        )
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Reservation {
    pub id: Uuid,
    #[schema(example = "SGH-20250301-A1B2C3")]
    pub booking_code: String,
    pub guest_name: String,
    pub guest_email: String,
    pub guest_phone: String,
    pub room_type_id: Uuid,
    pub room_type_name: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub nights: i32,
    pub guests: i32,
    pub special_requests: String,
    pub rate_plan_id: Option<Uuid>,
    pub rate_plan_name: String,
    pub promo_code: Option<String>,
    // Price snapshot taken at booking time, never recomputed
    pub rate_per_night: Decimal,
    pub total_amount: Decimal,
    pub discount_amount: Decimal,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Name stored on bookings made without a rate plan.
pub const STANDARD_RATE_NAME: &str = "Room Only";

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateReservationPayload {
    #[validate(custom(function = "validate_guest_name"))]
    pub guest_name: String,
    #[validate(email(message = "A valid e-mail address is required."))]
    pub guest_email: String,
    #[validate(length(min = 5, message = "A phone number is required."))]
    pub guest_phone: String,
    pub room_type_id: Uuid,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    #[validate(range(min = 1, message = "At least one guest is required."))]
    pub guests: i32,
    // "" or "standard" books the plain room rate
    #[serde(default)]
    pub rate_plan_id: String,
    #[serde(default)]
    pub special_requests: String,
    #[serde(default)]
    pub promo_code: Option<String>,
}

fn validate_guest_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some("Guest name is required.".into());
        return Err(err);
    }
    Ok(())
}

/// Pricing request for a stay, without guest details.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct QuoteRequest {
    pub room_type_id: Uuid,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    #[serde(default = "one_guest")]
    #[validate(range(min = 1, message = "At least one guest is required."))]
    pub guests: i32,
    #[serde(default)]
    pub rate_plan_id: String,
    #[serde(default)]
    pub promo_code: Option<String>,
}

fn one_guest() -> i32 {
    1
}

impl From<&CreateReservationPayload> for QuoteRequest {
    fn from(p: &CreateReservationPayload) -> Self {
        Self {
            room_type_id: p.room_type_id,
            check_in: p.check_in,
            check_out: p.check_out,
            guests: p.guests,
            rate_plan_id: p.rate_plan_id.clone(),
            promo_code: p.promo_code.clone(),
        }
    }
}

/// Priced stay, used both for quotes and as the basis of a new reservation.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct StayQuote {
    pub room_type_id: Uuid,
    pub room_type_name: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub nights: i32,
    // Resolved calendar rates, before the rate plan
    pub nightly_rates: Vec<Decimal>,
    pub rate_plan_id: Option<Uuid>,
    pub rate_plan_name: String,
    // After the rate plan, before the promo
    pub subtotal: Decimal,
    pub rate_per_night: Decimal,
    pub promo_code: Option<String>,
    pub discount_amount: Decimal,
    pub total_amount: Decimal,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReservationFilter {
    pub status: Option<ReservationStatus>,
    // check_in >= start_date
    pub start_date: Option<NaiveDate>,
    // check_out <= end_date
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct CheckReservationQuery {
    pub booking_code: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusPayload {
    pub status: ReservationStatus,
}

/// `<PREFIX>-YYYYMMDD-XXXXXX`, the suffix taken from a fresh v4 uuid.
pub fn generate_booking_code(prefix: &str, today: NaiveDate) -> String {
    let suffix: String = Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(6)
        .collect::<String>()
        .to_uppercase();
    format!("{}-{}-{}", prefix, today.format("%Y%m%d"), suffix)
}

impl Reservation {
    pub fn from_quote(
        quote: StayQuote,
        payload: CreateReservationPayload,
        booking_code: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            booking_code,
            guest_name: payload.guest_name.trim().to_string(),
            guest_email: payload.guest_email.trim().to_lowercase(),
            guest_phone: payload.guest_phone.trim().to_string(),
            room_type_id: quote.room_type_id,
            room_type_name: quote.room_type_name,
            check_in: quote.check_in,
            check_out: quote.check_out,
            nights: quote.nights,
            guests: payload.guests,
            special_requests: payload.special_requests,
            rate_plan_id: quote.rate_plan_id,
            rate_plan_name: quote.rate_plan_name,
            promo_code: quote.promo_code,
            rate_per_night: quote.rate_per_night,
            total_amount: quote.total_amount,
            discount_amount: quote.discount_amount,
            status: ReservationStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }
}

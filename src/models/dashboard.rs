// src/models/dashboard.rs

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::{common::error::AppError, models::reservation::Reservation};

// --- GET /api/admin/dashboard ---

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct RevenuePoint {
    // Short month name, e.g. "Mar"
    pub name: String,
    pub revenue: Decimal,
    // YYYY-MM
    pub full_date: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardSummary {
    pub occupied_rooms: i64,
    pub available_rooms: i64,
    pub monthly_revenue: Decimal,
    pub total_room_types: i64,
    pub pending_reviews: i64,
    pub recent_reservations: Vec<Reservation>,
    pub revenue_chart: Vec<RevenuePoint>,
}

/// Counters gathered by a single round of aggregate queries.
#[derive(Debug, Default, FromRow)]
pub struct DashboardCounters {
    pub occupied_rooms: i64,
    pub monthly_revenue: Decimal,
    pub pending_reviews: i64,
}

// --- GET /api/admin/dashboard-stats ---

#[derive(Debug, Deserialize)]
pub struct DashboardStatsQuery {
    pub days: Option<i64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl DashboardStatsQuery {
    pub const DEFAULT_DAYS: i64 = 30;
    pub const MAX_DAYS: i64 = 366;

    /// Inclusive reporting window. An explicit start/end pair wins over `days`.
    pub fn window(&self, today: NaiveDate) -> Result<(NaiveDate, NaiveDate), AppError> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => {
                if end < start || (end - start).num_days() >= Self::MAX_DAYS {
                    return Err(AppError::InvalidRange { start, end });
                }
                Ok((start, end))
            }
            (None, None) => {
                let days = self.days.unwrap_or(Self::DEFAULT_DAYS).clamp(1, Self::MAX_DAYS);
                Ok((today - Duration::days(days - 1), today))
            }
            _ => Err(AppError::field(
                "start_date",
                "start_date and end_date must be given together.",
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct DailyTraffic {
    pub date: NaiveDate,
    pub visits: i64,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct DailyRevenue {
    pub date: NaiveDate,
    pub daily_revenue: Decimal,
    pub daily_bookings: i64,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct RoomBookingCount {
    pub room_type_name: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct EventCount {
    pub category: String,
    pub action: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct FunnelStep {
    pub name: String,
    pub value: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardStats {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub daily_traffic: Vec<DailyTraffic>,
    pub revenue_trend: Vec<DailyRevenue>,
    pub room_stats: Vec<RoomBookingCount>,
    pub funnel: Vec<FunnelStep>,
    pub events: Vec<EventCount>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn days_window_ends_today() {
        let q = DashboardStatsQuery {
            days: Some(7),
            start_date: None,
            end_date: None,
        };
        assert_eq!(q.window(date(2025, 3, 10)).unwrap(), (date(2025, 3, 4), date(2025, 3, 10)));
    }

    #[test]
    fn explicit_range_must_be_ordered_and_complete() {
        let reversed = DashboardStatsQuery {
            days: None,
            start_date: Some(date(2025, 3, 10)),
            end_date: Some(date(2025, 3, 1)),
        };
        assert!(matches!(
            reversed.window(date(2025, 3, 10)),
            Err(AppError::InvalidRange { .. })
        ));

        let half = DashboardStatsQuery {
            days: None,
            start_date: Some(date(2025, 3, 1)),
            end_date: None,
        };
        assert!(matches!(half.window(date(2025, 3, 10)), Err(AppError::ValidationError(_))));
    }
}

// src/db/dashboard_repo.rs
//
// Read-only aggregates for the back-office dashboards.

use chrono::NaiveDate;
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    models::{
        dashboard::{
            DailyRevenue, DailyTraffic, DashboardCounters, EventCount, RevenuePoint,
            RoomBookingCount,
        },
        reservation::Reservation,
    },
};

#[derive(Clone)]
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn counters(
        &self,
        today: NaiveDate,
        month_start: NaiveDate,
    ) -> Result<DashboardCounters, AppError> {
        let counters = sqlx::query_as::<_, DashboardCounters>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM reservations
                  WHERE check_in <= $1 AND check_out > $1
                    AND status IN ('confirmed', 'checked_in')) AS occupied_rooms,
                (SELECT COALESCE(SUM(total_amount), 0) FROM reservations
                  WHERE created_at >= $2::date AND status <> 'cancelled') AS monthly_revenue,
                (SELECT COUNT(*) FROM reviews WHERE NOT is_visible) AS pending_reviews
            "#,
        )
        .bind(today)
        .bind(month_start)
        .fetch_one(&self.pool)
        .await?;
        Ok(counters)
    }

    pub async fn recent_reservations(&self, limit: i64) -> Result<Vec<Reservation>, AppError> {
        let rows = sqlx::query_as::<_, Reservation>(
            "SELECT * FROM reservations ORDER BY created_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Revenue grouped by check-in month, starting at `since`.
    pub async fn revenue_by_month(&self, since: NaiveDate) -> Result<Vec<RevenuePoint>, AppError> {
        let rows = sqlx::query_as::<_, RevenuePoint>(
            r#"
            SELECT
                to_char(date_trunc('month', check_in), 'Mon') AS name,
                SUM(total_amount) AS revenue,
                to_char(date_trunc('month', check_in), 'YYYY-MM') AS full_date
            FROM reservations
            WHERE check_in >= $1
              AND status IN ('confirmed', 'checked_in', 'checked_out')
            GROUP BY date_trunc('month', check_in)
            ORDER BY date_trunc('month', check_in)
            "#,
        )
        .bind(since)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn daily_traffic(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyTraffic>, AppError> {
        let rows = sqlx::query_as::<_, DailyTraffic>(
            r#"
            SELECT d::date AS date, COALESCE(s.total_visits, 0)::bigint AS visits
            FROM generate_series($1::date, $2::date, INTERVAL '1 day') AS d
            LEFT JOIN daily_stats s ON s.date = d::date
            ORDER BY d
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn revenue_trend(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyRevenue>, AppError> {
        let rows = sqlx::query_as::<_, DailyRevenue>(
            r#"
            SELECT
                created_at::date AS date,
                COALESCE(SUM(total_amount), 0) AS daily_revenue,
                COUNT(*) AS daily_bookings
            FROM reservations
            WHERE created_at::date BETWEEN $1 AND $2 AND status <> 'cancelled'
            GROUP BY created_at::date
            ORDER BY created_at::date
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn bookings_per_room(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RoomBookingCount>, AppError> {
        let rows = sqlx::query_as::<_, RoomBookingCount>(
            r#"
            SELECT room_type_name, COUNT(*) AS count
            FROM reservations
            WHERE created_at::date BETWEEN $1 AND $2
            GROUP BY room_type_name
            ORDER BY count DESC
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn reservations_created(&self, start: NaiveDate, end: NaiveDate) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM reservations WHERE created_at::date BETWEEN $1 AND $2",
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    pub async fn event_counts(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<EventCount>, AppError> {
        let rows = sqlx::query_as::<_, EventCount>(
            r#"
            SELECT category, action, COUNT(*) AS count
            FROM analytics_events
            WHERE created_at::date BETWEEN $1 AND $2
            GROUP BY category, action
            ORDER BY count DESC
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

// src/db/reservation_repo.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::store::ReservationStore,
    models::reservation::{Reservation, ReservationFilter, ReservationStatus},
};

#[derive(Clone)]
pub struct ReservationRepository {
    pool: PgPool,
}

impl ReservationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReservationStore for ReservationRepository {
    async fn insert_reservation(&self, r: &Reservation) -> Result<Reservation, AppError> {
        let created = sqlx::query_as::<_, Reservation>(
            r#"
            INSERT INTO reservations (
                id, booking_code, guest_name, guest_email, guest_phone, room_type_id,
                room_type_name, check_in, check_out, nights, guests, special_requests,
                rate_plan_id, rate_plan_name, promo_code, rate_per_night, total_amount,
                discount_amount, status, created_at, updated_at
            )
            VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11,
                $12, $13, $14, $15, $16, $17, $18, $19, $20, $21
            )
            RETURNING *
            "#,
        )
        .bind(r.id)
        .bind(&r.booking_code)
        .bind(&r.guest_name)
        .bind(&r.guest_email)
        .bind(&r.guest_phone)
        .bind(r.room_type_id)
        .bind(&r.room_type_name)
        .bind(r.check_in)
        .bind(r.check_out)
        .bind(r.nights)
        .bind(r.guests)
        .bind(&r.special_requests)
        .bind(r.rate_plan_id)
        .bind(&r.rate_plan_name)
        .bind(&r.promo_code)
        .bind(r.rate_per_night)
        .bind(r.total_amount)
        .bind(r.discount_amount)
        .bind(r.status)
        .bind(r.created_at)
        .bind(r.updated_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn find_reservation(&self, id: Uuid) -> Result<Option<Reservation>, AppError> {
        let reservation =
            sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(reservation)
    }

    async fn list_reservations(
        &self,
        filter: &ReservationFilter,
    ) -> Result<Vec<Reservation>, AppError> {
        let reservations = sqlx::query_as::<_, Reservation>(
            r#"
            SELECT * FROM reservations
            WHERE ($1::reservation_status IS NULL OR status = $1)
              AND ($2::date IS NULL OR check_in >= $2)
              AND ($3::date IS NULL OR check_out <= $3)
            ORDER BY created_at DESC
            LIMIT 1000
            "#,
        )
        .bind(filter.status)
        .bind(filter.start_date)
        .bind(filter.end_date)
        .fetch_all(&self.pool)
        .await?;
        Ok(reservations)
    }

    async fn lookup_reservations(
        &self,
        booking_code: Option<&str>,
        email: Option<&str>,
        limit: i64,
    ) -> Result<Vec<Reservation>, AppError> {
        let reservations = sqlx::query_as::<_, Reservation>(
            r#"
            SELECT * FROM reservations
            WHERE ($1::text IS NULL OR booking_code = $1)
              AND ($2::text IS NULL OR guest_email = $2)
            ORDER BY created_at DESC
            LIMIT $3
            "#,
        )
        .bind(booking_code)
        .bind(email)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(reservations)
    }

    async fn set_status(
        &self,
        id: Uuid,
        from: ReservationStatus,
        to: ReservationStatus,
        now: DateTime<Utc>,
    ) -> Result<Option<Reservation>, AppError> {
        let updated = sqlx::query_as::<_, Reservation>(
            r#"
            UPDATE reservations SET status = $3, updated_at = $4
            WHERE id = $1 AND status = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(from)
        .bind(to)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;
        Ok(updated)
    }

    async fn delete_reservation(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM reservations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

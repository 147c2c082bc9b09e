// src/db/inventory_repo.rs

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{common::error::AppError, db::store::InventoryStore, models::inventory::InventoryDay};

#[derive(Clone)]
pub struct InventoryRepository {
    pool: PgPool,
}

impl InventoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InventoryStore for InventoryRepository {
    async fn overrides(
        &self,
        room_type_ids: &[Uuid],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<InventoryDay>, AppError> {
        let days = sqlx::query_as::<_, InventoryDay>(
            r#"
            SELECT room_type_id, date, allotment, rate, is_closed
            FROM room_inventory
            WHERE (cardinality($1::uuid[]) = 0 OR room_type_id = ANY($1))
              AND date >= $2 AND date < $3
            ORDER BY room_type_id, date
            "#,
        )
        .bind(room_type_ids)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;
        Ok(days)
    }

    async fn upsert_days(&self, days: &[InventoryDay]) -> Result<u64, AppError> {
        if days.is_empty() {
            return Ok(0);
        }

        let mut room_ids: Vec<Uuid> = Vec::with_capacity(days.len());
        let mut dates: Vec<NaiveDate> = Vec::with_capacity(days.len());
        let mut allotments: Vec<i32> = Vec::with_capacity(days.len());
        let mut rates: Vec<Decimal> = Vec::with_capacity(days.len());
        let mut closed: Vec<bool> = Vec::with_capacity(days.len());
        for day in days {
            room_ids.push(day.room_type_id);
            dates.push(day.date);
            allotments.push(day.allotment);
            rates.push(day.rate);
            closed.push(day.is_closed);
        }

        // One statement for the whole batch
        let result = sqlx::query(
            r#"
            INSERT INTO room_inventory (room_type_id, date, allotment, rate, is_closed)
            SELECT * FROM UNNEST($1::uuid[], $2::date[], $3::int4[], $4::numeric[], $5::bool[])
            ON CONFLICT (room_type_id, date) DO UPDATE SET
                allotment = EXCLUDED.allotment,
                rate = EXCLUDED.rate,
                is_closed = EXCLUDED.is_closed,
                updated_at = NOW()
            "#,
        )
        .bind(&room_ids)
        .bind(&dates)
        .bind(&allotments)
        .bind(&rates)
        .bind(&closed)
        .execute(&self.pool)
        .await?;

        tracing::debug!(rows = result.rows_affected(), "inventory rows upserted");
        Ok(result.rows_affected())
    }
}

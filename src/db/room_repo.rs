// src/db/room_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{common::error::AppError, db::store::RoomStore, models::room::RoomType};

#[derive(Clone)]
pub struct RoomRepository {
    pool: PgPool,
}

impl RoomRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoomStore for RoomRepository {
    async fn list_rooms(&self, include_inactive: bool) -> Result<Vec<RoomType>, AppError> {
        let rooms = sqlx::query_as::<_, RoomType>(
            r#"
            SELECT * FROM room_types
            WHERE is_active OR $1
            ORDER BY display_order ASC, created_at ASC
            "#,
        )
        .bind(include_inactive)
        .fetch_all(&self.pool)
        .await?;
        Ok(rooms)
    }

    async fn find_room(&self, id: Uuid) -> Result<Option<RoomType>, AppError> {
        let room = sqlx::query_as::<_, RoomType>("SELECT * FROM room_types WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(room)
    }

    async fn insert_room(&self, room: &RoomType) -> Result<RoomType, AppError> {
        let created = sqlx::query_as::<_, RoomType>(
            r#"
            INSERT INTO room_types (
                id, name, description, base_price, max_guests, amenities, images,
                image_alts, video_url, is_active, display_order, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *
            "#,
        )
        .bind(room.id)
        .bind(&room.name)
        .bind(&room.description)
        .bind(room.base_price)
        .bind(room.max_guests)
        .bind(&room.amenities)
        .bind(&room.images)
        .bind(&room.image_alts)
        .bind(&room.video_url)
        .bind(room.is_active)
        .bind(room.display_order)
        .bind(room.created_at)
        .bind(room.updated_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn update_room(&self, room: &RoomType) -> Result<Option<RoomType>, AppError> {
        let updated = sqlx::query_as::<_, RoomType>(
            r#"
            UPDATE room_types SET
                name = $2, description = $3, base_price = $4, max_guests = $5,
                amenities = $6, images = $7, image_alts = $8, video_url = $9,
                is_active = $10, display_order = $11, updated_at = $12
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(room.id)
        .bind(&room.name)
        .bind(&room.description)
        .bind(room.base_price)
        .bind(room.max_guests)
        .bind(&room.amenities)
        .bind(&room.images)
        .bind(&room.image_alts)
        .bind(&room.video_url)
        .bind(room.is_active)
        .bind(room.display_order)
        .bind(room.updated_at)
        .fetch_optional(&self.pool)
        .await?;
        Ok(updated)
    }

    async fn reorder_rooms(&self, ids: &[Uuid]) -> Result<u64, AppError> {
        // WITH ORDINALITY numbers from 1, display_order starts at 0
        let result = sqlx::query(
            r#"
            UPDATE room_types AS r
            SET display_order = o.position - 1, updated_at = NOW()
            FROM UNNEST($1::uuid[]) WITH ORDINALITY AS o(id, position)
            WHERE r.id = o.id
            "#,
        )
        .bind(ids)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}

// src/services/room_service.rs

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::Stores,
    models::room::{CreateRoomPayload, RoomType, UpdateRoomPayload},
};

#[derive(Clone)]
pub struct RoomService {
    stores: Stores,
}

impl RoomService {
    pub fn new(stores: Stores) -> Self {
        Self { stores }
    }

    pub async fn list(&self, include_inactive: bool) -> Result<Vec<RoomType>, AppError> {
        self.stores.rooms.list_rooms(include_inactive).await
    }

    pub async fn get(&self, id: Uuid) -> Result<RoomType, AppError> {
        self.stores
            .rooms
            .find_room(id)
            .await?
            .ok_or(AppError::NotFound("Room type"))
    }

    pub async fn create(&self, payload: CreateRoomPayload) -> Result<RoomType, AppError> {
        payload.validate()?;
        let room = RoomType::new(payload, Utc::now());
        self.stores.rooms.insert_room(&room).await
    }

    /// Returns the stored room before and after the patch.
    pub async fn update(
        &self,
        id: Uuid,
        patch: UpdateRoomPayload,
    ) -> Result<(RoomType, RoomType), AppError> {
        patch.validate()?;
        let before = self.get(id).await?;
        let mut after = before.clone();
        after.apply(patch, Utc::now());
        let saved = self
            .stores
            .rooms
            .update_room(&after)
            .await?
            .ok_or(AppError::NotFound("Room type"))?;
        Ok((before, saved))
    }

    /// Soft delete: the room disappears from public listings but keeps its history.
    pub async fn deactivate(&self, id: Uuid) -> Result<RoomType, AppError> {
        let (_, saved) = self
            .update(
                id,
                UpdateRoomPayload {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await?;
        Ok(saved)
    }

    pub async fn reorder(&self, room_ids: &[Uuid]) -> Result<u64, AppError> {
        if room_ids.is_empty() {
            return Err(AppError::field("room_ids", "At least one room id is required."));
        }
        self.stores.rooms.reorder_rooms(room_ids).await
    }
}

// src/db/store.rs
//
// Persistence seams of the booking core. PostgreSQL repositories implement
// them in production; tests swap in `db::memory::MemoryStore`.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        inventory::InventoryDay,
        promo::PromoCode,
        rate_plan::RatePlan,
        reservation::{Reservation, ReservationFilter, ReservationStatus},
        room::RoomType,
    },
};

#[async_trait]
pub trait RoomStore: Send + Sync {
    /// Rooms in display order.
    async fn list_rooms(&self, include_inactive: bool) -> Result<Vec<RoomType>, AppError>;
    async fn find_room(&self, id: Uuid) -> Result<Option<RoomType>, AppError>;
    async fn insert_room(&self, room: &RoomType) -> Result<RoomType, AppError>;
    /// Overwrites every column of an existing room; `None` when the id is unknown.
    async fn update_room(&self, room: &RoomType) -> Result<Option<RoomType>, AppError>;
    /// Sets `display_order` to the position of each id. Unknown ids are skipped.
    async fn reorder_rooms(&self, ids: &[Uuid]) -> Result<u64, AppError>;
}

#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Override rows with `start <= date < end`. An empty id list means every room.
    async fn overrides(
        &self,
        room_type_ids: &[Uuid],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<InventoryDay>, AppError>;
    /// Inserts or replaces whole rows, keyed by (room, date). Last write wins.
    async fn upsert_days(&self, days: &[InventoryDay]) -> Result<u64, AppError>;
}

#[async_trait]
pub trait RatePlanStore: Send + Sync {
    /// Newest first. With `active_only`, inactive plans are left out; with a room id,
    /// only plans for every room or for that room are returned.
    async fn list_plans(
        &self,
        active_only: bool,
        room_type_id: Option<Uuid>,
    ) -> Result<Vec<RatePlan>, AppError>;
    async fn find_plan(&self, id: Uuid) -> Result<Option<RatePlan>, AppError>;
    async fn insert_plan(&self, plan: &RatePlan) -> Result<RatePlan, AppError>;
    async fn update_plan(&self, plan: &RatePlan) -> Result<Option<RatePlan>, AppError>;
    async fn delete_plan(&self, id: Uuid) -> Result<bool, AppError>;
}

#[async_trait]
pub trait PromoStore: Send + Sync {
    async fn list_promos(&self) -> Result<Vec<PromoCode>, AppError>;
    async fn find_promo(&self, id: Uuid) -> Result<Option<PromoCode>, AppError>;
    /// Exact match on the normalised (upper-case) code.
    async fn find_by_code(&self, code: &str) -> Result<Option<PromoCode>, AppError>;
    async fn insert_promo(&self, promo: &PromoCode) -> Result<PromoCode, AppError>;
    async fn update_promo(&self, promo: &PromoCode) -> Result<Option<PromoCode>, AppError>;
    async fn delete_promo(&self, id: Uuid) -> Result<bool, AppError>;
    /// Atomically takes one use if `current_usage < max_usage`. Returns the
    /// updated code, or `None` when no use was left.
    async fn consume_usage(&self, id: Uuid) -> Result<Option<PromoCode>, AppError>;
    /// Gives back a use taken by [`PromoStore::consume_usage`].
    async fn release_usage(&self, id: Uuid) -> Result<(), AppError>;
}

#[async_trait]
pub trait ReservationStore: Send + Sync {
    async fn insert_reservation(&self, reservation: &Reservation) -> Result<Reservation, AppError>;
    async fn find_reservation(&self, id: Uuid) -> Result<Option<Reservation>, AppError>;
    /// Newest first.
    async fn list_reservations(
        &self,
        filter: &ReservationFilter,
    ) -> Result<Vec<Reservation>, AppError>;
    /// Guest self-service lookup. Both criteria are optional but combined with AND.
    async fn lookup_reservations(
        &self,
        booking_code: Option<&str>,
        email: Option<&str>,
        limit: i64,
    ) -> Result<Vec<Reservation>, AppError>;
    /// Moves `id` from `from` to `to`. `None` when the stored status is no longer `from`.
    async fn set_status(
        &self,
        id: Uuid,
        from: ReservationStatus,
        to: ReservationStatus,
        now: DateTime<Utc>,
    ) -> Result<Option<Reservation>, AppError>;
    async fn delete_reservation(&self, id: Uuid) -> Result<bool, AppError>;
}

/// The booking-core stores handed to the services.
#[derive(Clone)]
pub struct Stores {
    pub rooms: Arc<dyn RoomStore>,
    pub inventory: Arc<dyn InventoryStore>,
    pub rate_plans: Arc<dyn RatePlanStore>,
    pub promos: Arc<dyn PromoStore>,
    pub reservations: Arc<dyn ReservationStore>,
}

// src/db/memory.rs
//
// In-process implementation of the booking-core stores, used by the tests.

use std::{
    collections::{BTreeMap, HashMap},
    sync::{Arc, Mutex, MutexGuard},
};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::store::{
        InventoryStore, PromoStore, RatePlanStore, ReservationStore, RoomStore, Stores,
    },
    models::{
        inventory::InventoryDay,
        promo::PromoCode,
        rate_plan::RatePlan,
        reservation::{Reservation, ReservationFilter, ReservationStatus},
        room::RoomType,
    },
};

#[derive(Default)]
struct State {
    rooms: HashMap<Uuid, RoomType>,
    inventory: BTreeMap<(Uuid, NaiveDate), InventoryDay>,
    plans: HashMap<Uuid, RatePlan>,
    promos: HashMap<Uuid, PromoCode>,
    reservations: HashMap<Uuid, Reservation>,
    // Makes the next reservation insert fail, to exercise rollback paths
    fail_next_reservation: bool,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stores(&self) -> Stores {
        Stores {
            rooms: Arc::new(self.clone()),
            inventory: Arc::new(self.clone()),
            rate_plans: Arc::new(self.clone()),
            promos: Arc::new(self.clone()),
            reservations: Arc::new(self.clone()),
        }
    }

    pub fn fail_next_reservation(&self) {
        self.lock().fail_next_reservation = true;
    }

    pub fn inventory_row(&self, room_type_id: Uuid, date: NaiveDate) -> Option<InventoryDay> {
        self.lock().inventory.get(&(room_type_id, date)).cloned()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // A panicking test must not cascade into the others
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl RoomStore for MemoryStore {
    async fn list_rooms(&self, include_inactive: bool) -> Result<Vec<RoomType>, AppError> {
        let mut rooms: Vec<RoomType> = self
            .lock()
            .rooms
            .values()
            .filter(|r| include_inactive || r.is_active)
            .cloned()
            .collect();
        rooms.sort_by_key(|r| (r.display_order, r.created_at));
        Ok(rooms)
    }

    async fn find_room(&self, id: Uuid) -> Result<Option<RoomType>, AppError> {
        Ok(self.lock().rooms.get(&id).cloned())
    }

    async fn insert_room(&self, room: &RoomType) -> Result<RoomType, AppError> {
        self.lock().rooms.insert(room.id, room.clone());
        Ok(room.clone())
    }

    async fn update_room(&self, room: &RoomType) -> Result<Option<RoomType>, AppError> {
        let mut state = self.lock();
        match state.rooms.get_mut(&room.id) {
            Some(stored) => {
                *stored = room.clone();
                Ok(Some(room.clone()))
            }
            None => Ok(None),
        }
    }

    async fn reorder_rooms(&self, ids: &[Uuid]) -> Result<u64, AppError> {
        let mut state = self.lock();
        let mut touched = 0;
        for (position, id) in ids.iter().enumerate() {
            if let Some(room) = state.rooms.get_mut(id) {
                room.display_order = position as i32;
                touched += 1;
            }
        }
        Ok(touched)
    }
}

#[async_trait]
impl InventoryStore for MemoryStore {
    async fn overrides(
        &self,
        room_type_ids: &[Uuid],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<InventoryDay>, AppError> {
        Ok(self
            .lock()
            .inventory
            .values()
            .filter(|d| room_type_ids.is_empty() || room_type_ids.contains(&d.room_type_id))
            .filter(|d| d.date >= start && d.date < end)
            .cloned()
            .collect())
    }

    async fn upsert_days(&self, days: &[InventoryDay]) -> Result<u64, AppError> {
        let mut state = self.lock();
        for day in days {
            state.inventory.insert((day.room_type_id, day.date), day.clone());
        }
        Ok(days.len() as u64)
    }
}

#[async_trait]
impl RatePlanStore for MemoryStore {
    async fn list_plans(
        &self,
        active_only: bool,
        room_type_id: Option<Uuid>,
    ) -> Result<Vec<RatePlan>, AppError> {
        let mut plans: Vec<RatePlan> = self
            .lock()
            .plans
            .values()
            .filter(|p| !active_only || p.is_active)
            .filter(|p| match (room_type_id, p.room_type_id) {
                (Some(wanted), Some(scope)) => wanted == scope,
                _ => true,
            })
            .cloned()
            .collect();
        plans.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(plans)
    }

    async fn find_plan(&self, id: Uuid) -> Result<Option<RatePlan>, AppError> {
        Ok(self.lock().plans.get(&id).cloned())
    }

    async fn insert_plan(&self, plan: &RatePlan) -> Result<RatePlan, AppError> {
        self.lock().plans.insert(plan.id, plan.clone());
        Ok(plan.clone())
    }

    async fn update_plan(&self, plan: &RatePlan) -> Result<Option<RatePlan>, AppError> {
        let mut state = self.lock();
        match state.plans.get_mut(&plan.id) {
            Some(stored) => {
                *stored = plan.clone();
                Ok(Some(plan.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete_plan(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.lock().plans.remove(&id).is_some())
    }
}

#[async_trait]
impl PromoStore for MemoryStore {
    async fn list_promos(&self) -> Result<Vec<PromoCode>, AppError> {
        let mut promos: Vec<PromoCode> = self.lock().promos.values().cloned().collect();
        promos.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(promos)
    }

    async fn find_promo(&self, id: Uuid) -> Result<Option<PromoCode>, AppError> {
        Ok(self.lock().promos.get(&id).cloned())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<PromoCode>, AppError> {
        Ok(self.lock().promos.values().find(|p| p.code == code).cloned())
    }

    async fn insert_promo(&self, promo: &PromoCode) -> Result<PromoCode, AppError> {
        let mut state = self.lock();
        if state.promos.values().any(|p| p.code == promo.code) {
            return Err(AppError::PromoCodeAlreadyExists(promo.code.clone()));
        }
        state.promos.insert(promo.id, promo.clone());
        Ok(promo.clone())
    }

    async fn update_promo(&self, promo: &PromoCode) -> Result<Option<PromoCode>, AppError> {
        let mut state = self.lock();
        if state.promos.values().any(|p| p.code == promo.code && p.id != promo.id) {
            return Err(AppError::PromoCodeAlreadyExists(promo.code.clone()));
        }
        match state.promos.get_mut(&promo.id) {
            Some(stored) => {
                let current_usage = stored.current_usage;
                *stored = promo.clone();
                stored.current_usage = current_usage;
                Ok(Some(stored.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete_promo(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.lock().promos.remove(&id).is_some())
    }

    async fn consume_usage(&self, id: Uuid) -> Result<Option<PromoCode>, AppError> {
        let mut state = self.lock();
        match state.promos.get_mut(&id) {
            Some(promo) if promo.current_usage < promo.max_usage => {
                promo.current_usage += 1;
                Ok(Some(promo.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn release_usage(&self, id: Uuid) -> Result<(), AppError> {
        if let Some(promo) = self.lock().promos.get_mut(&id) {
            promo.current_usage = (promo.current_usage - 1).max(0);
        }
        Ok(())
    }
}

#[async_trait]
impl ReservationStore for MemoryStore {
    async fn insert_reservation(&self, reservation: &Reservation) -> Result<Reservation, AppError> {
        let mut state = self.lock();
        if std::mem::take(&mut state.fail_next_reservation) {
            return Err(AppError::InternalServerError(anyhow::anyhow!(
                "simulated storage failure"
            )));
        }
        state.reservations.insert(reservation.id, reservation.clone());
        Ok(reservation.clone())
    }

    async fn find_reservation(&self, id: Uuid) -> Result<Option<Reservation>, AppError> {
        Ok(self.lock().reservations.get(&id).cloned())
    }

    async fn list_reservations(
        &self,
        filter: &ReservationFilter,
    ) -> Result<Vec<Reservation>, AppError> {
        let mut rows: Vec<Reservation> = self
            .lock()
            .reservations
            .values()
            .filter(|r| filter.status.is_none_or(|s| r.status == s))
            .filter(|r| filter.start_date.is_none_or(|d| r.check_in >= d))
            .filter(|r| filter.end_date.is_none_or(|d| r.check_out <= d))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn lookup_reservations(
        &self,
        booking_code: Option<&str>,
        email: Option<&str>,
        limit: i64,
    ) -> Result<Vec<Reservation>, AppError> {
        let mut rows: Vec<Reservation> = self
            .lock()
            .reservations
            .values()
            .filter(|r| booking_code.is_none_or(|c| r.booking_code == c))
            .filter(|r| email.is_none_or(|e| r.guest_email == e))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows.truncate(limit.max(0) as usize);
        Ok(rows)
    }

    async fn set_status(
        &self,
        id: Uuid,
        from: ReservationStatus,
        to: ReservationStatus,
        now: DateTime<Utc>,
    ) -> Result<Option<Reservation>, AppError> {
        let mut state = self.lock();
        match state.reservations.get_mut(&id) {
            Some(r) if r.status == from => {
                r.status = to;
                r.updated_at = now;
                Ok(Some(r.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete_reservation(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.lock().reservations.remove(&id).is_some())
    }
}

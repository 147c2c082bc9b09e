// src/services/inventory_service.rs

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde_json::Value;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::Stores,
    models::{
        inventory::{
            AvailabilityQuery, BulkUpdateRequest, BulkUpdateSummary, CellEdit, CellEditPayload,
            DEFAULT_ALLOTMENT, InventoryDay, InventoryField, ResolvedDay, RoomAvailability,
            SetDayPayload,
        },
        room::RoomType,
    },
};

/// Longest window any calendar read or write may span.
pub const MAX_WINDOW_DAYS: i64 = 366;

// ---
// Pure calendar rules
// ---

/// Effective values of one cell: the override row when present, the defaults otherwise.
pub fn resolve_day(room: &RoomType, date: NaiveDate, row: Option<&InventoryDay>) -> ResolvedDay {
    match row {
        Some(day) => ResolvedDay {
            day: day.clone(),
            is_default: false,
        },
        None => ResolvedDay {
            day: InventoryDay {
                room_type_id: room.id,
                date,
                allotment: DEFAULT_ALLOTMENT,
                rate: room.base_price,
                is_closed: false,
            },
            is_default: true,
        },
    }
}

/// Resolves every date of `[start, end)` for one room.
pub fn resolve_range(
    room: &RoomType,
    start: NaiveDate,
    end: NaiveDate,
    overrides: &[InventoryDay],
) -> Vec<ResolvedDay> {
    let by_date: HashMap<NaiveDate, &InventoryDay> = overrides
        .iter()
        .filter(|d| d.room_type_id == room.id)
        .map(|d| (d.date, d))
        .collect();
    start
        .iter_days()
        .take_while(|date| *date < end)
        .map(|date| resolve_day(room, date, by_date.get(&date).copied()))
        .collect()
}

pub fn apply_cell_edit(mut day: InventoryDay, edit: CellEdit) -> InventoryDay {
    match edit {
        CellEdit::Allotment(allotment) => day.allotment = allotment,
        CellEdit::Rate(rate) => day.rate = rate,
        CellEdit::Closed(is_closed) => day.is_closed = is_closed,
    }
    day
}

impl CellEdit {
    /// Checks that `value` has the type the field expects.
    pub fn parse(field: InventoryField, value: &Value) -> Result<Self, AppError> {
        match field {
            InventoryField::Allotment => value
                .as_i64()
                .and_then(|v| i32::try_from(v).ok())
                .filter(|v| *v >= 0)
                .map(CellEdit::Allotment)
                .ok_or_else(|| AppError::field("value", "Allotment must be a non-negative integer.")),
            InventoryField::Rate => {
                let rate: Decimal = serde_json::from_value(value.clone())
                    .map_err(|_| AppError::field("value", "Rate must be a number."))?;
                if rate.is_sign_negative() {
                    return Err(AppError::field("value", "Rate cannot be negative."));
                }
                Ok(CellEdit::Rate(rate))
            }
            InventoryField::IsClosed => value
                .as_bool()
                .map(CellEdit::Closed)
                .ok_or_else(|| AppError::field("value", "is_closed must be a boolean.")),
        }
    }
}

fn matches_weekday(date: NaiveDate, weekdays: &[u8]) -> bool {
    weekdays.is_empty() || weekdays.contains(&(date.weekday().num_days_from_sunday() as u8))
}

/// Rows a bulk update writes: every date of the inclusive range that passes the
/// weekday filter, starting from its resolved value and changing only the given fields.
pub fn plan_bulk_update(
    room: &RoomType,
    req: &BulkUpdateRequest,
    existing: &[InventoryDay],
) -> Vec<InventoryDay> {
    if req.allotment.is_none() && req.rate.is_none() && req.is_closed.is_none() {
        return Vec::new();
    }
    let weekdays = req.days_of_week.as_deref().unwrap_or_default();
    let by_date: HashMap<NaiveDate, &InventoryDay> = existing
        .iter()
        .filter(|d| d.room_type_id == room.id)
        .map(|d| (d.date, d))
        .collect();

    req.start_date
        .iter_days()
        .take_while(|date| *date <= req.end_date)
        .filter(|date| matches_weekday(*date, weekdays))
        .map(|date| {
            let mut day = resolve_day(room, date, by_date.get(&date).copied()).day;
            if let Some(allotment) = req.allotment {
                day.allotment = allotment;
            }
            if let Some(rate) = req.rate {
                day.rate = rate;
            }
            if let Some(is_closed) = req.is_closed {
                day.is_closed = is_closed;
            }
            day
        })
        .collect()
}

/// Rejects reversed or oversized windows. `inclusive` tells whether `end` is part of it.
pub fn check_window(start: NaiveDate, end: NaiveDate, inclusive: bool) -> Result<(), AppError> {
    let span = (end - start).num_days() + i64::from(inclusive);
    if span <= 0 || span > MAX_WINDOW_DAYS {
        return Err(AppError::InvalidRange { start, end });
    }
    Ok(())
}

/// First night that cannot be sold, if any.
pub fn first_blocked(nights: &[ResolvedDay]) -> Option<NaiveDate> {
    nights.iter().find(|n| !n.day.is_open()).map(|n| n.day.date)
}

fn availability(room: RoomType, nights: &[ResolvedDay]) -> RoomAvailability {
    let nightly_rates: Vec<Decimal> = nights.iter().map(|n| n.day.rate).collect();
    let total_rate: Decimal = nightly_rates.iter().copied().sum();
    let count = nightly_rates.len() as i64;
    let average_rate = if count > 0 {
        (total_rate / Decimal::from(count)).round_dp(2)
    } else {
        Decimal::ZERO
    };
    let min_rate = nightly_rates.iter().copied().min().unwrap_or(room.base_price);
    RoomAvailability {
        available: first_blocked(nights).is_none(),
        nights: count,
        total_rate,
        average_rate,
        min_rate,
        available_rate: min_rate,
        nightly_rates,
        room,
    }
}

// ---
// Service
// ---

#[derive(Clone)]
pub struct InventoryService {
    stores: Stores,
}

impl InventoryService {
    pub fn new(stores: Stores) -> Self {
        Self { stores }
    }

    async fn room(&self, room_type_id: Uuid) -> Result<RoomType, AppError> {
        self.stores
            .rooms
            .find_room(room_type_id)
            .await?
            .ok_or(AppError::NotFound("Room type"))
    }

    /// Raw override rows in `[start, end)`; the caller merges them with the defaults.
    pub async fn get_range(
        &self,
        room_type_ids: &[Uuid],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<InventoryDay>, AppError> {
        if end <= start {
            return Err(AppError::InvalidRange { start, end });
        }
        self.stores.inventory.overrides(room_type_ids, start, end).await
    }

    /// Every date of `[start, end)` for one room, merged with the defaults.
    pub async fn get_resolved(
        &self,
        room_type_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<ResolvedDay>, AppError> {
        let room = self.room(room_type_id).await?;
        let overrides = self.get_range(&[room_type_id], start, end).await?;
        Ok(resolve_range(&room, start, end, &overrides))
    }

    /// Read-modify-write of one field. No concurrency check: the last write wins.
    pub async fn upsert_cell(&self, payload: CellEditPayload) -> Result<InventoryDay, AppError> {
        let edit = CellEdit::parse(payload.field, &payload.value)?;
        let room = self.room(payload.room_type_id).await?;
        let next_day = payload.date.succ_opt().ok_or(AppError::InvalidRange {
            start: payload.date,
            end: payload.date,
        })?;
        let existing = self
            .stores
            .inventory
            .overrides(&[room.id], payload.date, next_day)
            .await?;
        let current = resolve_day(&room, payload.date, existing.first()).day;
        let updated = apply_cell_edit(current, edit);
        self.stores
            .inventory
            .upsert_days(std::slice::from_ref(&updated))
            .await?;
        Ok(updated)
    }

    pub async fn upsert_day(&self, payload: SetDayPayload) -> Result<InventoryDay, AppError> {
        payload.validate()?;
        let room = self.room(payload.room_type_id).await?;
        let day = InventoryDay {
            room_type_id: room.id,
            date: payload.date,
            allotment: payload.allotment,
            rate: payload.rate,
            is_closed: payload.is_closed,
        };
        self.stores
            .inventory
            .upsert_days(std::slice::from_ref(&day))
            .await?;
        Ok(day)
    }

    pub async fn bulk_update(&self, req: BulkUpdateRequest) -> Result<BulkUpdateSummary, AppError> {
        req.validate()?;
        if req.start_date > req.end_date {
            return Err(AppError::InvalidRange {
                start: req.start_date,
                end: req.end_date,
            });
        }
        if req.days_of_week.iter().flatten().any(|d| *d > 6) {
            return Err(AppError::field(
                "days_of_week",
                "Weekdays must be between 0 (Sunday) and 6 (Saturday).",
            ));
        }

        let room = self
            .stores
            .rooms
            .find_room(req.room_type_id)
            .await?
            .filter(|r| r.is_active)
            .ok_or(AppError::NotFound("Room type"))?;

        let end_exclusive = req.end_date.succ_opt().ok_or(AppError::InvalidRange {
            start: req.start_date,
            end: req.end_date,
        })?;
        let existing = self
            .stores
            .inventory
            .overrides(&[room.id], req.start_date, end_exclusive)
            .await?;
        let rows = plan_bulk_update(&room, &req, &existing);
        self.stores.inventory.upsert_days(&rows).await?;

        tracing::info!(
            room_type_id = %room.id,
            start = %req.start_date,
            end = %req.end_date,
            days = rows.len(),
            "bulk inventory update applied"
        );

        Ok(BulkUpdateSummary {
            room_type_id: room.id,
            updated_days: rows.len(),
            message: format!("Updated {} day(s).", rows.len()),
        })
    }

    /// Resolved nights of a stay, `[check_in, check_out)`.
    pub async fn stay_nights(
        &self,
        room: &RoomType,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> Result<Vec<ResolvedDay>, AppError> {
        let overrides = self
            .stores
            .inventory
            .overrides(&[room.id], check_in, check_out)
            .await?;
        Ok(resolve_range(room, check_in, check_out, &overrides))
    }

    /// Writes each night back with one unit less. Only used when bookings consume allotment.
    pub async fn consume_allotment(&self, nights: &[ResolvedDay]) -> Result<(), AppError> {
        let rows: Vec<InventoryDay> = nights
            .iter()
            .map(|n| InventoryDay {
                allotment: (n.day.allotment - 1).max(0),
                ..n.day.clone()
            })
            .collect();
        self.stores.inventory.upsert_days(&rows).await?;
        Ok(())
    }

    pub async fn search_availability(
        &self,
        query: &AvailabilityQuery,
    ) -> Result<Vec<RoomAvailability>, AppError> {
        check_window(query.check_in, query.check_out, false)?;

        let rooms: Vec<RoomType> = self
            .stores
            .rooms
            .list_rooms(false)
            .await?
            .into_iter()
            .filter(|r| query.guests.is_none_or(|g| r.max_guests >= g))
            .collect();
        let ids: Vec<Uuid> = rooms.iter().map(|r| r.id).collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let overrides = self
            .stores
            .inventory
            .overrides(&ids, query.check_in, query.check_out)
            .await?;

        Ok(rooms
            .into_iter()
            .map(|room| {
                let nights = resolve_range(&room, query.check_in, query.check_out, &overrides);
                availability(room, &nights)
            })
            .collect())
    }

    /// Units sellable today across active rooms (open days only).
    pub async fn available_today(&self, today: NaiveDate) -> Result<i64, AppError> {
        let rooms = self.stores.rooms.list_rooms(false).await?;
        let ids: Vec<Uuid> = rooms.iter().map(|r| r.id).collect();
        if ids.is_empty() {
            return Ok(0);
        }
        let tomorrow = today + chrono::Duration::days(1);
        let overrides = self.stores.inventory.overrides(&ids, today, tomorrow).await?;
        Ok(rooms
            .iter()
            .flat_map(|room| resolve_range(room, today, tomorrow, &overrides))
            .filter(|n| !n.day.is_closed)
            .map(|n| i64::from(n.day.allotment))
            .sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::{memory::MemoryStore, store::RoomStore},
        models::room::CreateRoomPayload,
    };
    use chrono::Utc;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn room(base_price: i64) -> RoomType {
        RoomType::new(
            CreateRoomPayload {
                name: "Deluxe".into(),
                description: String::new(),
                base_price: Decimal::from(base_price),
                max_guests: 2,
                amenities: vec![],
                images: vec![],
                image_alts: vec![],
                video_url: String::new(),
                display_order: None,
            },
            Utc::now(),
        )
    }

    async fn setup(base_price: i64) -> (MemoryStore, InventoryService, RoomType) {
        let store = MemoryStore::new();
        let room = room(base_price);
        store.insert_room(&room).await.unwrap();
        let service = InventoryService::new(store.stores());
        (store, service, room)
    }

    fn bulk(room: &RoomType, start: NaiveDate, end: NaiveDate) -> BulkUpdateRequest {
        BulkUpdateRequest {
            room_type_id: room.id,
            start_date: start,
            end_date: end,
            allotment: None,
            rate: None,
            is_closed: None,
            days_of_week: None,
        }
    }

    #[test]
    fn missing_override_resolves_to_defaults() {
        let room = room(500_000);
        let resolved = resolve_day(&room, date(2025, 3, 1), None);
        assert!(resolved.is_default);
        assert_eq!(resolved.day.allotment, 5);
        assert_eq!(resolved.day.rate, Decimal::from(500_000));
        assert!(!resolved.day.is_closed);
    }

    #[test]
    fn cell_edit_changes_only_its_field() {
        let room = room(500_000);
        let day = resolve_day(&room, date(2025, 3, 1), None).day;
        let edited = apply_cell_edit(day.clone(), CellEdit::Rate(Decimal::from(650_000)));
        assert_eq!(edited.rate, Decimal::from(650_000));
        assert_eq!(edited.allotment, day.allotment);
        assert_eq!(edited.is_closed, day.is_closed);

        let closed = apply_cell_edit(edited.clone(), CellEdit::Closed(true));
        assert_eq!(closed.rate, edited.rate);
        assert_eq!(closed.allotment, edited.allotment);
    }

    #[test]
    fn cell_value_type_is_checked() {
        assert!(CellEdit::parse(InventoryField::Allotment, &json!(3)).is_ok());
        assert!(CellEdit::parse(InventoryField::Allotment, &json!(-1)).is_err());
        assert!(CellEdit::parse(InventoryField::Allotment, &json!("3")).is_err());
        assert_eq!(
            CellEdit::parse(InventoryField::Rate, &json!(450000.5)).unwrap(),
            CellEdit::Rate(Decimal::new(4500005, 1))
        );
        assert!(CellEdit::parse(InventoryField::IsClosed, &json!(1)).is_err());
    }

    #[test]
    fn empty_weekday_filter_covers_every_day() {
        let room = room(100);
        let mut req = bulk(&room, date(2025, 4, 1), date(2025, 4, 7));
        req.allotment = Some(2);
        req.days_of_week = Some(vec![]);
        assert_eq!(plan_bulk_update(&room, &req, &[]).len(), 7);

        req.days_of_week = None;
        assert_eq!(plan_bulk_update(&room, &req, &[]).len(), 7);
    }

    #[test]
    fn weekday_filter_limits_written_dates() {
        let room = room(100);
        let mut req = bulk(&room, date(2025, 4, 1), date(2025, 4, 7));
        req.allotment = Some(0);
        req.days_of_week = Some(vec![5, 6]);
        let rows = plan_bulk_update(&room, &req, &[]);
        let dates: Vec<NaiveDate> = rows.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![date(2025, 4, 4), date(2025, 4, 5)]);
    }

    #[test]
    fn bulk_keeps_unspecified_fields_of_existing_rows() {
        let room = room(100);
        let existing = InventoryDay {
            room_type_id: room.id,
            date: date(2025, 4, 2),
            allotment: 9,
            rate: Decimal::from(777),
            is_closed: false,
        };
        let mut req = bulk(&room, date(2025, 4, 1), date(2025, 4, 2));
        req.is_closed = Some(true);
        let rows = plan_bulk_update(&room, &req, std::slice::from_ref(&existing));
        assert_eq!(rows[1].allotment, 9);
        assert_eq!(rows[1].rate, Decimal::from(777));
        assert!(rows[1].is_closed);
        assert_eq!(rows[0].allotment, DEFAULT_ALLOTMENT);
    }

    #[test]
    fn bulk_without_fields_is_a_no_op() {
        let room = room(100);
        let req = bulk(&room, date(2025, 4, 1), date(2025, 4, 7));
        assert!(plan_bulk_update(&room, &req, &[]).is_empty());
    }

    #[test]
    fn windows_are_bounded() {
        assert!(check_window(date(2025, 1, 1), date(2025, 1, 1), true).is_ok());
        assert!(check_window(date(2025, 1, 1), date(2025, 1, 1), false).is_err());
        assert!(check_window(date(2025, 1, 2), date(2025, 1, 1), true).is_err());
        assert!(check_window(date(2025, 1, 1), date(2026, 1, 2), false).is_ok());
        assert!(check_window(date(2025, 1, 1), date(2026, 1, 3), false).is_err());
    }

    #[tokio::test]
    async fn bulk_update_is_idempotent() {
        let (_store, service, room) = setup(500_000).await;
        let mut req = bulk(&room, date(2025, 4, 1), date(2025, 4, 7));
        req.rate = Some(Decimal::from(600_000));
        req.days_of_week = Some(vec![1, 3]);

        service.bulk_update(req.clone()).await.unwrap();
        let once = service
            .get_resolved(room.id, date(2025, 4, 1), date(2025, 4, 8))
            .await
            .unwrap();
        service.bulk_update(req).await.unwrap();
        let twice = service
            .get_resolved(room.id, date(2025, 4, 1), date(2025, 4, 8))
            .await
            .unwrap();
        assert_eq!(once, twice);
    }

    #[tokio::test]
    async fn bulk_update_rejects_reversed_range_and_unknown_room() {
        let (_store, service, room) = setup(100).await;
        let mut req = bulk(&room, date(2025, 4, 7), date(2025, 4, 1));
        req.allotment = Some(1);
        assert!(matches!(
            service.bulk_update(req).await,
            Err(AppError::InvalidRange { .. })
        ));

        let mut req = bulk(&room, date(2025, 4, 1), date(2025, 4, 7));
        req.room_type_id = Uuid::new_v4();
        req.allotment = Some(1);
        assert!(matches!(
            service.bulk_update(req).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn bulk_update_rejects_inactive_room() {
        let store = MemoryStore::new();
        let mut inactive = room(100);
        inactive.is_active = false;
        store.insert_room(&inactive).await.unwrap();
        let service = InventoryService::new(store.stores());

        let mut req = bulk(&inactive, date(2025, 4, 1), date(2025, 4, 2));
        req.allotment = Some(1);
        assert!(matches!(
            service.bulk_update(req).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn closing_weekend_nights_blocks_only_those_stays() {
        let (_store, service, room) = setup(500_000).await;
        let mut req = bulk(&room, date(2025, 4, 1), date(2025, 4, 7));
        req.allotment = Some(0);
        req.days_of_week = Some(vec![5, 6]);
        service.bulk_update(req).await.unwrap();

        let friday = service
            .search_availability(&AvailabilityQuery {
                check_in: date(2025, 4, 4),
                check_out: date(2025, 4, 5),
                guests: None,
            })
            .await
            .unwrap();
        assert!(!friday[0].available);

        let wednesday = service
            .search_availability(&AvailabilityQuery {
                check_in: date(2025, 4, 2),
                check_out: date(2025, 4, 3),
                guests: None,
            })
            .await
            .unwrap();
        assert!(wednesday[0].available);
        let resolved = service
            .get_resolved(room.id, date(2025, 4, 2), date(2025, 4, 3))
            .await
            .unwrap();
        assert!(resolved[0].is_default);
        assert_eq!(resolved[0].day.allotment, DEFAULT_ALLOTMENT);
    }

    #[tokio::test]
    async fn availability_reports_rates_and_filters_by_guests() {
        let (store, service, room) = setup(500_000).await;
        service
            .upsert_cell(CellEditPayload {
                room_type_id: room.id,
                date: date(2025, 3, 2),
                field: InventoryField::Rate,
                value: json!(300000),
            })
            .await
            .unwrap();

        let offers = service
            .search_availability(&AvailabilityQuery {
                check_in: date(2025, 3, 1),
                check_out: date(2025, 3, 3),
                guests: Some(2),
            })
            .await
            .unwrap();
        assert_eq!(offers.len(), 1);
        let offer = &offers[0];
        assert_eq!(offer.nights, 2);
        assert_eq!(offer.total_rate, Decimal::from(800_000));
        assert_eq!(offer.average_rate, Decimal::from(400_000));
        assert_eq!(offer.min_rate, Decimal::from(300_000));
        assert_eq!(offer.available_rate, offer.min_rate);

        let crowd = service
            .search_availability(&AvailabilityQuery {
                check_in: date(2025, 3, 1),
                check_out: date(2025, 3, 3),
                guests: Some(3),
            })
            .await
            .unwrap();
        assert!(crowd.is_empty());
        assert!(store.inventory_row(room.id, date(2025, 3, 1)).is_none());
    }

    #[tokio::test]
    async fn out_of_order_cell_writes_keep_the_last_arrival() {
        let (store, service, room) = setup(500_000).await;
        let write = |rate: i64| CellEditPayload {
            room_type_id: room.id,
            date: date(2025, 3, 1),
            field: InventoryField::Rate,
            value: json!(rate),
        };
        // The "newer" edit lands first, the stale one second
        service.upsert_cell(write(700_000)).await.unwrap();
        service.upsert_cell(write(650_000)).await.unwrap();

        let row = store.inventory_row(room.id, date(2025, 3, 1)).unwrap();
        assert_eq!(row.rate, Decimal::from(650_000));
        assert_eq!(row.allotment, DEFAULT_ALLOTMENT);
    }

    #[tokio::test]
    async fn available_today_skips_closed_days() {
        let (_store, service, room) = setup(100).await;
        let today = date(2025, 5, 1);
        assert_eq!(service.available_today(today).await.unwrap(), 5);

        service
            .upsert_cell(CellEditPayload {
                room_type_id: room.id,
                date: today,
                field: InventoryField::IsClosed,
                value: json!(true),
            })
            .await
            .unwrap();
        assert_eq!(service.available_today(today).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn last_representable_date_is_an_invalid_range() {
        let (store, service, room) = setup(100).await;
        let err = service
            .upsert_cell(CellEditPayload {
                room_type_id: room.id,
                date: NaiveDate::MAX,
                field: InventoryField::Rate,
                value: json!(5),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidRange { .. }));

        let mut req = bulk(&room, NaiveDate::MAX, NaiveDate::MAX);
        req.allotment = Some(1);
        assert!(matches!(
            service.bulk_update(req).await,
            Err(AppError::InvalidRange { .. })
        ));
        assert!(store.inventory_row(room.id, NaiveDate::MAX).is_none());
    }

    #[tokio::test]
    async fn get_range_rejects_empty_window() {
        let (_store, service, room) = setup(100).await;
        let err = service
            .get_range(&[room.id], date(2025, 3, 2), date(2025, 3, 2))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidRange { .. }));
    }
}

// src/handlers/inventory.rs

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::rbac::{PermRooms, RequirePermission},
    models::inventory::{
        AvailabilityQuery, BulkUpdateRequest, BulkUpdateSummary, CellEditPayload, InventoryDay,
        InventoryQuery, ResolvedDay, RoomAvailability, SetDayPayload,
    },
    services::{audit_service::Actor, inventory_service::check_window},
};

// ---
// Handler: get_inventory
// ---
// Raw override rows by default. `resolved=true` merges them with the room
// defaults, which needs exactly one room.
#[utoipa::path(
    get,
    path = "/api/inventory",
    tag = "Inventory",
    params(
        ("room_type_id" = Option<uuid::Uuid>, Query, description = "Room type; all rooms when absent"),
        ("start_date" = chrono::NaiveDate, Query, description = "First date (inclusive)"),
        ("end_date" = chrono::NaiveDate, Query, description = "Last date (exclusive)"),
        ("resolved" = Option<bool>, Query, description = "Merge overrides with the room defaults")
    ),
    responses(
        (status = 200, description = "Override rows, or resolved days when `resolved=true`", body = Vec<InventoryDay>),
        (status = 400, description = "Reversed or oversized window")
    )
)]
pub async fn get_inventory(
    State(app_state): State<AppState>,
    Query(query): Query<InventoryQuery>,
) -> Result<Response, AppError> {
    check_window(query.start_date, query.end_date, false)?;

    if query.resolved {
        let room_type_id = query.room_type_id.ok_or_else(|| {
            AppError::field("room_type_id", "A room type is required for resolved values.")
        })?;
        let days: Vec<ResolvedDay> = app_state
            .inventory_service
            .get_resolved(room_type_id, query.start_date, query.end_date)
            .await?;
        return Ok(Json(days).into_response());
    }

    let ids: Vec<_> = query.room_type_id.into_iter().collect();
    let rows = app_state
        .inventory_service
        .get_range(&ids, query.start_date, query.end_date)
        .await?;
    Ok(Json(rows).into_response())
}

// ---
// Handler: update_cell
// ---
#[utoipa::path(
    post,
    path = "/api/inventory",
    tag = "Inventory",
    request_body = CellEditPayload,
    responses((status = 200, description = "Stored calendar row", body = InventoryDay)),
    security(("api_jwt" = []))
)]
pub async fn update_cell(
    State(app_state): State<AppState>,
    actor: Actor,
    _guard: RequirePermission<PermRooms>,
    Json(payload): Json<CellEditPayload>,
) -> Result<impl IntoResponse, AppError> {
    let details = json!({ "date": payload.date, "field": payload.field, "value": payload.value });
    let room_type_id = payload.room_type_id;
    let day = app_state.inventory_service.upsert_cell(payload).await?;
    app_state
        .audit_service
        .record(&actor, "update", "inventory", room_type_id, details)
        .await;
    Ok(Json(day))
}

// ---
// Handler: set_day
// ---
#[utoipa::path(
    put,
    path = "/api/inventory",
    tag = "Inventory",
    request_body = SetDayPayload,
    responses((status = 200, description = "Stored calendar row", body = InventoryDay)),
    security(("api_jwt" = []))
)]
pub async fn set_day(
    State(app_state): State<AppState>,
    actor: Actor,
    _guard: RequirePermission<PermRooms>,
    Json(payload): Json<SetDayPayload>,
) -> Result<impl IntoResponse, AppError> {
    let day = app_state.inventory_service.upsert_day(payload).await?;
    app_state
        .audit_service
        .record(&actor, "update", "inventory", day.room_type_id, json!(day))
        .await;
    Ok(Json(day))
}

// ---
// Handler: bulk_update
// ---
#[utoipa::path(
    post,
    path = "/api/admin/inventory/bulk-update",
    tag = "Inventory",
    request_body = BulkUpdateRequest,
    responses(
        (status = 200, body = BulkUpdateSummary),
        (status = 400, description = "Invalid range or weekday"),
        (status = 404, description = "Room type missing or inactive")
    ),
    security(("api_jwt" = []))
)]
pub async fn bulk_update(
    State(app_state): State<AppState>,
    actor: Actor,
    _guard: RequirePermission<PermRooms>,
    Json(payload): Json<BulkUpdateRequest>,
) -> Result<impl IntoResponse, AppError> {
    check_window(payload.start_date, payload.end_date, true)?;

    let details = json!({
        "start_date": payload.start_date,
        "end_date": payload.end_date,
        "allotment": payload.allotment,
        "rate": payload.rate,
        "is_closed": payload.is_closed,
        "days_of_week": payload.days_of_week,
    });
    let summary = app_state.inventory_service.bulk_update(payload).await?;
    app_state
        .audit_service
        .record(&actor, "bulk_update", "inventory", summary.room_type_id, details)
        .await;
    Ok(Json(summary))
}

// ---
// Handler: search_availability (public)
// ---
#[utoipa::path(
    get,
    path = "/api/availability",
    tag = "Inventory",
    params(
        ("check_in" = chrono::NaiveDate, Query, description = "Arrival date"),
        ("check_out" = chrono::NaiveDate, Query, description = "Departure date"),
        ("guests" = Option<i32>, Query, description = "Party size")
    ),
    responses((status = 200, body = Vec<RoomAvailability>))
)]
pub async fn search_availability(
    State(app_state): State<AppState>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<impl IntoResponse, AppError> {
    let rooms = app_state.inventory_service.search_availability(&query).await?;
    Ok(Json(rooms))
}

// src/handlers/rooms.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::rbac::{PermRooms, RequirePermission},
    models::room::{CreateRoomPayload, ReorderRoomsPayload, RoomType, UpdateRoomPayload},
    services::audit_service::{diff, Actor},
};

// ---
// Handler: list_rooms (public)
// ---
#[utoipa::path(
    get,
    path = "/api/rooms",
    tag = "Rooms",
    responses((status = 200, description = "Active room types in display order", body = Vec<RoomType>))
)]
pub async fn list_rooms(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let rooms = app_state.room_service.list(false).await?;
    Ok(Json(rooms))
}

// ---
// Handler: get_room (public)
// ---
#[utoipa::path(
    get,
    path = "/api/rooms/{id}",
    tag = "Rooms",
    params(("id" = Uuid, Path, description = "Room type id")),
    responses(
        (status = 200, body = RoomType),
        (status = 404, description = "Unknown room type")
    )
)]
pub async fn get_room(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(app_state.room_service.get(id).await?))
}

// ---
// Handler: list_all_rooms (admin, includes inactive)
// ---
#[utoipa::path(
    get,
    path = "/api/admin/rooms",
    tag = "Rooms",
    responses((status = 200, body = Vec<RoomType>)),
    security(("api_jwt" = []))
)]
pub async fn list_all_rooms(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermRooms>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(app_state.room_service.list(true).await?))
}

// ---
// Handler: create_room
// ---
#[utoipa::path(
    post,
    path = "/api/rooms",
    tag = "Rooms",
    request_body = CreateRoomPayload,
    responses((status = 201, description = "Room type created", body = RoomType)),
    security(("api_jwt" = []))
)]
pub async fn create_room(
    State(app_state): State<AppState>,
    actor: Actor,
    _guard: RequirePermission<PermRooms>,
    Json(payload): Json<CreateRoomPayload>,
) -> Result<impl IntoResponse, AppError> {
    let room = app_state.room_service.create(payload).await?;
    app_state
        .audit_service
        .record(&actor, "create", "room_type", room.id, json!({ "name": room.name }))
        .await;
    Ok((StatusCode::CREATED, Json(room)))
}

// ---
// Handler: update_room
// ---
#[utoipa::path(
    put,
    path = "/api/rooms/{id}",
    tag = "Rooms",
    params(("id" = Uuid, Path, description = "Room type id")),
    request_body = UpdateRoomPayload,
    responses((status = 200, body = RoomType)),
    security(("api_jwt" = []))
)]
pub async fn update_room(
    State(app_state): State<AppState>,
    actor: Actor,
    _guard: RequirePermission<PermRooms>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRoomPayload>,
) -> Result<impl IntoResponse, AppError> {
    let (before, after) = app_state.room_service.update(id, payload).await?;
    app_state
        .audit_service
        .record(&actor, "update", "room_type", id, diff(&before, &after))
        .await;
    Ok(Json(after))
}

// ---
// Handler: delete_room (soft delete)
// ---
#[utoipa::path(
    delete,
    path = "/api/rooms/{id}",
    tag = "Rooms",
    params(("id" = Uuid, Path, description = "Room type id")),
    responses((status = 200, description = "Room type deactivated", body = RoomType)),
    security(("api_jwt" = []))
)]
pub async fn delete_room(
    State(app_state): State<AppState>,
    actor: Actor,
    _guard: RequirePermission<PermRooms>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let room = app_state.room_service.deactivate(id).await?;
    app_state
        .audit_service
        .record(&actor, "delete", "room_type", id, json!({ "name": room.name }))
        .await;
    Ok(Json(room))
}

// ---
// Handler: reorder_rooms
// ---
#[utoipa::path(
    put,
    path = "/api/rooms/reorder",
    tag = "Rooms",
    request_body = ReorderRoomsPayload,
    responses((status = 200, description = "Display order saved")),
    security(("api_jwt" = []))
)]
pub async fn reorder_rooms(
    State(app_state): State<AppState>,
    actor: Actor,
    _guard: RequirePermission<PermRooms>,
    Json(payload): Json<ReorderRoomsPayload>,
) -> Result<impl IntoResponse, AppError> {
    let updated = app_state.room_service.reorder(&payload.room_ids).await?;
    app_state
        .audit_service
        .record(&actor, "reorder", "room_type", "all", json!({ "room_ids": payload.room_ids }))
        .await;
    Ok(Json(json!({ "updated": updated })))
}

// src/handlers/rate_plans.rs

use axum::{
    extract::{Path, Query, State},
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
    models::rate_plan::{CreateRatePlanPayload, RatePlan, RatePlanQuery, UpdateRatePlanPayload},
    services::audit_service::{diff, Actor},
};

// ---
// Handler: list_public_plans
// ---
#[utoipa::path(
    get,
    path = "/api/rate-plans",
    tag = "Rate plans",
    params(("room_type_id" = Option<Uuid>, Query, description = "Only plans usable for this room")),
    responses((status = 200, description = "Active plans", body = Vec<RatePlan>))
)]
pub async fn list_public_plans(
    State(app_state): State<AppState>,
    Query(query): Query<RatePlanQuery>,
) -> Result<impl IntoResponse, AppError> {
    let plans = app_state.rate_plan_service.list_public(query.room_type_id).await?;
    Ok(Json(plans))
}

// ---
// Handler: list_plans (admin)
// ---
#[utoipa::path(
    get,
    path = "/api/admin/rate-plans",
    tag = "Rate plans",
    responses((status = 200, body = Vec<RatePlan>)),
    security(("api_jwt" = []))
)]
pub async fn list_plans(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermRooms>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(app_state.rate_plan_service.list_all().await?))
}

// ---
// Handler: create_plan
// ---
#[utoipa::path(
    post,
    path = "/api/admin/rate-plans",
    tag = "Rate plans",
    request_body = CreateRatePlanPayload,
    responses((status = 201, body = RatePlan)),
    security(("api_jwt" = []))
)]
pub async fn create_plan(
    State(app_state): State<AppState>,
    actor: Actor,
    _guard: RequirePermission<PermRooms>,
    Json(payload): Json<CreateRatePlanPayload>,
) -> Result<impl IntoResponse, AppError> {
    let plan = app_state.rate_plan_service.create(payload).await?;
    app_state
        .audit_service
        .record(&actor, "create", "rate_plan", plan.id, json!({ "name": plan.name }))
        .await;
    Ok((StatusCode::CREATED, Json(plan)))
}

// ---
// Handler: update_plan
// ---
#[utoipa::path(
    put,
    path = "/api/admin/rate-plans/{id}",
    tag = "Rate plans",
    params(("id" = Uuid, Path, description = "Rate plan id")),
    request_body = UpdateRatePlanPayload,
    responses((status = 200, body = RatePlan)),
    security(("api_jwt" = []))
)]
pub async fn update_plan(
    State(app_state): State<AppState>,
    actor: Actor,
    _guard: RequirePermission<PermRooms>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRatePlanPayload>,
) -> Result<impl IntoResponse, AppError> {
    let (before, after) = app_state.rate_plan_service.update(id, payload).await?;
    app_state
        .audit_service
        .record(&actor, "update", "rate_plan", id, diff(&before, &after))
        .await;
    Ok(Json(after))
}

// ---
// Handler: delete_plan
// ---
#[utoipa::path(
    delete,
    path = "/api/admin/rate-plans/{id}",
    tag = "Rate plans",
    params(("id" = Uuid, Path, description = "Rate plan id")),
    responses((status = 204, description = "Rate plan deleted")),
    security(("api_jwt" = []))
)]
pub async fn delete_plan(
    State(app_state): State<AppState>,
    actor: Actor,
    _guard: RequirePermission<PermRooms>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let plan = app_state.rate_plan_service.delete(id).await?;
    app_state
        .audit_service
        .record(&actor, "delete", "rate_plan", id, json!({ "name": plan.name }))
        .await;
    Ok(StatusCode::NO_CONTENT)
}

// src/handlers/promo.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::rbac::{PermPromo, RequirePermission},
    models::promo::{
        CreatePromoPayload, PromoCode, UpdatePromoPayload, VerifyPromoPayload, VerifyPromoResponse,
    },
    services::audit_service::{diff, Actor},
};

// ---
// Handler: verify_promo (public)
// ---
#[utoipa::path(
    post,
    path = "/api/promo/verify",
    tag = "Promo codes",
    request_body = VerifyPromoPayload,
    responses(
        (status = 200, body = VerifyPromoResponse),
        (status = 400, description = "Code unknown, inactive, expired, exhausted or not valid that day")
    )
)]
pub async fn verify_promo(
    State(app_state): State<AppState>,
    Json(payload): Json<VerifyPromoPayload>,
) -> Result<impl IntoResponse, AppError> {
    let check_in = payload.check_in.unwrap_or_else(|| Utc::now().date_naive());
    let promo = app_state.promo_service.verify(&payload.code, check_in).await?;
    Ok(Json(VerifyPromoResponse::from(&promo)))
}

// ---
// Handler: list_promos
// ---
#[utoipa::path(
    get,
    path = "/api/admin/promo-codes",
    tag = "Promo codes",
    responses((status = 200, body = Vec<PromoCode>)),
    security(("api_jwt" = []))
)]
pub async fn list_promos(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermPromo>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(app_state.promo_service.list().await?))
}

// ---
// Handler: create_promo
// ---
#[utoipa::path(
    post,
    path = "/api/admin/promo-codes",
    tag = "Promo codes",
    request_body = CreatePromoPayload,
    responses(
        (status = 201, body = PromoCode),
        (status = 409, description = "Code already exists")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_promo(
    State(app_state): State<AppState>,
    actor: Actor,
    _guard: RequirePermission<PermPromo>,
    Json(payload): Json<CreatePromoPayload>,
) -> Result<impl IntoResponse, AppError> {
    let promo = app_state.promo_service.create(payload).await?;
    app_state
        .audit_service
        .record(&actor, "create", "promo_code", promo.id, json!({ "code": promo.code }))
        .await;
    Ok((StatusCode::CREATED, Json(promo)))
}

// ---
// Handler: update_promo
// ---
#[utoipa::path(
    put,
    path = "/api/admin/promo-codes/{id}",
    tag = "Promo codes",
    params(("id" = Uuid, Path, description = "Promo code id")),
    request_body = UpdatePromoPayload,
    responses((status = 200, body = PromoCode)),
    security(("api_jwt" = []))
)]
pub async fn update_promo(
    State(app_state): State<AppState>,
    actor: Actor,
    _guard: RequirePermission<PermPromo>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePromoPayload>,
) -> Result<impl IntoResponse, AppError> {
    let (before, after) = app_state.promo_service.update(id, payload).await?;
    app_state
        .audit_service
        .record(&actor, "update", "promo_code", id, diff(&before, &after))
        .await;
    Ok(Json(after))
}

// ---
// Handler: delete_promo
// ---
#[utoipa::path(
    delete,
    path = "/api/admin/promo-codes/{id}",
    tag = "Promo codes",
    params(("id" = Uuid, Path, description = "Promo code id")),
    responses((status = 204, description = "Promo code deleted")),
    security(("api_jwt" = []))
)]
pub async fn delete_promo(
    State(app_state): State<AppState>,
    actor: Actor,
    _guard: RequirePermission<PermPromo>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let promo = app_state.promo_service.delete(id).await?;
    app_state
        .audit_service
        .record(&actor, "delete", "promo_code", id, json!({ "code": promo.code }))
        .await;
    Ok(StatusCode::NO_CONTENT)
}

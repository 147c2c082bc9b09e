// src/handlers/reviews.rs

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
    middleware::rbac::{PermReviews, RequirePermission, RequireSuperAdmin},
    models::review::{CreateReviewPayload, Review, VisibilityPayload},
    services::audit_service::Actor,
};

// ---
// Handler: submit_review (public)
// ---
#[utoipa::path(
    post,
    path = "/api/reviews",
    tag = "Reviews",
    request_body = CreateReviewPayload,
    responses((status = 201, description = "Review stored, hidden until approved", body = Review))
)]
pub async fn submit_review(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateReviewPayload>,
) -> Result<impl IntoResponse, AppError> {
    let review = app_state.review_service.submit(payload).await?;
    Ok((StatusCode::CREATED, Json(review)))
}

// ---
// Handler: list_visible_reviews (public)
// ---
#[utoipa::path(
    get,
    path = "/api/reviews",
    tag = "Reviews",
    responses((status = 200, description = "Newest approved reviews", body = Vec<Review>))
)]
pub async fn list_visible_reviews(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(app_state.review_service.list_visible().await?))
}

// ---
// Handler: list_reviews (admin)
// ---
#[utoipa::path(
    get,
    path = "/api/admin/reviews",
    tag = "Reviews",
    responses((status = 200, body = Vec<Review>)),
    security(("api_jwt" = []))
)]
pub async fn list_reviews(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermReviews>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(app_state.review_service.list_all().await?))
}

// ---
// Handler: set_visibility
// ---
#[utoipa::path(
    put,
    path = "/api/admin/reviews/{id}/visibility",
    tag = "Reviews",
    params(("id" = Uuid, Path, description = "Review id")),
    request_body = VisibilityPayload,
    responses((status = 200, body = Review)),
    security(("api_jwt" = []))
)]
pub async fn set_visibility(
    State(app_state): State<AppState>,
    actor: Actor,
    _guard: RequirePermission<PermReviews>,
    Path(id): Path<Uuid>,
    Json(payload): Json<VisibilityPayload>,
) -> Result<impl IntoResponse, AppError> {
    let review = app_state
        .review_service
        .set_visibility(id, payload.is_visible)
        .await?;
    let action = if review.is_visible { "approve" } else { "hide" };
    app_state
        .audit_service
        .record(&actor, action, "review", id, json!({ "guest_name": review.guest_name }))
        .await;
    Ok(Json(review))
}

// ---
// Handler: delete_review (superadmin)
// ---
#[utoipa::path(
    delete,
    path = "/api/admin/reviews/{id}",
    tag = "Reviews",
    params(("id" = Uuid, Path, description = "Review id")),
    responses((status = 204, description = "Review deleted")),
    security(("api_jwt" = []))
)]
pub async fn delete_review(
    State(app_state): State<AppState>,
    actor: Actor,
    _guard: RequireSuperAdmin,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.review_service.delete(id).await?;
    app_state
        .audit_service
        .record(&actor, "delete", "review", id, json!({}))
        .await;
    Ok(StatusCode::NO_CONTENT)
}

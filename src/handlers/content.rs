// src/handlers/content.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::content::{SiteContent, UpdateContentPayload, UpsertContentPayload},
    services::audit_service::{diff, Actor},
};

#[derive(Debug, Deserialize)]
pub struct ContentQuery {
    pub page: Option<String>,
}

// ---
// Handler: list_content (public)
// ---
#[utoipa::path(
    get,
    path = "/api/content",
    tag = "Content",
    params(("page" = Option<String>, Query, description = "Only sections of this page")),
    responses((status = 200, body = Vec<SiteContent>))
)]
pub async fn list_content(
    State(app_state): State<AppState>,
    Query(query): Query<ContentQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = query.page.as_deref().map(str::trim).filter(|p| !p.is_empty());
    Ok(Json(app_state.content_service.list(page).await?))
}

// ---
// Handler: get_section (public)
// ---
#[utoipa::path(
    get,
    path = "/api/content/{page}/{section}",
    tag = "Content",
    params(
        ("page" = String, Path, description = "Page key"),
        ("section" = String, Path, description = "Section key")
    ),
    responses((status = 200, body = SiteContent), (status = 404, description = "No such section"))
)]
pub async fn get_section(
    State(app_state): State<AppState>,
    Path((page, section)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(app_state.content_service.get(&page, &section).await?))
}

// ---
// Handler: upsert_section
// ---
// Capability checks depend on the section, so they live in the service.
#[utoipa::path(
    post,
    path = "/api/content",
    tag = "Content",
    request_body = UpsertContentPayload,
    responses(
        (status = 200, body = SiteContent),
        (status = 400, description = "Content does not match the section shape"),
        (status = 403, description = "Missing content, gallery or email_config permission")
    ),
    security(("api_jwt" = []))
)]
pub async fn upsert_section(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    actor: Actor,
    Json(payload): Json<UpsertContentPayload>,
) -> Result<impl IntoResponse, AppError> {
    let (before, saved) = app_state.content_service.upsert(&user, payload).await?;
    let resource_id = format!("{}/{}", saved.page, saved.section);
    match before {
        Some(before) => {
            app_state
                .audit_service
                .record(&actor, "update", "content", resource_id, diff(&before, &saved))
                .await
        }
        None => {
            app_state
                .audit_service
                .record(&actor, "create", "content", resource_id, json!({ "content_type": saved.content_type }))
                .await
        }
    }
    Ok(Json(saved))
}

// ---
// Handler: update_section
// ---
#[utoipa::path(
    put,
    path = "/api/content/{id}",
    tag = "Content",
    params(("id" = Uuid, Path, description = "Content id")),
    request_body = UpdateContentPayload,
    responses((status = 200, body = SiteContent)),
    security(("api_jwt" = []))
)]
pub async fn update_section(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    actor: Actor,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateContentPayload>,
) -> Result<impl IntoResponse, AppError> {
    let (before, after) = app_state.content_service.update(&user, id, payload).await?;
    app_state
        .audit_service
        .record(&actor, "update", "content", id, diff(&before, &after))
        .await;
    Ok(Json(after))
}

// ---
// Handler: delete_section
// ---
#[utoipa::path(
    delete,
    path = "/api/content/{page}/{section}",
    tag = "Content",
    params(
        ("page" = String, Path, description = "Page key"),
        ("section" = String, Path, description = "Section key")
    ),
    responses((status = 204, description = "Section deleted")),
    security(("api_jwt" = []))
)]
pub async fn delete_section(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    actor: Actor,
    Path((page, section)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let removed = app_state.content_service.delete(&user, &page, &section).await?;
    app_state
        .audit_service
        .record(&actor, "delete", "content", removed.id, json!({ "page": page, "section": section }))
        .await;
    Ok(StatusCode::NO_CONTENT)
}

// src/handlers/auth.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{PermUsers, RequirePermission},
    },
    models::auth::{
        AuthResponse, CreateUserPayload, LoginUserPayload, UpdateUserPayload, UserProfile,
    },
    services::audit_service::{diff, Actor},
};

// ---
// Handler: login
// ---
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginUserPayload,
    responses(
        (status = 200, body = AuthResponse),
        (status = 401, description = "Wrong e-mail or password")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let response = app_state
        .auth_service
        .login(&payload.email, &payload.password)
        .await?;
    Ok(Json(response))
}

// ---
// Handler: get_me
// ---
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Auth",
    responses((status = 200, body = UserProfile)),
    security(("api_jwt" = []))
)]
pub async fn get_me(AuthenticatedUser(user): AuthenticatedUser) -> Json<UserProfile> {
    Json(UserProfile::from(user))
}

// ---
// Handler: register (creates a back-office user)
// ---
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Users",
    request_body = CreateUserPayload,
    responses(
        (status = 201, body = UserProfile),
        (status = 403, description = "Role cannot be granted by this user"),
        (status = 409, description = "E-mail already registered")
    ),
    security(("api_jwt" = []))
)]
pub async fn register(
    State(app_state): State<AppState>,
    AuthenticatedUser(current): AuthenticatedUser,
    actor: Actor,
    _guard: RequirePermission<PermUsers>,
    Json(payload): Json<CreateUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    let user = app_state.user_service.create(&current, payload).await?;
    app_state
        .audit_service
        .record(
            &actor,
            "create",
            "user",
            user.id,
            json!({ "email": user.email, "role": user.role }),
        )
        .await;
    Ok((StatusCode::CREATED, Json(UserProfile::from(user))))
}

// ---
// Handler: list_users
// ---
#[utoipa::path(
    get,
    path = "/api/admin/users",
    tag = "Users",
    responses((status = 200, body = Vec<UserProfile>)),
    security(("api_jwt" = []))
)]
pub async fn list_users(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermUsers>,
) -> Result<impl IntoResponse, AppError> {
    let users: Vec<UserProfile> = app_state
        .user_service
        .list()
        .await?
        .into_iter()
        .map(UserProfile::from)
        .collect();
    Ok(Json(users))
}

// ---
// Handler: update_user
// ---
#[utoipa::path(
    put,
    path = "/api/admin/users/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "User id")),
    request_body = UpdateUserPayload,
    responses((status = 200, body = UserProfile)),
    security(("api_jwt" = []))
)]
pub async fn update_user(
    State(app_state): State<AppState>,
    AuthenticatedUser(current): AuthenticatedUser,
    actor: Actor,
    _guard: RequirePermission<PermUsers>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    let password_changed = payload.password.is_some();
    let (before, after) = app_state.user_service.update(&current, id, payload).await?;

    let mut details = diff(&before, &after);
    if password_changed {
        details["password"] = json!("changed");
    }
    app_state
        .audit_service
        .record(&actor, "update", "user", id, details)
        .await;
    Ok(Json(UserProfile::from(after)))
}

// ---
// Handler: delete_user
// ---
#[utoipa::path(
    delete,
    path = "/api/admin/users/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 400, description = "Users cannot delete themselves")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_user(
    State(app_state): State<AppState>,
    AuthenticatedUser(current): AuthenticatedUser,
    actor: Actor,
    _guard: RequirePermission<PermUsers>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let user = app_state.user_service.delete(&current, id).await?;
    app_state
        .audit_service
        .record(&actor, "delete", "user", id, json!({ "email": user.email }))
        .await;
    Ok(StatusCode::NO_CONTENT)
}

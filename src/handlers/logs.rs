// src/handlers/logs.rs

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::rbac::{PermUsers, RequirePermission},
    models::audit::{LogPage, LogQuery},
};

#[utoipa::path(
    get,
    path = "/api/admin/logs",
    tag = "Activity logs",
    params(
        ("page" = Option<i64>, Query, description = "1-based page"),
        ("limit" = Option<i64>, Query, description = "Entries per page, 1 to 100"),
        ("resource" = Option<String>, Query, description = "Filter by resource"),
        ("action" = Option<String>, Query, description = "Filter by action")
    ),
    responses((status = 200, body = LogPage)),
    security(("api_jwt" = []))
)]
pub async fn list_logs(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermUsers>,
    Query(query): Query<LogQuery>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(app_state.audit_service.list(&query).await?))
}

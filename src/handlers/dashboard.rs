// src/handlers/dashboard.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::rbac::{PermDashboard, RequirePermission},
    models::dashboard::{DashboardStats, DashboardStatsQuery, DashboardSummary},
};

// GET /api/admin/dashboard
#[utoipa::path(
    get,
    path = "/api/admin/dashboard",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Occupancy, revenue and latest bookings", body = DashboardSummary),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Missing dashboard permission")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_summary(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermDashboard>,
) -> Result<impl IntoResponse, AppError> {
    let summary = app_state.dashboard_service.summary().await?;
    Ok((StatusCode::OK, Json(summary)))
}

// GET /api/admin/dashboard-stats
#[utoipa::path(
    get,
    path = "/api/admin/dashboard-stats",
    tag = "Dashboard",
    params(
        ("days" = Option<i64>, Query, description = "Window ending today, default 30"),
        ("start_date" = Option<chrono::NaiveDate>, Query, description = "Explicit window start"),
        ("end_date" = Option<chrono::NaiveDate>, Query, description = "Explicit window end")
    ),
    responses(
        (status = 200, description = "Traffic, bookings per room and conversion funnel", body = DashboardStats),
        (status = 400, description = "Invalid window")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_stats(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermDashboard>,
    Query(query): Query<DashboardStatsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let stats = app_state.dashboard_service.stats(&query).await?;
    Ok((StatusCode::OK, Json(stats)))
}

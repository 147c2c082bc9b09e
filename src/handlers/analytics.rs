// src/handlers/analytics.rs

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
    models::analytics::{AnalyticsEvent, AnalyticsQuery, DailyStats, TrackEventPayload, TrackQuery},
};

#[utoipa::path(
    post,
    path = "/api/analytics/track",
    tag = "Analytics",
    params(("page" = Option<String>, Query, description = "Visited page, `/` when absent")),
    responses((status = 204, description = "Visit counted"))
)]
pub async fn track_visit(
    State(app_state): State<AppState>,
    Query(query): Query<TrackQuery>,
) -> Result<impl IntoResponse, AppError> {
    app_state.analytics_service.track_visit(&query).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/analytics/event",
    tag = "Analytics",
    request_body = TrackEventPayload,
    responses((status = 201, body = AnalyticsEvent))
)]
pub async fn track_event(
    State(app_state): State<AppState>,
    Json(payload): Json<TrackEventPayload>,
) -> Result<impl IntoResponse, AppError> {
    let event = app_state.analytics_service.record_event(payload).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

#[utoipa::path(
    get,
    path = "/api/admin/analytics",
    tag = "Analytics",
    params(("days" = Option<i64>, Query, description = "Days back from today, default 7")),
    responses((status = 200, description = "Daily stats, oldest first", body = Vec<DailyStats>)),
    security(("api_jwt" = []))
)]
pub async fn recent_stats(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermDashboard>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(app_state.analytics_service.recent(&query).await?))
}

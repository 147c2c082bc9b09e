// src/handlers/reservations.rs

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
    middleware::rbac::{PermReservations, RequirePermission, RequireSuperAdmin},
    models::reservation::{
        CheckReservationQuery, CreateReservationPayload, QuoteRequest, Reservation,
        ReservationFilter, StayQuote, UpdateStatusPayload,
    },
    services::audit_service::Actor,
};

// ---
// Handler: create_reservation (public)
// ---
#[utoipa::path(
    post,
    path = "/api/reservations",
    tag = "Reservations",
    request_body = CreateReservationPayload,
    responses(
        (status = 201, description = "Reservation created, confirmation e-mail queued", body = Reservation),
        (status = 400, description = "Invalid guest data, dates, rate plan or promo code"),
        (status = 404, description = "Room type missing or inactive"),
        (status = 409, description = "A night of the stay is closed or sold out")
    )
)]
pub async fn create_reservation(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateReservationPayload>,
) -> Result<impl IntoResponse, AppError> {
    let reservation = app_state.reservation_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(reservation)))
}

// ---
// Handler: quote_reservation (public)
// ---
#[utoipa::path(
    post,
    path = "/api/reservations/quote",
    tag = "Reservations",
    request_body = QuoteRequest,
    responses((status = 200, description = "Price of the stay, nothing persisted", body = StayQuote))
)]
pub async fn quote_reservation(
    State(app_state): State<AppState>,
    Json(payload): Json<QuoteRequest>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(app_state.reservation_service.quote(&payload).await?))
}

// ---
// Handler: check_reservation (public)
// ---
#[utoipa::path(
    get,
    path = "/api/reservations/check",
    tag = "Reservations",
    params(
        ("booking_code" = Option<String>, Query, description = "Booking code, any case"),
        ("email" = Option<String>, Query, description = "Guest e-mail")
    ),
    responses((status = 200, description = "Up to 10 matching reservations", body = Vec<Reservation>))
)]
pub async fn check_reservation(
    State(app_state): State<AppState>,
    Query(query): Query<CheckReservationQuery>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(app_state.reservation_service.check(&query).await?))
}

// ---
// Handler: list_reservations (admin)
// ---
#[utoipa::path(
    get,
    path = "/api/admin/reservations",
    tag = "Reservations",
    params(
        ("status" = Option<String>, Query, description = "Filter by status"),
        ("start_date" = Option<chrono::NaiveDate>, Query, description = "check_in on or after"),
        ("end_date" = Option<chrono::NaiveDate>, Query, description = "check_out on or before")
    ),
    responses((status = 200, body = Vec<Reservation>)),
    security(("api_jwt" = []))
)]
pub async fn list_reservations(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermReservations>,
    Query(filter): Query<ReservationFilter>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(app_state.reservation_service.list(&filter).await?))
}

// ---
// Handler: get_reservation (admin)
// ---
#[utoipa::path(
    get,
    path = "/api/admin/reservations/{id}",
    tag = "Reservations",
    params(("id" = Uuid, Path, description = "Reservation id")),
    responses((status = 200, body = Reservation), (status = 404, description = "Unknown reservation")),
    security(("api_jwt" = []))
)]
pub async fn get_reservation(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermReservations>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(app_state.reservation_service.get(id).await?))
}

// ---
// Handler: update_status
// ---
#[utoipa::path(
    put,
    path = "/api/admin/reservations/{id}/status",
    tag = "Reservations",
    params(("id" = Uuid, Path, description = "Reservation id")),
    request_body = UpdateStatusPayload,
    responses(
        (status = 200, body = Reservation),
        (status = 409, description = "Transition not allowed from the current status")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_status(
    State(app_state): State<AppState>,
    actor: Actor,
    _guard: RequirePermission<PermReservations>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusPayload>,
) -> Result<impl IntoResponse, AppError> {
    let (before, after) = app_state
        .reservation_service
        .update_status(id, payload.status)
        .await?;
    app_state
        .audit_service
        .record(
            &actor,
            "update_status",
            "reservation",
            id,
            json!({
                "booking_code": after.booking_code,
                "status": { "old": before.status, "new": after.status },
            }),
        )
        .await;
    Ok(Json(after))
}

// ---
// Handler: resend_email
// ---
#[utoipa::path(
    post,
    path = "/api/admin/reservations/{id}/resend-email",
    tag = "Reservations",
    params(("id" = Uuid, Path, description = "Reservation id")),
    responses(
        (status = 200, description = "Confirmation sent"),
        (status = 502, description = "The mail provider rejected the message")
    ),
    security(("api_jwt" = []))
)]
pub async fn resend_email(
    State(app_state): State<AppState>,
    actor: Actor,
    _guard: RequirePermission<PermReservations>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let outcome = app_state.reservation_service.resend_confirmation(id).await;

    // Unknown ids are not worth an audit entry
    let details = match &outcome {
        Ok(r) => Some(json!({ "booking_code": r.booking_code, "to": r.guest_email, "sent": true })),
        Err(AppError::NotFound(_)) => None,
        Err(e) => Some(json!({ "sent": false, "error": e.to_string() })),
    };
    if let Some(details) = details {
        app_state
            .audit_service
            .record(&actor, "resend_email", "reservation", id, details)
            .await;
    }

    let reservation = outcome?;
    Ok(Json(json!({
        "message": format!("Confirmation sent to {}.", reservation.guest_email),
    })))
}

// ---
// Handler: delete_reservation (superadmin)
// ---
#[utoipa::path(
    delete,
    path = "/api/admin/reservations/{id}",
    tag = "Reservations",
    params(("id" = Uuid, Path, description = "Reservation id")),
    responses((status = 204, description = "Reservation deleted")),
    security(("api_jwt" = []))
)]
pub async fn delete_reservation(
    State(app_state): State<AppState>,
    actor: Actor,
    _guard: RequireSuperAdmin,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let reservation = app_state.reservation_service.delete(id).await?;
    app_state
        .audit_service
        .record(
            &actor,
            "delete",
            "reservation",
            id,
            json!({ "booking_code": reservation.booking_code, "guest_name": reservation.guest_name }),
        )
        .await;
    Ok(StatusCode::NO_CONTENT)
}

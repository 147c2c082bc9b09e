// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Rooms ---
        handlers::rooms::list_rooms,
        handlers::rooms::get_room,
        handlers::rooms::list_all_rooms,
        handlers::rooms::create_room,
        handlers::rooms::update_room,
        handlers::rooms::delete_room,
        handlers::rooms::reorder_rooms,

        // --- Inventory ---
        handlers::inventory::get_inventory,
        handlers::inventory::update_cell,
        handlers::inventory::set_day,
        handlers::inventory::bulk_update,
        handlers::inventory::search_availability,

        // --- Rate plans ---
        handlers::rate_plans::list_public_plans,
        handlers::rate_plans::list_plans,
        handlers::rate_plans::create_plan,
        handlers::rate_plans::update_plan,
        handlers::rate_plans::delete_plan,

        // --- Promo codes ---
        handlers::promo::verify_promo,
        handlers::promo::list_promos,
        handlers::promo::create_promo,
        handlers::promo::update_promo,
        handlers::promo::delete_promo,

        // --- Reservations ---
        handlers::reservations::create_reservation,
        handlers::reservations::quote_reservation,
        handlers::reservations::check_reservation,
        handlers::reservations::list_reservations,
        handlers::reservations::get_reservation,
        handlers::reservations::update_status,
        handlers::reservations::resend_email,
        handlers::reservations::delete_reservation,

        // --- Auth & users ---
        handlers::auth::login,
        handlers::auth::get_me,
        handlers::auth::register,
        handlers::auth::list_users,
        handlers::auth::update_user,
        handlers::auth::delete_user,
        handlers::logs::list_logs,

        // --- Content ---
        handlers::content::list_content,
        handlers::content::get_section,
        handlers::content::upsert_section,
        handlers::content::update_section,
        handlers::content::delete_section,

        // --- Reviews ---
        handlers::reviews::submit_review,
        handlers::reviews::list_visible_reviews,
        handlers::reviews::list_reviews,
        handlers::reviews::set_visibility,
        handlers::reviews::delete_review,

        // --- Analytics & dashboard ---
        handlers::analytics::track_visit,
        handlers::analytics::track_event,
        handlers::analytics::recent_stats,
        handlers::dashboard::get_summary,
        handlers::dashboard::get_stats,
    ),
    components(
        schemas(
            // --- Rooms ---
            models::room::RoomType,
            models::room::CreateRoomPayload,
            models::room::UpdateRoomPayload,
            models::room::ReorderRoomsPayload,

            // --- Inventory ---
            models::inventory::InventoryDay,
            models::inventory::ResolvedDay,
            models::inventory::InventoryField,
            models::inventory::CellEditPayload,
            models::inventory::SetDayPayload,
            models::inventory::BulkUpdateRequest,
            models::inventory::BulkUpdateSummary,
            models::inventory::RoomAvailability,

            // --- Rate plans ---
            models::rate_plan::ModifierType,
            models::rate_plan::RatePlan,
            models::rate_plan::CreateRatePlanPayload,
            models::rate_plan::UpdateRatePlanPayload,

            // --- Promo codes ---
            models::promo::DiscountType,
            models::promo::PromoCode,
            models::promo::CreatePromoPayload,
            models::promo::UpdatePromoPayload,
            models::promo::VerifyPromoPayload,
            models::promo::VerifyPromoResponse,

            // --- Reservations ---
            models::reservation::ReservationStatus,
            models::reservation::Reservation,
            models::reservation::CreateReservationPayload,
            models::reservation::QuoteRequest,
            models::reservation::StayQuote,
            models::reservation::UpdateStatusPayload,

            // --- Auth ---
            models::auth::Role,
            models::auth::Capability,
            models::auth::Permissions,
            models::auth::User,
            models::auth::UserProfile,
            models::auth::LoginUserPayload,
            models::auth::CreateUserPayload,
            models::auth::UpdateUserPayload,
            models::auth::AuthResponse,
            models::audit::ActivityLog,
            models::audit::LogPage,

            // --- Content ---
            models::content::SiteContent,
            models::content::UpsertContentPayload,
            models::content::UpdateContentPayload,
            models::content::PaymentDetails,
            models::content::EmailTemplateConfig,

            // --- Reviews ---
            models::review::Review,
            models::review::CreateReviewPayload,
            models::review::VisibilityPayload,

            // --- Analytics & dashboard ---
            models::analytics::DailyStats,
            models::analytics::TrackEventPayload,
            models::analytics::AnalyticsEvent,
            models::dashboard::DashboardSummary,
            models::dashboard::RevenuePoint,
            models::dashboard::DashboardStats,
            models::dashboard::DailyTraffic,
            models::dashboard::DailyRevenue,
            models::dashboard::RoomBookingCount,
            models::dashboard::EventCount,
            models::dashboard::FunnelStep,
        )
    ),
    tags(
        (name = "Rooms", description = "Room type catalog"),
        (name = "Inventory", description = "Per-date allotment, rates and availability search"),
        (name = "Rate plans", description = "Pricing variants of a room"),
        (name = "Promo codes", description = "Discount codes and verification"),
        (name = "Reservations", description = "Booking intake and back-office management"),
        (name = "Auth", description = "Login and session"),
        (name = "Users", description = "Back-office accounts and permissions"),
        (name = "Activity logs", description = "Audit trail of admin changes"),
        (name = "Content", description = "Editable website sections"),
        (name = "Reviews", description = "Guest reviews and moderation"),
        (name = "Analytics", description = "Visit and event tracking"),
        (name = "Dashboard", description = "Back-office indicators")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}

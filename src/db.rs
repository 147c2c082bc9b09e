pub mod store;
pub use store::Stores;

pub mod room_repo;
pub use room_repo::RoomRepository;
pub mod inventory_repo;
pub use inventory_repo::InventoryRepository;
pub mod rate_plan_repo;
pub use rate_plan_repo::RatePlanRepository;
pub mod promo_repo;
pub use promo_repo::PromoRepository;
pub mod reservation_repo;
pub use reservation_repo::ReservationRepository;

pub mod user_repo;
pub use user_repo::UserRepository;
pub mod audit_repo;
pub use audit_repo::AuditRepository;
pub mod content_repo;
pub use content_repo::ContentRepository;
pub mod review_repo;
pub use review_repo::ReviewRepository;
pub mod analytics_repo;
pub use analytics_repo::AnalyticsRepository;
pub mod dashboard_repo;
pub use dashboard_repo::DashboardRepository;

#[cfg(test)]
pub mod memory;

use std::sync::Arc;

use sqlx::PgPool;

impl Stores {
    /// Booking-core stores backed by PostgreSQL.
    pub fn postgres(pool: &PgPool) -> Self {
        Self {
            rooms: Arc::new(RoomRepository::new(pool.clone())),
            inventory: Arc::new(InventoryRepository::new(pool.clone())),
            rate_plans: Arc::new(RatePlanRepository::new(pool.clone())),
            promos: Arc::new(PromoRepository::new(pool.clone())),
            reservations: Arc::new(ReservationRepository::new(pool.clone())),
        }
    }
}

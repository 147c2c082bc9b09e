pub mod analytics_service;
pub mod audit_service;
pub mod auth;
pub mod content_service;
pub mod dashboard_service;
pub mod email;
pub mod inventory_service;
pub mod pricing;
pub mod promo_service;
pub mod rate_plan_service;
pub mod reservation_service;
pub mod review_service;
pub mod room_service;
pub mod user_service;

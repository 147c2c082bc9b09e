// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{
        AnalyticsRepository, AuditRepository, ContentRepository, DashboardRepository,
        ReviewRepository, Stores, UserRepository,
    },
    services::{
        analytics_service::AnalyticsService,
        audit_service::AuditService,
        auth::{AuthService, TokenKeys},
        content_service::ContentService,
        dashboard_service::DashboardService,
        email::{EmailService, ReservationNotifier},
        inventory_service::InventoryService,
        promo_service::PromoService,
        rate_plan_service::RatePlanService,
        reservation_service::{BookingPolicy, ReservationService},
        review_service::ReviewService,
        room_service::RoomService,
        user_service::UserService,
    },
};

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub bind_addr: String,
    pub db_max_connections: u32,
    pub cors_origins: Vec<String>,
    pub resend_api_key: Option<String>,
    pub sender_email: String,
    pub frontend_url: String,
    pub booking_code_prefix: String,
    pub booking_consumes_allotment: bool,
    pub init_admin_email: Option<String>,
    pub init_admin_password: Option<String>,
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn or_default(key: &str, default: &str) -> String {
    optional(key).unwrap_or_else(|| default.to_string())
}

fn parsed<T: std::str::FromStr>(key: &str, default: T) -> anyhow::Result<T>
where
    T::Err: std::fmt::Display,
{
    match optional(key) {
        Some(raw) => raw
            .parse()
            .map_err(|e| anyhow::anyhow!("{} has an invalid value {:?}: {}", key, raw, e)),
        None => Ok(default),
    }
}

impl Config {
    /// Reads the configuration from the environment (after `.env` is loaded).
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            jwt_expiration_hours: parsed("JWT_EXPIRATION_HOURS", 24)?,
            bind_addr: or_default("BIND_ADDR", "0.0.0.0:3000"),
            db_max_connections: parsed("DB_MAX_CONNECTIONS", 5)?,
            cors_origins: or_default("CORS_ORIGINS", "http://localhost:3000")
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect(),
            resend_api_key: optional("RESEND_API_KEY"),
            sender_email: or_default("SENDER_EMAIL", "onboarding@resend.dev"),
            frontend_url: or_default("FRONTEND_URL", "http://localhost:3000"),
            booking_code_prefix: or_default("BOOKING_CODE_PREFIX", "SGH"),
            booking_consumes_allotment: parsed("BOOKING_CONSUMES_ALLOTMENT", false)?,
            init_admin_email: optional("INIT_ADMIN_EMAIL"),
            init_admin_password: optional("INIT_ADMIN_PASSWORD"),
        })
    }

    pub fn booking_policy(&self) -> BookingPolicy {
        BookingPolicy {
            code_prefix: self.booking_code_prefix.clone(),
            consume_allotment: self.booking_consumes_allotment,
        }
    }
}

pub async fn connect(config: &Config) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(3))
        .connect(&config.database_url)
        .await
        .context("could not connect to the database")?;
    tracing::info!("database connection established");
    Ok(pool)
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub config: Arc<Config>,
    pub auth_service: AuthService,
    pub user_service: UserService,
    pub audit_service: AuditService,
    pub room_service: RoomService,
    pub inventory_service: InventoryService,
    pub rate_plan_service: RatePlanService,
    pub promo_service: PromoService,
    pub reservation_service: ReservationService,
    pub content_service: ContentService,
    pub review_service: ReviewService,
    pub analytics_service: AnalyticsService,
    pub dashboard_service: DashboardService,
}

impl AppState {
    /// Production wiring: every store backed by PostgreSQL, e-mails through Resend.
    pub fn new(db_pool: PgPool, config: Config) -> Self {
        let stores = Stores::postgres(&db_pool);
        let notifier: Arc<dyn ReservationNotifier> = Arc::new(EmailService::new(
            ContentRepository::new(db_pool.clone()),
            config.resend_api_key.clone(),
            config.sender_email.clone(),
        ));
        Self::with_stores(db_pool, config, stores, notifier)
    }

    pub fn with_stores(
        db_pool: PgPool,
        config: Config,
        stores: Stores,
        notifier: Arc<dyn ReservationNotifier>,
    ) -> Self {
        let user_repo = UserRepository::new(db_pool.clone());
        let keys = TokenKeys::new(config.jwt_secret.clone(), config.jwt_expiration_hours);

        Self {
            auth_service: AuthService::new(user_repo.clone(), keys),
            user_service: UserService::new(user_repo),
            audit_service: AuditService::new(AuditRepository::new(db_pool.clone())),
            room_service: RoomService::new(stores.clone()),
            inventory_service: InventoryService::new(stores.clone()),
            rate_plan_service: RatePlanService::new(stores.clone()),
            promo_service: PromoService::new(stores.clone()),
            reservation_service: ReservationService::new(
                stores.clone(),
                notifier,
                config.booking_policy(),
            ),
            content_service: ContentService::new(ContentRepository::new(db_pool.clone())),
            review_service: ReviewService::new(ReviewRepository::new(db_pool.clone())),
            analytics_service: AnalyticsService::new(AnalyticsRepository::new(db_pool.clone())),
            dashboard_service: DashboardService::new(
                DashboardRepository::new(db_pool.clone()),
                stores,
            ),
            config: Arc::new(config),
            db_pool,
        }
    }
}

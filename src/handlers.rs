// src/handlers.rs

pub mod analytics;
pub mod auth;
pub mod content;
pub mod dashboard;
pub mod inventory;
pub mod logs;
pub mod promo;
pub mod rate_plans;
pub mod reservations;
pub mod reviews;
pub mod rooms;

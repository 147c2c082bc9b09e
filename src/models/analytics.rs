// src/models/analytics.rs

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, types::Json};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Visit counters for one calendar day.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct DailyStats {
    pub date: NaiveDate,
    pub total_visits: i32,
    #[schema(value_type = Object)]
    pub page_views: Json<BTreeMap<String, i64>>,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct TrackQuery {
    pub page: Option<String>,
}

impl TrackQuery {
    const MAX_PAGE_LEN: usize = 200;

    /// Page key as stored in `page_views`. Missing or blank pages count as `/`.
    pub fn page_key(&self) -> String {
        let page = self.page.as_deref().map(str::trim).unwrap_or_default();
        if page.is_empty() {
            return "/".to_string();
        }
        page.chars().take(Self::MAX_PAGE_LEN).collect()
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct TrackEventPayload {
    #[validate(length(min = 1, max = 100, message = "Category is required."))]
    pub category: String,
    #[validate(length(min = 1, max = 100, message = "Action is required."))]
    pub action: String,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub label: String,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct AnalyticsEvent {
    pub id: Uuid,
    pub category: String,
    pub action: String,
    pub label: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct AnalyticsQuery {
    pub days: Option<i64>,
}

impl AnalyticsQuery {
    pub fn days(&self) -> i64 {
        self.days.unwrap_or(7).clamp(1, 366)
    }
}

// src/models/audit.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct ActivityLog {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub user_name: String,
    pub user_role: String,
    #[schema(example = "update")]
    pub action: String,
    #[schema(example = "rooms")]
    pub resource: String,
    pub resource_id: String,
    #[schema(value_type = Object)]
    pub details: serde_json::Value,
    pub ip_address: String,
    pub created_at: DateTime<Utc>,
}

/// Entry about to be appended, before the store assigns id and timestamp.
#[derive(Debug, Clone)]
pub struct NewActivity {
    pub user_id: Option<Uuid>,
    pub user_name: String,
    pub user_role: String,
    pub action: String,
    pub resource: String,
    pub resource_id: String,
    pub details: serde_json::Value,
    pub ip_address: String,
}

#[derive(Debug, Deserialize)]
pub struct LogQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub resource: Option<String>,
    pub action: Option<String>,
}

impl LogQuery {
    pub const DEFAULT_LIMIT: i64 = 50;
    pub const MAX_LIMIT: i64 = 100;

    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit(&self) -> i64 {
        self.limit
            .unwrap_or(Self::DEFAULT_LIMIT)
            .clamp(1, Self::MAX_LIMIT)
    }

    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.limit()
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LogPage {
    pub logs: Vec<ActivityLog>,
    pub total: i64,
    pub page: i64,
    pub pages: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_is_clamped_and_page_starts_at_one() {
        let q = LogQuery {
            page: Some(0),
            limit: Some(500),
            resource: None,
            action: None,
        };
        assert_eq!(q.page(), 1);
        assert_eq!(q.limit(), 100);
        assert_eq!(q.offset(), 0);

        let q = LogQuery {
            page: Some(3),
            limit: Some(0),
            resource: None,
            action: None,
        };
        assert_eq!(q.limit(), 1);
        assert_eq!(q.offset(), 2);
    }
}

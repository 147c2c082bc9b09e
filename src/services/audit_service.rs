// src/services/audit_service.rs

use serde::Serialize;
use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::AuditRepository,
    models::{
        audit::{LogPage, LogQuery, NewActivity},
        auth::User,
    },
};

/// Who performed an admin action, and from where.
#[derive(Debug, Clone)]
pub struct Actor {
    pub user_id: Uuid,
    pub name: String,
    pub role: String,
    pub ip_address: String,
}

impl Actor {
    pub fn new(user: &User, ip_address: String) -> Self {
        Self {
            user_id: user.id,
            name: if user.name.is_empty() {
                user.email.clone()
            } else {
                user.name.clone()
            },
            role: user.role.as_str().to_string(),
            ip_address,
        }
    }
}

/// Field-level changes between two versions of a record: `{field: {old, new}}`.
/// Timestamps are left out.
pub fn diff<T: Serialize>(before: &T, after: &T) -> Value {
    let (Ok(Value::Object(old)), Ok(Value::Object(new))) =
        (serde_json::to_value(before), serde_json::to_value(after))
    else {
        return Value::Object(Map::new());
    };
    let changes: Map<String, Value> = new
        .into_iter()
        .filter(|(field, _)| field != "updated_at")
        .filter_map(|(field, value)| {
            let previous = old.get(&field).cloned().unwrap_or(Value::Null);
            (previous != value).then(|| (field, json!({ "old": previous, "new": value })))
        })
        .collect();
    Value::Object(changes)
}

#[derive(Clone)]
pub struct AuditService {
    repo: AuditRepository,
}

impl AuditService {
    pub fn new(repo: AuditRepository) -> Self {
        Self { repo }
    }

    /// Appends an entry. Failures are logged and never fail the audited action.
    pub async fn record(
        &self,
        actor: &Actor,
        action: &str,
        resource: &str,
        resource_id: impl ToString,
        details: Value,
    ) {
        let entry = NewActivity {
            user_id: Some(actor.user_id),
            user_name: actor.name.clone(),
            user_role: actor.role.clone(),
            action: action.to_string(),
            resource: resource.to_string(),
            resource_id: resource_id.to_string(),
            details,
            ip_address: actor.ip_address.clone(),
        };
        if let Err(e) = self.repo.append(&entry).await {
            tracing::error!(action, resource, "failed to write activity log: {:?}", e);
        }
    }

    pub async fn list(&self, query: &LogQuery) -> Result<LogPage, AppError> {
        let (logs, total) = self.repo.page(query).await?;
        let limit = query.limit();
        Ok(LogPage {
            logs,
            total,
            page: query.page(),
            pages: (total + limit - 1) / limit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Room {
        name: &'static str,
        price: u32,
        updated_at: &'static str,
    }

    #[test]
    fn diff_lists_only_changed_fields() {
        let before = Room {
            name: "Deluxe",
            price: 100,
            updated_at: "t1",
        };
        let after = Room {
            name: "Deluxe",
            price: 120,
            updated_at: "t2",
        };
        assert_eq!(
            diff(&before, &after),
            json!({ "price": { "old": 100, "new": 120 } })
        );
    }

    #[test]
    fn identical_records_have_an_empty_diff() {
        let room = Room {
            name: "Deluxe",
            price: 100,
            updated_at: "t1",
        };
        assert_eq!(diff(&room, &room), json!({}));
    }
}

// src/models/auth.rs

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Staff,
    Admin,
    Superadmin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Staff => "staff",
            Role::Admin => "admin",
            Role::Superadmin => "superadmin",
        }
    }

    pub fn is_admin(self) -> bool {
        matches!(self, Role::Admin | Role::Superadmin)
    }
}

/// One back-office area a user can be allowed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Dashboard,
    Rooms,
    Reservations,
    Content,
    Reviews,
    Promo,
    Users,
    Gallery,
    EmailConfig,
}

impl Capability {
    pub const ALL: [Capability; 9] = [
        Capability::Dashboard,
        Capability::Rooms,
        Capability::Reservations,
        Capability::Content,
        Capability::Reviews,
        Capability::Promo,
        Capability::Users,
        Capability::Gallery,
        Capability::EmailConfig,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Capability::Dashboard => "dashboard",
            Capability::Rooms => "rooms",
            Capability::Reservations => "reservations",
            Capability::Content => "content",
            Capability::Reviews => "reviews",
            Capability::Promo => "promo",
            Capability::Users => "users",
            Capability::Gallery => "gallery",
            Capability::EmailConfig => "email_config",
        }
    }
}

/// Per-area switches for staff accounts. Ignored for admins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct Permissions {
    pub dashboard: bool,
    pub rooms: bool,
    pub reservations: bool,
    pub content: bool,
    pub reviews: bool,
    pub promo: bool,
    pub users: bool,
    pub gallery: bool,
    pub email_config: bool,
}

impl Default for Permissions {
    fn default() -> Self {
        Self {
            dashboard: true,
            rooms: false,
            reservations: false,
            content: false,
            reviews: false,
            promo: false,
            users: false,
            gallery: false,
            email_config: false,
        }
    }
}

impl Permissions {
    pub fn allows(&self, capability: Capability) -> bool {
        match capability {
            Capability::Dashboard => self.dashboard,
            Capability::Rooms => self.rooms,
            Capability::Reservations => self.reservations,
            Capability::Content => self.content,
            Capability::Reviews => self.reviews,
            Capability::Promo => self.promo,
            Capability::Users => self.users,
            Capability::Gallery => self.gallery,
            Capability::EmailConfig => self.email_config,
        }
    }
}

/// The single place where role and permission map turn into capabilities.
pub fn resolve_permissions(role: Role, permissions: &Permissions) -> BTreeSet<Capability> {
    Capability::ALL
        .into_iter()
        .filter(|cap| role.is_admin() || permissions.allows(*cap))
        .collect()
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub role: Role,
    pub permissions: Permissions,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn capabilities(&self) -> BTreeSet<Capability> {
        resolve_permissions(self.role, &self.permissions)
    }

    pub fn can(&self, capability: Capability) -> bool {
        self.role.is_admin() || self.permissions.allows(capability)
    }
}

// Row shape of the `users` table (permissions stored as JSONB)
#[derive(Debug, sqlx::FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub role: Role,
    pub permissions: Json<Permissions>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            password_hash: row.password_hash,
            name: row.name,
            role: row.role,
            permissions: row.permissions.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Public view of a user, with the resolved capability set.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserProfile {
    #[serde(flatten)]
    pub user: User,
    pub capabilities: BTreeSet<Capability>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        let capabilities = user.capabilities();
        Self { user, capabilities }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginUserPayload {
    #[validate(email(message = "The e-mail address is invalid."))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required."))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserPayload {
    #[validate(email(message = "The e-mail address is invalid."))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must have at least 6 characters."))]
    pub password: String,
    #[validate(length(min = 1, message = "Name is required."))]
    pub name: String,
    #[serde(default = "default_role")]
    pub role: Role,
    pub permissions: Option<Permissions>,
}

fn default_role() -> Role {
    Role::Staff
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUserPayload {
    #[validate(email(message = "The e-mail address is invalid."))]
    pub email: Option<String>,
    #[validate(length(min = 6, message = "Password must have at least 6 characters."))]
    pub password: Option<String>,
    #[validate(length(min = 1, message = "Name cannot be empty."))]
    pub name: Option<String>,
    pub role: Option<Role>,
    pub permissions: Option<Permissions>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserProfile,
}

// JWT claims
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub role: Role,
    pub exp: usize,
    pub iat: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admins_get_every_capability() {
        let none = Permissions {
            dashboard: false,
            ..Default::default()
        };
        assert_eq!(resolve_permissions(Role::Admin, &none).len(), Capability::ALL.len());
        assert_eq!(resolve_permissions(Role::Superadmin, &none).len(), Capability::ALL.len());
        assert!(resolve_permissions(Role::Staff, &none).is_empty());
    }

    #[test]
    fn staff_capabilities_follow_the_map() {
        let perms = Permissions {
            rooms: true,
            promo: true,
            ..Default::default()
        };
        let caps = resolve_permissions(Role::Staff, &perms);
        assert_eq!(
            caps.into_iter().collect::<Vec<_>>(),
            vec![Capability::Dashboard, Capability::Rooms, Capability::Promo]
        );
    }

    #[test]
    fn missing_permission_keys_take_defaults() {
        let perms: Permissions = serde_json::from_str(r#"{ "reviews": true }"#).unwrap();
        assert!(perms.dashboard);
        assert!(perms.reviews);
        assert!(!perms.users);
    }

    #[test]
    fn password_hash_is_never_serialized() {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: "a@b.co".into(),
            password_hash: "secret".into(),
            name: "A".into(),
            role: Role::Staff,
            permissions: Permissions::default(),
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(UserProfile::from(user)).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["capabilities"], serde_json::json!(["dashboard"]));
    }
}

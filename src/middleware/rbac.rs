// src/middleware/rbac.rs

use std::marker::PhantomData;

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{
    common::error::AppError,
    middleware::auth::AuthenticatedUser,
    models::auth::{Capability, Role},
};

/// A capability a route requires.
pub trait PermissionDef: Send + Sync + 'static {
    fn capability() -> Capability;
}

/// Guard extractor: rejects the request unless the user holds `T`'s capability.
pub struct RequirePermission<T>(pub PhantomData<T>);

impl<T, S> FromRequestParts<S> for RequirePermission<T>
where
    T: PermissionDef,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthenticatedUser(user) = AuthenticatedUser::from_request_parts(parts, state).await?;
        let required = T::capability();
        if !user.can(required) {
            tracing::warn!(user_id = %user.id, capability = required.key(), "permission denied");
            return Err(AppError::Forbidden(format!(
                "You need the '{}' permission for this action.",
                required.key()
            )));
        }
        Ok(RequirePermission(PhantomData))
    }
}

/// Guard for destructive actions reserved to superadmins.
pub struct RequireSuperAdmin;

impl<S> FromRequestParts<S> for RequireSuperAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthenticatedUser(user) = AuthenticatedUser::from_request_parts(parts, state).await?;
        if user.role != Role::Superadmin {
            return Err(AppError::Forbidden("Only a superadmin can do this.".into()));
        }
        Ok(RequireSuperAdmin)
    }
}

// ---
// Permission types
// ---

pub struct PermDashboard;
impl PermissionDef for PermDashboard {
    fn capability() -> Capability { Capability::Dashboard }
}

pub struct PermRooms;
impl PermissionDef for PermRooms {
    fn capability() -> Capability { Capability::Rooms }
}

pub struct PermReservations;
impl PermissionDef for PermReservations {
    fn capability() -> Capability { Capability::Reservations }
}

pub struct PermContent;
impl PermissionDef for PermContent {
    fn capability() -> Capability { Capability::Content }
}

pub struct PermReviews;
impl PermissionDef for PermReviews {
    fn capability() -> Capability { Capability::Reviews }
}

pub struct PermPromo;
impl PermissionDef for PermPromo {
    fn capability() -> Capability { Capability::Promo }
}

pub struct PermUsers;
impl PermissionDef for PermUsers {
    fn capability() -> Capability { Capability::Users }
}

#[cfg(test)]
mod tests {
    use axum::http::Request;
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;
    use crate::models::auth::{Permissions, User};

    fn parts_for(role: Role, permissions: Permissions) -> Parts {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: "frontdesk@hotel.test".into(),
            password_hash: String::new(),
            name: "Front Desk".into(),
            role,
            permissions,
            created_at: now,
            updated_at: now,
        };
        let (mut parts, _) = Request::builder().body(()).unwrap().into_parts();
        parts.extensions.insert(AuthenticatedUser(user));
        parts
    }

    #[tokio::test]
    async fn staff_needs_the_matching_switch() {
        let mut parts = parts_for(
            Role::Staff,
            Permissions {
                reservations: true,
                ..Default::default()
            },
        );
        assert!(RequirePermission::<PermReservations>::from_request_parts(&mut parts, &())
            .await
            .is_ok());
        let denied = RequirePermission::<PermUsers>::from_request_parts(&mut parts, &()).await;
        assert!(matches!(denied, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn admins_pass_every_capability_but_not_superadmin_only() {
        let mut parts = parts_for(Role::Admin, Permissions::default());
        assert!(RequirePermission::<PermPromo>::from_request_parts(&mut parts, &())
            .await
            .is_ok());
        assert!(RequireSuperAdmin::from_request_parts(&mut parts, &()).await.is_err());

        let mut parts = parts_for(Role::Superadmin, Permissions::default());
        assert!(RequireSuperAdmin::from_request_parts(&mut parts, &()).await.is_ok());
    }

    #[tokio::test]
    async fn missing_user_is_unauthenticated() {
        let (mut parts, _) = Request::builder().body(()).unwrap().into_parts();
        let result = RequirePermission::<PermRooms>::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AppError::InvalidToken)));
    }
}

// src/services/user_service.rs

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{CreateUserPayload, Permissions, Role, UpdateUserPayload, User},
    services::auth::hash_password,
};

/// Only a superadmin hands out the admin or superadmin role.
pub fn ensure_can_grant(actor: Role, granted: Role) -> Result<(), AppError> {
    if granted.is_admin() && actor != Role::Superadmin {
        return Err(AppError::Forbidden(format!(
            "Only a superadmin can grant the {} role.",
            granted.as_str()
        )));
    }
    Ok(())
}

pub fn ensure_not_self(actor: &User, target: Uuid) -> Result<(), AppError> {
    if actor.id == target {
        return Err(AppError::Forbidden("You cannot delete your own account.".into()));
    }
    Ok(())
}

/// Applies the non-secret fields of a patch. The password is handled by the caller.
pub fn apply_user_patch(user: &mut User, patch: &UpdateUserPayload) {
    if let Some(email) = &patch.email {
        user.email = email.trim().to_lowercase();
    }
    if let Some(name) = &patch.name {
        user.name = name.trim().to_string();
    }
    if let Some(role) = patch.role {
        user.role = role;
    }
    if let Some(permissions) = &patch.permissions {
        user.permissions = permissions.clone();
    }
    user.updated_at = Utc::now();
}

#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
}

impl UserService {
    pub fn new(user_repo: UserRepository) -> Self {
        Self { user_repo }
    }

    pub async fn list(&self) -> Result<Vec<User>, AppError> {
        self.user_repo.list().await
    }

    pub async fn create(&self, actor: &User, payload: CreateUserPayload) -> Result<User, AppError> {
        payload.validate()?;
        ensure_can_grant(actor.role, payload.role)?;
        let password_hash = hash_password(&payload.password).await?;
        self.user_repo
            .create(
                &payload.email.trim().to_lowercase(),
                &password_hash,
                payload.name.trim(),
                payload.role,
                &payload.permissions.unwrap_or_else(Permissions::default),
            )
            .await
    }

    pub async fn update(
        &self,
        actor: &User,
        id: Uuid,
        patch: UpdateUserPayload,
    ) -> Result<(User, User), AppError> {
        patch.validate()?;
        let before = self
            .user_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("User"))?;
        if let Some(role) = patch.role {
            ensure_can_grant(actor.role, role)?;
        }
        // Editing an administrator is itself an administrator-level grant
        ensure_can_grant(actor.role, before.role)?;

        let mut after = before.clone();
        apply_user_patch(&mut after, &patch);
        if let Some(password) = &patch.password {
            after.password_hash = hash_password(password).await?;
        }
        let saved = self
            .user_repo
            .update(&after)
            .await?
            .ok_or(AppError::NotFound("User"))?;
        Ok((before, saved))
    }

    pub async fn delete(&self, actor: &User, id: Uuid) -> Result<User, AppError> {
        ensure_not_self(actor, id)?;
        let target = self
            .user_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("User"))?;
        ensure_can_grant(actor.role, target.role)?;
        if !self.user_repo.delete(id).await? {
            return Err(AppError::NotFound("User"));
        }
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            email: "a@hotel.test".into(),
            password_hash: "hash".into(),
            name: "A".into(),
            role,
            permissions: Permissions::default(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn only_superadmin_grants_admin_roles() {
        assert!(ensure_can_grant(Role::Superadmin, Role::Admin).is_ok());
        assert!(ensure_can_grant(Role::Superadmin, Role::Superadmin).is_ok());
        assert!(ensure_can_grant(Role::Admin, Role::Staff).is_ok());
        assert!(matches!(
            ensure_can_grant(Role::Admin, Role::Admin),
            Err(AppError::Forbidden(_))
        ));
        assert!(ensure_can_grant(Role::Staff, Role::Superadmin).is_err());
    }

    #[test]
    fn nobody_deletes_themselves() {
        let me = user(Role::Superadmin);
        assert!(ensure_not_self(&me, me.id).is_err());
        assert!(ensure_not_self(&me, Uuid::new_v4()).is_ok());
    }

    #[test]
    fn patch_normalises_email_and_keeps_hash() {
        let mut u = user(Role::Staff);
        apply_user_patch(
            &mut u,
            &UpdateUserPayload {
                email: Some(" New@Hotel.Test ".into()),
                password: Some("changed".into()),
                ..Default::default()
            },
        );
        assert_eq!(u.email, "new@hotel.test");
        assert_eq!(u.password_hash, "hash");
        assert_eq!(u.role, Role::Staff);
    }
}

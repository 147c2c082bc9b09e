// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{AuthResponse, Claims, Permissions, Role, User, UserProfile},
};

pub async fn hash_password(password: &str) -> Result<String, AppError> {
    let password = password.to_owned();
    let hashed = tokio::task::spawn_blocking(move || hash(&password, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| anyhow::anyhow!("Hashing task failed: {}", e))??;
    Ok(hashed)
}

async fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    let password = password.to_owned();
    let password_hash = password_hash.to_owned();
    let valid = tokio::task::spawn_blocking(move || verify(&password, &password_hash))
        .await
        .map_err(|e| anyhow::anyhow!("Password check task failed: {}", e))??;
    Ok(valid)
}

/// Signs and checks bearer tokens.
#[derive(Clone)]
pub struct TokenKeys {
    secret: String,
    expiration_hours: i64,
}

impl TokenKeys {
    pub fn new(secret: String, expiration_hours: i64) -> Self {
        Self {
            secret,
            expiration_hours,
        }
    }

    pub fn create_token(&self, user: &User) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::hours(self.expiration_hours);
        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            role: user.role,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };
        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_ref()),
        )?)
    }

    pub fn decode_token(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_ref()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|_| AppError::InvalidToken)
    }
}

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    keys: TokenKeys,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, keys: TokenKeys) -> Self {
        Self { user_repo, keys }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, AppError> {
        let user = self
            .user_repo
            .find_by_email(&email.trim().to_lowercase())
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash).await? {
            tracing::warn!(email = %user.email, "failed login attempt");
            return Err(AppError::InvalidCredentials);
        }

        let token = self.keys.create_token(&user)?;
        Ok(AuthResponse {
            token,
            user: UserProfile::from(user),
        })
    }

    /// Resolves a bearer token into the user it was issued to. A token whose user
    /// has since been deleted is rejected like any other invalid token.
    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let claims = self.keys.decode_token(token)?;
        self.user_repo
            .find_by_id(claims.sub)
            .await?
            .ok_or(AppError::InvalidToken)
    }

    /// Creates the first superadmin when no administrator exists yet.
    pub async fn bootstrap_admin(&self, email: &str, password: &str) -> Result<(), AppError> {
        if self.user_repo.count_admins().await? > 0 {
            return Ok(());
        }
        let password_hash = hash_password(password).await?;
        let user = self
            .user_repo
            .create(
                &email.trim().to_lowercase(),
                &password_hash,
                "Administrator",
                Role::Superadmin,
                &Permissions::default(),
            )
            .await?;
        tracing::info!(email = %user.email, "bootstrap administrator created");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn user() -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            email: "staff@hotel.test".into(),
            password_hash: String::new(),
            name: "Staff".into(),
            role: Role::Staff,
            permissions: Permissions::default(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn token_round_trips_claims() {
        let keys = TokenKeys::new("secret".into(), 24);
        let user = user();
        let claims = keys.decode_token(&keys.create_token(&user).unwrap()).unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.role, Role::Staff);
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
    }

    #[test]
    fn foreign_or_expired_tokens_are_rejected() {
        let keys = TokenKeys::new("secret".into(), 24);
        let other = TokenKeys::new("other".into(), 24);
        let token = other.create_token(&user()).unwrap();
        assert!(matches!(keys.decode_token(&token), Err(AppError::InvalidToken)));

        let expired = TokenKeys::new("secret".into(), -2);
        let token = expired.create_token(&user()).unwrap();
        assert!(matches!(keys.decode_token(&token), Err(AppError::InvalidToken)));
        assert!(matches!(keys.decode_token("garbage"), Err(AppError::InvalidToken)));
    }

    #[tokio::test]
    async fn hashes_verify_only_the_original_password() {
        let hashed = hash_password("hunter22").await.unwrap();
        assert!(verify_password("hunter22", &hashed).await.unwrap());
        assert!(!verify_password("hunter23", &hashed).await.unwrap());
    }
}

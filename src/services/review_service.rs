// src/services/review_service.rs

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::ReviewRepository,
    models::review::{CreateReviewPayload, Review},
};

const PUBLIC_LIMIT: i64 = 50;
const ADMIN_LIMIT: i64 = 500;

#[derive(Clone)]
pub struct ReviewService {
    repo: ReviewRepository,
}

impl ReviewService {
    pub fn new(repo: ReviewRepository) -> Self {
        Self { repo }
    }

    /// New reviews stay hidden until a moderator approves them.
    pub async fn submit(&self, payload: CreateReviewPayload) -> Result<Review, AppError> {
        payload.validate()?;
        let review = Review::new(payload, Utc::now());
        self.repo.insert(&review).await
    }

    pub async fn list_visible(&self) -> Result<Vec<Review>, AppError> {
        self.repo.list(true, PUBLIC_LIMIT).await
    }

    pub async fn list_all(&self) -> Result<Vec<Review>, AppError> {
        self.repo.list(false, ADMIN_LIMIT).await
    }

    pub async fn set_visibility(&self, id: Uuid, is_visible: bool) -> Result<Review, AppError> {
        self.repo
            .set_visibility(id, is_visible)
            .await?
            .ok_or(AppError::NotFound("Review"))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.repo.delete(id).await? {
            return Err(AppError::NotFound("Review"));
        }
        Ok(())
    }
}

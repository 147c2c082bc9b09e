// src/models/review.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Review {
    pub id: Uuid,
    pub guest_name: String,
    pub guest_email: String,
    pub rating: i16,
    pub comment: String,
    pub reservation_id: Option<Uuid>,
    // Hidden until approved by staff
    pub is_visible: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReviewPayload {
    #[validate(length(min = 1, message = "Name is required."))]
    pub guest_name: String,
    #[validate(email(message = "The e-mail address is invalid."))]
    pub guest_email: String,
    // Clamped into 1..=5
    pub rating: i16,
    #[validate(length(min = 1, message = "Comment is required."))]
    pub comment: String,
    pub reservation_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct VisibilityPayload {
    pub is_visible: bool,
}

impl Review {
    pub fn new(payload: CreateReviewPayload, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            guest_name: payload.guest_name,
            guest_email: payload.guest_email.trim().to_lowercase(),
            rating: payload.rating.clamp(1, 5),
            comment: payload.comment,
            reservation_id: payload.reservation_id,
            is_visible: false,
            created_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_reviews_are_hidden_and_rating_is_clamped() {
        let review = Review::new(
            CreateReviewPayload {
                guest_name: "Ana".into(),
                guest_email: "Ana@Mail.com".into(),
                rating: 9,
                comment: "Lovely stay".into(),
                reservation_id: None,
            },
            Utc::now(),
        );
        assert!(!review.is_visible);
        assert_eq!(review.rating, 5);
        assert_eq!(review.guest_email, "ana@mail.com");
    }
}

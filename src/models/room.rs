// src/models/room.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

// --- Room type (the bookable product) ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct RoomType {
    pub id: Uuid,
    #[schema(example = "Deluxe Room")]
    pub name: String,
    pub description: String,
    #[schema(example = "1200000")]
    pub base_price: Decimal,
    #[schema(example = 2)]
    pub max_guests: i32,
    pub amenities: Vec<String>,
    // Ordered, with image_alts kept parallel to it
    pub images: Vec<String>,
    pub image_alts: Vec<String>,
    pub video_url: String,
    pub is_active: bool,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub(crate) fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("Value cannot be negative.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateRoomPayload {
    #[validate(length(min = 1, message = "Name is required."))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[validate(custom(function = "validate_not_negative"))]
    pub base_price: Decimal,
    #[validate(range(min = 1, message = "A room must host at least one guest."))]
    pub max_guests: i32,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub image_alts: Vec<String>,
    #[serde(default)]
    pub video_url: String,
    pub display_order: Option<i32>,
}

/// Partial update: absent fields keep their stored value.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateRoomPayload {
    #[validate(length(min = 1, message = "Name cannot be empty."))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(custom(function = "validate_not_negative"))]
    pub base_price: Option<Decimal>,
    #[validate(range(min = 1, message = "A room must host at least one guest."))]
    pub max_guests: Option<i32>,
    pub amenities: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
    pub image_alts: Option<Vec<String>>,
    pub video_url: Option<String>,
    pub is_active: Option<bool>,
    pub display_order: Option<i32>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ReorderRoomsPayload {
    pub room_ids: Vec<Uuid>,
}

impl RoomType {
    pub fn new(payload: CreateRoomPayload, now: DateTime<Utc>) -> Self {
        let mut room = Self {
            id: Uuid::new_v4(),
            name: payload.name,
            description: payload.description,
            base_price: payload.base_price,
            max_guests: payload.max_guests,
            amenities: payload.amenities,
            images: payload.images,
            image_alts: payload.image_alts,
            video_url: payload.video_url,
            is_active: true,
            display_order: payload.display_order.unwrap_or(0),
            created_at: now,
            updated_at: now,
        };
        room.normalize();
        room
    }

    pub fn apply(&mut self, patch: UpdateRoomPayload, now: DateTime<Utc>) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(base_price) = patch.base_price {
            self.base_price = base_price;
        }
        if let Some(max_guests) = patch.max_guests {
            self.max_guests = max_guests;
        }
        if let Some(amenities) = patch.amenities {
            self.amenities = amenities;
        }
        if let Some(images) = patch.images {
            self.images = images;
        }
        if let Some(image_alts) = patch.image_alts {
            self.image_alts = image_alts;
        }
        if let Some(video_url) = patch.video_url {
            self.video_url = video_url;
        }
        if let Some(is_active) = patch.is_active {
            self.is_active = is_active;
        }
        if let Some(display_order) = patch.display_order {
            self.display_order = display_order;
        }
        self.updated_at = now;
        self.normalize();
    }

    /// Amenities behave as a set (first occurrence wins) and alt texts always
    /// line up with the image list.
    fn normalize(&mut self) {
        let mut seen = std::collections::HashSet::new();
        self.amenities.retain(|a| {
            let trimmed = a.trim();
            !trimmed.is_empty() && seen.insert(trimmed.to_lowercase())
        });
        self.image_alts.resize(self.images.len(), String::new());
    }
}

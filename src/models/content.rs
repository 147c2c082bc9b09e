// src/models/content.rs

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::error::AppError;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct SiteContent {
    pub id: Uuid,
    #[schema(example = "home")]
    pub page: String,
    #[schema(example = "hero")]
    pub section: String,
    pub content_type: String,
    #[schema(value_type = Object)]
    pub content: Value,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpsertContentPayload {
    #[validate(length(min = 1, max = 100, message = "Page is required."))]
    pub page: String,
    #[validate(length(min = 1, max = 100, message = "Section is required."))]
    pub section: String,
    #[serde(default)]
    pub content_type: String,
    #[schema(value_type = Object)]
    pub content: Value,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateContentPayload {
    pub content_type: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub content: Option<Value>,
}

// --- Typed section shapes ---

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HeroSection {
    pub title: String,
    pub subtitle: String,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactSection {
    // Digits only, international format without "+"
    pub number: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FooterSection {
    pub address: String,
    pub phone: String,
    pub email: String,
    pub whatsapp: String,
    pub instagram: String,
    pub facebook: String,
    pub tiktok: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PromoBannerSection {
    pub title: String,
    pub description: String,
    pub image: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GalleryItem {
    pub url: String,
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub order: u32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct PaymentDetails {
    pub bank_name: String,
    pub account_number: String,
    pub account_holder: String,
    pub show: bool,
}

/// Admin-editable confirmation e-mail. `{booking_code}`, `{guest_name}` and
/// `{nights}` placeholders are filled in when rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct EmailTemplateConfig {
    pub subject_template: String,
    pub header_text_top: String,
    pub header_text_bottom: String,
    pub greeting_template: String,
    pub intro_text: String,
    pub labels: BTreeMap<String, String>,
    pub payment_details: PaymentDetails,
    pub important_notes_list: Vec<String>,
    pub cancellation_policy_list: Vec<String>,
    pub footer_address: String,
    pub show_payment: bool,
    pub show_policy: bool,
}

impl Default for EmailTemplateConfig {
    fn default() -> Self {
        let labels = [
            ("reservation_number", "RESERVATION NUMBER"),
            ("status", "STATUS"),
            ("check_in", "CHECK-IN"),
            ("check_out", "CHECK-OUT"),
            ("guests", "GUESTS"),
            ("stay", "STAY"),
            ("reservation_under", "RESERVED BY"),
            ("contact", "CONTACT"),
            ("room_details", "Room Details"),
            ("room_type", "Room Type:"),
            ("rate_plan", "Package:"),
            ("special_req", "Special Requests:"),
            ("room_charge", "Room charge ({nights} nights)"),
            ("discount", "Discount"),
            ("total_amount", "Total Amount"),
            ("payment_info", "Please transfer the payment to:"),
            ("bank", "Bank:"),
            ("account", "Account No.:"),
            ("holder", "Account Holder:"),
            ("important_notes", "Important Notes:"),
            ("cancellation_policy", "Cancellation Policy"),
            ("whatsapp", "Contact us on WhatsApp"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            subject_template: "Reservation Confirmation - {booking_code}".into(),
            header_text_top: "SPENCER GREEN HOTEL".into(),
            header_text_bottom: "Batu, East Java".into(),
            greeting_template: "Hi {guest_name}!".into(),
            intro_text: "Thank you for choosing us. Here are your booking details.".into(),
            labels,
            payment_details: PaymentDetails::default(),
            important_notes_list: vec![
                "Payment must be completed within 24 hours.".into(),
                "Please send the transfer receipt via WhatsApp or e-mail.".into(),
            ],
            cancellation_policy_list: vec!["No-shows are non-refundable.".into()],
            footer_address: String::new(),
            show_payment: true,
            show_policy: true,
        }
    }
}

impl EmailTemplateConfig {
    pub fn label<'a>(&'a self, key: &str, fallback: &'a str) -> &'a str {
        self.labels.get(key).map(String::as_str).unwrap_or(fallback)
    }
}

pub const EMAIL_PAGE: &str = "email";
pub const EMAIL_TEMPLATE_SECTION: &str = "reservation_conf";
pub const GLOBAL_PAGE: &str = "global";
pub const CONTACT_SECTION: &str = "contact";

/// Content of one `(page, section)` document. Known sections carry a typed
/// shape; anything else is kept as a free-form JSON object.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionContent {
    Hero(HeroSection),
    Contact(ContactSection),
    Footer(FooterSection),
    PromoBanner(PromoBannerSection),
    GalleryItem { index: u32, item: GalleryItem },
    EmailTemplate(Box<EmailTemplateConfig>),
    Generic(serde_json::Map<String, Value>),
}

fn typed<T: DeserializeOwned>(value: Value, what: &'static str) -> Result<T, AppError> {
    serde_json::from_value(value)
        .map_err(|e| AppError::InvalidInput(format!("Invalid {} content: {}", what, e)))
}

impl SectionContent {
    pub fn parse(page: &str, section: &str, value: Value) -> Result<Self, AppError> {
        if !value.is_object() {
            return Err(AppError::field("content", "Content must be a JSON object."));
        }
        let parsed = match (page, section) {
            // Every public page reuses the hero shape
            (_, "hero") => SectionContent::Hero(typed(value, "hero")?),
            (GLOBAL_PAGE, CONTACT_SECTION) => SectionContent::Contact(typed(value, "contact")?),
            (GLOBAL_PAGE, "footer") => SectionContent::Footer(typed(value, "footer")?),
            ("home", "promo_banner") => {
                SectionContent::PromoBanner(typed(value, "promo banner")?)
            }
            (EMAIL_PAGE, EMAIL_TEMPLATE_SECTION) => {
                SectionContent::EmailTemplate(Box::new(typed(value, "e-mail template")?))
            }
            ("gallery", s) if gallery_index(s).is_some() => SectionContent::GalleryItem {
                index: gallery_index(s).unwrap_or_default(),
                item: typed(value, "gallery item")?,
            },
            _ => SectionContent::Generic(match value {
                Value::Object(map) => map,
                _ => serde_json::Map::new(),
            }),
        };
        Ok(parsed)
    }

    pub fn is_email_template(&self) -> bool {
        matches!(self, SectionContent::EmailTemplate(_))
    }

    pub fn into_value(self) -> Value {
        let value = match self {
            SectionContent::Hero(v) => serde_json::to_value(v),
            SectionContent::Contact(v) => serde_json::to_value(v),
            SectionContent::Footer(v) => serde_json::to_value(v),
            SectionContent::PromoBanner(v) => serde_json::to_value(v),
            SectionContent::GalleryItem { item, .. } => serde_json::to_value(item),
            SectionContent::EmailTemplate(v) => serde_json::to_value(*v),
            SectionContent::Generic(map) => Ok(Value::Object(map)),
        };
        // Plain structs of strings, lists and maps always serialize
        value.unwrap_or(Value::Null)
    }
}

fn gallery_index(section: &str) -> Option<u32> {
    section.strip_prefix("gallery_item_")?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn known_sections_are_typed() {
        let hero = SectionContent::parse("home", "hero", json!({ "title": "Welcome" })).unwrap();
        assert!(matches!(hero, SectionContent::Hero(ref h) if h.title == "Welcome"));

        let item =
            SectionContent::parse("gallery", "gallery_item_3", json!({ "url": "a.jpg" })).unwrap();
        assert!(matches!(item, SectionContent::GalleryItem { index: 3, .. }));

        let other = SectionContent::parse("about", "story", json!({ "anything": [1, 2] })).unwrap();
        assert!(matches!(other, SectionContent::Generic(_)));
    }

    #[test]
    fn typed_section_rejects_wrong_shape() {
        let err = SectionContent::parse("home", "hero", json!({ "title": 42 })).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));

        let err = SectionContent::parse("global", "contact", json!({})).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));

        let err = SectionContent::parse("home", "story", json!("text")).unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[test]
    fn email_template_fills_missing_fields_with_defaults() {
        let parsed = SectionContent::parse(
            EMAIL_PAGE,
            EMAIL_TEMPLATE_SECTION,
            json!({ "subject_template": "Booking {booking_code}" }),
        )
        .unwrap();
        let SectionContent::EmailTemplate(config) = parsed else {
            panic!("expected the e-mail template");
        };
        assert_eq!(config.subject_template, "Booking {booking_code}");
        assert!(config.show_payment);
        assert_eq!(config.label("total_amount", "x"), "Total Amount");
    }
}

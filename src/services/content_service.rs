// src/services/content_service.rs

use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::ContentRepository,
    models::{
        auth::{Capability, User},
        content::{SectionContent, SiteContent, UpdateContentPayload, UpsertContentPayload},
    },
};

/// Editing a section needs `content`; the gallery also accepts `gallery`, and the
/// confirmation e-mail template additionally needs `email_config`.
pub fn ensure_can_edit(user: &User, page: &str, section: &str, parsed: &SectionContent) -> Result<(), AppError> {
    let allowed = if parsed.is_email_template() {
        user.can(Capability::Content) && user.can(Capability::EmailConfig)
    } else if page == "gallery" {
        user.can(Capability::Content) || user.can(Capability::Gallery)
    } else {
        user.can(Capability::Content)
    };
    if !allowed {
        return Err(AppError::Forbidden(format!(
            "You are not allowed to edit {}/{}.",
            page, section
        )));
    }
    Ok(())
}

fn content_type_for(payload_type: &str, parsed: &SectionContent) -> String {
    if !payload_type.trim().is_empty() {
        return payload_type.trim().to_string();
    }
    match parsed {
        SectionContent::Hero(_) => "hero",
        SectionContent::Contact(_) => "whatsapp",
        SectionContent::Footer(_) => "footer",
        SectionContent::PromoBanner(_) => "promo_banner",
        SectionContent::GalleryItem { .. } => "gallery_item",
        SectionContent::EmailTemplate(_) => "email_template",
        SectionContent::Generic(_) => "json",
    }
    .to_string()
}

#[derive(Clone)]
pub struct ContentService {
    repo: ContentRepository,
}

impl ContentService {
    pub fn new(repo: ContentRepository) -> Self {
        Self { repo }
    }

    pub async fn list(&self, page: Option<&str>) -> Result<Vec<SiteContent>, AppError> {
        self.repo.list(page).await
    }

    pub async fn get(&self, page: &str, section: &str) -> Result<SiteContent, AppError> {
        self.repo
            .find(page, section)
            .await?
            .ok_or(AppError::NotFound("Content"))
    }

    /// Creates or replaces the document at `(page, section)`. Returns the previous
    /// version when there was one.
    pub async fn upsert(
        &self,
        user: &User,
        payload: UpsertContentPayload,
    ) -> Result<(Option<SiteContent>, SiteContent), AppError> {
        payload.validate()?;
        let page = payload.page.trim();
        let section = payload.section.trim();
        let parsed = SectionContent::parse(page, section, payload.content)?;
        ensure_can_edit(user, page, section, &parsed)?;

        let before = self.repo.find(page, section).await?;
        let content_type = content_type_for(&payload.content_type, &parsed);
        let saved = self
            .repo
            .upsert(page, section, &content_type, &parsed.into_value())
            .await?;
        Ok((before, saved))
    }

    pub async fn update(
        &self,
        user: &User,
        id: Uuid,
        payload: UpdateContentPayload,
    ) -> Result<(SiteContent, SiteContent), AppError> {
        let before = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Content"))?;
        let content = payload.content.unwrap_or_else(|| before.content.clone());
        let parsed = SectionContent::parse(&before.page, &before.section, content)?;
        ensure_can_edit(user, &before.page, &before.section, &parsed)?;

        let content_type = payload
            .content_type
            .unwrap_or_else(|| before.content_type.clone());
        let saved = self
            .repo
            .update(id, &content_type, &parsed.into_value())
            .await?
            .ok_or(AppError::NotFound("Content"))?;
        Ok((before, saved))
    }

    pub async fn delete(&self, user: &User, page: &str, section: &str) -> Result<SiteContent, AppError> {
        let existing = self.get(page, section).await?;
        let parsed = SectionContent::parse(page, section, existing.content.clone())
            .unwrap_or(SectionContent::Generic(serde_json::Map::new()));
        ensure_can_edit(user, page, section, &parsed)?;
        if !self.repo.delete(page, section).await? {
            return Err(AppError::NotFound("Content"));
        }
        Ok(existing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::{Permissions, Role};
    use chrono::Utc;
    use serde_json::json;

    fn staff(permissions: Permissions) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            email: "s@hotel.test".into(),
            password_hash: String::new(),
            name: "S".into(),
            role: Role::Staff,
            permissions,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn email_template_needs_both_capabilities() {
        let template = SectionContent::parse("email", "reservation_conf", json!({})).unwrap();
        let content_only = staff(Permissions {
            content: true,
            ..Default::default()
        });
        assert!(ensure_can_edit(&content_only, "email", "reservation_conf", &template).is_err());

        let both = staff(Permissions {
            content: true,
            email_config: true,
            ..Default::default()
        });
        assert!(ensure_can_edit(&both, "email", "reservation_conf", &template).is_ok());
    }

    #[test]
    fn gallery_accepts_gallery_permission() {
        let item = SectionContent::parse("gallery", "gallery_item_1", json!({ "url": "a.jpg" })).unwrap();
        let gallery = staff(Permissions {
            gallery: true,
            ..Default::default()
        });
        assert!(ensure_can_edit(&gallery, "gallery", "gallery_item_1", &item).is_ok());

        let hero = SectionContent::parse("home", "hero", json!({ "title": "Hi" })).unwrap();
        assert!(matches!(
            ensure_can_edit(&gallery, "home", "hero", &hero),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn content_type_defaults_from_the_shape() {
        let contact = SectionContent::parse("global", "contact", json!({ "number": "62811" })).unwrap();
        assert_eq!(content_type_for("", &contact), "whatsapp");
        assert_eq!(content_type_for(" text ", &contact), "text");
    }
}

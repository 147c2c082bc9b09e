// src/services/promo_service.rs

use chrono::{NaiveDate, Utc};
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::{
    common::error::AppError,
    db::Stores,
    models::promo::{
        CreatePromoPayload, PromoCode, PromoRejection, UpdatePromoPayload, normalize_code,
    },
};

const UNKNOWN_CODE: &str = "Promo code not found or no longer active.";

#[derive(Clone)]
pub struct PromoService {
    stores: Stores,
}

impl PromoService {
    pub fn new(stores: Stores) -> Self {
        Self { stores }
    }

    pub async fn list(&self) -> Result<Vec<PromoCode>, AppError> {
        self.stores.promos.list_promos().await
    }

    pub async fn get(&self, id: Uuid) -> Result<PromoCode, AppError> {
        self.stores
            .promos
            .find_promo(id)
            .await?
            .ok_or(AppError::NotFound("Promo code"))
    }

    pub async fn create(&self, payload: CreatePromoPayload) -> Result<PromoCode, AppError> {
        payload.validate()?;
        let promo = PromoCode::new(payload, Utc::now());
        if promo.code.is_empty() {
            return Err(AppError::field("code", "Code is required."));
        }
        self.stores.promos.insert_promo(&promo).await
    }

    pub async fn update(
        &self,
        id: Uuid,
        patch: UpdatePromoPayload,
    ) -> Result<(PromoCode, PromoCode), AppError> {
        patch.validate()?;
        let before = self.get(id).await?;
        let mut after = before.clone();
        after.apply(patch, Utc::now()).map_err(|e| {
            let mut errors = ValidationErrors::new();
            errors.add("__all__", e);
            AppError::ValidationError(errors)
        })?;
        let saved = self
            .stores
            .promos
            .update_promo(&after)
            .await?
            .ok_or(AppError::NotFound("Promo code"))?;
        Ok((before, saved))
    }

    pub async fn delete(&self, id: Uuid) -> Result<PromoCode, AppError> {
        let promo = self.get(id).await?;
        if !self.stores.promos.delete_promo(id).await? {
            return Err(AppError::NotFound("Promo code"));
        }
        Ok(promo)
    }

    /// Pure check: never touches the usage counter.
    pub async fn verify(&self, code: &str, check_in: NaiveDate) -> Result<PromoCode, AppError> {
        let code = normalize_code(code);
        if code.is_empty() {
            return Err(AppError::field("code", "Code is required."));
        }
        let promo = self
            .stores
            .promos
            .find_by_code(&code)
            .await?
            .ok_or_else(|| AppError::InvalidPromo(UNKNOWN_CODE.into()))?;
        promo.check(check_in).map_err(rejected)?;
        Ok(promo)
    }

    /// Takes one use of the code. The conditional increment in the store decides
    /// races between concurrent bookings.
    pub async fn consume(&self, promo: &PromoCode) -> Result<PromoCode, AppError> {
        let consumed = self
            .stores
            .promos
            .consume_usage(promo.id)
            .await?
            .ok_or_else(|| rejected(PromoRejection::UsageExhausted))?;
        tracing::info!(
            code = %consumed.code,
            usage = consumed.current_usage,
            max = consumed.max_usage,
            "promo code usage consumed"
        );
        Ok(consumed)
    }

    pub async fn release(&self, promo: &PromoCode) {
        if let Err(e) = self.stores.promos.release_usage(promo.id).await {
            tracing::error!(code = %promo.code, "failed to release promo usage: {:?}", e);
        }
    }
}

fn rejected(reason: PromoRejection) -> AppError {
    AppError::InvalidPromo(reason.message().into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{db::memory::MemoryStore, models::promo::DiscountType};
    use rust_decimal::Decimal;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    fn payload(code: &str, max_usage: i32) -> CreatePromoPayload {
        CreatePromoPayload {
            code: code.into(),
            discount_type: DiscountType::Percent,
            discount_value: Decimal::from(10),
            max_usage,
            room_type_ids: vec![],
            valid_days: vec![],
            valid_from: date(1, 1),
            valid_until: date(6, 30),
            is_active: true,
        }
    }

    #[tokio::test]
    async fn verification_is_case_insensitive_and_free() {
        let store = MemoryStore::new();
        let service = PromoService::new(store.stores());
        let promo = service.create(payload("spring", 1)).await.unwrap();
        assert_eq!(promo.code, "SPRING");

        service.verify(" Spring ", date(3, 1)).await.unwrap();
        service.verify("spring", date(3, 1)).await.unwrap();
        assert_eq!(service.get(promo.id).await.unwrap().current_usage, 0);
    }

    #[tokio::test]
    async fn unknown_and_out_of_window_codes_are_rejected() {
        let service = PromoService::new(MemoryStore::new().stores());
        service.create(payload("SPRING", 5)).await.unwrap();

        assert!(matches!(
            service.verify("NOPE", date(3, 1)).await,
            Err(AppError::InvalidPromo(_))
        ));
        let err = service.verify("SPRING", date(7, 1)).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidPromo(ref m) if m == PromoRejection::OutsideWindow.message()));
    }

    #[tokio::test]
    async fn duplicate_codes_conflict() {
        let service = PromoService::new(MemoryStore::new().stores());
        service.create(payload("SPRING", 5)).await.unwrap();
        assert!(matches!(
            service.create(payload("spring", 5)).await,
            Err(AppError::PromoCodeAlreadyExists(_))
        ));
    }

    #[tokio::test]
    async fn last_use_goes_to_exactly_one_of_two_concurrent_bookings() {
        let service = PromoService::new(MemoryStore::new().stores());
        let promo = service.create(payload("ONCE", 1)).await.unwrap();

        // Both pass the read-only check before either consumes
        let a = service.verify("ONCE", date(3, 1)).await.unwrap();
        let b = service.verify("ONCE", date(3, 1)).await.unwrap();

        let (first, second) = tokio::join!(service.consume(&a), service.consume(&b));
        assert_eq!(
            [first.is_ok(), second.is_ok()].iter().filter(|ok| **ok).count(),
            1
        );
        assert_eq!(service.get(promo.id).await.unwrap().current_usage, 1);

        service.release(&promo).await;
        assert_eq!(service.get(promo.id).await.unwrap().current_usage, 0);
    }

    #[tokio::test]
    async fn update_rechecks_merged_rules() {
        let service = PromoService::new(MemoryStore::new().stores());
        let promo = service.create(payload("SPRING", 5)).await.unwrap();
        let result = service
            .update(
                promo.id,
                UpdatePromoPayload {
                    discount_value: Some(Decimal::from(150)),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));

        let (_, saved) = service
            .update(
                promo.id,
                UpdatePromoPayload {
                    code: Some("summer".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(saved.code, "SUMMER");
    }
}

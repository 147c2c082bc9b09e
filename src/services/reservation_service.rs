// src/services/reservation_service.rs

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::Stores,
    models::{
        inventory::ResolvedDay,
        promo::PromoCode,
        reservation::{
            CheckReservationQuery, CreateReservationPayload, QuoteRequest, Reservation,
            ReservationFilter, ReservationStatus, StayQuote, generate_booking_code,
        },
    },
    services::{
        email::ReservationNotifier,
        inventory_service::{InventoryService, check_window, first_blocked},
        pricing::quote_stay,
        promo_service::PromoService,
        rate_plan_service::RatePlanService,
    },
};

const CHECK_LIMIT: i64 = 10;

/// Booking behaviour that comes from configuration.
#[derive(Debug, Clone)]
pub struct BookingPolicy {
    pub code_prefix: String,
    pub consume_allotment: bool,
}

impl Default for BookingPolicy {
    fn default() -> Self {
        Self {
            code_prefix: "SGH".into(),
            consume_allotment: false,
        }
    }
}

// A priced stay plus what is needed to commit it
struct PreparedStay {
    quote: StayQuote,
    nights: Vec<ResolvedDay>,
    promo: Option<PromoCode>,
}

#[derive(Clone)]
pub struct ReservationService {
    stores: Stores,
    inventory: InventoryService,
    rate_plans: RatePlanService,
    promos: PromoService,
    notifier: Arc<dyn ReservationNotifier>,
    policy: BookingPolicy,
}

impl ReservationService {
    pub fn new(
        stores: Stores,
        notifier: Arc<dyn ReservationNotifier>,
        policy: BookingPolicy,
    ) -> Self {
        Self {
            inventory: InventoryService::new(stores.clone()),
            rate_plans: RatePlanService::new(stores.clone()),
            promos: PromoService::new(stores.clone()),
            stores,
            notifier,
            policy,
        }
    }

    async fn prepare(&self, req: &QuoteRequest) -> Result<PreparedStay, AppError> {
        req.validate()?;
        if req.check_out <= req.check_in {
            return Err(AppError::InvalidRange {
                start: req.check_in,
                end: req.check_out,
            });
        }
        check_window(req.check_in, req.check_out, false)?;

        let room = self
            .stores
            .rooms
            .find_room(req.room_type_id)
            .await?
            .filter(|r| r.is_active)
            .ok_or(AppError::NotFound("Room type"))?;
        if req.guests > room.max_guests {
            return Err(AppError::field(
                "guests",
                "Too many guests for the selected room.",
            ));
        }

        let plan = self
            .rate_plans
            .resolve_for_booking(&req.rate_plan_id, room.id)
            .await?;
        let promo = match req.promo_code.as_deref().map(str::trim) {
            Some(code) if !code.is_empty() => Some(self.promos.verify(code, req.check_in).await?),
            _ => None,
        };

        let nights = self
            .inventory
            .stay_nights(&room, req.check_in, req.check_out)
            .await?;
        if let Some(date) = first_blocked(&nights) {
            return Err(AppError::RoomUnavailable { date });
        }

        let quote = quote_stay(&room, &nights, plan.as_ref(), promo.as_ref());
        Ok(PreparedStay {
            quote,
            nights,
            promo,
        })
    }

    /// Prices a stay without booking it or touching promo usage.
    pub async fn quote(&self, req: &QuoteRequest) -> Result<StayQuote, AppError> {
        Ok(self.prepare(req).await?.quote)
    }

    pub async fn create(&self, payload: CreateReservationPayload) -> Result<Reservation, AppError> {
        payload.validate()?;
        let stay = self.prepare(&QuoteRequest::from(&payload)).await?;

        // A promo that did not change the price is not charged a use
        let consumed = match (&stay.promo, &stay.quote.promo_code) {
            (Some(promo), Some(_)) => Some(self.promos.consume(promo).await?),
            _ => None,
        };

        let now = Utc::now();
        let code = generate_booking_code(&self.policy.code_prefix, now.date_naive());
        let reservation = Reservation::from_quote(stay.quote, payload, code, now);

        let saved = match self.stores.reservations.insert_reservation(&reservation).await {
            Ok(saved) => saved,
            Err(e) => {
                if let Some(promo) = &consumed {
                    self.promos.release(promo).await;
                }
                return Err(e);
            }
        };

        if self.policy.consume_allotment {
            if let Err(e) = self.inventory.consume_allotment(&stay.nights).await {
                tracing::warn!(
                    booking_code = %saved.booking_code,
                    "reservation saved but allotment not decremented: {:?}",
                    e
                );
            }
        }

        tracing::info!(
            booking_code = %saved.booking_code,
            room_type_id = %saved.room_type_id,
            nights = saved.nights,
            total = %saved.total_amount,
            "reservation created"
        );

        let notifier = Arc::clone(&self.notifier);
        let to_notify = saved.clone();
        tokio::spawn(async move {
            if let Err(e) = notifier.send_confirmation(&to_notify).await {
                tracing::error!(
                    booking_code = %to_notify.booking_code,
                    "confirmation e-mail failed: {}",
                    e
                );
            }
        });

        Ok(saved)
    }

    /// Guest self-service lookup by booking code and/or e-mail.
    pub async fn check(&self, query: &CheckReservationQuery) -> Result<Vec<Reservation>, AppError> {
        let code = query
            .booking_code
            .as_deref()
            .map(|c| c.trim().to_uppercase())
            .filter(|c| !c.is_empty());
        let email = query
            .email
            .as_deref()
            .map(|e| e.trim().to_lowercase())
            .filter(|e| !e.is_empty());
        if code.is_none() && email.is_none() {
            return Err(AppError::field(
                "booking_code",
                "Provide a booking code or an e-mail address.",
            ));
        }
        self.stores
            .reservations
            .lookup_reservations(code.as_deref(), email.as_deref(), CHECK_LIMIT)
            .await
    }

    pub async fn list(&self, filter: &ReservationFilter) -> Result<Vec<Reservation>, AppError> {
        self.stores.reservations.list_reservations(filter).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Reservation, AppError> {
        self.stores
            .reservations
            .find_reservation(id)
            .await?
            .ok_or(AppError::NotFound("Reservation"))
    }

    /// Moves a reservation along the status machine. The store only applies the
    /// change if the status is still the one the transition was checked against.
    pub async fn update_status(
        &self,
        id: Uuid,
        next: ReservationStatus,
    ) -> Result<(Reservation, Reservation), AppError> {
        let before = self.get(id).await?;
        if !before.status.can_transition_to(next) {
            return Err(AppError::InvalidStatusTransition {
                from: before.status,
                to: next,
            });
        }
        match self
            .stores
            .reservations
            .set_status(id, before.status, next, Utc::now())
            .await?
        {
            Some(after) => Ok((before, after)),
            None => {
                let current = self.get(id).await?;
                Err(AppError::InvalidStatusTransition {
                    from: current.status,
                    to: next,
                })
            }
        }
    }

    /// Sends the confirmation again and waits for the outcome.
    pub async fn resend_confirmation(&self, id: Uuid) -> Result<Reservation, AppError> {
        let reservation = self.get(id).await?;
        self.notifier
            .send_confirmation(&reservation)
            .await
            .map_err(|e| match e {
                AppError::ExternalService(_) => e,
                other => AppError::ExternalService(other.to_string()),
            })?;
        Ok(reservation)
    }

    pub async fn delete(&self, id: Uuid) -> Result<Reservation, AppError> {
        let reservation = self.get(id).await?;
        if !self.stores.reservations.delete_reservation(id).await? {
            return Err(AppError::NotFound("Reservation"));
        }
        Ok(reservation)
    }
}

// src/services/pricing.rs
//
// Stay price: sum of resolved nightly rates, then the rate plan, then the promo.

use rust_decimal::Decimal;

use crate::models::{
    inventory::ResolvedDay,
    promo::PromoCode,
    rate_plan::RatePlan,
    reservation::{STANDARD_RATE_NAME, StayQuote},
    room::RoomType,
};

pub fn quote_stay(
    room: &RoomType,
    nights: &[ResolvedDay],
    plan: Option<&RatePlan>,
    promo: Option<&PromoCode>,
) -> StayQuote {
    let nightly_rates: Vec<Decimal> = nights.iter().map(|n| n.day.rate).collect();

    let subtotal = match plan {
        Some(plan) => {
            nightly_rates
                .iter()
                .map(|rate| plan.nightly_price(*rate))
                .sum::<Decimal>()
                + plan.stay_adjustment()
        }
        None => nightly_rates.iter().copied().sum(),
    }
    .max(Decimal::ZERO)
    .round_dp(2);

    let total_amount = match promo {
        Some(promo) => promo.discounted_price(room.id, subtotal).round_dp(2),
        None => subtotal,
    };

    let count = nightly_rates.len() as i32;
    let rate_per_night = if count > 0 {
        (subtotal / Decimal::from(count)).round_dp(2)
    } else {
        Decimal::ZERO
    };

    StayQuote {
        room_type_id: room.id,
        room_type_name: room.name.clone(),
        check_in: nights.first().map(|n| n.day.date).unwrap_or_default(),
        check_out: nights
            .last()
            .map(|n| n.day.date + chrono::Duration::days(1))
            .unwrap_or_default(),
        nights: count,
        nightly_rates,
        rate_plan_id: plan.map(|p| p.id),
        rate_plan_name: plan
            .map(|p| p.name.clone())
            .unwrap_or_else(|| STANDARD_RATE_NAME.to_string()),
        subtotal,
        rate_per_night,
        // Only recorded when it actually changed the price
        promo_code: promo
            .filter(|p| p.covers_room(room.id))
            .map(|p| p.code.clone()),
        discount_amount: subtotal - total_amount,
        total_amount,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{
            promo::{CreatePromoPayload, DiscountType},
            rate_plan::{CreateRatePlanPayload, ModifierType},
            room::CreateRoomPayload,
        },
        services::inventory_service::resolve_range,
    };
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    fn room() -> RoomType {
        RoomType::new(
            CreateRoomPayload {
                name: "Deluxe".into(),
                description: String::new(),
                base_price: Decimal::from(500_000),
                max_guests: 2,
                amenities: vec![],
                images: vec![],
                image_alts: vec![],
                video_url: String::new(),
                display_order: None,
            },
            Utc::now(),
        )
    }

    fn plan(kind: ModifierType, val: i64) -> RatePlan {
        RatePlan::new(
            CreateRatePlanPayload {
                room_type_id: None,
                name: "Breakfast Included".into(),
                description: String::new(),
                price_modifier_type: kind,
                price_modifier_val: Decimal::from(val),
                is_active: true,
                conditions: vec![],
            },
            Utc::now(),
        )
    }

    fn promo(kind: DiscountType, val: i64, rooms: Vec<Uuid>) -> PromoCode {
        PromoCode::new(
            CreatePromoPayload {
                code: "save".into(),
                discount_type: kind,
                discount_value: Decimal::from(val),
                max_usage: 10,
                room_type_ids: rooms,
                valid_days: vec![],
                valid_from: date(1, 1),
                valid_until: date(12, 31),
                is_active: true,
            },
            Utc::now(),
        )
    }

    #[test]
    fn default_rate_then_plan_then_promo() {
        let room = room();
        let nights = resolve_range(&room, date(3, 1), date(3, 2), &[]);
        let plan = plan(ModifierType::Percent, -10);
        let promo = promo(DiscountType::Fixed, 50_000, vec![]);

        let base = quote_stay(&room, &nights, None, None);
        assert_eq!(base.total_amount, Decimal::from(500_000));
        assert_eq!(base.rate_plan_name, STANDARD_RATE_NAME);

        let with_plan = quote_stay(&room, &nights, Some(&plan), None);
        assert_eq!(with_plan.total_amount, Decimal::from(450_000));

        let quote = quote_stay(&room, &nights, Some(&plan), Some(&promo));
        assert_eq!(quote.subtotal, Decimal::from(450_000));
        assert_eq!(quote.total_amount, Decimal::from(400_000));
        assert_eq!(quote.discount_amount, Decimal::from(50_000));
        assert_eq!(quote.promo_code.as_deref(), Some("SAVE"));
        assert_eq!(quote.check_out, date(3, 2));
    }

    #[test]
    fn absolute_total_is_added_once_whatever_the_length() {
        let room = room();
        let extra = plan(ModifierType::AbsoluteTotal, 120_000);
        for n in [1, 3, 7] {
            let nights = resolve_range(&room, date(3, 1), date(3, 1 + n), &[]);
            let without = quote_stay(&room, &nights, None, None).total_amount;
            let with = quote_stay(&room, &nights, Some(&extra), None).total_amount;
            assert_eq!(with - without, Decimal::from(120_000));
        }
    }

    #[test]
    fn absolute_add_scales_with_nights() {
        let room = room();
        let extra = plan(ModifierType::AbsoluteAdd, 30_000);
        for n in [1u32, 2, 5] {
            let nights = resolve_range(&room, date(3, 1), date(3, 1 + n), &[]);
            let without = quote_stay(&room, &nights, None, None).total_amount;
            let with = quote_stay(&room, &nights, Some(&extra), None).total_amount;
            assert_eq!(with - without, Decimal::from(30_000 * n as i64));
        }
    }

    #[test]
    fn promo_outside_allow_list_leaves_price_alone() {
        let room = room();
        let nights = resolve_range(&room, date(3, 1), date(3, 3), &[]);
        let promo = promo(DiscountType::Percent, 20, vec![Uuid::new_v4()]);
        let quote = quote_stay(&room, &nights, None, Some(&promo));
        assert_eq!(quote.total_amount, Decimal::from(1_000_000));
        assert_eq!(quote.discount_amount, Decimal::ZERO);
        assert_eq!(quote.promo_code, None);
        assert_eq!(quote.rate_per_night, Decimal::from(500_000));
    }

    #[test]
    fn fixed_discount_never_goes_below_zero() {
        let room = room();
        let nights = resolve_range(&room, date(3, 1), date(3, 2), &[]);
        let promo = promo(DiscountType::Fixed, 900_000, vec![]);
        let quote = quote_stay(&room, &nights, None, Some(&promo));
        assert_eq!(quote.total_amount, Decimal::ZERO);
        assert_eq!(quote.discount_amount, Decimal::from(500_000));
    }
}

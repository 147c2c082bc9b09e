// src/services/dashboard_service.rs

use chrono::{Datelike, Months, NaiveDate, Utc};

use crate::{
    common::error::AppError,
    db::{DashboardRepository, Stores},
    models::dashboard::{
        DailyTraffic, DashboardStats, DashboardStatsQuery, DashboardSummary, EventCount,
        FunnelStep,
    },
    services::inventory_service::InventoryService,
};

const RECENT_RESERVATIONS: i64 = 5;
const REVENUE_MONTHS: u32 = 6;
pub const BOOK_NOW_ACTION: &str = "click_book_now";

pub fn month_start(today: NaiveDate) -> NaiveDate {
    today.with_day(1).unwrap_or(today)
}

/// First day of the oldest month shown by the revenue chart.
pub fn revenue_since(today: NaiveDate) -> NaiveDate {
    month_start(today)
        .checked_sub_months(Months::new(REVENUE_MONTHS - 1))
        .unwrap_or(today)
}

/// Page views, then "book now" clicks, then reservations created.
pub fn build_funnel(traffic: &[DailyTraffic], events: &[EventCount], reservations: i64) -> Vec<FunnelStep> {
    let page_views = traffic.iter().map(|d| d.visits).sum();
    let book_now = events
        .iter()
        .filter(|e| e.action == BOOK_NOW_ACTION)
        .map(|e| e.count)
        .sum();
    vec![
        FunnelStep {
            name: "Page Views".into(),
            value: page_views,
        },
        FunnelStep {
            name: "Book Now Clicks".into(),
            value: book_now,
        },
        FunnelStep {
            name: "Reservations".into(),
            value: reservations,
        },
    ]
}

#[derive(Clone)]
pub struct DashboardService {
    repo: DashboardRepository,
    stores: Stores,
    inventory: InventoryService,
}

impl DashboardService {
    pub fn new(repo: DashboardRepository, stores: Stores) -> Self {
        Self {
            repo,
            inventory: InventoryService::new(stores.clone()),
            stores,
        }
    }

    pub async fn summary(&self) -> Result<DashboardSummary, AppError> {
        let today = Utc::now().date_naive();
        let counters = self.repo.counters(today, month_start(today)).await?;
        let available_rooms = self.inventory.available_today(today).await?;
        let total_room_types = self.stores.rooms.list_rooms(false).await?.len() as i64;
        let recent_reservations = self.repo.recent_reservations(RECENT_RESERVATIONS).await?;
        let revenue_chart = self.repo.revenue_by_month(revenue_since(today)).await?;

        Ok(DashboardSummary {
            occupied_rooms: counters.occupied_rooms,
            available_rooms,
            monthly_revenue: counters.monthly_revenue,
            total_room_types,
            pending_reviews: counters.pending_reviews,
            recent_reservations,
            revenue_chart,
        })
    }

    pub async fn stats(&self, query: &DashboardStatsQuery) -> Result<DashboardStats, AppError> {
        let (start, end) = query.window(Utc::now().date_naive())?;

        let daily_traffic = self.repo.daily_traffic(start, end).await?;
        let revenue_trend = self.repo.revenue_trend(start, end).await?;
        let room_stats = self.repo.bookings_per_room(start, end).await?;
        let events = self.repo.event_counts(start, end).await?;
        let reservations = self.repo.reservations_created(start, end).await?;

        Ok(DashboardStats {
            start_date: start,
            end_date: end,
            funnel: build_funnel(&daily_traffic, &events, reservations),
            daily_traffic,
            revenue_trend,
            room_stats,
            events,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn revenue_window_spans_six_calendar_months() {
        assert_eq!(month_start(date(2025, 3, 17)), date(2025, 3, 1));
        assert_eq!(revenue_since(date(2025, 3, 17)), date(2024, 10, 1));
    }

    #[test]
    fn funnel_counts_only_book_now_clicks() {
        let traffic = vec![
            DailyTraffic {
                date: date(2025, 3, 1),
                visits: 40,
            },
            DailyTraffic {
                date: date(2025, 3, 2),
                visits: 60,
            },
        ];
        let events = vec![
            EventCount {
                category: "booking".into(),
                action: BOOK_NOW_ACTION.into(),
                count: 12,
            },
            EventCount {
                category: "rooms".into(),
                action: "view_room_detail".into(),
                count: 30,
            },
        ];
        let funnel = build_funnel(&traffic, &events, 3);
        let values: Vec<i64> = funnel.iter().map(|s| s.value).collect();
        assert_eq!(values, vec![100, 12, 3]);
    }
}

// src/services/analytics_service.rs

use chrono::Utc;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::AnalyticsRepository,
    models::analytics::{AnalyticsEvent, AnalyticsQuery, DailyStats, TrackEventPayload, TrackQuery},
};

#[derive(Clone)]
pub struct AnalyticsService {
    repo: AnalyticsRepository,
}

impl AnalyticsService {
    pub fn new(repo: AnalyticsRepository) -> Self {
        Self { repo }
    }

    pub async fn track_visit(&self, query: &TrackQuery) -> Result<(), AppError> {
        self.repo
            .track_visit(Utc::now().date_naive(), &query.page_key())
            .await
    }

    pub async fn record_event(&self, payload: TrackEventPayload) -> Result<AnalyticsEvent, AppError> {
        payload.validate()?;
        self.repo.record_event(&payload).await
    }

    pub async fn recent(&self, query: &AnalyticsQuery) -> Result<Vec<DailyStats>, AppError> {
        self.repo.recent_stats(query.days()).await
    }
}

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::{error, info};

use crate::models::feed::{FeedSource, FeedView};
use crate::models::stats::ImpactStats;
use crate::services::api_client::FeedbackApi;
use crate::services::feed_service::FeedService;
use crate::services::impact_stats_service::ImpactStatsService;

pub const MEAL_REPORT_LIMIT: usize = 10;

/// What the page shows right after loading.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PageSnapshot {
    pub stats: Option<ImpactStats>,
    pub feed: FeedView,
}

pub struct PageService {
    api: Arc<dyn FeedbackApi>,
    feed: Arc<FeedService>,
    stats: Arc<ImpactStatsService>,
}

impl PageService {
    pub fn new(
        api: Arc<dyn FeedbackApi>,
        feed: Arc<FeedService>,
        stats: Arc<ImpactStatsService>,
    ) -> Self {
        Self { api, feed, stats }
    }

    /// Loads impact stats and the recent feed concurrently. Neither waits on
    /// the other, and a failure in one leaves the other intact.
    pub async fn on_load(&self) -> PageSnapshot {
        let (stats, feed) = tokio::join!(self.stats.fetch(), self.feed.load_recent());
        let feed = feed.unwrap_or_else(|err| {
            error!(target: "app::page", error = %err, "failed to load recent feedback");
            FeedView::hidden(FeedSource::Local)
        });
        PageSnapshot { stats, feed }
    }

    pub async fn load_meal_reports(&self, limit: usize) -> Option<JsonValue> {
        match self.api.recent_meals(limit).await {
            Ok(meals) => {
                info!(
                    target: "app::page",
                    count = meals.as_array().map(Vec::len).unwrap_or(0),
                    "loaded meal reports"
                );
                Some(meals)
            }
            Err(err) => {
                error!(target: "app::page", error = %err, "failed to load meal reports");
                None
            }
        }
    }

    pub async fn load_donation_stats(&self) -> Option<JsonValue> {
        match self.api.donation_stats().await {
            Ok(stats) => {
                info!(target: "app::page", "loaded donation stats");
                Some(stats)
            }
            Err(err) => {
                error!(target: "app::page", error = %err, "failed to load donation stats");
                None
            }
        }
    }
}

use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDateTime};
use tracing::{debug, warn};

use crate::error::AppResult;
use crate::models::feed::{DimensionLine, FeedItem, FeedSource, FeedView};
use crate::models::feedback::{Dimension, FeedbackEntry, FeedbackMode};
use crate::services::api_client::FeedbackApi;
use crate::services::local_log_service::LocalFeedbackLog;

pub const FEED_DISPLAY_LIMIT: usize = 10;

pub struct FeedService {
    api: Arc<dyn FeedbackApi>,
    local_log: Arc<LocalFeedbackLog>,
    limit: usize,
}

impl FeedService {
    pub fn new(api: Arc<dyn FeedbackApi>, local_log: Arc<LocalFeedbackLog>, limit: usize) -> Self {
        Self {
            api,
            local_log,
            limit: limit.clamp(1, FEED_DISPLAY_LIMIT),
        }
    }

    /// Recent feedback from the backend, or from the local log when the
    /// backend cannot be reached.
    pub async fn load_recent(&self) -> AppResult<FeedView> {
        match self.api.recent_feedbacks(self.limit).await {
            Ok(entries) => {
                debug!(target: "app::feed", fetched = entries.len(), "loaded remote feedback");
                Ok(build_view(FeedSource::Remote, &entries, self.limit))
            }
            Err(error) => {
                warn!(
                    target: "app::feed",
                    error = %error,
                    "failed to load remote feedback; using local log"
                );
                self.load_local().await
            }
        }
    }

    pub async fn load_local(&self) -> AppResult<FeedView> {
        let entries = self.local_log.load_async().await?;
        Ok(self.view_of_local(&entries))
    }

    pub fn view_of_local(&self, entries: &[FeedbackEntry]) -> FeedView {
        build_view(FeedSource::Local, entries, self.limit)
    }
}

pub fn build_view(source: FeedSource, entries: &[FeedbackEntry], max: usize) -> FeedView {
    let items = render_feed(entries, max);
    FeedView {
        source,
        visible: !items.is_empty(),
        items,
    }
}

/// Renders up to `max` displayable entries, keeping input order.
pub fn render_feed(entries: &[FeedbackEntry], max: usize) -> Vec<FeedItem> {
    entries.iter().filter_map(render_entry).take(max).collect()
}

pub fn render_entry(entry: &FeedbackEntry) -> Option<FeedItem> {
    let timestamp = entry
        .timestamp
        .as_deref()
        .map(format_timestamp)
        .unwrap_or_default();

    if entry.is_kind(FeedbackMode::Emoji) {
        // Zero counts as absent, like a missing rating.
        entry.rating(Dimension::Overall).filter(|rating| *rating != 0)?;

        let lines = Dimension::ALL
            .into_iter()
            .map(|dimension| DimensionLine {
                label: dimension.label().to_string(),
                emoji: entry.emoji(dimension).map(str::to_string),
                rating: entry.rating(dimension),
            })
            .collect();

        return Some(FeedItem::Emoji {
            lines,
            average: format_average(entry.average_rating),
            timestamp,
        });
    }

    if entry.is_kind(FeedbackMode::Text) {
        let message = entry.message.clone()?;
        return Some(FeedItem::Text { message, timestamp });
    }

    None
}

pub fn format_average(average: Option<f64>) -> String {
    match average {
        Some(value) if value != 0.0 => format!("{value:.1}"),
        _ => "N/A".to_string(),
    }
}

/// `YYYY-MM-DD HH:MM` in local time; unparseable input is returned as is.
pub fn format_timestamp(raw: &str) -> String {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M")
            .to_string();
    }
    // The backend stores naive local timestamps.
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return parsed.format("%Y-%m-%d %H:%M").to_string();
    }
    raw.to_string()
}

use std::sync::Arc;

use tracing::debug;

use crate::error::AppResult;
use crate::models::analytics::FeedbackSummary;
use crate::models::feedback::{Dimension, FeedbackEntry, FeedbackMode};
use crate::services::local_log_service::LocalFeedbackLog;

/// Feedback aggregation for the analytics view.
pub struct AnalyticsService {
    local_log: Arc<LocalFeedbackLog>,
}

impl AnalyticsService {
    pub fn new(local_log: Arc<LocalFeedbackLog>) -> Self {
        Self { local_log }
    }

    /// Aggregates whatever the local log currently holds.
    pub fn summary(&self) -> AppResult<FeedbackSummary> {
        let entries = self.local_log.load()?;
        Ok(aggregate(&entries))
    }
}

/// Builds one histogram per dimension from emoji entries. A dimension that
/// is absent, zero or off-scale on an entry is skipped for that dimension
/// only.
pub fn aggregate(entries: &[FeedbackEntry]) -> FeedbackSummary {
    let mut summary = FeedbackSummary::default();
    let mut skipped = 0usize;

    for entry in entries.iter().filter(|e| e.is_kind(FeedbackMode::Emoji)) {
        for dimension in Dimension::ALL {
            let counted = entry
                .rating(dimension)
                .map(|rating| summary.histogram_mut(dimension).record(rating))
                .unwrap_or(false);
            if !counted {
                skipped += 1;
            }
        }
    }

    debug!(
        target: "app::analytics",
        entries = entries.len(),
        observations = summary.overall.total(),
        skipped,
        "aggregated feedback"
    );

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::analytics::RatingHistogram;

    fn emoji_entry(ratings: [Option<i64>; 5]) -> FeedbackEntry {
        FeedbackEntry {
            kind: Some("emoji".to_string()),
            overall_rating: ratings[0],
            quality_rating: ratings[1],
            hygiene_rating: ratings[2],
            quantity_rating: ratings[3],
            temperature_rating: ratings[4],
            ..Default::default()
        }
    }

    fn overall_only(rating: i64) -> FeedbackEntry {
        emoji_entry([Some(rating), None, None, None, None])
    }

    #[test]
    fn overall_histogram_and_weighted_average() {
        let entries: Vec<_> = [5, 5, 4, 3, 1].into_iter().map(overall_only).collect();
        let summary = aggregate(&entries);

        assert_eq!(summary.overall.counts(), [2, 1, 1, 0, 1]);
        assert!((summary.overall.weighted_average() - 3.6).abs() < 1e-12);
    }

    #[test]
    fn empty_dimension_averages_to_zero() {
        let summary = aggregate(&[overall_only(4)]);

        assert_eq!(summary.quality.counts(), [0, 0, 0, 0, 0]);
        assert_eq!(summary.quality.weighted_average(), 0.0);
        assert_eq!(aggregate(&[]), FeedbackSummary::default());
    }

    #[test]
    fn text_and_unknown_entries_are_ignored() {
        let text = FeedbackEntry {
            kind: Some("text".to_string()),
            overall_rating: Some(5),
            message: Some("great".to_string()),
            ..Default::default()
        };
        let voice = FeedbackEntry {
            kind: Some("voice".to_string()),
            overall_rating: Some(1),
            ..Default::default()
        };

        let summary = aggregate(&[text, voice, overall_only(2)]);
        assert_eq!(summary.overall.counts(), [0, 0, 0, 1, 0]);
    }

    #[test]
    fn zero_and_off_scale_ratings_are_skipped_per_dimension() {
        let entry = emoji_entry([Some(0), Some(6), Some(3), Some(-1), Some(5)]);
        let summary = aggregate(&[entry]);

        assert_eq!(summary.overall.total(), 0);
        assert_eq!(summary.quality.total(), 0);
        assert_eq!(summary.hygiene.counts(), [0, 0, 1, 0, 0]);
        assert_eq!(summary.quantity.total(), 0);
        assert_eq!(summary.temperature.counts(), [1, 0, 0, 0, 0]);
    }

    #[test]
    fn averages_follow_dimension_order() {
        let summary = FeedbackSummary {
            overall: RatingHistogram::from_counts([1, 0, 0, 0, 0]),
            quality: RatingHistogram::from_counts([0, 1, 0, 0, 0]),
            hygiene: RatingHistogram::from_counts([0, 0, 1, 0, 0]),
            quantity: RatingHistogram::from_counts([0, 0, 0, 1, 0]),
            temperature: RatingHistogram::from_counts([0, 0, 0, 0, 1]),
        };
        assert_eq!(summary.averages(), [5.0, 4.0, 3.0, 2.0, 1.0]);
    }
}

use serde::{Deserialize, Serialize};

use crate::models::feedback::{Dimension, MAX_RATING, MIN_RATING};

pub const BUCKET_LABELS: [&str; 5] = ["Excellent", "Good", "Average", "Poor", "Very Poor"];

/// Rating counts for one dimension, bucket 0 = rating 5 ... bucket 4 = rating 1.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct RatingHistogram {
    counts: [u32; 5],
}

impl RatingHistogram {
    pub fn from_counts(counts: [u32; 5]) -> Self {
        Self { counts }
    }

    /// Counts one rating; anything outside the 1..=5 scale is ignored.
    pub fn record(&mut self, rating: i64) -> bool {
        if rating < i64::from(MIN_RATING) || rating > i64::from(MAX_RATING) {
            return false;
        }
        let bucket = (i64::from(MAX_RATING) - rating) as usize;
        self.counts[bucket] += 1;
        true
    }

    pub fn counts(&self) -> [u32; 5] {
        self.counts
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    pub fn weighted_average(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }

        let weighted: u32 = self
            .counts
            .iter()
            .enumerate()
            .map(|(bucket, count)| count * (5 - bucket as u32))
            .sum();

        f64::from(weighted) / f64::from(total)
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackSummary {
    pub overall: RatingHistogram,
    pub quality: RatingHistogram,
    pub hygiene: RatingHistogram,
    pub quantity: RatingHistogram,
    pub temperature: RatingHistogram,
}

impl FeedbackSummary {
    pub fn histogram(&self, dimension: Dimension) -> &RatingHistogram {
        match dimension {
            Dimension::Overall => &self.overall,
            Dimension::Quality => &self.quality,
            Dimension::Hygiene => &self.hygiene,
            Dimension::Quantity => &self.quantity,
            Dimension::Temperature => &self.temperature,
        }
    }

    pub fn histogram_mut(&mut self, dimension: Dimension) -> &mut RatingHistogram {
        match dimension {
            Dimension::Overall => &mut self.overall,
            Dimension::Quality => &mut self.quality,
            Dimension::Hygiene => &mut self.hygiene,
            Dimension::Quantity => &mut self.quantity,
            Dimension::Temperature => &mut self.temperature,
        }
    }

    /// Weighted averages in `Dimension::ALL` order.
    pub fn averages(&self) -> [f64; 5] {
        Dimension::ALL.map(|dimension| self.histogram(dimension).weighted_average())
    }
}

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{AppError, AppResult};

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

/// One of the five independently rated feedback axes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Overall,
    Quality,
    Hygiene,
    Quantity,
    Temperature,
}

impl Dimension {
    pub const ALL: [Dimension; 5] = [
        Dimension::Overall,
        Dimension::Quality,
        Dimension::Hygiene,
        Dimension::Quantity,
        Dimension::Temperature,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Overall => "overall",
            Dimension::Quality => "quality",
            Dimension::Hygiene => "hygiene",
            Dimension::Quantity => "quantity",
            Dimension::Temperature => "temperature",
        }
    }

    /// Human-readable label used in validation notices and the feed.
    pub fn label(&self) -> &'static str {
        match self {
            Dimension::Overall => "Overall",
            Dimension::Quality => "Quality",
            Dimension::Hygiene => "Hygiene",
            Dimension::Quantity => "Quantity",
            Dimension::Temperature => "Temperature",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Dimension::Overall => 0,
            Dimension::Quality => 1,
            Dimension::Hygiene => 2,
            Dimension::Quantity => 3,
            Dimension::Temperature => 4,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Dimension {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "overall" => Ok(Dimension::Overall),
            "quality" => Ok(Dimension::Quality),
            "hygiene" => Ok(Dimension::Hygiene),
            "quantity" => Ok(Dimension::Quantity),
            "temperature" => Ok(Dimension::Temperature),
            other => Err(format!("unsupported feedback dimension: {other}")),
        }
    }
}

impl FromStr for Dimension {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackMode {
    #[default]
    Emoji,
    Text,
    Voice,
}

impl FeedbackMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackMode::Emoji => "emoji",
            FeedbackMode::Text => "text",
            FeedbackMode::Voice => "voice",
        }
    }
}

impl fmt::Display for FeedbackMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for FeedbackMode {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "emoji" => Ok(FeedbackMode::Emoji),
            "text" => Ok(FeedbackMode::Text),
            "voice" => Ok(FeedbackMode::Voice),
            other => Err(format!("unsupported feedback mode: {other}")),
        }
    }
}

impl FromStr for FeedbackMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

/// A rating picked for one dimension together with the glyph shown for it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DimensionRating {
    pub rating: u8,
    pub emoji: String,
}

impl DimensionRating {
    pub fn new(rating: u8, emoji: impl Into<String>) -> AppResult<Self> {
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(AppError::validation_with_details(
                format!("Rating must be between {MIN_RATING} and {MAX_RATING}"),
                json!({ "rating": rating }),
            ));
        }
        Ok(Self {
            rating,
            emoji: emoji.into(),
        })
    }
}

/// Transient, in-memory feedback entry for one page session.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackDraft {
    pub mode: FeedbackMode,
    pub ratings: BTreeMap<Dimension, DimensionRating>,
    pub text: String,
}

impl FeedbackDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switching mode keeps whatever was already entered in the other modes.
    pub fn set_mode(&mut self, mode: FeedbackMode) {
        self.mode = mode;
    }

    pub fn select_rating(
        &mut self,
        dimension: Dimension,
        rating: u8,
        emoji: impl Into<String>,
    ) -> AppResult<()> {
        let selection = DimensionRating::new(rating, emoji)?;
        self.ratings.insert(dimension, selection);
        Ok(())
    }

    pub fn clear_rating(&mut self, dimension: Dimension) -> Option<DimensionRating> {
        self.ratings.remove(&dimension)
    }

    pub fn rating(&self, dimension: Dimension) -> Option<&DimensionRating> {
        self.ratings.get(&dimension)
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Unanswered dimensions in display order.
    pub fn missing_dimensions(&self) -> Vec<Dimension> {
        Dimension::ALL
            .into_iter()
            .filter(|dimension| !self.ratings.contains_key(dimension))
            .collect()
    }

    pub fn is_blank(&self) -> bool {
        self.ratings.is_empty() && self.text.is_empty()
    }

    /// Drops every rating and the text; the selected mode stays.
    pub fn reset(&mut self) {
        self.ratings.clear();
        self.text.clear();
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmojiRatings {
    pub overall_rating: u8,
    pub overall_emoji: String,
    pub quality_rating: u8,
    pub quality_emoji: String,
    pub hygiene_rating: u8,
    pub hygiene_emoji: String,
    pub quantity_rating: u8,
    pub quantity_emoji: String,
    pub temperature_rating: u8,
    pub temperature_emoji: String,
    pub average_rating: f64,
}

impl EmojiRatings {
    /// Builds the ratings block from one selection per dimension, in
    /// `Dimension::ALL` order, and derives the unrounded mean.
    pub fn from_selections(selections: [&DimensionRating; 5]) -> Self {
        let [overall, quality, hygiene, quantity, temperature] = selections;
        let sum: u32 = selections.iter().map(|s| u32::from(s.rating)).sum();

        Self {
            overall_rating: overall.rating,
            overall_emoji: overall.emoji.clone(),
            quality_rating: quality.rating,
            quality_emoji: quality.emoji.clone(),
            hygiene_rating: hygiene.rating,
            hygiene_emoji: hygiene.emoji.clone(),
            quantity_rating: quantity.rating,
            quantity_emoji: quantity.emoji.clone(),
            temperature_rating: temperature.rating,
            temperature_emoji: temperature.emoji.clone(),
            average_rating: f64::from(sum) / 5.0,
        }
    }

    pub fn rating(&self, dimension: Dimension) -> u8 {
        match dimension {
            Dimension::Overall => self.overall_rating,
            Dimension::Quality => self.quality_rating,
            Dimension::Hygiene => self.hygiene_rating,
            Dimension::Quantity => self.quantity_rating,
            Dimension::Temperature => self.temperature_rating,
        }
    }

    pub fn emoji(&self, dimension: Dimension) -> &str {
        match dimension {
            Dimension::Overall => &self.overall_emoji,
            Dimension::Quality => &self.quality_emoji,
            Dimension::Hygiene => &self.hygiene_emoji,
            Dimension::Quantity => &self.quantity_emoji,
            Dimension::Temperature => &self.temperature_emoji,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FeedbackBody {
    Emoji(EmojiRatings),
    Text { message: String },
}

/// A submitted rating or comment, serialised in the flat wire shape the
/// backend stores (`type`, `timestamp`, `<dimension>_rating`, ...).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeedbackRecord {
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub body: FeedbackBody,
}

impl FeedbackRecord {
    pub fn mode(&self) -> FeedbackMode {
        match self.body {
            FeedbackBody::Emoji(_) => FeedbackMode::Emoji,
            FeedbackBody::Text { .. } => FeedbackMode::Text,
        }
    }

    pub fn average_rating(&self) -> Option<f64> {
        match &self.body {
            FeedbackBody::Emoji(ratings) => Some(ratings.average_rating),
            FeedbackBody::Text { .. } => None,
        }
    }
}

/// Read-side view of a feedback object as it comes back from the backend or
/// the local log. Every field is optional so that malformed or foreign
/// entries can be filtered at display time instead of failing the load.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FeedbackEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall_rating: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall_emoji: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality_rating: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality_emoji: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hygiene_rating: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hygiene_emoji: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity_rating: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity_emoji: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature_rating: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature_emoji: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FeedbackEntry {
    pub fn is_kind(&self, mode: FeedbackMode) -> bool {
        self.kind.as_deref() == Some(mode.as_str())
    }

    pub fn rating(&self, dimension: Dimension) -> Option<i64> {
        match dimension {
            Dimension::Overall => self.overall_rating,
            Dimension::Quality => self.quality_rating,
            Dimension::Hygiene => self.hygiene_rating,
            Dimension::Quantity => self.quantity_rating,
            Dimension::Temperature => self.temperature_rating,
        }
    }

    pub fn emoji(&self, dimension: Dimension) -> Option<&str> {
        match dimension {
            Dimension::Overall => self.overall_emoji.as_deref(),
            Dimension::Quality => self.quality_emoji.as_deref(),
            Dimension::Hygiene => self.hygiene_emoji.as_deref(),
            Dimension::Quantity => self.quantity_emoji.as_deref(),
            Dimension::Temperature => self.temperature_emoji.as_deref(),
        }
    }
}

impl From<&FeedbackRecord> for FeedbackEntry {
    fn from(record: &FeedbackRecord) -> Self {
        let mut entry = FeedbackEntry {
            kind: Some(record.mode().as_str().to_string()),
            timestamp: Some(record.timestamp.to_rfc3339()),
            ..Default::default()
        };

        match &record.body {
            FeedbackBody::Emoji(ratings) => {
                entry.overall_rating = Some(i64::from(ratings.overall_rating));
                entry.overall_emoji = Some(ratings.overall_emoji.clone());
                entry.quality_rating = Some(i64::from(ratings.quality_rating));
                entry.quality_emoji = Some(ratings.quality_emoji.clone());
                entry.hygiene_rating = Some(i64::from(ratings.hygiene_rating));
                entry.hygiene_emoji = Some(ratings.hygiene_emoji.clone());
                entry.quantity_rating = Some(i64::from(ratings.quantity_rating));
                entry.quantity_emoji = Some(ratings.quantity_emoji.clone());
                entry.temperature_rating = Some(i64::from(ratings.temperature_rating));
                entry.temperature_emoji = Some(ratings.temperature_emoji.clone());
                entry.average_rating = Some(ratings.average_rating);
            }
            FeedbackBody::Text { message } => {
                entry.message = Some(message.clone());
            }
        }

        entry
    }
}

impl From<FeedbackRecord> for FeedbackEntry {
    fn from(record: FeedbackRecord) -> Self {
        FeedbackEntry::from(&record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn selection(rating: u8) -> DimensionRating {
        DimensionRating::new(rating, "🙂").expect("valid rating")
    }

    #[test]
    fn rating_outside_scale_is_rejected() {
        assert!(DimensionRating::new(0, "😶").is_err());
        assert!(DimensionRating::new(6, "😶").is_err());
        assert!(DimensionRating::new(1, "😞").is_ok());
        assert!(DimensionRating::new(5, "😍").is_ok());
    }

    #[test]
    fn missing_dimensions_follow_display_order() {
        let mut draft = FeedbackDraft::new();
        draft
            .select_rating(Dimension::Hygiene, 4, "😊")
            .expect("valid");
        draft
            .select_rating(Dimension::Overall, 5, "😍")
            .expect("valid");

        assert_eq!(
            draft.missing_dimensions(),
            vec![
                Dimension::Quality,
                Dimension::Quantity,
                Dimension::Temperature
            ]
        );
    }

    #[test]
    fn reselecting_a_dimension_replaces_previous_choice() {
        let mut draft = FeedbackDraft::new();
        draft.select_rating(Dimension::Quality, 2, "😕").unwrap();
        draft.select_rating(Dimension::Quality, 4, "😊").unwrap();

        let chosen = draft.rating(Dimension::Quality).expect("rated");
        assert_eq!(chosen.rating, 4);
        assert_eq!(chosen.emoji, "😊");
        assert_eq!(draft.ratings.len(), 1);
    }

    #[test]
    fn switching_mode_keeps_partial_ratings() {
        let mut draft = FeedbackDraft::new();
        draft.select_rating(Dimension::Overall, 3, "😐").unwrap();
        draft.set_mode(FeedbackMode::Text);
        draft.set_mode(FeedbackMode::Emoji);

        assert_eq!(draft.rating(Dimension::Overall).map(|r| r.rating), Some(3));
    }

    #[test]
    fn reset_clears_ratings_and_text_but_not_mode() {
        let mut draft = FeedbackDraft::new();
        draft.select_rating(Dimension::Overall, 3, "😐").unwrap();
        draft.set_text("ok");
        draft.set_mode(FeedbackMode::Text);
        draft.reset();

        assert!(draft.is_blank());
        assert_eq!(draft.mode, FeedbackMode::Text);
    }

    #[test]
    fn average_is_exact_unrounded_mean() {
        let picks = [selection(5), selection(4), selection(5), selection(3), selection(4)];
        let ratings = EmojiRatings::from_selections([
            &picks[0], &picks[1], &picks[2], &picks[3], &picks[4],
        ]);
        assert_eq!(ratings.average_rating, 4.2);
        assert_eq!(ratings.rating(Dimension::Temperature), 4);
    }

    #[test]
    fn record_serializes_to_flat_wire_shape() {
        let record = FeedbackRecord {
            timestamp: Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap(),
            body: FeedbackBody::Text {
                message: "good food".to_string(),
            },
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["type"], "text");
        assert_eq!(value["message"], "good food");
        assert!(value["timestamp"].as_str().unwrap().starts_with("2025-03-01T12:00:00"));

        let back: FeedbackRecord = serde_json::from_value(value).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn entry_tolerates_nulls_and_unknown_fields() {
        let entry: FeedbackEntry = serde_json::from_value(serde_json::json!({
            "id": 7,
            "type": "emoji",
            "overall_rating": 4,
            "quality_rating": null,
            "message": null,
            "meal_id": "abc",
            "timestamp": "2025-03-01T12:00:00"
        }))
        .unwrap();

        assert!(entry.is_kind(FeedbackMode::Emoji));
        assert_eq!(entry.rating(Dimension::Overall), Some(4));
        assert_eq!(entry.rating(Dimension::Quality), None);
        assert_eq!(entry.message, None);
    }

    #[test]
    fn entry_from_record_carries_every_field() {
        let picks = [selection(5), selection(4), selection(5), selection(3), selection(4)];
        let record = FeedbackRecord {
            timestamp: Utc::now(),
            body: FeedbackBody::Emoji(EmojiRatings::from_selections([
                &picks[0], &picks[1], &picks[2], &picks[3], &picks[4],
            ])),
        };

        let entry = FeedbackEntry::from(&record);
        assert!(entry.is_kind(FeedbackMode::Emoji));
        for dimension in Dimension::ALL {
            assert!(entry.rating(dimension).is_some());
            assert_eq!(entry.emoji(dimension), Some("🙂"));
        }
        assert_eq!(entry.average_rating, Some(4.2));
    }
}

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult};
use crate::models::feed::{FeedSource, FeedView};
use crate::models::feedback::{
    Dimension, EmojiRatings, FeedbackBody, FeedbackDraft, FeedbackMode, FeedbackRecord,
};
use crate::services::api_client::FeedbackApi;
use crate::services::feed_service::FeedService;
use crate::services::local_log_service::LocalFeedbackLog;

pub const VOICE_UNSUPPORTED_MESSAGE: &str = "Voice recording feature coming soon";
pub const EMPTY_TEXT_MESSAGE: &str = "Please enter your feedback";

/// Draft state for one page session plus the single in-flight submission
/// slot.
#[derive(Debug, Default)]
pub struct FeedbackSession {
    draft: Mutex<FeedbackDraft>,
    in_flight: AtomicBool,
}

/// Releases the in-flight slot when dropped.
pub struct SubmissionGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for SubmissionGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

impl FeedbackSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> AppResult<FeedbackDraft> {
        Ok(self.lock()?.clone())
    }

    pub fn set_mode(&self, mode: FeedbackMode) -> AppResult<FeedbackDraft> {
        let mut draft = self.lock()?;
        draft.set_mode(mode);
        Ok(draft.clone())
    }

    pub fn select_rating(
        &self,
        dimension: Dimension,
        rating: u8,
        emoji: impl Into<String>,
    ) -> AppResult<FeedbackDraft> {
        let mut draft = self.lock()?;
        draft.select_rating(dimension, rating, emoji)?;
        Ok(draft.clone())
    }

    pub fn clear_rating(&self, dimension: Dimension) -> AppResult<FeedbackDraft> {
        let mut draft = self.lock()?;
        draft.clear_rating(dimension);
        Ok(draft.clone())
    }

    pub fn set_text(&self, text: impl Into<String>) -> AppResult<FeedbackDraft> {
        let mut draft = self.lock()?;
        draft.set_text(text);
        Ok(draft.clone())
    }

    pub fn reset(&self) -> AppResult<()> {
        self.lock()?.reset();
        Ok(())
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Claims the in-flight slot, or fails with `Conflict` if another
    /// submission holds it.
    pub fn begin_submit(&self) -> AppResult<SubmissionGuard<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| AppError::conflict("A submission is already in progress"))?;
        Ok(SubmissionGuard {
            flag: &self.in_flight,
        })
    }

    fn lock(&self) -> AppResult<MutexGuard<'_, FeedbackDraft>> {
        self.draft
            .lock()
            .map_err(|_| AppError::other("feedback draft lock poisoned"))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Delivery {
    Remote,
    LocalFallback,
}

/// Outcome of an accepted submission. Both deliveries count as success for
/// the user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    pub record: FeedbackRecord,
    pub delivery: Delivery,
    pub feed: FeedView,
}

pub struct FeedbackService {
    api: Arc<dyn FeedbackApi>,
    local_log: Arc<LocalFeedbackLog>,
    feed: Arc<FeedService>,
}

impl FeedbackService {
    pub fn new(
        api: Arc<dyn FeedbackApi>,
        local_log: Arc<LocalFeedbackLog>,
        feed: Arc<FeedService>,
    ) -> Self {
        Self {
            api,
            local_log,
            feed,
        }
    }

    /// Validates the session draft, delivers it remotely or to the local log,
    /// clears the draft and returns the refreshed feed. A validation failure
    /// leaves the draft, the log and the feed untouched.
    pub async fn submit(&self, session: &FeedbackSession) -> AppResult<SubmissionReceipt> {
        let _guard = session.begin_submit()?;

        let draft = session.snapshot()?;
        let record = build_record(&draft, Utc::now())?;

        let (delivery, local_entries) = match self.api.submit_feedback(&record).await {
            Ok(()) => {
                info!(target: "app::feedback", kind = %record.mode(), "feedback submitted");
                (Delivery::Remote, None)
            }
            Err(err) => {
                warn!(
                    target: "app::feedback",
                    error = %err,
                    kind = %record.mode(),
                    "remote submission failed; storing locally"
                );
                let entries = self.local_log.prepend_async(record.clone()).await?;
                (Delivery::LocalFallback, Some(entries))
            }
        };

        session.reset()?;

        // The record is stored at this point; a failed refresh only hides the feed.
        let feed = match local_entries {
            Some(entries) => self.feed.view_of_local(&entries),
            None => match self.feed.load_recent().await {
                Ok(view) => view,
                Err(err) => {
                    warn!(
                        target: "app::feedback",
                        error = %err,
                        "feed refresh failed after submission"
                    );
                    FeedView::hidden(FeedSource::Local)
                }
            },
        };

        debug!(
            target: "app::feedback",
            ?delivery,
            feed_items = feed.items.len(),
            "submission complete"
        );

        Ok(SubmissionReceipt {
            record,
            delivery,
            feed,
        })
    }
}

/// Turns a draft into a record, or explains what is missing.
pub fn build_record(draft: &FeedbackDraft, now: DateTime<Utc>) -> AppResult<FeedbackRecord> {
    let body = match draft.mode {
        FeedbackMode::Voice => {
            return Err(AppError::validation_with_details(
                VOICE_UNSUPPORTED_MESSAGE,
                json!({ "mode": FeedbackMode::Voice.as_str() }),
            ));
        }
        FeedbackMode::Emoji => {
            let missing = draft.missing_dimensions();
            if !missing.is_empty() {
                let labels: Vec<&str> = missing.iter().map(Dimension::label).collect();
                return Err(AppError::validation_with_details(
                    format!("Please answer all questions: {}", labels.join(", ")),
                    json!({ "missing": labels }),
                ));
            }

            let selections = Dimension::ALL.map(|dimension| &draft.ratings[&dimension]);
            FeedbackBody::Emoji(EmojiRatings::from_selections(selections))
        }
        FeedbackMode::Text => {
            let message = draft.text.trim();
            if message.is_empty() {
                return Err(AppError::validation_with_details(
                    EMPTY_TEXT_MESSAGE,
                    json!({ "field": "message" }),
                ));
            }
            FeedbackBody::Text {
                message: message.to_string(),
            }
        }
    };

    Ok(FeedbackRecord {
        timestamp: now,
        body,
    })
}

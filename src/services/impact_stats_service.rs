use std::sync::Arc;

use tracing::{debug, error};

use crate::models::stats::{ImpactStatSlot, ImpactStats};
use crate::services::api_client::FeedbackApi;

/// Display slots for the headline impact figures, addressed by slot.
pub trait StatSlots {
    fn has_slot(&self, slot: ImpactStatSlot) -> bool;

    fn set_text(&mut self, slot: ImpactStatSlot, text: String);
}

pub struct ImpactStatsService {
    api: Arc<dyn FeedbackApi>,
}

impl ImpactStatsService {
    pub fn new(api: Arc<dyn FeedbackApi>) -> Self {
        Self { api }
    }

    /// Fetches the impact figures. Failures are logged and never surfaced;
    /// the page keeps its placeholder values.
    pub async fn fetch(&self) -> Option<ImpactStats> {
        match self.api.impact_stats().await {
            Ok(stats) => Some(stats),
            Err(err) => {
                error!(target: "app::stats", error = %err, "failed to load impact stats");
                None
            }
        }
    }

    /// Fetches and writes into `slots`; returns the slots that were updated.
    pub async fn load_into(&self, slots: &mut dyn StatSlots) -> Vec<ImpactStatSlot> {
        match self.fetch().await {
            Some(stats) => apply_stats(slots, &stats),
            None => Vec::new(),
        }
    }
}

/// Writes each present value into its slot. Absent values and missing slots
/// leave the page untouched.
pub fn apply_stats(slots: &mut dyn StatSlots, stats: &ImpactStats) -> Vec<ImpactStatSlot> {
    let mut applied = Vec::new();
    for slot in ImpactStatSlot::ALL {
        let Some(text) = stats.display_text(slot) else {
            continue;
        };
        if !slots.has_slot(slot) {
            debug!(target: "app::stats", %slot, "stat slot missing; value skipped");
            continue;
        }
        slots.set_text(slot, text);
        applied.push(slot);
    }
    applied
}

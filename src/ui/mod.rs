//! In-memory page surfaces used by the headless shell and by tests in place
//! of the webview.

use std::collections::{BTreeMap, BTreeSet};

use crate::models::chart::ChartSpec;
use crate::models::feedback::Dimension;
use crate::models::stats::ImpactStatSlot;
use crate::services::chart_service::{
    dimension_mount, ChartSurface, COMPARATIVE_MOUNT, WEEKLY_TREND_MOUNT,
};
use crate::services::impact_stats_service::StatSlots;

/// Placeholder text the page shows before stats arrive.
pub const STAT_PLACEHOLDER: &str = "--";

/// Records the charts drawn on each mount point.
#[derive(Debug, Default)]
pub struct MountRegistry {
    mounts: BTreeSet<String>,
    drawn: BTreeMap<String, ChartSpec>,
}

impl MountRegistry {
    pub fn new<I, S>(mounts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            mounts: mounts.into_iter().map(Into::into).collect(),
            drawn: BTreeMap::new(),
        }
    }

    /// A registry with every mount point of the analytics view.
    pub fn analytics_view() -> Self {
        let mut mounts: Vec<&str> = Dimension::ALL.into_iter().map(dimension_mount).collect();
        mounts.push(COMPARATIVE_MOUNT);
        mounts.push(WEEKLY_TREND_MOUNT);
        Self::new(mounts)
    }

    pub fn chart(&self, mount_id: &str) -> Option<&ChartSpec> {
        self.drawn.get(mount_id)
    }

    pub fn drawn_count(&self) -> usize {
        self.drawn.len()
    }
}

impl ChartSurface for MountRegistry {
    fn has_mount(&self, mount_id: &str) -> bool {
        self.mounts.contains(mount_id)
    }

    // Redrawing a mount replaces its previous chart.
    fn draw(&mut self, chart: ChartSpec) {
        self.drawn.insert(chart.mount_id().to_string(), chart);
    }
}

/// Text shown in each impact stat slot.
#[derive(Debug, Clone)]
pub struct SlotBoard {
    values: BTreeMap<ImpactStatSlot, String>,
}

impl Default for SlotBoard {
    fn default() -> Self {
        Self {
            values: ImpactStatSlot::ALL
                .into_iter()
                .map(|slot| (slot, STAT_PLACEHOLDER.to_string()))
                .collect(),
        }
    }
}

impl SlotBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// A board holding only `slots`.
    pub fn with_slots(slots: &[ImpactStatSlot]) -> Self {
        Self {
            values: slots
                .iter()
                .map(|slot| (*slot, STAT_PLACEHOLDER.to_string()))
                .collect(),
        }
    }

    pub fn text(&self, slot: ImpactStatSlot) -> Option<&str> {
        self.values.get(&slot).map(String::as_str)
    }

    pub fn entries(&self) -> impl Iterator<Item = (ImpactStatSlot, &str)> {
        self.values.iter().map(|(slot, text)| (*slot, text.as_str()))
    }
}

impl StatSlots for SlotBoard {
    fn has_slot(&self, slot: ImpactStatSlot) -> bool {
        self.values.contains_key(&slot)
    }

    fn set_text(&mut self, slot: ImpactStatSlot, text: String) {
        if let Some(value) = self.values.get_mut(&slot) {
            *value = text;
        }
    }
}

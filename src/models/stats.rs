use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Aggregate figures served by `/stats/impact`. Values are opaque display
/// data; the backend sends preformatted strings such as `"2,450 kg"`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ImpactStats {
    pub food_saved: Option<JsonValue>,
    pub servings_donated: Option<JsonValue>,
    pub quality_score: Option<JsonValue>,
    pub wastage_reduced: Option<JsonValue>,
}

impl ImpactStats {
    pub fn value(&self, slot: ImpactStatSlot) -> Option<&JsonValue> {
        let value = match slot {
            ImpactStatSlot::FoodSaved => self.food_saved.as_ref(),
            ImpactStatSlot::ServingsDonated => self.servings_donated.as_ref(),
            ImpactStatSlot::QualityScore => self.quality_score.as_ref(),
            ImpactStatSlot::WastageReduced => self.wastage_reduced.as_ref(),
        };
        value.filter(|value| !value.is_null())
    }

    /// Text for a slot: strings verbatim, anything else as JSON text.
    pub fn display_text(&self, slot: ImpactStatSlot) -> Option<String> {
        self.value(slot).map(|value| match value {
            JsonValue::String(text) => text.clone(),
            other => other.to_string(),
        })
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ImpactStatSlot {
    #[serde(rename = "foodSaved")]
    FoodSaved,
    #[serde(rename = "servingsDonated")]
    ServingsDonated,
    #[serde(rename = "qualityScore")]
    QualityScore,
    #[serde(rename = "wastageReduced")]
    WastageReduced,
}

impl ImpactStatSlot {
    pub const ALL: [ImpactStatSlot; 4] = [
        ImpactStatSlot::FoodSaved,
        ImpactStatSlot::ServingsDonated,
        ImpactStatSlot::QualityScore,
        ImpactStatSlot::WastageReduced,
    ];

    /// Element id of the display slot on the page.
    pub fn as_str(&self) -> &'static str {
        match self {
            ImpactStatSlot::FoodSaved => "foodSaved",
            ImpactStatSlot::ServingsDonated => "servingsDonated",
            ImpactStatSlot::QualityScore => "qualityScore",
            ImpactStatSlot::WastageReduced => "wastageReduced",
        }
    }
}

impl fmt::Display for ImpactStatSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FeedSource {
    Remote,
    Local,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DimensionLine {
    pub label: String,
    pub emoji: Option<String>,
    pub rating: Option<i64>,
}

impl DimensionLine {
    pub fn display(&self) -> String {
        let emoji = self.emoji.as_deref().unwrap_or("");
        let rating = self
            .rating
            .map(|value| value.to_string())
            .unwrap_or_else(|| "?".to_string());
        format!("{}: {} {}/5", self.label, emoji, rating)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FeedItem {
    #[serde(rename_all = "camelCase")]
    Emoji {
        lines: Vec<DimensionLine>,
        average: String,
        timestamp: String,
    },
    #[serde(rename_all = "camelCase")]
    Text { message: String, timestamp: String },
}

impl FeedItem {
    pub fn display_lines(&self) -> Vec<String> {
        match self {
            FeedItem::Emoji {
                lines,
                average,
                timestamp,
            } => {
                let mut rendered: Vec<String> = lines.iter().map(DimensionLine::display).collect();
                rendered.push(format!("Average: {average}/5  ({timestamp})"));
                rendered
            }
            FeedItem::Text { message, timestamp } => {
                vec![message.clone(), timestamp.clone()]
            }
        }
    }
}

/// Recent-feedback section as the page shows it; `visible` is false when
/// there is nothing to show and the section should be hidden.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeedView {
    pub source: FeedSource,
    pub visible: bool,
    pub items: Vec<FeedItem>,
}

impl FeedView {
    /// An empty, hidden section.
    pub fn hidden(source: FeedSource) -> Self {
        Self {
            source,
            visible: false,
            items: Vec::new(),
        }
    }
}

//! Wire messages between the extension UI and the page.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::highlight::{HighlightSummary, SearchMode};

/// A request from the UI, tagged by `type`.
///
/// Body fields are lenient: a field of the wrong type reads as absent, so a
/// known tag always decodes and always gets a reply.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Command {
    #[serde(rename_all = "camelCase")]
    HighlightText {
        #[serde(default, deserialize_with = "lenient")]
        query: String,
        #[serde(default, deserialize_with = "lenient")]
        is_regex: bool,
        #[serde(default, deserialize_with = "lenient")]
        threshold: Option<f64>,
        /// Overrides the mode derived from `is_regex`.
        #[serde(default, deserialize_with = "lenient")]
        mode: Option<SearchMode>,
    },
    NavigateNext,
    NavigatePrevious,
    ClearHighlights,
}

/// Decode a field, falling back to its default on a type mismatch.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

impl Command {
    pub fn kind(&self) -> &'static str {
        match self {
            Command::HighlightText { .. } => "HIGHLIGHT_TEXT",
            Command::NavigateNext => "NAVIGATE_NEXT",
            Command::NavigatePrevious => "NAVIGATE_PREVIOUS",
            Command::ClearHighlights => "CLEAR_HIGHLIGHTS",
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReplyKind {
    #[serde(rename = "SEARCH_RESULTS")]
    SearchResults,
}

/// Answer to every known command.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    #[serde(rename = "type")]
    pub kind: ReplyKind,
    pub total: usize,
    pub active_index: i64,
}

impl From<HighlightSummary> for Reply {
    fn from(summary: HighlightSummary) -> Self {
        Self {
            kind: ReplyKind::SearchResults,
            total: summary.total,
            active_index: summary.active_index,
        }
    }
}

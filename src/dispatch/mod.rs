//! CommandDispatcher - synchronous `(command) -> reply` surface
//!
//! The transport (extension messaging, popup disconnect notifications) lives
//! outside this crate; it hands every message here and forwards whatever
//! comes back. Unknown tags and non-object messages produce no reply; a known
//! tag is always answered.

pub mod message;

pub use message::{Command, Reply, ReplyKind};

use crate::config::HighlightConfig;
use crate::highlight::{Direction, HighlightEngine, SearchMode, TextTree};

pub struct CommandDispatcher<T: TextTree> {
    engine: HighlightEngine<T>,
}

impl<T: TextTree> CommandDispatcher<T> {
    pub fn new(tree: T, config: HighlightConfig) -> Self {
        Self::from_engine(HighlightEngine::new(tree, config))
    }

    pub fn from_engine(engine: HighlightEngine<T>) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &HighlightEngine<T> {
        &self.engine
    }

    /// Run one command to completion.
    pub fn dispatch(&mut self, command: Command) -> Reply {
        let summary = match command {
            Command::HighlightText { query, is_regex, threshold, mode } => {
                let mode = mode.unwrap_or_else(|| self.mode_for(is_regex));
                let threshold = self.engine.config().resolve_threshold(threshold);
                self.engine.highlight(&query, mode, threshold)
            }
            Command::NavigateNext => self.engine.navigate(Direction::Next),
            Command::NavigatePrevious => self.engine.navigate(Direction::Prev),
            Command::ClearHighlights => {
                self.engine.clear();
                self.engine.summary()
            }
        };
        Reply::from(summary)
    }

    /// Decode and run a raw JSON message. `None` means "do not reply".
    pub fn handle_json(&mut self, message: serde_json::Value) -> Option<Reply> {
        let command = decode(message)?;
        Some(self.dispatch(command))
    }

    fn mode_for(&self, is_regex: bool) -> SearchMode {
        if is_regex {
            SearchMode::Regex
        } else if self.engine.config().fuzzy_by_default {
            SearchMode::Fuzzy
        } else {
            SearchMode::Literal
        }
    }
}

/// Parse a message; unknown tags and messages without a tag are logged and dropped.
pub fn decode(message: serde_json::Value) -> Option<Command> {
    let tag = message
        .get("type")
        .and_then(|t| t.as_str())
        .unwrap_or("<missing>")
        .to_string();
    match serde_json::from_value::<Command>(message) {
        Ok(command) => Some(command),
        Err(e) => {
            log::debug!("Ignoring message {}: {}", tag, e);
            None
        }
    }
}

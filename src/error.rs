//! Error type shared by the highlight engine, the text trees and the bindings.

use thiserror::Error;

/// Failures raised inside a highlight pass.
///
/// None of these cross the message boundary: the engine and the dispatcher
/// log them and answer with an empty result instead.
#[derive(Debug, Error)]
pub enum HighlightError {
    #[error("invalid search pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("text node is no longer attached to the document")]
    DetachedNode,

    #[error("dom operation failed: {0}")]
    Dom(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl HighlightError {
    pub fn dom(message: impl Into<String>) -> Self {
        Self::Dom(message.into())
    }
}

pub type HighlightResult<T> = Result<T, HighlightError>;

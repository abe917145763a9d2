//! Configuration types and defaults for the page highlighter
//!
//! Every field has a default so the content script can pass `undefined`, a
//! partial object, or a full one.

use serde::{Deserialize, Serialize};

use crate::error::{HighlightError, HighlightResult};

// =============================================================================
// Defaults
// =============================================================================

pub const DEFAULT_MARKER_CLASS: &str = "found-item";
pub const DEFAULT_ACTIVE_CLASS: &str = "found-item-active";
pub const DEFAULT_CONTAINER_ATTRIBUTE: &str = "data-extension-highlight-container";
pub const DEFAULT_THRESHOLD: f64 = 0.4;

/// Tags whose text is never searched (lowercase).
pub const DEFAULT_SKIP_TAGS: [&str; 7] =
    ["script", "style", "noscript", "meta", "title", "link", "head"];

fn default_marker_class() -> String { DEFAULT_MARKER_CLASS.to_string() }
fn default_active_class() -> String { DEFAULT_ACTIVE_CLASS.to_string() }
fn default_container_attribute() -> String { DEFAULT_CONTAINER_ATTRIBUTE.to_string() }
fn default_skip_tags() -> Vec<String> { DEFAULT_SKIP_TAGS.iter().map(|t| t.to_string()).collect() }
fn default_threshold() -> f64 { DEFAULT_THRESHOLD }
fn default_true() -> bool { true }
fn default_log_level() -> String { "warn".to_string() }

// =============================================================================
// HighlightConfig
// =============================================================================

/// Page highlighter configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightConfig {
    /// Class carried by every marker. Default: `found-item`
    #[serde(default = "default_marker_class")]
    pub marker_class: String,
    /// Class carried by the marker under the cursor. Default: `found-item-active`
    #[serde(default = "default_active_class")]
    pub active_class: String,
    /// Reserved attribute flagging highlight containers.
    #[serde(default = "default_container_attribute")]
    pub container_attribute: String,
    /// Elements whose descendant text is skipped.
    #[serde(default = "default_skip_tags")]
    pub skip_tags: Vec<String>,
    /// Threshold for requests that omit one or send a non-finite value. Default: 0.4
    #[serde(default = "default_threshold")]
    pub default_threshold: f64,
    /// Non-regex requests use fuzzy word matching instead of a literal search. Default: true
    #[serde(default = "default_true")]
    pub fuzzy_by_default: bool,
    /// Scroll the active marker with a smooth animation. Default: true
    #[serde(default = "default_true")]
    pub smooth_scroll: bool,
    /// Maximum level forwarded to the console
    /// (`error`, `warn`, `info`, `debug`, `trace`, `off`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            marker_class: default_marker_class(),
            active_class: default_active_class(),
            container_attribute: default_container_attribute(),
            skip_tags: default_skip_tags(),
            default_threshold: DEFAULT_THRESHOLD,
            fuzzy_by_default: true,
            smooth_scroll: true,
            log_level: default_log_level(),
        }
    }
}

impl HighlightConfig {
    /// Check the invariants the engine relies on.
    pub fn validate(&self) -> HighlightResult<()> {
        if self.marker_class.trim().is_empty() || self.active_class.trim().is_empty() {
            return Err(HighlightError::Config("marker classes must not be empty".to_string()));
        }
        if self.marker_class == self.active_class {
            return Err(HighlightError::Config(
                "marker class and active class must differ".to_string(),
            ));
        }
        if self.container_attribute.trim().is_empty() {
            return Err(HighlightError::Config("container attribute must not be empty".to_string()));
        }
        if !(0.0..=1.0).contains(&self.default_threshold) {
            return Err(HighlightError::Config(format!(
                "default threshold {} is outside [0, 1]",
                self.default_threshold
            )));
        }
        self.level_filter()?;
        Ok(())
    }

    /// Whether text under an element with this tag name is skipped.
    pub fn skips_tag(&self, tag: &str) -> bool {
        self.skip_tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    /// Clamp a requested threshold into `[0, 1]`.
    pub fn resolve_threshold(&self, requested: Option<f64>) -> f64 {
        match requested {
            Some(t) if t.is_finite() => t.clamp(0.0, 1.0),
            _ => self.default_threshold,
        }
    }

    /// Parsed `log_level`.
    pub fn level_filter(&self) -> HighlightResult<log::LevelFilter> {
        self.log_level
            .parse()
            .map_err(|_| HighlightError::Config(format!("unknown log level: {}", self.log_level)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = HighlightConfig::default();
        assert_eq!(config.marker_class, "found-item");
        assert_eq!(config.active_class, "found-item-active");
        assert_eq!(config.default_threshold, 0.4);
        assert!(config.fuzzy_by_default);
        assert!(config.skips_tag("SCRIPT"));
        assert!(!config.skips_tag("p"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_config_parsing() {
        let json = r#"{"markerClass": "hit", "fuzzyByDefault": false}"#;
        let config: HighlightConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.marker_class, "hit");
        assert_eq!(config.active_class, "found-item-active");
        assert!(!config.fuzzy_by_default);
        assert_eq!(config.skip_tags.len(), 7);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = HighlightConfig { default_threshold: 1.5, ..Default::default() };
        assert!(config.validate().is_err());

        let config =
            HighlightConfig { active_class: "found-item".to_string(), ..Default::default() };
        assert!(config.validate().is_err());

        let config = HighlightConfig { log_level: "loud".to_string(), ..Default::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_resolve_threshold() {
        let config = HighlightConfig::default();
        assert_eq!(config.resolve_threshold(Some(0.2)), 0.2);
        assert_eq!(config.resolve_threshold(Some(-3.0)), 0.0);
        assert_eq!(config.resolve_threshold(Some(7.0)), 1.0);
        assert_eq!(config.resolve_threshold(Some(f64::NAN)), 0.4);
        assert_eq!(config.resolve_threshold(None), 0.4);
    }
}

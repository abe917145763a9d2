//! HighlightEngine - find-on-page session over a text tree
//!
//! Owns the one highlight session of a document context:
//! - `highlight()` clears, scans, plans, applies, activates the first marker
//! - `navigate()` moves the active cursor with wraparound
//! - `clear()` reverts every container and normalizes the touched parents
//!
//! Public operations never fail. Internal errors are logged and the engine
//! falls back to an empty session.

use serde::{Deserialize, Serialize};

use super::matcher::{QueryMatcher, SearchMode};
use super::range::MatchRange;
use super::scorer::{ApproximateScorer, MatchScorer, ScorerOptions};
use super::tree::{ContainerPlan, HighlightPlan, TextTree};
use crate::config::HighlightConfig;
use crate::error::{HighlightError, HighlightResult};

// ==================== TYPE DEFINITIONS ====================

/// Cursor movement.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Next,
    Prev,
}

/// Match count and cursor position reported after every operation.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HighlightSummary {
    pub total: usize,
    /// `-1` when there is no active marker.
    pub active_index: i64,
}

impl HighlightSummary {
    pub const EMPTY: HighlightSummary = HighlightSummary { total: 0, active_index: -1 };
}

/// Markers, containers and cursor of the current pass.
struct Session<T: TextTree> {
    markers: Vec<T::Marker>,
    containers: Vec<T::Container>,
    active: Option<usize>,
}

impl<T: TextTree> Default for Session<T> {
    fn default() -> Self {
        Self { markers: Vec::new(), containers: Vec::new(), active: None }
    }
}

impl<T: TextTree> Session<T> {
    fn summary(&self) -> HighlightSummary {
        HighlightSummary {
            total: self.markers.len(),
            active_index: self.active.map_or(-1, |i| i as i64),
        }
    }

    fn is_empty(&self) -> bool {
        self.markers.is_empty() && self.containers.is_empty()
    }
}

// ==================== MAIN IMPLEMENTATION ====================

pub struct HighlightEngine<T: TextTree> {
    tree: T,
    config: HighlightConfig,
    scorer: Box<dyn MatchScorer>,
    session: Session<T>,
}

impl<T: TextTree> HighlightEngine<T> {
    pub fn new(tree: T, config: HighlightConfig) -> Self {
        Self::with_scorer(tree, config, Box::new(ApproximateScorer::new()))
    }

    pub fn with_scorer(tree: T, config: HighlightConfig, scorer: Box<dyn MatchScorer>) -> Self {
        Self { tree, config, scorer, session: Session::default() }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn tree(&self) -> &T {
        &self.tree
    }

    pub fn config(&self) -> &HighlightConfig {
        &self.config
    }

    pub fn summary(&self) -> HighlightSummary {
        self.session.summary()
    }

    pub fn markers(&self) -> &[T::Marker] {
        &self.session.markers
    }

    pub fn active_marker(&self) -> Option<&T::Marker> {
        self.session.active.and_then(|i| self.session.markers.get(i))
    }

    pub fn has_session(&self) -> bool {
        !self.session.is_empty()
    }

    // -------------------------------------------------------------------------
    // Operations
    // -------------------------------------------------------------------------

    /// Highlight every match of `query` and activate the first one.
    ///
    /// `threshold` only matters in fuzzy mode; it is clamped to `[0, 1]`.
    pub fn highlight(&mut self, query: &str, mode: SearchMode, threshold: f64) -> HighlightSummary {
        self.clear();
        if query.is_empty() {
            return HighlightSummary::EMPTY;
        }

        match self.try_highlight(query, mode, threshold) {
            Ok(summary) => {
                log::debug!("{} search for {:?}: {} markers", mode.as_str(), query, summary.total);
                summary
            }
            Err(HighlightError::InvalidPattern(e)) => {
                log::warn!("Invalid regex pattern: {}", e);
                HighlightSummary::EMPTY
            }
            Err(e) => {
                log::error!("Highlight pass failed: {}", e);
                self.clear();
                HighlightSummary::EMPTY
            }
        }
    }

    /// Move the cursor one marker forward or back, wrapping at both ends.
    pub fn navigate(&mut self, direction: Direction) -> HighlightSummary {
        let total = self.session.markers.len();
        if total == 0 {
            self.session.active = None;
            return HighlightSummary::EMPTY;
        }

        let next = match (self.session.active, direction) {
            (Some(i), Direction::Next) => (i + 1) % total,
            (Some(i), Direction::Prev) => (i + total - 1) % total,
            (None, Direction::Next) => 0,
            (None, Direction::Prev) => total - 1,
        };

        match self.set_active(next) {
            Ok(()) => self.session.summary(),
            Err(e) => {
                log::error!("Navigation failed: {}", e);
                self.clear();
                HighlightSummary::EMPTY
            }
        }
    }

    /// Revert every container and reset the session. Safe without a session.
    pub fn clear(&mut self) {
        if self.session.is_empty() {
            self.session.active = None;
            return;
        }

        let session = std::mem::take(&mut self.session);
        if let Some(marker) = session.active.and_then(|i| session.markers.get(i)) {
            if let Err(e) = self.tree.set_marker_active(marker, false, &self.config) {
                log::debug!("Could not deactivate marker: {}", e);
            }
        }

        let mut parents: Vec<T::Node> = Vec::new();
        for container in &session.containers {
            match self.tree.restore_container(container) {
                Ok(Some(parent)) => {
                    if !parents.contains(&parent) {
                        parents.push(parent);
                    }
                }
                Ok(None) => log::debug!("Container already removed from the document"),
                Err(e) => log::warn!("Could not restore container: {}", e),
            }
        }

        for parent in &parents {
            if let Err(e) = self.tree.normalize(parent) {
                log::warn!("Could not normalize after clear: {}", e);
            }
        }
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn try_highlight(
        &mut self,
        query: &str,
        mode: SearchMode,
        threshold: f64,
    ) -> HighlightResult<HighlightSummary> {
        let options = ScorerOptions::with_threshold(self.config.resolve_threshold(Some(threshold)));
        let matcher = QueryMatcher::build(query, mode, options)?;
        let plan = self.plan(&matcher)?;
        self.apply(plan)?;

        if !self.session.markers.is_empty() {
            self.set_active(0)?;
        }
        Ok(self.session.summary())
    }

    /// Compute every substitution before touching the tree.
    fn plan(&self, matcher: &QueryMatcher) -> HighlightResult<HighlightPlan<T::Node>> {
        let mut plan = HighlightPlan::default();
        for text_node in self.tree.text_nodes(&self.config)? {
            let ranges: Vec<MatchRange> =
                matcher.find_ranges(&text_node.text, self.scorer.as_ref());
            if let Some(container) = ContainerPlan::build(&text_node.text, &ranges) {
                plan.entries.push((text_node.node, container));
            }
        }
        Ok(plan)
    }

    fn apply(&mut self, plan: HighlightPlan<T::Node>) -> HighlightResult<()> {
        self.session.markers.reserve(plan.marker_count());
        for (node, container_plan) in &plan.entries {
            match self.tree.apply_container(node, container_plan, &self.config) {
                Ok((container, markers)) => {
                    self.session.containers.push(container);
                    self.session.markers.extend(markers);
                }
                Err(HighlightError::DetachedNode) => {
                    log::debug!("Skipping text node detached during the pass");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    /// Move the active class to `index` and scroll to it.
    fn set_active(&mut self, index: usize) -> HighlightResult<()> {
        if let Some(current) = self.session.active.and_then(|i| self.session.markers.get(i)) {
            self.tree.set_marker_active(current, false, &self.config)?;
        }

        let marker = self
            .session
            .markers
            .get(index)
            .ok_or_else(|| HighlightError::dom(format!("no marker at index {}", index)))?;
        self.tree.set_marker_active(marker, true, &self.config)?;
        self.tree.scroll_into_view(marker, self.config.smooth_scroll);
        self.session.active = Some(index);
        Ok(())
    }
}

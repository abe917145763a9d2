//! Text tree abstraction
//!
//! The engine never touches a DOM directly. It reads candidate text nodes
//! from a `TextTree`, computes a `HighlightPlan` (which node becomes which
//! container) and hands each entry back to the tree to apply. `WebTree`
//! implements this over `web-sys`; `MemoryDocument` implements it in memory.

use serde::{Deserialize, Serialize};

use super::range::MatchRange;
use crate::config::HighlightConfig;
use crate::error::HighlightResult;

// =============================================================================
// Plans
// =============================================================================

/// One piece of a container's content.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub enum Segment {
    /// Plain text kept as a text node.
    Text(String),
    /// Text wrapped in a marker element.
    Mark(String),
}

/// Content of the container that replaces one text node.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct ContainerPlan {
    pub segments: Vec<Segment>,
}

impl ContainerPlan {
    /// Split `text` around merged `ranges`.
    ///
    /// Returns `None` when there is nothing to mark. Ranges must be sorted,
    /// disjoint and lie on char boundaries (as `merge_ranges` output over
    /// regex offsets does).
    pub fn build(text: &str, ranges: &[MatchRange]) -> Option<Self> {
        if ranges.is_empty() {
            return None;
        }

        let mut segments = Vec::with_capacity(ranges.len() * 2 + 1);
        let mut cursor = 0;
        for range in ranges {
            let (start, end) = (range.start.max(cursor), range.end.min(text.len()));
            if start >= end {
                continue;
            }
            if start > cursor {
                segments.push(Segment::Text(text[cursor..start].to_string()));
            }
            segments.push(Segment::Mark(text[start..end].to_string()));
            cursor = end;
        }
        if cursor < text.len() {
            segments.push(Segment::Text(text[cursor..].to_string()));
        }

        let plan = Self { segments };
        (plan.marker_count() > 0).then_some(plan)
    }

    pub fn marker_count(&self) -> usize {
        self.segments.iter().filter(|s| matches!(s, Segment::Mark(_))).count()
    }

    /// Concatenated text of every segment; equals the replaced node's text.
    pub fn text(&self) -> String {
        self.segments
            .iter()
            .map(|s| match s {
                Segment::Text(t) | Segment::Mark(t) => t.as_str(),
            })
            .collect()
    }
}

/// Every (node -> container) substitution of one pass, in document order.
#[derive(Debug, Clone)]
pub struct HighlightPlan<N> {
    pub entries: Vec<(N, ContainerPlan)>,
}

impl<N> Default for HighlightPlan<N> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<N> HighlightPlan<N> {
    pub fn marker_count(&self) -> usize {
        self.entries.iter().map(|(_, plan)| plan.marker_count()).sum()
    }
}

/// A searchable text node and its current content.
#[derive(Debug, Clone)]
pub struct TextNode<N> {
    pub node: N,
    pub text: String,
}

// =============================================================================
// TextTree
// =============================================================================

/// Document operations the highlight engine depends on.
pub trait TextTree {
    type Node: Clone + PartialEq;
    type Container: Clone;
    type Marker: Clone;

    /// Searchable text nodes under the body, in document order.
    ///
    /// Excludes text inside skipped tags, hidden elements and existing
    /// containers, and text that is blank after trimming.
    fn text_nodes(&self, config: &HighlightConfig) -> HighlightResult<Vec<TextNode<Self::Node>>>;

    /// Replace `node` with a container built from `plan`.
    ///
    /// Returns the container and its markers in order. Fails with
    /// `HighlightError::DetachedNode` if the node has lost its parent.
    fn apply_container(
        &mut self,
        node: &Self::Node,
        plan: &ContainerPlan,
        config: &HighlightConfig,
    ) -> HighlightResult<(Self::Container, Vec<Self::Marker>)>;

    /// Replace a container with one text node holding its text.
    ///
    /// Returns the parent the text node now lives in, or `None` if the
    /// container had already been removed from the document.
    fn restore_container(
        &mut self,
        container: &Self::Container,
    ) -> HighlightResult<Option<Self::Node>>;

    /// Merge adjacent text children of `node` and drop empty ones.
    fn normalize(&mut self, node: &Self::Node) -> HighlightResult<()>;

    fn set_marker_active(
        &mut self,
        marker: &Self::Marker,
        active: bool,
        config: &HighlightConfig,
    ) -> HighlightResult<()>;

    /// Fire-and-forget; nothing waits for the scroll to finish.
    fn scroll_into_view(&mut self, marker: &Self::Marker, smooth: bool);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_splits_around_ranges() {
        let ranges = [MatchRange::new(0, 2), MatchRange::new(4, 6)];
        let plan = ContainerPlan::build("abcdefg", &ranges).unwrap();

        assert_eq!(
            plan.segments,
            vec![
                Segment::Mark("ab".to_string()),
                Segment::Text("cd".to_string()),
                Segment::Mark("ef".to_string()),
                Segment::Text("g".to_string()),
            ]
        );
        assert_eq!(plan.marker_count(), 2);
        assert_eq!(plan.text(), "abcdefg");
    }

    #[test]
    fn test_build_whole_text_marked() {
        let plan = ContainerPlan::build("abc", &[MatchRange::new(0, 3)]).unwrap();
        assert_eq!(plan.segments, vec![Segment::Mark("abc".to_string())]);
    }

    #[test]
    fn test_build_without_ranges() {
        assert!(ContainerPlan::build("abc", &[]).is_none());
        assert!(ContainerPlan::build("abc", &[MatchRange::new(5, 9)]).is_none());
    }
}

pub mod range;
pub mod words;
pub mod scorer;
pub mod matcher;
pub mod tree;
pub mod memory;
pub mod web;
pub mod engine;

pub use engine::{Direction, HighlightEngine, HighlightSummary};
pub use matcher::{QueryMatcher, SearchMode};
pub use memory::{MemoryDocument, NodeId};
pub use range::{merge_ranges, MatchRange};
pub use scorer::{ApproximateScorer, MatchScorer, ScorerOptions, WordRecord};
pub use tree::{ContainerPlan, HighlightPlan, Segment, TextNode, TextTree};
pub use web::WebTree;

#[cfg(test)]
mod tests;

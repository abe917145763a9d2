//! Tests for whole-word fuzzy highlighting

use crate::config::HighlightConfig;
use crate::highlight::engine::{HighlightEngine, HighlightSummary};
use crate::highlight::matcher::SearchMode;
use crate::highlight::memory::MemoryDocument;
use crate::highlight::scorer::{MatchScorer, ScorerOptions, WordRecord};
use crate::highlight::words::WordSplitter;

fn engine(paragraphs: &[&str]) -> HighlightEngine<MemoryDocument> {
    HighlightEngine::new(MemoryDocument::with_paragraphs(paragraphs), HighlightConfig::default())
}

fn marker_texts(engine: &HighlightEngine<MemoryDocument>) -> Vec<String> {
    engine.markers().iter().map(|m| engine.tree().text_content(*m)).collect()
}

#[test]
fn test_typo_matches_at_default_threshold() {
    let mut engine = engine(&["hello world"]);
    let summary = engine.highlight("helo", SearchMode::Fuzzy, 0.4);

    assert!(summary.total >= 1);
    assert_eq!(marker_texts(&engine)[0], "hello");
}

#[test]
fn test_zero_threshold_is_exact_only() {
    let mut engine = engine(&["hello world"]);
    assert_eq!(engine.highlight("helo", SearchMode::Fuzzy, 0.0), HighlightSummary::EMPTY);
}

#[test]
fn test_threshold_is_clamped() {
    let mut engine = engine(&["hello world"]);
    assert_eq!(engine.highlight("helo", SearchMode::Fuzzy, -2.0), HighlightSummary::EMPTY);
    // Clamped to 1.0: every word passes, and the two words stay separate markers.
    assert_eq!(engine.highlight("helo", SearchMode::Fuzzy, 9.0).total, 2);
}

#[test]
fn test_markers_never_span_partial_words() {
    let text = "internationalization of intern_ships, interns and internal notes";
    let mut engine = engine(&[text]);
    engine.highlight("intern", SearchMode::Fuzzy, 0.3);

    let words: Vec<String> =
        WordSplitter::new().split(text).iter().map(|w| w.text.to_string()).collect();
    let marked = marker_texts(&engine);
    assert!(!marked.is_empty());
    for m in &marked {
        assert!(words.contains(m), "marker {:?} is not a whole word", m);
    }
}

#[test]
fn test_fuzzy_is_case_insensitive() {
    let mut engine = engine(&["Rust RUST rust"]);
    assert_eq!(engine.highlight("rust", SearchMode::Fuzzy, 0.0).total, 3);
    assert_eq!(marker_texts(&engine), vec!["Rust", "RUST", "rust"]);
}

/// Selects every word regardless of the query, twice over.
struct EveryWordTwice;

impl MatchScorer for EveryWordTwice {
    fn select(
        &self,
        _query: &str,
        words: &[WordRecord<'_>],
        _options: &ScorerOptions,
    ) -> Vec<usize> {
        (0..words.len()).chain(0..words.len()).collect()
    }
}

#[test]
fn test_duplicate_selections_yield_one_marker_per_word() {
    let mut engine = HighlightEngine::with_scorer(
        MemoryDocument::with_paragraphs(&["alpha beta"]),
        HighlightConfig::default(),
        Box::new(EveryWordTwice),
    );
    let summary = engine.highlight("anything", SearchMode::Fuzzy, 0.4);

    assert_eq!(summary.total, 2);
    assert_eq!(marker_texts(&engine), vec!["alpha", "beta"]);
}

#[test]
fn test_custom_scorer_is_not_used_for_regex() {
    let mut engine = HighlightEngine::with_scorer(
        MemoryDocument::with_paragraphs(&["alpha beta"]),
        HighlightConfig::default(),
        Box::new(EveryWordTwice),
    );
    assert_eq!(engine.highlight("beta", SearchMode::Regex, 0.4).total, 1);
}

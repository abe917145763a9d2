//! Fuzzy word scoring
//!
//! The engine only needs a yes/no answer per word: does this word resemble
//! the query closely enough under the threshold? `MatchScorer` is that seam.
//! `ApproximateScorer` answers it with an approximate substring search:
//!
//! - case-insensitive, over grapheme clusters
//! - the query may align anywhere in the word (location ignored)
//! - score = fewest edit errors against any substring / query length
//! - the query is scored as given; surrounding whitespace counts as characters
//! - a word passes when `score <= threshold`
//!
//! Threshold 0.0 therefore accepts only words that contain the query verbatim.

use unicode_segmentation::UnicodeSegmentation;

/// A candidate word and its byte span in the node text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordRecord<'a> {
    pub text: &'a str,
    pub start: usize,
    pub end: usize,
}

/// Scoring options applied to one search.
///
/// Where the query aligns inside a word never affects its score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScorerOptions {
    /// 0.0 = exact, 1.0 = anything.
    pub threshold: f64,
    /// Keep every passing word rather than the best one.
    pub find_all_matches: bool,
}

impl ScorerOptions {
    pub fn with_threshold(threshold: f64) -> Self {
        Self { threshold, find_all_matches: true }
    }
}

/// Selects the words that fuzzily match a query.
///
/// Implementations must be monotonic in the threshold (a lower threshold
/// selects a subset) and stable (same input, same selection). Order of the
/// returned indices is irrelevant; callers re-sort by position.
pub trait MatchScorer {
    fn select(
        &self,
        query: &str,
        words: &[WordRecord<'_>],
        options: &ScorerOptions,
    ) -> Vec<usize>;
}

/// Edit-distance scorer with free alignment inside the word.
#[derive(Debug, Default, Clone, Copy)]
pub struct ApproximateScorer;

impl ApproximateScorer {
    pub fn new() -> Self {
        Self
    }

    /// Score of `word` against an already segmented, lowercased query.
    fn score(query: &[String], word: &str) -> f64 {
        if query.is_empty() {
            return 1.0;
        }
        let word = graphemes_lower(word);
        best_alignment_errors(query, &word) as f64 / query.len() as f64
    }
}

impl MatchScorer for ApproximateScorer {
    fn select(
        &self,
        query: &str,
        words: &[WordRecord<'_>],
        options: &ScorerOptions,
    ) -> Vec<usize> {
        let query = graphemes_lower(query);
        if query.is_empty() {
            return Vec::new();
        }

        let scored = words
            .iter()
            .enumerate()
            .map(|(idx, word)| (idx, Self::score(&query, word.text)))
            .filter(|(_, score)| *score <= options.threshold);

        if options.find_all_matches {
            return scored.map(|(idx, _)| idx).collect();
        }

        // Single best word; earliest wins ties.
        scored
            .fold(None::<(usize, f64)>, |best, (idx, score)| match best {
                Some((_, best_score)) if best_score <= score => best,
                _ => Some((idx, score)),
            })
            .map(|(idx, _)| vec![idx])
            .unwrap_or_default()
    }
}

fn graphemes_lower(text: &str) -> Vec<String> {
    text.graphemes(true).map(|g| g.to_lowercase()).collect()
}

/// Fewest insertions, deletions or substitutions turning `query` into some
/// substring of `text` (Sellers' variant of Levenshtein).
fn best_alignment_errors(query: &[String], text: &[String]) -> usize {
    // Row 0 is all zeros: the alignment may start at any position.
    let mut prev = vec![0usize; text.len() + 1];
    let mut cur = vec![0usize; text.len() + 1];

    for (i, q) in query.iter().enumerate() {
        cur[0] = i + 1;
        for (j, t) in text.iter().enumerate() {
            let substitution = prev[j] + usize::from(q != t);
            cur[j + 1] = substitution.min(prev[j + 1] + 1).min(cur[j] + 1);
        }
        std::mem::swap(&mut prev, &mut cur);
    }

    prev.into_iter().min().unwrap_or(query.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(list: &[&'static str]) -> Vec<WordRecord<'static>> {
        let mut offset = 0;
        list.iter()
            .map(|text| {
                let record = WordRecord { text, start: offset, end: offset + text.len() };
                offset += text.len() + 1;
                record
            })
            .collect()
    }

    fn errors(query: &str, text: &str) -> usize {
        best_alignment_errors(&graphemes_lower(query), &graphemes_lower(text))
    }

    #[test]
    fn test_alignment_errors() {
        assert_eq!(errors("helo", "hello"), 1);
        assert_eq!(errors("hello", "hello"), 0);
        assert_eq!(errors("ell", "hello"), 0);
        assert_eq!(errors("xyz", "hello"), 3);
        assert_eq!(errors("abc", ""), 3);
    }

    #[test]
    fn test_case_insensitive() {
        let scorer = ApproximateScorer::new();
        let w = words(&["HELLO", "world"]);
        assert_eq!(scorer.select("hello", &w, &ScorerOptions::with_threshold(0.0)), vec![0]);
    }

    #[test]
    fn test_threshold_controls_typo_tolerance() {
        let scorer = ApproximateScorer::new();
        let w = words(&["hello", "world"]);

        assert_eq!(scorer.select("helo", &w, &ScorerOptions::with_threshold(0.4)), vec![0]);
        assert!(scorer.select("helo", &w, &ScorerOptions::with_threshold(0.0)).is_empty());
    }

    #[test]
    fn test_lower_threshold_selects_subset() {
        let scorer = ApproximateScorer::new();
        let w = words(&["search", "serach", "starch", "reach", "banana"]);

        let mut previous: Vec<usize> = Vec::new();
        for step in 0..=10 {
            let options = ScorerOptions::with_threshold(step as f64 / 10.0);
            let selected = scorer.select("search", &w, &options);
            assert!(previous.iter().all(|idx| selected.contains(idx)));
            previous = selected;
        }
        assert_eq!(previous.len(), w.len());
    }

    #[test]
    fn test_best_only_when_not_finding_all() {
        let scorer = ApproximateScorer::new();
        let w = words(&["helo", "hello", "help"]);
        let options =
            ScorerOptions { find_all_matches: false, ..ScorerOptions::with_threshold(0.5) };
        assert_eq!(scorer.select("hello", &w, &options), vec![1]);
    }

    #[test]
    fn test_empty_query_selects_nothing() {
        let scorer = ApproximateScorer::new();
        let w = words(&["hello"]);
        assert!(scorer.select("", &w, &ScorerOptions::with_threshold(1.0)).is_empty());
    }

    #[test]
    fn test_surrounding_whitespace_is_scored() {
        let scorer = ApproximateScorer::new();
        let w = words(&["hello"]);

        // One extra character out of six: score 1/6.
        assert!(scorer.select(" hello", &w, &ScorerOptions::with_threshold(0.0)).is_empty());
        assert_eq!(scorer.select(" hello", &w, &ScorerOptions::with_threshold(0.2)), vec![0]);
    }

    #[test]
    fn test_alignment_position_does_not_matter() {
        let scorer = ApproximateScorer::new();
        let w = words(&["helo", "xxxxxxxxxxxxhelo"]);
        assert_eq!(scorer.select("helo", &w, &ScorerOptions::with_threshold(0.0)), vec![0, 1]);
    }
}

//! Query matchers: turn one node's text into merged match ranges.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use super::range::{dedup_ranges, merge_ranges, MatchRange};
use super::scorer::{MatchScorer, ScorerOptions};
use super::words::WordSplitter;
use crate::error::HighlightResult;

/// How a query is interpreted.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Case-insensitive regular expression.
    Regex,
    /// Case-insensitive plain text, metacharacters escaped.
    Literal,
    /// Whole words scored against the query.
    Fuzzy,
}

impl SearchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchMode::Regex => "regex",
            SearchMode::Literal => "literal",
            SearchMode::Fuzzy => "fuzzy",
        }
    }
}

/// A compiled query, ready to scan text nodes.
#[derive(Debug, Clone)]
pub enum QueryMatcher {
    Pattern(Regex),
    Fuzzy {
        query: String,
        options: ScorerOptions,
        splitter: WordSplitter,
    },
}

impl QueryMatcher {
    /// Compile `query` for `mode`. Fails only on an invalid regex.
    pub fn build(query: &str, mode: SearchMode, options: ScorerOptions) -> HighlightResult<Self> {
        match mode {
            SearchMode::Regex => Ok(Self::Pattern(compile_insensitive(query)?)),
            SearchMode::Literal => Ok(Self::Pattern(compile_insensitive(&regex::escape(query))?)),
            SearchMode::Fuzzy => Ok(Self::Fuzzy {
                query: query.to_string(),
                options,
                splitter: WordSplitter::new(),
            }),
        }
    }

    /// Merged ranges for one node's text.
    pub fn find_ranges(&self, text: &str, scorer: &dyn MatchScorer) -> Vec<MatchRange> {
        let ranges = match self {
            Self::Pattern(re) => re
                .find_iter(text)
                .filter(|m| !m.is_empty())
                .map(|m| MatchRange::new(m.start(), m.end()))
                .collect(),
            Self::Fuzzy { query, options, splitter } => {
                let words = splitter.split(text);
                let mut ranges: Vec<MatchRange> = scorer
                    .select(query, &words, options)
                    .into_iter()
                    .filter_map(|idx| words.get(idx))
                    .map(|w| MatchRange::new(w.start, w.end))
                    .collect();
                dedup_ranges(&mut ranges);
                ranges
            }
        };
        merge_ranges(ranges)
    }
}

fn compile_insensitive(pattern: &str) -> HighlightResult<Regex> {
    Ok(RegexBuilder::new(pattern).case_insensitive(true).build()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HighlightError;
    use crate::highlight::scorer::ApproximateScorer;

    fn ranges(query: &str, mode: SearchMode, threshold: f64, text: &str) -> Vec<(usize, usize)> {
        let options = ScorerOptions::with_threshold(threshold);
        let matcher = QueryMatcher::build(query, mode, options).unwrap();
        matcher
            .find_ranges(text, &ApproximateScorer::new())
            .into_iter()
            .map(|r| (r.start, r.end))
            .collect()
    }

    #[test]
    fn test_regex_matches() {
        assert_eq!(ranges("a.c", SearchMode::Regex, 0.0, "abc xabcx"), vec![(0, 3), (5, 8)]);
    }

    #[test]
    fn test_regex_is_case_insensitive() {
        assert_eq!(ranges("ABC", SearchMode::Regex, 0.0, "abc"), vec![(0, 3)]);
    }

    #[test]
    fn test_literal_escapes_metacharacters() {
        assert_eq!(ranges("a.c", SearchMode::Literal, 0.0, "abc a.c"), vec![(4, 7)]);
        assert_eq!(ranges("(1+1)", SearchMode::Literal, 0.0, "is (1+1)?"), vec![(3, 8)]);
    }

    #[test]
    fn test_zero_length_matches_dropped() {
        assert!(ranges("x*", SearchMode::Regex, 0.0, "abc").is_empty());
        assert!(ranges("^", SearchMode::Regex, 0.0, "abc").is_empty());
    }

    #[test]
    fn test_invalid_regex_is_an_error() {
        let options = ScorerOptions::with_threshold(0.4);
        let result = QueryMatcher::build("(unclosed", SearchMode::Regex, options);
        assert!(result.is_err());
    }

    #[test]
    fn test_lookaround_and_backreferences_unsupported() {
        for pattern in ["foo(?=bar)", "(?<!x)y", r"(a)\1"] {
            let options = ScorerOptions::with_threshold(0.4);
            let result = QueryMatcher::build(pattern, SearchMode::Regex, options);
            assert!(
                matches!(result, Err(HighlightError::InvalidPattern(_))),
                "{} should be rejected",
                pattern
            );
        }
    }

    #[test]
    fn test_fuzzy_marks_whole_words() {
        assert_eq!(ranges("helo", SearchMode::Fuzzy, 0.4, "hello world"), vec![(0, 5)]);
        assert!(ranges("helo", SearchMode::Fuzzy, 0.0, "hello world").is_empty());
    }

    #[test]
    fn test_fuzzy_substring_hit_still_spans_word() {
        assert_eq!(ranges("ell", SearchMode::Fuzzy, 0.0, "a hello"), vec![(2, 7)]);
    }

    #[test]
    fn test_search_mode_wire_names() {
        let mode: SearchMode = serde_json::from_str(r#""fuzzy""#).unwrap();
        assert_eq!(mode, SearchMode::Fuzzy);
        assert_eq!(SearchMode::Literal.as_str(), "literal");
    }
}

//! Word boundaries for whole-word fuzzy highlighting.

use regex::Regex;

use super::scorer::WordRecord;

/// Splits text into maximal runs of word characters (Unicode letters,
/// digits, marks, connector punctuation such as `_`).
#[derive(Debug, Clone)]
pub struct WordSplitter {
    word_re: Regex,
}

impl Default for WordSplitter {
    fn default() -> Self {
        Self::new()
    }
}

impl WordSplitter {
    pub fn new() -> Self {
        // Literal pattern; cannot fail to compile.
        let word_re = Regex::new(r"\w+").unwrap();
        Self { word_re }
    }

    pub fn split<'a>(&self, text: &'a str) -> Vec<WordRecord<'a>> {
        self.word_re
            .find_iter(text)
            .map(|m| WordRecord { text: m.as_str(), start: m.start(), end: m.end() })
            .collect()
    }
}

//! Match ranges and per-node range merging.

use serde::{Deserialize, Serialize};

/// Half-open byte interval `[start, end)` within one text node's content.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MatchRange {
    pub start: usize,
    pub end: usize,
}

impl MatchRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// Sort by start and fold overlapping or adjacent ranges.
///
/// Empty ranges are dropped. The result is strictly increasing with gaps
/// between consecutive ranges.
pub fn merge_ranges(mut ranges: Vec<MatchRange>) -> Vec<MatchRange> {
    ranges.retain(|r| !r.is_empty());
    ranges.sort_unstable();

    let mut merged: Vec<MatchRange> = Vec::with_capacity(ranges.len());
    for range in ranges {
        match merged.last_mut() {
            Some(last) if range.start <= last.end => {
                last.end = last.end.max(range.end);
            }
            _ => merged.push(range),
        }
    }
    merged
}

/// Drop identical `[start, end)` pairs, keeping first occurrences.
pub fn dedup_ranges(ranges: &mut Vec<MatchRange>) {
    let mut seen = std::collections::HashSet::with_capacity(ranges.len());
    ranges.retain(|r| seen.insert(*r));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(start: usize, end: usize) -> MatchRange {
        MatchRange::new(start, end)
    }

    #[test]
    fn test_overlapping_ranges_merge() {
        assert_eq!(merge_ranges(vec![r(0, 3), r(2, 5)]), vec![r(0, 5)]);
    }

    #[test]
    fn test_disjoint_ranges_stay_apart() {
        assert_eq!(merge_ranges(vec![r(4, 6), r(0, 2)]), vec![r(0, 2), r(4, 6)]);
    }

    #[test]
    fn test_adjacent_ranges_merge() {
        assert_eq!(merge_ranges(vec![r(3, 5), r(0, 3)]), vec![r(0, 5)]);
    }

    #[test]
    fn test_contained_range_is_absorbed() {
        assert_eq!(merge_ranges(vec![r(0, 10), r(2, 4), r(9, 12)]), vec![r(0, 12)]);
    }

    #[test]
    fn test_empty_ranges_dropped() {
        assert_eq!(merge_ranges(vec![r(2, 2), r(5, 7)]), vec![r(5, 7)]);
        assert!(merge_ranges(Vec::new()).is_empty());
    }

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let mut ranges = vec![r(0, 5), r(6, 9), r(0, 5)];
        dedup_ranges(&mut ranges);
        assert_eq!(ranges, vec![r(0, 5), r(6, 9)]);
    }
}

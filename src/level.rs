//! Size clustering turns visual heading heights into nesting levels.
//!
//! Glyph heights are continuous and noisy, so sizes within a small tolerance collapse into one
//! cluster. Larger clusters get shallower levels. A cluster boundary is only discovered when a
//! larger, previously unseen size shows up, so assignment runs in two phases: every heading
//! records the cluster key it joined, and only once all sizes are in is each heading mapped
//! through the finished size → level table.

use crate::outline::{HeadingCandidate, OutlineEntry};
use std::collections::BTreeMap;
use tracing::debug;

/// Sizes this close (in rounded glyph units) belong to the same cluster by default.
pub const DEFAULT_TOLERANCE: i64 = 1;

#[derive(Clone, Copy, Debug)]
/// Assigns levels to headings from their rounded glyph heights.
pub struct SizeClusterer {
    tolerance: i64,
}

impl Default for SizeClusterer {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE)
    }
}

impl SizeClusterer {
    #[must_use]
    /// Creates a clusterer; negative tolerances are treated as zero.
    pub fn new(tolerance: i64) -> Self {
        Self {
            tolerance: tolerance.max(0),
        }
    }

    #[must_use]
    /// Levels for a sequence of sizes, in input order.
    ///
    /// Equal or near-equal sizes share a level and larger sizes get smaller level numbers:
    /// `[20, 20, 14, 20]` yields `[1, 1, 2, 1]`.
    pub fn levels(self, sizes: &[i64]) -> Vec<usize> {
        let mut table = LevelTable::default();
        let keys: Vec<i64> = sizes
            .iter()
            .map(|&size| table.insert(size, self.tolerance))
            .collect();
        keys.into_iter().map(|key| table.level_of(key)).collect()
    }

    #[must_use]
    /// Resolves size-only candidates into outline entries.
    ///
    /// Candidates without a positive `raw_size` cannot take part in clustering and are dropped.
    pub fn assign(self, candidates: Vec<HeadingCandidate>) -> Vec<OutlineEntry> {
        let (titles, sizes): (Vec<String>, Vec<i64>) = candidates
            .into_iter()
            .filter_map(|candidate| match candidate.raw_size {
                Some(size) if size > 0 => Some((candidate.title, size)),
                _ => {
                    debug!(title = %candidate.title, "dropping heading without usable size");
                    None
                }
            })
            .unzip();

        let levels = self.levels(&sizes);
        titles
            .into_iter()
            .zip(levels)
            .map(|(title, level)| OutlineEntry::new(level, title))
            .collect()
    }
}

#[derive(Default, Debug)]
/// Size → level table, ordered by size.
struct LevelTable {
    levels: BTreeMap<i64, usize>,
}

impl LevelTable {
    /// Places `size` into a cluster and returns that cluster's key.
    fn insert(&mut self, size: i64, tolerance: i64) -> i64 {
        let floor = size - tolerance;
        let mut prev_level = 0;
        let mut smaller_found = false;

        for (&key, &level) in self.levels.iter().rev() {
            if (floor..=size).contains(&key) {
                return key;
            }
            if key < floor {
                prev_level = level - 1;
                smaller_found = true;
                break;
            }
            prev_level = level;
        }

        if smaller_found {
            // Make room for the new cluster above every distinctly smaller one
            for level in self.levels.range_mut(..floor).map(|(_, level)| level) {
                *level += 1;
            }
        }
        self.levels.insert(size, prev_level + 1);
        debug!(size, level = prev_level + 1, "new size cluster");
        size
    }

    fn level_of(&self, key: i64) -> usize {
        self.levels.get(&key).copied().unwrap_or(1)
    }
}

#[cfg(test)]
#[path = "tests/level.rs"]
mod tests;

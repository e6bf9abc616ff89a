//! Transposition table keyed by position identity.
//!
//! Stores one score per key, independent of the alpha-beta window that
//! produced it. A score recorded under a narrow window is returned as-is when
//! the same position is reached again under a wider one.

use std::collections::HashMap;

/// Hit/store counters for one table lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableStats {
    pub probes: u64,
    pub hits: u64,
    pub stores: u64,
}

#[derive(Debug, Clone, Default)]
pub struct TranspositionTable {
    entries: HashMap<u64, i32>,
    stats: TableStats,
}

impl TranspositionTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn probe(&mut self, key: u64) -> Option<i32> {
        self.stats.probes += 1;
        let score = self.entries.get(&key).copied();
        if score.is_some() {
            self.stats.hits += 1;
        }
        score
    }

    #[inline]
    pub fn store(&mut self, key: u64, score: i32) {
        self.stats.stores += 1;
        self.entries.insert(key, score);
    }

    /// Drop every entry and reset the counters.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.stats = TableStats::default();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> TableStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_and_store() {
        let mut tt = TranspositionTable::new();
        assert_eq!(tt.probe(7), None);

        tt.store(7, 0);
        assert_eq!(tt.probe(7), Some(0));

        tt.store(7, -12);
        assert_eq!(tt.probe(7), Some(-12));
        assert_eq!(tt.len(), 1);

        let stats = tt.stats();
        assert_eq!(stats.probes, 3);
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.stores, 2);
    }

    #[test]
    fn test_clear() {
        let mut tt = TranspositionTable::new();
        tt.store(1, 5);
        tt.store(2, 6);
        tt.clear();
        assert!(tt.is_empty());
        assert_eq!(tt.probe(1), None);
        assert_eq!(tt.stats().hits, 0);
    }
}

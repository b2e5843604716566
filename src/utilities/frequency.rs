//! Window composition state shared by the two-pointer controller and the
//! set-based fixed-window variants.
//!
//! A `FrequencyMap` counts how many of each element value currently sit
//! inside the active window. An entry is removed outright when its count
//! reaches zero, so `distinct_count()` always equals the number of distinct
//! values actually in-window, and the sum of all counts equals the window
//! size. No ordering guarantees over keys.

use std::collections::HashMap;
use std::hash::Hash;

#[derive(Debug, Clone, Default)]
pub struct FrequencyMap<T: Eq + Hash> {
    counts: HashMap<T, usize>,
    total: usize,
}

impl<T: Eq + Hash> FrequencyMap<T> {
    pub fn new() -> Self {
        Self {
            counts: HashMap::new(),
            total: 0,
        }
    }

    /// Add one occurrence of `key` to the window.
    #[inline]
    pub fn increment(&mut self, key: T) {
        *self.counts.entry(key).or_insert(0) += 1;
        self.total += 1;
    }

    /// Remove one occurrence of `key`. The entry is deleted when its count
    /// reaches zero. Decrementing an absent key is a no-op.
    #[inline]
    pub fn decrement(&mut self, key: &T) {
        if let Some(count) = self.counts.get_mut(key) {
            *count -= 1;
            self.total -= 1;
            if *count == 0 {
                self.counts.remove(key);
            }
        }
    }

    #[inline]
    pub fn contains(&self, key: &T) -> bool {
        self.counts.contains_key(key)
    }

    #[inline]
    pub fn count(&self, key: &T) -> usize {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Number of distinct values currently in-window.
    #[inline]
    pub fn distinct_count(&self) -> usize {
        self.counts.len()
    }

    /// Total occurrences across all keys, i.e. the window size.
    #[inline]
    pub fn total(&self) -> usize {
        self.total
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn clear(&mut self) {
        self.counts.clear();
        self.total = 0;
    }
}

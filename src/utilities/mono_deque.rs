//! Monotonic index/value deque shared by the fixed-window trackers.
//!
//! Stores `(index, value)` pairs whose values are kept strictly monotonic
//! from front to back: decreasing for a max tracker, increasing for a min
//! tracker. The front pair is always the current window's extremum. Each
//! index is pushed and popped at most once, so a full pass over a stream
//! costs O(n) regardless of window size, with O(k) worst-case space.

use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct MonoDeque<T> {
    buf: VecDeque<(usize, T)>,
    is_max: bool,
}

impl<T: Copy + PartialOrd> MonoDeque<T> {
    /// Deque whose front tracks the running maximum.
    pub fn max_tracker(capacity: usize) -> Self {
        Self {
            buf: VecDeque::with_capacity(capacity),
            is_max: true,
        }
    }

    /// Deque whose front tracks the running minimum.
    pub fn min_tracker(capacity: usize) -> Self {
        Self {
            buf: VecDeque::with_capacity(capacity),
            is_max: false,
        }
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Index and value of the current extremum, if any element is in range.
    #[inline(always)]
    pub fn front(&self) -> Option<(usize, T)> {
        self.buf.front().copied()
    }

    /// Admit the next stream element. Dominated tail entries are discarded
    /// first; ties evict the older index, keeping values strictly monotonic.
    #[inline]
    pub fn push(&mut self, idx: usize, value: T) {
        while let Some(&(_, back)) = self.buf.back() {
            let dominated = if self.is_max {
                back <= value
            } else {
                back >= value
            };
            if !dominated {
                break;
            }
            self.buf.pop_back();
        }
        self.buf.push_back((idx, value));
    }

    /// Evict front entries whose index fell out of the window, i.e. every
    /// entry with `index < oldest_allowed`.
    #[inline]
    pub fn expire(&mut self, oldest_allowed: usize) {
        while let Some(&(idx, _)) = self.buf.front() {
            if idx >= oldest_allowed {
                break;
            }
            self.buf.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.buf.clear();
    }
}

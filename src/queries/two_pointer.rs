//! # Two-Pointer Shrink–Expand Controller
//!
//! A single forward pass maintaining a variable-size window `[left, right]`
//! over the stream. `right` advances exactly once per step, folding the new
//! element into the window's [`FrequencyMap`] and tally; `left` then
//! advances one element at a time while a caller-supplied invalidity
//! predicate holds, re-checked after every removal. `left` never passes
//! `right + 1` and neither pointer ever backtracks.
//!
//! Two evaluation disciplines, per the `exact_match` flag:
//! - `false` (longest-window family): the observation callback runs once
//!   the shrink loop has restored validity.
//! - `true` (shortest-window / full-cover family): the predicate marks
//!   satisfaction rather than violation, and the callback runs before each
//!   single shrink step while satisfaction holds, so removing one
//!   occurrence of a multiply-counted key is re-evaluated immediately.
//!
//! Concrete queries built on the controller live in this module:
//! [`longest_distinct_limit`], [`count_within_distinct_limit`],
//! [`shortest_sum_at_least`], and the required/formed-counter
//! [`min_window_cover`].
//!
//! ## Errors
//! - **InvalidLimit**: two_pointer: distinct-element limit is zero.
//!
//! An empty stream, an unreachable target, or an uncoverable pattern yield
//! identity answers (0 / `None`), never errors.

use crate::queries::Subrange;
use crate::utilities::frequency::FrequencyMap;
use std::collections::VecDeque;
use std::hash::Hash;
use thiserror::Error;

/// Live composition of the current window, observable by caller predicates.
#[derive(Debug, Clone)]
pub struct WindowState<T: Eq + Hash> {
    left: usize,
    next: usize,
    buf: VecDeque<T>,
    freq: FrequencyMap<T>,
    tally: i64,
}

impl<T: Copy + Eq + Hash> WindowState<T> {
    fn new() -> Self {
        Self {
            left: 0,
            next: 0,
            buf: VecDeque::new(),
            freq: FrequencyMap::new(),
            tally: 0,
        }
    }

    #[inline]
    fn push(&mut self, element: T, weight: i64) {
        self.buf.push_back(element);
        self.freq.increment(element);
        self.tally += weight;
        self.next += 1;
    }

    /// Remove the leftmost element; returns it for weight adjustment.
    #[inline]
    fn shrink_one(&mut self) -> Option<T> {
        let element = self.buf.pop_front()?;
        self.freq.decrement(&element);
        self.left += 1;
        Some(element)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    #[inline]
    pub fn left(&self) -> usize {
        self.left
    }

    /// Index of the newest element, `None` while the window is empty.
    #[inline]
    pub fn right(&self) -> Option<usize> {
        if self.buf.is_empty() {
            None
        } else {
            Some(self.left + self.buf.len() - 1)
        }
    }

    #[inline]
    pub fn distinct(&self) -> usize {
        self.freq.distinct_count()
    }

    /// Running sum of element weights currently in-window.
    #[inline]
    pub fn tally(&self) -> i64 {
        self.tally
    }

    #[inline]
    pub fn freq(&self) -> &FrequencyMap<T> {
        &self.freq
    }

    fn range(&self) -> Option<Subrange> {
        self.right().map(|right| Subrange::new(self.left, right))
    }
}

/// Running answer mutated by the observation callback.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TwoPointerAnswer {
    pub length: Option<usize>,
    pub range: Option<Subrange>,
    pub count: u64,
}

pub struct TwoPointerController<T, W, P, C>
where
    T: Copy + Eq + Hash,
    W: Fn(&T) -> i64,
    P: FnMut(&WindowState<T>) -> bool,
    C: FnMut(&WindowState<T>, &mut TwoPointerAnswer),
{
    state: WindowState<T>,
    weigh: W,
    is_invalid: P,
    on_valid: C,
    exact_match: bool,
    answer: TwoPointerAnswer,
}

impl<T, P, C> TwoPointerController<T, fn(&T) -> i64, P, C>
where
    T: Copy + Eq + Hash,
    P: FnMut(&WindowState<T>) -> bool,
    C: FnMut(&WindowState<T>, &mut TwoPointerAnswer),
{
    pub fn new(is_invalid: P, on_valid: C, exact_match: bool) -> Self {
        fn zero<T>(_: &T) -> i64 {
            0
        }
        Self {
            state: WindowState::new(),
            weigh: zero::<T>,
            is_invalid,
            on_valid,
            exact_match,
            answer: TwoPointerAnswer::default(),
        }
    }
}

impl<T, W, P, C> TwoPointerController<T, W, P, C>
where
    T: Copy + Eq + Hash,
    W: Fn(&T) -> i64,
    P: FnMut(&WindowState<T>) -> bool,
    C: FnMut(&WindowState<T>, &mut TwoPointerAnswer),
{
    /// Replace the per-element weight folded into the window tally.
    pub fn with_weight<W2: Fn(&T) -> i64>(self, weigh: W2) -> TwoPointerController<T, W2, P, C> {
        TwoPointerController {
            state: self.state,
            weigh,
            is_invalid: self.is_invalid,
            on_valid: self.on_valid,
            exact_match: self.exact_match,
            answer: self.answer,
        }
    }

    /// Expand with the next element, then shrink per the invalidity
    /// predicate. Runs to completion synchronously; all window invariants
    /// hold on return.
    pub fn step(&mut self, element: T) -> &TwoPointerAnswer {
        let weight = (self.weigh)(&element);
        self.state.push(element, weight);

        if self.exact_match {
            while !self.state.is_empty() && (self.is_invalid)(&self.state) {
                (self.on_valid)(&self.state, &mut self.answer);
                if let Some(removed) = self.state.shrink_one() {
                    self.state.tally -= (self.weigh)(&removed);
                }
            }
        } else {
            while !self.state.is_empty() && (self.is_invalid)(&self.state) {
                if let Some(removed) = self.state.shrink_one() {
                    self.state.tally -= (self.weigh)(&removed);
                }
            }
            (self.on_valid)(&self.state, &mut self.answer);
        }
        &self.answer
    }

    pub fn state(&self) -> &WindowState<T> {
        &self.state
    }

    pub fn answer(&self) -> &TwoPointerAnswer {
        &self.answer
    }

    pub fn into_answer(self) -> TwoPointerAnswer {
        self.answer
    }
}

#[derive(Debug, Error)]
pub enum TwoPointerError {
    #[error("two_pointer: Invalid distinct limit: limit = {limit}")]
    InvalidLimit { limit: usize },
}

// --- longest window with at most `limit` distinct elements ---

#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DistinctLimitParams {
    pub limit: Option<usize>,
}

impl Default for DistinctLimitParams {
    fn default() -> Self {
        Self { limit: Some(2) }
    }
}

#[derive(Debug, Clone)]
pub struct DistinctLimitInput<'a, T> {
    pub data: &'a [T],
    pub params: DistinctLimitParams,
}

impl<'a, T> DistinctLimitInput<'a, T> {
    pub fn from_slice(data: &'a [T], params: DistinctLimitParams) -> Self {
        Self { data, params }
    }

    pub fn get_limit(&self) -> usize {
        self.params.limit.unwrap_or(2)
    }
}

#[derive(Debug, Clone)]
pub struct DistinctLimitOutput {
    pub length: usize,
    pub range: Option<Subrange>,
}

pub fn longest_distinct_limit<T: Copy + Eq + Hash>(
    input: &DistinctLimitInput<T>,
) -> Result<DistinctLimitOutput, TwoPointerError> {
    let limit = input.get_limit();
    if limit == 0 {
        return Err(TwoPointerError::InvalidLimit { limit });
    }

    let mut controller = TwoPointerController::new(
        move |state: &WindowState<T>| state.distinct() > limit,
        |state: &WindowState<T>, answer: &mut TwoPointerAnswer| {
            let len = state.len();
            if len > 0 && answer.length.map_or(true, |best| len > best) {
                answer.length = Some(len);
                answer.range = state.range();
            }
        },
        false,
    );
    for &x in input.data {
        controller.step(x);
    }
    let answer = controller.into_answer();
    Ok(DistinctLimitOutput {
        length: answer.length.unwrap_or(0),
        range: answer.range,
    })
}

/// Number of subranges with at most `limit` distinct elements. Every valid
/// window contributes one subrange per element it holds (all subranges
/// ending at `right`).
pub fn count_within_distinct_limit<T: Copy + Eq + Hash>(
    input: &DistinctLimitInput<T>,
) -> Result<u64, TwoPointerError> {
    let limit = input.get_limit();
    if limit == 0 {
        return Err(TwoPointerError::InvalidLimit { limit });
    }

    let mut controller = TwoPointerController::new(
        move |state: &WindowState<T>| state.distinct() > limit,
        |state: &WindowState<T>, answer: &mut TwoPointerAnswer| {
            answer.count += state.len() as u64;
        },
        false,
    );
    for &x in input.data {
        controller.step(x);
    }
    Ok(controller.into_answer().count)
}

// --- shortest window with tally >= target ---

#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShortestSumParams {
    pub target: Option<i64>,
}

impl Default for ShortestSumParams {
    fn default() -> Self {
        Self { target: Some(1) }
    }
}

#[derive(Debug, Clone)]
pub struct ShortestSumInput<'a> {
    pub data: &'a [i64],
    pub params: ShortestSumParams,
}

impl<'a> ShortestSumInput<'a> {
    pub fn from_slice(data: &'a [i64], params: ShortestSumParams) -> Self {
        Self { data, params }
    }

    pub fn get_target(&self) -> i64 {
        self.params.target.unwrap_or(1)
    }
}

#[derive(Debug, Clone)]
pub struct ShortestSumOutput {
    /// `None` when no window ever reaches the target.
    pub length: Option<usize>,
    pub range: Option<Subrange>,
}

pub fn shortest_sum_at_least(input: &ShortestSumInput) -> ShortestSumOutput {
    let target = input.get_target();
    // a non-positive target is met by the empty window
    if target <= 0 {
        return ShortestSumOutput {
            length: Some(0),
            range: None,
        };
    }

    let mut controller = TwoPointerController::new(
        move |state: &WindowState<i64>| state.tally() >= target,
        |state: &WindowState<i64>, answer: &mut TwoPointerAnswer| {
            let len = state.len();
            if len > 0 && answer.length.map_or(true, |best| len < best) {
                answer.length = Some(len);
                answer.range = state.range();
            }
        },
        true,
    )
    .with_weight(|&x: &i64| x);

    for &x in input.data {
        controller.step(x);
    }
    let answer = controller.into_answer();
    ShortestSumOutput {
        length: answer.length,
        range: answer.range,
    }
}

// --- minimum window covering a pattern with multiplicity ---

#[derive(Debug, Clone)]
pub struct MinWindowCoverInput<'a, T> {
    pub haystack: &'a [T],
    pub pattern: &'a [T],
}

impl<'a, T> MinWindowCoverInput<'a, T> {
    pub fn from_slices(haystack: &'a [T], pattern: &'a [T]) -> Self {
        Self { haystack, pattern }
    }
}

#[derive(Debug, Clone)]
pub struct MinWindowCoverOutput {
    /// Smallest window containing every pattern element with at least its
    /// pattern multiplicity; `None` when no window covers the pattern.
    pub range: Option<Subrange>,
}

/// Exact-match variant of the controller loop: `formed` counts how many
/// required keys currently meet their required multiplicity, and the window
/// shrinks one element at a time while `formed == required`, re-checking
/// after each removal because dropping one occurrence of a multiply-counted
/// key may or may not break coverage.
pub fn min_window_cover<T: Copy + Eq + Hash>(input: &MinWindowCoverInput<T>) -> MinWindowCoverOutput {
    if input.pattern.is_empty() || input.haystack.is_empty() {
        return MinWindowCoverOutput { range: None };
    }

    let mut need: FrequencyMap<T> = FrequencyMap::new();
    for &x in input.pattern {
        need.increment(x);
    }
    let required = need.distinct_count();

    let mut window: FrequencyMap<T> = FrequencyMap::new();
    let mut formed = 0usize;
    let mut left = 0usize;
    let mut best: Option<Subrange> = None;

    for (right, &x) in input.haystack.iter().enumerate() {
        window.increment(x);
        if need.contains(&x) && window.count(&x) == need.count(&x) {
            formed += 1;
        }

        while formed == required {
            let found = Subrange::new(left, right);
            if best.map_or(true, |b| found.len() < b.len()) {
                best = Some(found);
            }
            let out = input.haystack[left];
            window.decrement(&out);
            if need.contains(&out) && window.count(&out) < need.count(&out) {
                formed -= 1;
            }
            left += 1;
        }
    }

    MinWindowCoverOutput { range: best }
}

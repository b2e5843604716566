//! # Unified per-element query engine
//!
//! Thin driver over the query-family streams: construct an engine for a
//! fixed window, a prefix-sum hash index, or a two-pointer controller, feed
//! it one element at a time with `step`, and read back the current answer
//! as a [`QueryResult`] after every element. `run_over_sequence` is a thin
//! loop over `step`.
//!
//! Engines share no mutable state: evaluating several window sizes over the
//! same source concurrently means one engine instance per worker, with the
//! input replayed or broadcast to each.
//!
//! "No window full yet" and "no subrange exists" are ordinary result
//! variants, never errors and never sentinel numbers; only construction
//! contract violations (zero window, non-positive modulo) fail.

use crate::queries::first_match::{FirstMatchParams, FirstMatchResult, FirstMatchStream};
use crate::queries::prefix_index::{
    PrefixAnswer, PrefixIndexParams, PrefixIndexStream, PrefixPolicy, PrefixTransform,
};
use crate::queries::two_pointer::{TwoPointerAnswer, TwoPointerController, WindowState};
use crate::queries::window_extremum::{
    ExtremumMode, ExtremumSample, WindowExtremumParams, WindowExtremumStream,
};
use crate::queries::{first_match::FirstMatchError, prefix_index::PrefixIndexError};
use crate::queries::window_extremum::WindowExtremumError;
use std::hash::Hash;
use std::ops::Add;
use thiserror::Error;

/// Current answer after one `step`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum QueryResult<T> {
    Extremum { index: usize, value: T },
    NoMatch,
    WindowIncomplete,
    SubrangeFound { start: usize, end: usize },
    Count(u64),
    Length(usize),
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Extremum(#[from] WindowExtremumError),
    #[error(transparent)]
    FirstMatch(#[from] FirstMatchError),
    #[error(transparent)]
    PrefixIndex(#[from] PrefixIndexError),
}

pub enum FixedWindowMode<T> {
    Max,
    Min,
    /// Both deques over the same index stream; reports the sum of window
    /// min and max, indexed at the window's last element.
    MinAndMax,
    FirstMatching(Box<dyn FnMut(&T) -> bool>),
}

enum FixedWindowInner<T> {
    Extremum(WindowExtremumStream<T>),
    FirstMatch(FirstMatchStream<T, Box<dyn FnMut(&T) -> bool>>),
}

/// Fixed-size window engine over `FixedWindowMode`.
pub struct FixedWindowEngine<T> {
    inner: FixedWindowInner<T>,
}

impl<T> FixedWindowEngine<T>
where
    T: Copy + PartialOrd + Add<Output = T>,
{
    pub fn new(window: usize, mode: FixedWindowMode<T>) -> Result<Self, EngineError> {
        let inner = match mode {
            FixedWindowMode::Max => {
                FixedWindowInner::Extremum(WindowExtremumStream::try_new(WindowExtremumParams {
                    window: Some(window),
                    mode: Some(ExtremumMode::Max),
                })?)
            }
            FixedWindowMode::Min => {
                FixedWindowInner::Extremum(WindowExtremumStream::try_new(WindowExtremumParams {
                    window: Some(window),
                    mode: Some(ExtremumMode::Min),
                })?)
            }
            FixedWindowMode::MinAndMax => {
                FixedWindowInner::Extremum(WindowExtremumStream::try_new(WindowExtremumParams {
                    window: Some(window),
                    mode: Some(ExtremumMode::MinAndMax),
                })?)
            }
            FixedWindowMode::FirstMatching(predicate) => FixedWindowInner::FirstMatch(
                FirstMatchStream::try_new(
                    FirstMatchParams {
                        window: Some(window),
                    },
                    predicate,
                )?,
            ),
        };
        Ok(Self { inner })
    }

    pub fn step(&mut self, element: T) -> QueryResult<T> {
        match &mut self.inner {
            FixedWindowInner::Extremum(stream) => match stream.update(element) {
                None => QueryResult::WindowIncomplete,
                Some(ExtremumSample::Single { index, value }) => {
                    QueryResult::Extremum { index, value }
                }
                Some(ExtremumSample::MinMax {
                    min_value,
                    max_value,
                    ..
                }) => QueryResult::Extremum {
                    index: stream.position() - 1,
                    value: min_value + max_value,
                },
            },
            FixedWindowInner::FirstMatch(stream) => match stream.update(element) {
                FirstMatchResult::Incomplete => QueryResult::WindowIncomplete,
                FirstMatchResult::NoMatch => QueryResult::NoMatch,
                FirstMatchResult::Match { index, value } => {
                    QueryResult::Extremum { index, value }
                }
            },
        }
    }

    pub fn run_over_sequence(&mut self, elements: &[T]) -> Vec<QueryResult<T>> {
        elements.iter().map(|&x| self.step(x)).collect()
    }
}

/// Prefix-sum hash index engine over `i64` streams.
pub struct PrefixIndexEngine {
    stream: PrefixIndexStream,
}

impl PrefixIndexEngine {
    pub fn new(
        policy: PrefixPolicy,
        transform: PrefixTransform,
        target: i64,
    ) -> Result<Self, EngineError> {
        let stream = PrefixIndexStream::try_new(PrefixIndexParams {
            policy: Some(policy),
            transform: Some(transform),
            target: Some(target),
        })?;
        Ok(Self { stream })
    }

    pub fn step(&mut self, element: i64) -> QueryResult<i64> {
        Self::result_of(self.stream.advance(element))
    }

    /// Whether some subrange ending at the current element folds to
    /// `target_delta`.
    pub fn exists_at(&self, target_delta: i64) -> bool {
        self.stream.exists_at(target_delta)
    }

    pub fn run_over_sequence(&mut self, elements: &[i64]) -> Vec<QueryResult<i64>> {
        elements.iter().map(|&x| self.step(x)).collect()
    }

    fn result_of(answer: PrefixAnswer) -> QueryResult<i64> {
        match answer {
            PrefixAnswer::Count(n) => QueryResult::Count(n),
            PrefixAnswer::Longest(Some(range)) => QueryResult::SubrangeFound {
                start: range.start,
                end: range.end,
            },
            PrefixAnswer::Longest(None) => QueryResult::NoMatch,
        }
    }
}

pub type ValidityFn<T> = Box<dyn FnMut(&WindowState<T>) -> bool>;
pub type OnValidFn<T> = Box<dyn FnMut(&WindowState<T>, &mut TwoPointerAnswer)>;
pub type WeightFn<T> = Box<dyn Fn(&T) -> i64>;

/// Two-pointer engine over caller-supplied validity and observation
/// callbacks. The running answer is whatever the callback recorded;
/// `step` reports the richest variant available: a recorded subrange,
/// else a recorded length, else a non-zero count, else `NoMatch`.
pub struct TwoPointerEngine<T: Copy + Eq + Hash> {
    controller: TwoPointerController<T, WeightFn<T>, ValidityFn<T>, OnValidFn<T>>,
}

impl<T: Copy + Eq + Hash> TwoPointerEngine<T> {
    pub fn new(validity: ValidityFn<T>, on_valid: OnValidFn<T>, exact_match: bool) -> Self {
        let controller = TwoPointerController::new(validity, on_valid, exact_match)
            .with_weight(Box::new(|_: &T| 0i64) as WeightFn<T>);
        Self { controller }
    }

    /// Replace the per-element weight folded into the window tally, for
    /// sum-driven predicates.
    pub fn with_weight(mut self, weigh: WeightFn<T>) -> Self {
        self.controller = self.controller.with_weight(weigh);
        self
    }

    pub fn step(&mut self, element: T) -> QueryResult<T> {
        let answer = *self.controller.step(element);
        if let Some(range) = answer.range {
            QueryResult::SubrangeFound {
                start: range.start,
                end: range.end,
            }
        } else if let Some(length) = answer.length {
            QueryResult::Length(length)
        } else if answer.count > 0 {
            QueryResult::Count(answer.count)
        } else {
            QueryResult::NoMatch
        }
    }

    pub fn state(&self) -> &WindowState<T> {
        self.controller.state()
    }

    pub fn run_over_sequence(&mut self, elements: &[T]) -> Vec<QueryResult<T>> {
        elements.iter().map(|&x| self.step(x)).collect()
    }
}

//! # First-Match Window Tracker
//!
//! Answers "first element in the current fixed-size window satisfying a
//! caller predicate" (e.g. first negative value) in amortized O(1) per
//! element. Uses the same evict-by-window-start rule as the extremum
//! tracker but no monotonicity pop: matching elements are queued in stream
//! order, and the front of the queue is the answer.
//!
//! ## Parameters
//! - **window**: Fixed window size. Defaults to 14.
//!
//! ## Errors
//! - **InvalidWindow**: first_match: `window` is zero.
//!
//! ## Returns
//! - **`Ok(FirstMatchOutput)`** on success, containing one
//!   [`FirstMatchResult`] per input element: `Incomplete` until the window
//!   is full, then `Match { index, value }` or `NoMatch`. "No match in this
//!   window" is an ordinary result, never an error.

use std::collections::VecDeque;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FirstMatchResult<T> {
    /// Fewer than `window` elements have been seen.
    Incomplete,
    /// The window is full but holds no matching element.
    NoMatch,
    /// First matching element in the window ending at the current index.
    Match { index: usize, value: T },
}

#[derive(Debug, Clone)]
pub struct FirstMatchOutput<T> {
    pub values: Vec<FirstMatchResult<T>>,
}

#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FirstMatchParams {
    pub window: Option<usize>,
}

impl Default for FirstMatchParams {
    fn default() -> Self {
        Self { window: Some(14) }
    }
}

#[derive(Debug, Clone)]
pub struct FirstMatchInput<'a, T> {
    pub data: &'a [T],
    pub params: FirstMatchParams,
}

impl<'a, T> FirstMatchInput<'a, T> {
    pub fn from_slice(data: &'a [T], params: FirstMatchParams) -> Self {
        Self { data, params }
    }

    pub fn get_window(&self) -> usize {
        self.params.window.unwrap_or(14)
    }
}

#[derive(Debug, Error)]
pub enum FirstMatchError {
    #[error("first_match: Invalid window: window = {window}")]
    InvalidWindow { window: usize },
}

pub fn first_match<T, P>(
    input: &FirstMatchInput<T>,
    predicate: P,
) -> Result<FirstMatchOutput<T>, FirstMatchError>
where
    T: Copy,
    P: FnMut(&T) -> bool,
{
    let mut stream = FirstMatchStream::try_new(input.params, predicate)?;
    let values = input.data.iter().map(|&x| stream.update(x)).collect();
    Ok(FirstMatchOutput { values })
}

/// O(1) streaming form of [`first_match`].
#[derive(Debug, Clone)]
pub struct FirstMatchStream<T, P> {
    window: usize,
    t: usize,
    matches: VecDeque<(usize, T)>,
    predicate: P,
}

impl<T, P> FirstMatchStream<T, P>
where
    T: Copy,
    P: FnMut(&T) -> bool,
{
    pub fn try_new(params: FirstMatchParams, predicate: P) -> Result<Self, FirstMatchError> {
        let window = params.window.unwrap_or(14);
        if window == 0 {
            return Err(FirstMatchError::InvalidWindow { window });
        }
        Ok(Self {
            window,
            t: 0,
            matches: VecDeque::with_capacity(window),
            predicate,
        })
    }

    #[inline]
    pub fn update(&mut self, value: T) -> FirstMatchResult<T> {
        let t = self.t;
        self.t += 1;

        let oldest = (t + 1).saturating_sub(self.window);
        while let Some(&(idx, _)) = self.matches.front() {
            if idx >= oldest {
                break;
            }
            self.matches.pop_front();
        }
        if (self.predicate)(&value) {
            self.matches.push_back((t, value));
        }

        if t + 1 < self.window {
            return FirstMatchResult::Incomplete;
        }
        match self.matches.front() {
            Some(&(index, value)) => FirstMatchResult::Match { index, value },
            None => FirstMatchResult::NoMatch,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_negative_in_window() {
        let data: [i64; 8] = [-8, 2, 3, -6, 10, -8, 6, 5];
        let params = FirstMatchParams { window: Some(3) };
        let input = FirstMatchInput::from_slice(&data, params);
        let output = first_match(&input, |&x| x < 0).expect("first_match failed");
        assert_eq!(output.values.len(), data.len());
        assert_eq!(
            output.values[2..],
            [
                FirstMatchResult::Match { index: 0, value: -8 },
                FirstMatchResult::Match { index: 3, value: -6 },
                FirstMatchResult::Match { index: 3, value: -6 },
                FirstMatchResult::Match { index: 3, value: -6 },
                FirstMatchResult::Match { index: 5, value: -8 },
                FirstMatchResult::Match { index: 5, value: -8 },
            ]
        );
    }

    #[test]
    fn test_window_without_match_reports_no_match() {
        let data: [i64; 5] = [1, 2, -3, 4, 5];
        let params = FirstMatchParams { window: Some(2) };
        let input = FirstMatchInput::from_slice(&data, params);
        let output = first_match(&input, |&x| x < 0).unwrap();
        assert_eq!(output.values[1], FirstMatchResult::NoMatch);
        assert_eq!(output.values[2], FirstMatchResult::Match { index: 2, value: -3 });
        assert_eq!(output.values[3], FirstMatchResult::Match { index: 2, value: -3 });
        assert_eq!(
            output.values[4],
            FirstMatchResult::NoMatch,
            "a match that slid out of the window must be forgotten"
        );
    }

    #[test]
    fn test_warmup_is_incomplete_not_no_match() {
        let data: [i64; 4] = [5, 5, 5, 5];
        let params = FirstMatchParams { window: Some(4) };
        let input = FirstMatchInput::from_slice(&data, params);
        let output = first_match(&input, |&x| x < 0).unwrap();
        assert_eq!(&output.values[..3], &[FirstMatchResult::Incomplete; 3]);
        assert_eq!(output.values[3], FirstMatchResult::NoMatch);
    }

    #[test]
    fn test_zero_window_rejected() {
        let params = FirstMatchParams { window: Some(0) };
        let result = FirstMatchStream::<i64, _>::try_new(params, |&x: &i64| x < 0);
        assert!(result.is_err(), "expected an error for zero window");
    }

    #[test]
    fn test_empty_stream_yields_empty_output() {
        let data: [i64; 0] = [];
        let params = FirstMatchParams { window: Some(3) };
        let input = FirstMatchInput::from_slice(&data, params);
        let output = first_match(&input, |&x| x < 0).unwrap();
        assert!(output.values.is_empty());
    }

    #[test]
    fn test_matches_brute_force_property() {
        use proptest::prelude::*;

        let strat = (1usize..=12).prop_flat_map(|window| {
            (
                proptest::collection::vec(-50i64..50, 0..100),
                Just(window),
            )
        });

        proptest::test_runner::TestRunner::default()
            .run(&strat, |(data, window)| {
                let params = FirstMatchParams {
                    window: Some(window),
                };
                let input = FirstMatchInput::from_slice(&data, params);
                let output = first_match(&input, |&x| x < 0).unwrap();
                for i in 0..data.len() {
                    if i + 1 < window {
                        prop_assert_eq!(output.values[i], FirstMatchResult::Incomplete);
                        continue;
                    }
                    let lo = i + 1 - window;
                    let expected = data[lo..=i]
                        .iter()
                        .position(|&x| x < 0)
                        .map(|off| FirstMatchResult::Match {
                            index: lo + off,
                            value: data[lo + off],
                        })
                        .unwrap_or(FirstMatchResult::NoMatch);
                    prop_assert_eq!(
                        output.values[i],
                        expected,
                        "first-match mismatch at index {}",
                        i
                    );
                }
                Ok(())
            })
            .unwrap();
    }
}

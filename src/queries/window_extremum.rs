//! # Fixed-Window Extremum Tracker
//!
//! Tracks the running maximum, minimum, or both over a fixed-size window of
//! a stream, in amortized O(1) per element via monotonic deques. The front
//! of each deque always holds the index of the current window's extremum;
//! dominated entries are evicted from the back on push and out-of-window
//! entries from the front on slide, so each index is pushed and popped at
//! most once over the whole stream.
//!
//! ## Parameters
//! - **window**: Fixed window size (number of elements). Defaults to 14.
//! - **mode**: `Max`, `Min`, or `MinAndMax` (both deques over the same index
//!   stream, answering "sum of window min and max"). Defaults to `Max`.
//!
//! ## Errors
//! - **InvalidWindow**: window_extremum: `window` is zero.
//!
//! ## Returns
//! - **`Ok(WindowExtremumOutput)`** on success, containing one entry per
//!   input element: `None` until the window is full, then the extremum
//!   sample for the window ending at that element. A window larger than the
//!   input yields all `None`, not an error.

use crate::utilities::mono_deque::MonoDeque;
use rayon::prelude::*;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExtremumMode {
    Max,
    Min,
    MinAndMax,
}

/// Answer for one full window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExtremumSample<T> {
    Single {
        index: usize,
        value: T,
    },
    MinMax {
        min_index: usize,
        min_value: T,
        max_index: usize,
        max_value: T,
    },
}

impl<T: Copy> ExtremumSample<T> {
    /// The extremum value for `Max`/`Min` samples.
    pub fn value(&self) -> Option<T> {
        match self {
            ExtremumSample::Single { value, .. } => Some(*value),
            ExtremumSample::MinMax { .. } => None,
        }
    }
}

impl<T: Copy + std::ops::Add<Output = T>> ExtremumSample<T> {
    /// Sum of window min and max for `MinAndMax` samples.
    pub fn min_max_sum(&self) -> Option<T> {
        match self {
            ExtremumSample::MinMax {
                min_value,
                max_value,
                ..
            } => Some(*min_value + *max_value),
            ExtremumSample::Single { .. } => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct WindowExtremumOutput<T> {
    pub values: Vec<Option<ExtremumSample<T>>>,
}

#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WindowExtremumParams {
    pub window: Option<usize>,
    pub mode: Option<ExtremumMode>,
}

impl Default for WindowExtremumParams {
    fn default() -> Self {
        Self {
            window: Some(14),
            mode: Some(ExtremumMode::Max),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WindowExtremumInput<'a, T> {
    pub data: &'a [T],
    pub params: WindowExtremumParams,
}

impl<'a, T> WindowExtremumInput<'a, T> {
    pub fn from_slice(data: &'a [T], params: WindowExtremumParams) -> Self {
        Self { data, params }
    }

    pub fn with_default_params(data: &'a [T]) -> Self {
        Self {
            data,
            params: WindowExtremumParams::default(),
        }
    }

    pub fn get_window(&self) -> usize {
        self.params.window.unwrap_or(14)
    }

    pub fn get_mode(&self) -> ExtremumMode {
        self.params.mode.unwrap_or(ExtremumMode::Max)
    }
}

#[derive(Debug, Error)]
pub enum WindowExtremumError {
    #[error("window_extremum: Invalid window: window = {window}")]
    InvalidWindow { window: usize },
}

#[inline]
pub fn window_extremum<T: Copy + PartialOrd>(
    input: &WindowExtremumInput<T>,
) -> Result<WindowExtremumOutput<T>, WindowExtremumError> {
    let window = input.get_window();
    if window == 0 {
        return Err(WindowExtremumError::InvalidWindow { window });
    }
    let mode = input.get_mode();
    let data = input.data;

    let mut max_q = MonoDeque::max_tracker(window);
    let mut min_q = MonoDeque::min_tracker(window);
    let mut values = Vec::with_capacity(data.len());

    for (i, &x) in data.iter().enumerate() {
        let oldest = (i + 1).saturating_sub(window);
        match mode {
            ExtremumMode::Max => {
                max_q.expire(oldest);
                max_q.push(i, x);
            }
            ExtremumMode::Min => {
                min_q.expire(oldest);
                min_q.push(i, x);
            }
            ExtremumMode::MinAndMax => {
                max_q.expire(oldest);
                min_q.expire(oldest);
                max_q.push(i, x);
                min_q.push(i, x);
            }
        }
        values.push(sample_front(mode, window, i, &max_q, &min_q));
    }

    Ok(WindowExtremumOutput { values })
}

#[inline(always)]
fn sample_front<T: Copy + PartialOrd>(
    mode: ExtremumMode,
    window: usize,
    i: usize,
    max_q: &MonoDeque<T>,
    min_q: &MonoDeque<T>,
) -> Option<ExtremumSample<T>> {
    if i + 1 < window {
        return None;
    }
    match mode {
        ExtremumMode::Max => {
            let (index, value) = max_q.front()?;
            Some(ExtremumSample::Single { index, value })
        }
        ExtremumMode::Min => {
            let (index, value) = min_q.front()?;
            Some(ExtremumSample::Single { index, value })
        }
        ExtremumMode::MinAndMax => {
            let (min_index, min_value) = min_q.front()?;
            let (max_index, max_value) = max_q.front()?;
            Some(ExtremumSample::MinMax {
                min_index,
                min_value,
                max_index,
                max_value,
            })
        }
    }
}

/// O(1) streaming form of [`window_extremum`]. Returns `None` until the
/// window is full; partial state stays valid after every completed update.
#[derive(Debug, Clone)]
pub struct WindowExtremumStream<T> {
    window: usize,
    mode: ExtremumMode,
    t: usize,
    max_q: MonoDeque<T>,
    min_q: MonoDeque<T>,
}

impl<T: Copy + PartialOrd> WindowExtremumStream<T> {
    pub fn try_new(params: WindowExtremumParams) -> Result<Self, WindowExtremumError> {
        let window = params.window.unwrap_or(14);
        if window == 0 {
            return Err(WindowExtremumError::InvalidWindow { window });
        }
        let mode = params.mode.unwrap_or(ExtremumMode::Max);
        Ok(Self {
            window,
            mode,
            t: 0,
            max_q: MonoDeque::max_tracker(window),
            min_q: MonoDeque::min_tracker(window),
        })
    }

    #[inline]
    pub fn update(&mut self, value: T) -> Option<ExtremumSample<T>> {
        let t = self.t;
        self.t += 1;
        let oldest = (t + 1).saturating_sub(self.window);
        match self.mode {
            ExtremumMode::Max => {
                self.max_q.expire(oldest);
                self.max_q.push(t, value);
            }
            ExtremumMode::Min => {
                self.min_q.expire(oldest);
                self.min_q.push(t, value);
            }
            ExtremumMode::MinAndMax => {
                self.max_q.expire(oldest);
                self.min_q.expire(oldest);
                self.max_q.push(t, value);
                self.min_q.push(t, value);
            }
        }
        sample_front(self.mode, self.window, t, &self.max_q, &self.min_q)
    }

    /// Elements consumed so far.
    pub fn position(&self) -> usize {
        self.t
    }
}

// Batch/param sweep types, one independent stream per window size.

#[derive(Clone, Debug)]
pub struct WindowExtremumBatchRange {
    pub window: (usize, usize, usize),
}

impl Default for WindowExtremumBatchRange {
    fn default() -> Self {
        Self { window: (2, 30, 1) }
    }
}

#[derive(Clone, Debug)]
pub struct WindowExtremumBatchBuilder {
    range: WindowExtremumBatchRange,
    mode: ExtremumMode,
}

impl Default for WindowExtremumBatchBuilder {
    fn default() -> Self {
        Self {
            range: WindowExtremumBatchRange::default(),
            mode: ExtremumMode::Max,
        }
    }
}

impl WindowExtremumBatchBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(mut self, mode: ExtremumMode) -> Self {
        self.mode = mode;
        self
    }

    #[inline]
    pub fn window_range(mut self, start: usize, end: usize, step: usize) -> Self {
        self.range.window = (start, end, step);
        self
    }

    #[inline]
    pub fn window_static(mut self, window: usize) -> Self {
        self.range.window = (window, window, 0);
        self
    }

    pub fn apply_slice<T>(
        self,
        data: &[T],
    ) -> Result<WindowExtremumBatchOutput<T>, WindowExtremumError>
    where
        T: Copy + PartialOrd + Send + Sync,
    {
        let combos = expand_window_grid(&self.range, self.mode);
        let cols = data.len();
        let rows: Vec<Vec<Option<ExtremumSample<T>>>> = combos
            .par_iter()
            .map(|params| {
                let input = WindowExtremumInput::from_slice(data, *params);
                window_extremum(&input).map(|out| out.values)
            })
            .collect::<Result<_, _>>()?;

        let mut values = Vec::with_capacity(combos.len() * cols);
        for row in rows {
            values.extend(row);
        }
        Ok(WindowExtremumBatchOutput {
            values,
            rows: combos.len(),
            cols,
            combos,
        })
    }
}

fn expand_window_grid(
    range: &WindowExtremumBatchRange,
    mode: ExtremumMode,
) -> Vec<WindowExtremumParams> {
    let (start, end, step) = range.window;
    let mut combos = Vec::new();
    if step == 0 || start == end {
        combos.push(WindowExtremumParams {
            window: Some(start),
            mode: Some(mode),
        });
        return combos;
    }
    let mut w = start;
    while w <= end {
        combos.push(WindowExtremumParams {
            window: Some(w),
            mode: Some(mode),
        });
        w += step;
    }
    combos
}

#[derive(Clone, Debug)]
pub struct WindowExtremumBatchOutput<T> {
    pub values: Vec<Option<ExtremumSample<T>>>,
    pub combos: Vec<WindowExtremumParams>,
    pub rows: usize,
    pub cols: usize,
}

impl<T> WindowExtremumBatchOutput<T> {
    pub fn row(&self, row: usize) -> &[Option<ExtremumSample<T>>] {
        &self.values[row * self.cols..(row + 1) * self.cols]
    }

    pub fn row_for_window(&self, window: usize) -> Option<&[Option<ExtremumSample<T>>]> {
        let row = self
            .combos
            .iter()
            .position(|p| p.window == Some(window))?;
        Some(self.row(row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn max_values(out: &WindowExtremumOutput<i64>) -> Vec<i64> {
        out.values
            .iter()
            .filter_map(|s| s.as_ref().and_then(|s| s.value()))
            .collect()
    }

    #[test]
    fn test_window_max_accuracy() {
        let data: [i64; 8] = [1, 3, -1, -3, 5, 3, 6, 7];
        let params = WindowExtremumParams {
            window: Some(3),
            mode: Some(ExtremumMode::Max),
        };
        let input = WindowExtremumInput::from_slice(&data, params);
        let output = window_extremum(&input).expect("window max failed");
        assert_eq!(output.values.len(), data.len());
        assert_eq!(max_values(&output), vec![3, 3, 5, 5, 6, 7]);
        assert!(
            output.values[..2].iter().all(|s| s.is_none()),
            "first window-1 entries must be incomplete"
        );
    }

    #[test]
    fn test_window_min_accuracy() {
        let data: [i64; 8] = [1, 3, -1, -3, 5, 3, 6, 7];
        let params = WindowExtremumParams {
            window: Some(3),
            mode: Some(ExtremumMode::Min),
        };
        let input = WindowExtremumInput::from_slice(&data, params);
        let output = window_extremum(&input).expect("window min failed");
        let mins: Vec<i64> = output
            .values
            .iter()
            .filter_map(|s| s.as_ref().and_then(|s| s.value()))
            .collect();
        assert_eq!(mins, vec![-1, -3, -3, -3, 3, 3]);
    }

    #[test]
    fn test_window_min_and_max_sum() {
        let data: [i64; 5] = [1, 3, -1, -3, 5];
        let params = WindowExtremumParams {
            window: Some(3),
            mode: Some(ExtremumMode::MinAndMax),
        };
        let input = WindowExtremumInput::from_slice(&data, params);
        let output = window_extremum(&input).expect("min-and-max failed");
        let sums: Vec<i64> = output
            .values
            .iter()
            .filter_map(|s| s.as_ref().and_then(|s| s.min_max_sum()))
            .collect();
        assert_eq!(sums, vec![2, 0, 2]);
    }

    #[test]
    fn test_extremum_index_points_into_window() {
        let data: Vec<i64> = (0..100).map(|i| (i * 31 % 17) - 8).collect();
        let window = 5;
        let params = WindowExtremumParams {
            window: Some(window),
            mode: Some(ExtremumMode::Max),
        };
        let input = WindowExtremumInput::from_slice(&data, params);
        let output = window_extremum(&input).expect("window max failed");
        for (i, sample) in output.values.iter().enumerate() {
            if let Some(ExtremumSample::Single { index, value }) = sample {
                assert!(
                    *index + window > i && *index <= i,
                    "extremum index {} outside window ending at {}",
                    index,
                    i
                );
                assert_eq!(data[*index], *value, "sample value must match its index");
            }
        }
    }

    #[test]
    fn test_stream_matches_batch() {
        let data: Vec<i64> = (0..256).map(|i| (i * 131 % 97) - 48).collect();
        for mode in [ExtremumMode::Max, ExtremumMode::Min, ExtremumMode::MinAndMax] {
            let params = WindowExtremumParams {
                window: Some(9),
                mode: Some(mode),
            };
            let input = WindowExtremumInput::from_slice(&data, params);
            let batch = window_extremum(&input).expect("batch failed");
            let mut stream = WindowExtremumStream::try_new(params).expect("stream failed");
            for (i, &x) in data.iter().enumerate() {
                assert_eq!(
                    stream.update(x),
                    batch.values[i],
                    "stream/batch mismatch at index {} for {:?}",
                    i,
                    mode
                );
            }
        }
    }

    #[test]
    fn test_replay_is_idempotent() {
        let data: Vec<i64> = (0..64).map(|i| (i * 7 % 23) - 11).collect();
        let params = WindowExtremumParams {
            window: Some(4),
            mode: Some(ExtremumMode::Max),
        };
        let mut first = WindowExtremumStream::try_new(params).unwrap();
        let mut second = WindowExtremumStream::try_new(params).unwrap();
        let a: Vec<_> = data.iter().map(|&x| first.update(x)).collect();
        let b: Vec<_> = data.iter().map(|&x| second.update(x)).collect();
        assert_eq!(a, b, "replaying an identical stream must yield identical results");
    }

    #[test]
    fn test_zero_window_rejected() {
        let data: [i64; 3] = [1, 2, 3];
        let params = WindowExtremumParams {
            window: Some(0),
            mode: Some(ExtremumMode::Max),
        };
        let input = WindowExtremumInput::from_slice(&data, params);
        let result = window_extremum(&input);
        assert!(result.is_err(), "expected an error for zero window");
        if let Err(e) = result {
            assert!(
                e.to_string().contains("Invalid window"),
                "expected 'Invalid window' error message, got: {}",
                e
            );
        }
        assert!(WindowExtremumStream::<i64>::try_new(params).is_err());
    }

    #[test]
    fn test_window_exceeding_data_is_incomplete() {
        let data: [i64; 3] = [10, 20, 30];
        let params = WindowExtremumParams {
            window: Some(10),
            mode: Some(ExtremumMode::Max),
        };
        let input = WindowExtremumInput::from_slice(&data, params);
        let output = window_extremum(&input).expect("oversized window must not error");
        assert!(
            output.values.iter().all(|s| s.is_none()),
            "window larger than the stream never completes"
        );
    }

    #[test]
    fn test_empty_stream_yields_empty_output() {
        let data: [i64; 0] = [];
        let input = WindowExtremumInput::with_default_params(&data);
        let output = window_extremum(&input).expect("empty input must not error");
        assert!(output.values.is_empty());
    }

    #[test]
    fn test_default_params() {
        let params = WindowExtremumParams::default();
        assert_eq!(params.window, Some(14));
        assert_eq!(params.mode, Some(ExtremumMode::Max));
    }

    #[test]
    fn test_batch_builder_rows_match_single_runs() {
        let data: Vec<i64> = (0..80).map(|i| (i * 53 % 41) - 20).collect();
        let output = WindowExtremumBatchBuilder::new()
            .mode(ExtremumMode::Max)
            .window_range(2, 8, 3)
            .apply_slice(&data)
            .expect("batch sweep failed");
        assert_eq!(output.rows, 3, "expected windows 2, 5, 8");
        assert_eq!(output.cols, data.len());
        for params in &output.combos {
            let window = params.window.unwrap();
            let single =
                window_extremum(&WindowExtremumInput::from_slice(&data, *params)).unwrap();
            assert_eq!(
                output.row_for_window(window).unwrap(),
                single.values.as_slice(),
                "batch row for window {} diverges from single run",
                window
            );
        }
    }

    #[test]
    fn test_window_max_matches_brute_force_property() {
        use proptest::prelude::*;

        let strat = (1usize..=16).prop_flat_map(|window| {
            (
                proptest::collection::vec(-1000i64..1000, 0..120),
                Just(window),
            )
        });

        proptest::test_runner::TestRunner::default()
            .run(&strat, |(data, window)| {
                let params = WindowExtremumParams {
                    window: Some(window),
                    mode: Some(ExtremumMode::Max),
                };
                let input = WindowExtremumInput::from_slice(&data, params);
                let output = window_extremum(&input).unwrap();
                for i in 0..data.len() {
                    if i + 1 < window {
                        prop_assert!(
                            output.values[i].is_none(),
                            "expected incomplete window at index {}",
                            i
                        );
                        continue;
                    }
                    let lo = i + 1 - window;
                    let expected = *data[lo..=i].iter().max().unwrap();
                    let got = output.values[i]
                        .as_ref()
                        .and_then(|s| s.value())
                        .expect("full window must have a sample");
                    prop_assert_eq!(
                        got,
                        expected,
                        "window max mismatch at index {}",
                        i
                    );
                }
                Ok(())
            })
            .unwrap();
    }

    #[test]
    fn test_window_min_matches_brute_force_property() {
        use proptest::prelude::*;

        let strat = (1usize..=16).prop_flat_map(|window| {
            (
                proptest::collection::vec(-1000i64..1000, 1..120),
                Just(window),
            )
        });

        proptest::test_runner::TestRunner::default()
            .run(&strat, |(data, window)| {
                let params = WindowExtremumParams {
                    window: Some(window),
                    mode: Some(ExtremumMode::Min),
                };
                let mut stream = WindowExtremumStream::try_new(params).unwrap();
                for (i, &x) in data.iter().enumerate() {
                    let got = stream.update(x);
                    if i + 1 < window {
                        prop_assert!(got.is_none());
                        continue;
                    }
                    let lo = i + 1 - window;
                    let expected = *data[lo..=i].iter().min().unwrap();
                    prop_assert_eq!(
                        got.and_then(|s| s.value()),
                        Some(expected),
                        "window min mismatch at index {}",
                        i
                    );
                }
                Ok(())
            })
            .unwrap();
    }
}

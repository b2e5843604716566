pub mod first_match;
pub mod prefix_index;
pub mod two_pointer;
pub mod window_extremum;

pub use prefix_index::{
    prefix_index, PrefixAnswer, PrefixIndexError, PrefixIndexInput, PrefixIndexOutput,
    PrefixIndexParams, PrefixIndexStream, PrefixPolicy, PrefixTransform,
};
pub use window_extremum::{
    window_extremum, ExtremumMode, ExtremumSample, WindowExtremumError, WindowExtremumInput,
    WindowExtremumOutput, WindowExtremumParams, WindowExtremumStream,
};

/// Inclusive index range `[start, end]` of a subrange answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Subrange {
    pub start: usize,
    pub end: usize,
}

impl Subrange {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    /// Number of elements covered; an inclusive range is never empty.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }
}

//! # window-query
//!
//! Streaming window queries over an append-only sequence, each in amortized
//! O(1) per element: rolling extrema over fixed windows (monotonic deques),
//! target-sum / balance / divisibility subrange lookups (prefix aggregate +
//! hash index), and variable-size window search (two-pointer shrink–expand).
//!
//! Callers push elements one at a time — or hand over a full slice — and
//! read back the current answer after each step. Each engine instance owns
//! its state exclusively; evaluating several parameterizations concurrently
//! means one instance per worker (see the batch builders, which do exactly
//! that with rayon).

pub mod engine;
pub mod queries;
pub mod utilities;

pub use engine::{
    EngineError, FixedWindowEngine, FixedWindowMode, PrefixIndexEngine, QueryResult,
    TwoPointerEngine,
};
pub use queries::Subrange;

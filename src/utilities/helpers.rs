//! Small shared helpers for the query modules.

/// Euclidean-style residue in `[0, k)`. Rust's `%` follows the sign of the
/// dividend, so negative prefix aggregates would otherwise produce negative
/// keys and miss their positive twins in the hash index.
#[inline(always)]
pub fn mod_floor(x: i64, k: i64) -> i64 {
    ((x % k) + k) % k
}

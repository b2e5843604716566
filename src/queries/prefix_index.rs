//! # Prefix-Sum Hash Index
//!
//! Maintains a running prefix aggregate over an `i64` stream together with
//! a hash index from aggregate key to either the earliest index at which
//! that key occurred or the number of times it occurred. This answers
//! "does a subrange with a target sum/remainder exist, and how long / how
//! many" in amortized O(1) per element.
//!
//! The identity aggregate is seeded before any element is processed (index
//! −1 under the first-occurrence policy, count 1 under the occurrence-count
//! policy), so subranges starting at the very first element need no special
//! branch.
//!
//! ## Parameters
//! - **policy**: [`PrefixPolicy::FirstOccurrence`] keeps a key's earliest
//!   index and never overwrites it (the first occurrence dominates when
//!   maximizing length). [`PrefixPolicy::OccurrenceCount`] increments the
//!   stored count on every occurrence. Defaults to `OccurrenceCount`.
//! - **transform**: how an element folds into the aggregate —
//!   [`PrefixTransform::IdentitySum`] (plain running sum),
//!   [`PrefixTransform::SignedBalance`] (+1 for positive elements, −1
//!   otherwise; a 0/1 stream fed raw becomes a balance counter), or
//!   [`PrefixTransform::ModuloK`] (running sum keyed by its residue in
//!   `[0, k)`). Defaults to `IdentitySum`.
//! - **target**: the subrange aggregate being searched for. Defaults to 0.
//!
//! ## Errors
//! - **InvalidModulo**: prefix_index: `ModuloK` with `k <= 0`.
//!
//! ## Returns
//! - **`Ok(PrefixIndexOutput)`** with [`PrefixAnswer::Count`] (total number
//!   of matching subranges) or [`PrefixAnswer::Longest`] (longest matching
//!   subrange, `None` when no subrange matches — an ordinary result, not an
//!   error).

use crate::queries::Subrange;
use crate::utilities::helpers::mod_floor;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PrefixPolicy {
    FirstOccurrence,
    OccurrenceCount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PrefixTransform {
    IdentitySum,
    SignedBalance,
    ModuloK(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PrefixAnswer {
    Count(u64),
    Longest(Option<Subrange>),
}

#[derive(Debug, Clone)]
pub struct PrefixIndexOutput {
    pub answer: PrefixAnswer,
}

#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PrefixIndexParams {
    pub policy: Option<PrefixPolicy>,
    pub transform: Option<PrefixTransform>,
    pub target: Option<i64>,
}

impl Default for PrefixIndexParams {
    fn default() -> Self {
        Self {
            policy: Some(PrefixPolicy::OccurrenceCount),
            transform: Some(PrefixTransform::IdentitySum),
            target: Some(0),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PrefixIndexInput<'a> {
    pub data: &'a [i64],
    pub params: PrefixIndexParams,
}

impl<'a> PrefixIndexInput<'a> {
    pub fn from_slice(data: &'a [i64], params: PrefixIndexParams) -> Self {
        Self { data, params }
    }

    pub fn get_policy(&self) -> PrefixPolicy {
        self.params.policy.unwrap_or(PrefixPolicy::OccurrenceCount)
    }

    pub fn get_transform(&self) -> PrefixTransform {
        self.params.transform.unwrap_or(PrefixTransform::IdentitySum)
    }

    pub fn get_target(&self) -> i64 {
        self.params.target.unwrap_or(0)
    }
}

#[derive(Debug, Error)]
pub enum PrefixIndexError {
    #[error("prefix_index: Invalid modulo: modulo = {modulo}")]
    InvalidModulo { modulo: i64 },
}

#[inline]
pub fn prefix_index(input: &PrefixIndexInput) -> Result<PrefixIndexOutput, PrefixIndexError> {
    let mut stream = PrefixIndexStream::try_new(input.params)?;
    for &x in input.data {
        stream.advance(x);
    }
    Ok(PrefixIndexOutput {
        answer: stream.answer(),
    })
}

/// O(1) streaming form of [`prefix_index`]. Partial state is valid and
/// inspectable after every completed `advance`.
#[derive(Debug, Clone)]
pub struct PrefixIndexStream {
    policy: PrefixPolicy,
    transform: PrefixTransform,
    target: i64,
    aggregate: i64,
    index: usize,
    // first index (may be -1 for the seed) or occurrence count, per policy
    map: HashMap<i64, i64>,
    total: u64,
    best: Option<Subrange>,
}

impl PrefixIndexStream {
    pub fn try_new(params: PrefixIndexParams) -> Result<Self, PrefixIndexError> {
        let policy = params.policy.unwrap_or(PrefixPolicy::OccurrenceCount);
        let transform = params.transform.unwrap_or(PrefixTransform::IdentitySum);
        let target = params.target.unwrap_or(0);
        if let PrefixTransform::ModuloK(k) = transform {
            if k <= 0 {
                return Err(PrefixIndexError::InvalidModulo { modulo: k });
            }
        }

        let mut map = HashMap::new();
        let identity_key = match transform {
            PrefixTransform::ModuloK(k) => mod_floor(0, k),
            _ => 0,
        };
        match policy {
            PrefixPolicy::FirstOccurrence => {
                map.insert(identity_key, -1);
            }
            PrefixPolicy::OccurrenceCount => {
                map.insert(identity_key, 1);
            }
        }

        Ok(Self {
            policy,
            transform,
            target,
            aggregate: 0,
            index: 0,
            map,
            total: 0,
            best: None,
        })
    }

    #[inline(always)]
    fn key_of(&self, aggregate: i64) -> i64 {
        match self.transform {
            PrefixTransform::ModuloK(k) => mod_floor(aggregate, k),
            _ => aggregate,
        }
    }

    /// Fold the next element into the aggregate and return the current
    /// answer over everything seen so far.
    pub fn advance(&mut self, element: i64) -> PrefixAnswer {
        let i = self.index;
        self.aggregate += match self.transform {
            PrefixTransform::SignedBalance => {
                if element > 0 {
                    1
                } else {
                    -1
                }
            }
            _ => element,
        };

        let lookup = self.key_of(self.aggregate - self.target);
        let store = self.key_of(self.aggregate);
        match self.policy {
            PrefixPolicy::OccurrenceCount => {
                if let Some(&count) = self.map.get(&lookup) {
                    self.total += count as u64;
                }
                *self.map.entry(store).or_insert(0) += 1;
            }
            PrefixPolicy::FirstOccurrence => {
                if let Some(&earliest) = self.map.get(&lookup) {
                    let start = (earliest + 1) as usize;
                    let found = Subrange::new(start, i);
                    if self.best.map_or(true, |b| found.len() > b.len()) {
                        self.best = Some(found);
                    }
                }
                // first occurrence dominates for length maximization
                self.map.entry(store).or_insert(i as i64);
            }
        }

        self.index += 1;
        self.answer()
    }

    /// Whether `aggregate - target_delta` has occurred before, i.e. whether
    /// some subrange ending at the current element folds to `target_delta`.
    pub fn exists_at(&self, target_delta: i64) -> bool {
        self.map
            .contains_key(&self.key_of(self.aggregate - target_delta))
    }

    /// Current answer without advancing.
    pub fn answer(&self) -> PrefixAnswer {
        match self.policy {
            PrefixPolicy::OccurrenceCount => PrefixAnswer::Count(self.total),
            PrefixPolicy::FirstOccurrence => PrefixAnswer::Longest(self.best),
        }
    }

    /// Elements consumed so far.
    pub fn position(&self) -> usize {
        self.index
    }
}

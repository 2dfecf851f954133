//! Top-K selection by quickselect partitioning.
//!
//! [`TopKSelector`] moves the k records that rank highest under a caller-supplied
//! comparator into the front of a buffer without sorting the rest:
//!
//! - **Partitioning**: Lomuto scheme (single forward scan, one swap index)
//! - **Pivot choice**: configurable via [`PivotRule`], randomized by default
//! - **Control flow**: an explicit loop over a shrinking `[left, right]` range,
//!   so pathological inputs cost time, never stack
//!
//! "Ranks highest" means `compare(a, b) == Ordering::Greater` puts `a` ahead of
//! `b`. With `compare = |a, b| a.value.total_cmp(&b.value)` the selector returns
//! the k largest values.
//!
//! Expected cost is O(N) comparisons. The `Last` rule is quadratic on already
//! sorted input. Records tied with the pivot are gathered next to it whenever
//! the search continues to the right, so metrics with few distinct values
//! (passenger counts, hours) finish in a handful of passes.

use std::cmp::Ordering;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::SelectionError;

/// How the partition pivot is chosen inside the working range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PivotRule {
    /// Always the rightmost element of the range.
    Last,
    /// Uniformly random element of the range.
    #[default]
    Random,
    /// Median of the leftmost, middle and rightmost elements.
    MedianOfThree,
}

/// Configuration for [`TopKSelector`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectorConfig {
    pub pivot: PivotRule,
    /// Seed for the pivot RNG (for reproducibility). `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl SelectorConfig {
    pub fn with_pivot(mut self, pivot: PivotRule) -> Self {
        self.pivot = pivot;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Validate a signed k coming from an untrusted caller.
///
/// Negative values are rejected rather than clamped. Values above the number of
/// records are fine; selection clamps them.
pub fn checked_k(k: i64) -> Result<usize, SelectionError> {
    usize::try_from(k).map_err(|_| SelectionError::NegativeK(k))
}

pub struct TopKSelector {
    pivot: PivotRule,
    rng: StdRng,
}

impl Default for TopKSelector {
    fn default() -> Self {
        Self::new(SelectorConfig::default())
    }
}

impl TopKSelector {
    pub fn new(config: SelectorConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            pivot: config.pivot,
            rng,
        }
    }

    /// Reorder `records` in place so the first `min(k, len)` slots hold the
    /// top-k records, and return that prefix.
    ///
    /// Order inside the prefix and inside the remainder is unspecified. When
    /// several records tie at the k boundary, any of them may be chosen.
    ///
    /// `compare` must be a consistent total order for the duration of the call.
    pub fn select<'a, T, F>(
        &mut self,
        records: &'a mut [T],
        k: usize,
        mut compare: F,
    ) -> &'a mut [T]
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        let len = records.len();
        if k == 0 {
            return &mut records[..0];
        }
        if k >= len {
            return records;
        }

        let mut left = 0;
        let mut right = len - 1;
        let mut wanted = k;

        // Invariant: [0, left) is part of the answer, (right, len) is not, and
        // `wanted` of the records in [left, right] still belong to it.
        while left < right && wanted < right - left + 1 {
            let pivot = self.choose_pivot(records, left, right, &mut compare);
            records.swap(pivot, right);

            let i = partition(records, left, right, &mut compare);
            let count = i - left + 1;

            match wanted.cmp(&count) {
                Ordering::Equal => break,
                // count > wanted >= 1, so i > left.
                Ordering::Less => right = i - 1,
                Ordering::Greater => {
                    let ties = gather_ties(records, i, right, &mut compare);
                    let remaining = wanted - count;
                    if remaining <= ties {
                        break;
                    }
                    left = i + 1 + ties;
                    wanted = remaining - ties;
                }
            }
        }

        &mut records[..k]
    }

    /// Owned variant of [`select`](Self::select): consumes the buffer and
    /// returns only the selected records.
    pub fn select_owned<T, F>(&mut self, mut records: Vec<T>, k: usize, compare: F) -> Vec<T>
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        let k = self.select(&mut records, k, compare).len();
        records.truncate(k);
        records
    }

    /// Like [`select`](Self::select) but takes a signed `k`, rejecting negative values.
    pub fn try_select<'a, T, F>(
        &mut self,
        records: &'a mut [T],
        k: i64,
        compare: F,
    ) -> Result<&'a mut [T], SelectionError>
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        let k = checked_k(k)?;
        Ok(self.select(records, k, compare))
    }

    fn choose_pivot<T, F>(
        &mut self,
        records: &[T],
        left: usize,
        right: usize,
        compare: &mut F,
    ) -> usize
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        match self.pivot {
            PivotRule::Last => right,
            PivotRule::Random => self.rng.gen_range(left..=right),
            PivotRule::MedianOfThree => {
                let mid = left + (right - left) / 2;
                median_of_three(records, left, mid, right, compare)
            }
        }
    }
}

/// Lomuto partition of `records[left..=right]` around the pivot at `right`.
///
/// Records ranking strictly ahead of the pivot end up in `[left, i)`, the pivot
/// at `i`, everything else in `(i, right]`. Returns `i`.
fn partition<T, F>(records: &mut [T], left: usize, right: usize, compare: &mut F) -> usize
where
    F: FnMut(&T, &T) -> Ordering,
{
    debug_assert_eq!(
        compare(&records[right], &records[right]),
        Ordering::Equal,
        "comparator must treat a record as equal to itself"
    );

    let mut i = left;
    for j in left..right {
        if compare(&records[j], &records[right]) == Ordering::Greater {
            records.swap(i, j);
            i += 1;
        }
    }
    records.swap(i, right);
    i
}

/// Move records in `(pivot, right]` that compare equal to the pivot at
/// `pivot` so they directly follow it. Returns how many were moved.
///
/// After a partition, `(pivot, right]` holds only records that do not rank
/// ahead of the pivot, so the gathered ties outrank everything behind them.
fn gather_ties<T, F>(records: &mut [T], pivot: usize, right: usize, compare: &mut F) -> usize
where
    F: FnMut(&T, &T) -> Ordering,
{
    let mut next = pivot + 1;
    for j in pivot + 1..=right {
        if compare(&records[j], &records[pivot]) == Ordering::Equal {
            records.swap(next, j);
            next += 1;
        }
    }
    next - pivot - 1
}

fn median_of_three<T, F>(records: &[T], a: usize, b: usize, c: usize, compare: &mut F) -> usize
where
    F: FnMut(&T, &T) -> Ordering,
{
    let ab = compare(&records[a], &records[b]);
    let bc = compare(&records[b], &records[c]);
    let ac = compare(&records[a], &records[c]);

    match (ab, bc, ac) {
        (Ordering::Greater, Ordering::Greater, _) | (Ordering::Less, Ordering::Less, _) => b,
        (Ordering::Equal, _, _) | (_, Ordering::Equal, _) => b,
        (Ordering::Greater, Ordering::Less, Ordering::Greater)
        | (Ordering::Less, Ordering::Greater, Ordering::Less) => c,
        _ => a,
    }
}

use std::ops::RangeInclusive;

use crate::RangeAggregate;
use crate::element::{Element, signed_at};
use crate::error::QueryError;
use crate::query::{Query, QueryKind};

/// Builds `(prefix_sum, prefix_alt)` for `values` in a single pass.
///
/// - `prefix_sum[i] = values[0] + ... + values[i]`
/// - `prefix_alt[i] = values[0] - values[1] + values[2] - ...` with the sign of
///   `values[i]` fixed by the parity of `i`.
///
/// An empty input yields two empty arrays.
pub fn build<T: Element>(values: &[T]) -> (Vec<T>, Vec<T>) {
    let mut prefix_sum = values.to_vec();
    let mut prefix_alt = values.to_vec();
    for i in 1..values.len() {
        prefix_sum[i] = prefix_sum[i - 1].add(values[i]);
        prefix_alt[i] = prefix_alt[i - 1].add(signed_at(values[i], i));
    }
    (prefix_sum, prefix_alt)
}

/// Answers `queries` against prefix arrays produced by [`build`].
///
/// Fails fast: the first invalid query aborts the batch and its error carries
/// the query index.
pub fn evaluate<T: Element>(
    prefix_sum: &[T],
    prefix_alt: &[T],
    queries: &[Query],
) -> Result<Vec<T>, QueryError> {
    PrefixView::new(prefix_sum, prefix_alt)?.evaluate(queries)
}

#[derive(Clone, Copy, Debug)]
struct PrefixView<'a, T> {
    sum: &'a [T],
    alt: &'a [T],
}

impl<'a, T: Element> PrefixView<'a, T> {
    fn new(sum: &'a [T], alt: &'a [T]) -> Result<Self, QueryError> {
        if sum.len() != alt.len() {
            return Err(QueryError::MismatchedPrefixes {
                sum_len: sum.len(),
                alt_len: alt.len(),
            });
        }
        Ok(Self { sum, alt })
    }

    #[inline(always)]
    fn range_sum(&self, l: usize, r: usize) -> T {
        debug_assert!(l <= r && r < self.sum.len());
        if l == 0 {
            self.sum[r]
        } else {
            self.sum[r].sub(self.sum[l - 1])
        }
    }

    #[inline(always)]
    fn alternating_sum(&self, l: usize, r: usize) -> T {
        debug_assert!(l <= r && r < self.alt.len());
        let base = if l == 0 {
            self.alt[r]
        } else {
            self.alt[r].sub(self.alt[l - 1])
        };
        // The residual keeps the sign pattern anchored at index 0; flip it so
        // that position `l` is positive.
        signed_at(base, l)
    }

    fn answer(&self, index: usize, query: &Query) -> Result<T, QueryError> {
        let len = self.sum.len();
        if !query.is_valid_for(len) {
            return Err(QueryError::invalid_range(index, query.l, query.r, len));
        }
        Ok(match query.kind {
            QueryKind::RangeSum => self.range_sum(query.l, query.r),
            QueryKind::AlternatingSum => self.alternating_sum(query.l, query.r),
        })
    }

    fn evaluate(&self, queries: &[Query]) -> Result<Vec<T>, QueryError> {
        queries
            .iter()
            .enumerate()
            .map(|(index, query)| self.answer(index, query))
            .collect()
    }
}

/// Prefix-sum index answering both query kinds in O(1).
#[derive(Clone, Debug, PartialEq)]
pub struct PrefixIndex<T> {
    prefix_sum: Vec<T>,
    prefix_alt: Vec<T>,
}

impl<T: Element> PrefixIndex<T> {
    pub fn prefix_sum(&self) -> &[T] {
        &self.prefix_sum
    }

    pub fn prefix_alt(&self) -> &[T] {
        &self.prefix_alt
    }

    pub fn into_parts(self) -> (Vec<T>, Vec<T>) {
        (self.prefix_sum, self.prefix_alt)
    }

    fn view(&self) -> PrefixView<'_, T> {
        PrefixView {
            sum: &self.prefix_sum,
            alt: &self.prefix_alt,
        }
    }

    /// Fail-fast batch evaluation; see [`evaluate`].
    pub fn evaluate(&self, queries: &[Query]) -> Result<Vec<T>, QueryError> {
        self.view().evaluate(queries)
    }

    /// Evaluates every query independently, reporting failures per query.
    pub fn evaluate_each(&self, queries: &[Query]) -> Vec<Result<T, QueryError>> {
        let view = self.view();
        queries
            .iter()
            .enumerate()
            .map(|(index, query)| view.answer(index, query))
            .collect()
    }
}

impl<T: Element> RangeAggregate<T> for PrefixIndex<T> {
    fn new(values: &[T]) -> Self {
        let (prefix_sum, prefix_alt) = build(values);
        Self {
            prefix_sum,
            prefix_alt,
        }
    }

    fn len(&self) -> usize {
        self.prefix_sum.len()
    }

    fn range_sum(&self, range: RangeInclusive<usize>) -> Option<T> {
        let (l, r) = range.into_inner();
        if l > r || r >= self.len() {
            return None;
        }
        Some(self.view().range_sum(l, r))
    }

    fn alternating_sum(&self, range: RangeInclusive<usize>) -> Option<T> {
        let (l, r) = range.into_inner();
        if l > r || r >= self.len() {
            return None;
        }
        Some(self.view().alternating_sum(l, r))
    }
}

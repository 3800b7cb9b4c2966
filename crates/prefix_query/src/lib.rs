//! Constant-time range aggregates over a static sequence.
//!
//! Two aggregates are supported, both over inclusive ranges `[l, r]`:
//! - range sum: `values[l] + ... + values[r]`;
//! - alternating sum: `values[l] - values[l + 1] + values[l + 2] - ...`,
//!   with `values[l]` always taken positively.
//!
//! [`PrefixIndex`] answers either in O(1) after an O(n) build.

mod element;
mod error;
mod prefix;
mod query;
mod scan;

use std::ops::RangeInclusive;

pub use element::Element;
pub use error::QueryError;
pub use prefix::{PrefixIndex, build, evaluate};
pub use query::{Query, QueryKind};
pub use scan::ScanIndex;

/// Static range-aggregate interface.
///
/// - Ranges are inclusive: `[l, r]`.
/// - The answer is `Some(_)` when `l <= r < len`, `None` otherwise.
pub trait RangeAggregate<T: Element>: Sized {
    fn new(values: &[T]) -> Self;
    fn len(&self) -> usize;

    #[inline(always)]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn range_sum(&self, range: RangeInclusive<usize>) -> Option<T>;
    fn alternating_sum(&self, range: RangeInclusive<usize>) -> Option<T>;

    fn answer(&self, query: &Query) -> Option<T> {
        match query.kind {
            QueryKind::RangeSum => self.range_sum(query.l..=query.r),
            QueryKind::AlternatingSum => self.alternating_sum(query.l..=query.r),
        }
    }
}

/// Fail-fast batch evaluation over any [`RangeAggregate`].
pub fn evaluate_with<T, A>(aggregate: &A, queries: &[Query]) -> Result<Vec<T>, QueryError>
where
    T: Element,
    A: RangeAggregate<T>,
{
    queries
        .iter()
        .enumerate()
        .map(|(index, query)| {
            aggregate
                .answer(query)
                .ok_or_else(|| QueryError::invalid_range(index, query.l, query.r, aggregate.len()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{PrefixIndex, Query, QueryError, RangeAggregate, ScanIndex, evaluate_with};

    fn brute_force_sum(values: &[i64], l: usize, r: usize) -> i64 {
        debug_assert!(l <= r);
        let mut acc = 0_i64;
        for &v in &values[l..=r] {
            acc = acc.wrapping_add(v);
        }
        acc
    }

    fn brute_force_alternating(values: &[i64], l: usize, r: usize) -> i64 {
        debug_assert!(l <= r);
        let mut acc = 0_i64;
        let mut positive = true;
        for &v in &values[l..=r] {
            acc = if positive {
                acc.wrapping_add(v)
            } else {
                acc.wrapping_sub(v)
            };
            positive = !positive;
        }
        acc
    }

    #[derive(Clone)]
    struct XorShift64 {
        state: u64,
    }

    impl XorShift64 {
        fn new(seed: u64) -> Self {
            Self { state: seed }
        }

        fn next_u64(&mut self) -> u64 {
            let mut x = self.state;
            x ^= x << 7;
            x ^= x >> 9;
            x ^= x << 8;
            self.state = x;
            x
        }

        fn gen_usize(&mut self, range: std::ops::Range<usize>) -> usize {
            debug_assert!(range.start < range.end);
            let span = (range.end - range.start) as u64;
            let x = self.next_u64() % span;
            range.start + (x as usize)
        }

        fn gen_i64(&mut self, range: std::ops::RangeInclusive<i64>) -> i64 {
            let start = *range.start();
            let end = *range.end();
            debug_assert!(start <= end);
            let span = (end as i128 - start as i128 + 1) as u64;
            let x = self.next_u64() % span;
            start + (x as i64)
        }
    }

    #[test]
    fn empty_returns_none() {
        let values: Vec<i64> = Vec::new();
        let prefix = PrefixIndex::new(&values);
        let scan = ScanIndex::new(&values);

        assert!(prefix.is_empty());
        assert!(scan.is_empty());
        assert_eq!(prefix.range_sum(0..=0), None);
        assert_eq!(prefix.alternating_sum(0..=0), None);
        assert_eq!(scan.range_sum(0..=0), None);
        assert_eq!(scan.alternating_sum(0..=0), None);
    }

    #[test]
    #[allow(clippy::reversed_empty_ranges)]
    fn invalid_ranges_return_none() {
        let values = vec![5_i64, 1, 4];
        let prefix = PrefixIndex::new(&values);
        let scan = ScanIndex::new(&values);

        for range in [2..=1, 0..=3, 3..=3, 1..=usize::MAX] {
            assert_eq!(prefix.range_sum(range.clone()), None, "prefix {range:?}");
            assert_eq!(prefix.alternating_sum(range.clone()), None, "prefix {range:?}");
            assert_eq!(scan.range_sum(range.clone()), None, "scan {range:?}");
            assert_eq!(scan.alternating_sum(range.clone()), None, "scan {range:?}");
        }
    }

    #[test]
    fn known_cases_match_bruteforce() {
        let cases: &[&[i64]] = &[
            &[1],
            &[2, 1],
            &[1, 2],
            &[1, 2, 3, 4, 5],
            &[5, -1, 4, -1, 3],
            &[0, 0, 0, 0],
            &[-3, -2, -1, 0],
            &[7, 7, 7, 7, 7],
        ];

        for &values in cases {
            let prefix = PrefixIndex::new(values);
            let scan = ScanIndex::new(values);

            let n = values.len();
            for l in 0..n {
                for r in l..n {
                    let sum = brute_force_sum(values, l, r);
                    let alt = brute_force_alternating(values, l, r);
                    assert_eq!(prefix.range_sum(l..=r), Some(sum), "prefix sum l={l} r={r}");
                    assert_eq!(scan.range_sum(l..=r), Some(sum), "scan sum l={l} r={r}");
                    assert_eq!(prefix.alternating_sum(l..=r), Some(alt), "prefix alt l={l} r={r}");
                    assert_eq!(scan.alternating_sum(l..=r), Some(alt), "scan alt l={l} r={r}");
                }
            }
        }
    }

    #[test]
    fn random_cases_match_bruteforce() {
        let mut rng = XorShift64::new(0xDEAD_BEEF_CAFE_BABE);

        for n in 1..64 {
            let mut values = Vec::with_capacity(n);
            for _ in 0..n {
                values.push(rng.gen_i64(-1_000..=1_000));
            }

            let prefix = PrefixIndex::new(&values);

            let mut queries = Vec::with_capacity(400);
            let mut expected = Vec::with_capacity(400);
            for i in 0..400 {
                let l = rng.gen_usize(0..n);
                let r = rng.gen_usize(l..n);
                if i % 2 == 0 {
                    queries.push(Query::range_sum(l, r));
                    expected.push(brute_force_sum(&values, l, r));
                } else {
                    queries.push(Query::alternating_sum(l, r));
                    expected.push(brute_force_alternating(&values, l, r));
                }
            }

            assert_eq!(prefix.evaluate(&queries).unwrap(), expected, "n={n}");
        }
    }

    #[test]
    fn evaluate_with_agrees_across_impls() {
        let mut rng = XorShift64::new(0x5EED_2026);
        let values: Vec<i64> = (0..200).map(|_| rng.gen_i64(-50..=50)).collect();
        let queries: Vec<Query> = (0..300)
            .map(|i| {
                let l = rng.gen_usize(0..values.len());
                let r = rng.gen_usize(l..values.len());
                if i % 3 == 0 {
                    Query::alternating_sum(l, r)
                } else {
                    Query::range_sum(l, r)
                }
            })
            .collect();

        let prefix = PrefixIndex::new(&values);
        let scan = ScanIndex::new(&values);
        assert_eq!(
            evaluate_with(&prefix, &queries).unwrap(),
            evaluate_with(&scan, &queries).unwrap()
        );
    }

    #[test]
    fn evaluate_with_reports_query_index() {
        let scan = ScanIndex::new(&[1_i64, 2, 3, 4]);
        let queries = [Query::range_sum(0, 1), Query::range_sum(1, 4)];
        assert_eq!(
            evaluate_with(&scan, &queries),
            Err(QueryError::InvalidRange {
                index: 1,
                l: 1,
                r: 4,
                len: 4
            })
        );
    }
}

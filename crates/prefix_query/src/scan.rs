use std::ops::RangeInclusive;

use crate::RangeAggregate;
use crate::element::{Element, signed_at};

/// Reference implementation: no preprocessing, O(r - l) per query.
#[derive(Clone, Debug)]
pub struct ScanIndex<T> {
    values: Vec<T>,
}

impl<T: Element> ScanIndex<T> {
    fn slice(&self, range: RangeInclusive<usize>) -> Option<&[T]> {
        let (l, r) = range.into_inner();
        if l > r || r >= self.values.len() {
            return None;
        }
        Some(&self.values[l..=r])
    }
}

impl<T: Element> RangeAggregate<T> for ScanIndex<T> {
    fn new(values: &[T]) -> Self {
        Self {
            values: values.to_vec(),
        }
    }

    fn len(&self) -> usize {
        self.values.len()
    }

    fn range_sum(&self, range: RangeInclusive<usize>) -> Option<T> {
        let values = self.slice(range)?;
        Some(values.iter().fold(T::ZERO, |acc, &v| acc.add(v)))
    }

    fn alternating_sum(&self, range: RangeInclusive<usize>) -> Option<T> {
        let values = self.slice(range)?;
        Some(
            values
                .iter()
                .enumerate()
                .fold(T::ZERO, |acc, (offset, &v)| acc.add(signed_at(v, offset))),
        )
    }
}

use thiserror::Error;

/// Contract violations raised while evaluating a query batch.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    /// Range outside `0 <= l <= r <= len - 1`.
    #[error("query {index}: invalid range [{l}, {r}] for sequence of length {len}")]
    InvalidRange {
        index: usize,
        l: i64,
        r: i64,
        len: usize,
    },

    #[error("query {index}: unknown query type {code:?}")]
    UnknownQueryType { index: usize, code: String },

    #[error("prefix arrays differ in length (sum: {sum_len}, alternating: {alt_len})")]
    MismatchedPrefixes { sum_len: usize, alt_len: usize },
}

impl QueryError {
    pub(crate) fn invalid_range(index: usize, l: usize, r: usize, len: usize) -> Self {
        Self::InvalidRange {
            index,
            l: saturating_i64(l),
            r: saturating_i64(r),
            len,
        }
    }

    /// Index of the offending query, if the error is tied to one.
    pub fn query_index(&self) -> Option<usize> {
        match self {
            Self::InvalidRange { index, .. } | Self::UnknownQueryType { index, .. } => Some(*index),
            Self::MismatchedPrefixes { .. } => None,
        }
    }
}

fn saturating_i64(x: usize) -> i64 {
    i64::try_from(x).unwrap_or(i64::MAX)
}

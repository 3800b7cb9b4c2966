use std::fmt;
use std::str::FromStr;

use crate::error::QueryError;

/// Aggregation requested by a query.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum QueryKind {
    /// Plain sum of `values[l..=r]`.
    RangeSum,
    /// `values[l] - values[l + 1] + values[l + 2] - ...` up to `r`.
    AlternatingSum,
}

impl QueryKind {
    pub const ALL: [QueryKind; 2] = [QueryKind::RangeSum, QueryKind::AlternatingSum];

    /// Wire code used by the batch payload (`"1"` / `"2"`).
    pub fn code(self) -> &'static str {
        match self {
            Self::RangeSum => "1",
            Self::AlternatingSum => "2",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "1" => Some(Self::RangeSum),
            "2" => Some(Self::AlternatingSum),
            _ => None,
        }
    }

    /// Like [`QueryKind::from_code`], reporting the query position on failure.
    pub fn parse_at(index: usize, code: &str) -> Result<Self, QueryError> {
        Self::from_code(code).ok_or_else(|| QueryError::UnknownQueryType {
            index,
            code: code.to_owned(),
        })
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RangeSum => f.write_str("range-sum"),
            Self::AlternatingSum => f.write_str("alternating-sum"),
        }
    }
}

impl FromStr for QueryKind {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_at(0, s)
    }
}

/// A single query over the inclusive range `[l, r]`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Query {
    pub kind: QueryKind,
    pub l: usize,
    pub r: usize,
}

impl Query {
    pub fn new(kind: QueryKind, l: usize, r: usize) -> Self {
        Self { kind, l, r }
    }

    pub fn range_sum(l: usize, r: usize) -> Self {
        Self::new(QueryKind::RangeSum, l, r)
    }

    pub fn alternating_sum(l: usize, r: usize) -> Self {
        Self::new(QueryKind::AlternatingSum, l, r)
    }

    #[inline(always)]
    pub(crate) fn is_valid_for(&self, len: usize) -> bool {
        self.l <= self.r && self.r < len
    }
}

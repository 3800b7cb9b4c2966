//! Wire format of the input payload and the submitted answers.

use std::fmt;

use prefix_query::{Query, QueryError, QueryKind, build, evaluate};
use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::error::BatchError;

/// Opaque bearer credential; never printed.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(***)")
    }
}

/// `{ token, data, query }` as fetched from the input endpoint.
#[derive(Clone, Debug, Deserialize)]
pub struct InputPayload {
    pub token: BearerToken,
    pub data: Vec<Number>,
    pub query: Vec<WireQuery>,
}

/// `{ type: "1" | "2", range: [l, r] }`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireQuery {
    #[serde(rename = "type")]
    pub kind: String,
    pub range: [i64; 2],
}

impl InputPayload {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, BatchError> {
        serde_json::from_slice(bytes).map_err(|e| BatchError::MalformedPayload(e.to_string()))
    }

    /// Converts the wire payload into engine inputs.
    ///
    /// Shape problems are [`BatchError::MalformedPayload`]. Queries are checked
    /// in order, so the reported [`QueryError`] names the first bad one.
    pub fn decode(self) -> Result<Batch, BatchError> {
        if self.token.as_str().is_empty() {
            return Err(BatchError::MalformedPayload("token is empty".to_string()));
        }
        let sequence = Sequence::from_numbers(&self.data)?;
        let queries = decode_queries(&self.query, sequence.len())?;
        Ok(Batch {
            token: self.token,
            sequence,
            queries,
        })
    }
}

fn decode_queries(wire: &[WireQuery], len: usize) -> Result<Vec<Query>, QueryError> {
    wire.iter()
        .enumerate()
        .map(|(index, q)| {
            let kind = QueryKind::parse_at(index, &q.kind)?;
            let [l, r] = q.range;
            match (usize::try_from(l), usize::try_from(r)) {
                (Ok(ul), Ok(ur)) if ul <= ur && ur < len => Ok(Query::new(kind, ul, ur)),
                _ => Err(QueryError::InvalidRange { index, l, r, len }),
            }
        })
        .collect()
}

/// Decoded batch ready for evaluation.
#[derive(Clone, Debug)]
pub struct Batch {
    pub token: BearerToken,
    pub sequence: Sequence,
    pub queries: Vec<Query>,
}

/// Input sequence, integer when every value fits `i64`.
#[derive(Clone, Debug, PartialEq)]
pub enum Sequence {
    Int(Vec<i64>),
    Float(Vec<f64>),
}

impl Sequence {
    pub fn from_numbers(numbers: &[Number]) -> Result<Self, BatchError> {
        if let Some(ints) = numbers.iter().map(Number::as_i64).collect::<Option<Vec<_>>>() {
            return Ok(Self::Int(ints));
        }
        numbers
            .iter()
            .enumerate()
            .map(|(i, n)| {
                n.as_f64()
                    .filter(|x| x.is_finite())
                    .ok_or_else(|| BatchError::MalformedPayload(format!("data[{i}] = {n} is not a finite number")))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self::Float)
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Int(v) => v.len(),
            Self::Float(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Builds both prefix arrays and answers `queries` in order.
    ///
    /// Integer sequences are widened to `i128`, so every answer over `i64`
    /// input is exact. A float answer that overflows to a non-finite value is
    /// an error rather than a JSON `null`.
    pub fn answer(&self, queries: &[Query]) -> Result<Answers, BatchError> {
        match self {
            Self::Int(values) => {
                let wide: Vec<i128> = values.iter().map(|&v| i128::from(v)).collect();
                let (prefix_sum, prefix_alt) = build(&wide);
                Ok(Answers::Int(evaluate(&prefix_sum, &prefix_alt, queries)?))
            }
            Self::Float(values) => {
                let (prefix_sum, prefix_alt) = build(values);
                let answers = evaluate(&prefix_sum, &prefix_alt, queries)?;
                if let Some(index) = answers.iter().position(|x| !x.is_finite()) {
                    return Err(BatchError::NonFiniteAnswer {
                        index,
                        query: queries[index],
                    });
                }
                Ok(Answers::Float(answers))
            }
        }
    }
}

/// Answers in query order; serialized as a plain JSON array.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Answers {
    Int(Vec<i128>),
    Float(Vec<f64>),
}

impl Answers {
    pub fn len(&self) -> usize {
        match self {
            Self::Int(v) => v.len(),
            Self::Float(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

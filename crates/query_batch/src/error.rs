//! Error types for a batch run

use std::fmt;

use prefix_query::{Query, QueryError};
use thiserror::Error;

/// Which side of the network boundary failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Fetch,
    Submit,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Fetch => f.write_str("fetch"),
            Stage::Submit => f.write_str("submit"),
        }
    }
}

/// Errors that abort a batch run
#[derive(Debug, Error)]
pub enum BatchError {
    /// Configuration validation failed
    #[error("Configuration error: {0}")]
    Config(String),

    /// Connection, timeout or body transfer failure
    #[error("{stage} request failed: {source}")]
    Transport {
        stage: Stage,
        #[source]
        source: reqwest::Error,
    },

    /// Non-success HTTP status
    #[error("{stage} returned HTTP {status}: {body}")]
    HttpStatus {
        stage: Stage,
        status: u16,
        body: String,
    },

    /// Input payload missing fields or with the wrong shape
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// A query violated its contract
    #[error(transparent)]
    Query(#[from] QueryError),

    /// A float answer overflowed to infinity or NaN
    #[error("query {index}: {} [{}, {}] overflowed to a non-finite value", .query.kind, .query.l, .query.r)]
    NonFiniteAnswer { index: usize, query: Query },

    /// Encoding answers failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Writing dry-run output failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BatchError {
    pub(crate) fn transport(stage: Stage, source: reqwest::Error) -> Self {
        Self::Transport { stage, source }
    }

    /// Index of the query the error is tied to, if any.
    pub fn query_index(&self) -> Option<usize> {
        match self {
            Self::Query(e) => e.query_index(),
            Self::NonFiniteAnswer { index, .. } => Some(*index),
            _ => None,
        }
    }

    /// Whether retrying the same request may succeed.
    ///
    /// Fetching is idempotent, so timeouts and 5xx/429 responses are retried.
    /// A submission is retried only if the request never reached the server.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport {
                stage: Stage::Fetch,
                source,
            } => source.is_connect() || source.is_timeout(),
            Self::Transport {
                stage: Stage::Submit,
                source,
            } => source.is_connect(),
            Self::HttpStatus {
                stage: Stage::Fetch,
                status,
                ..
            } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

//! Batch runner for the prefix range-query engine.
//!
//! A batch fetches `{ token, data, query }` from an input endpoint, answers
//! every query with [`prefix_query`], and posts the answers to an output
//! endpoint authenticated with the fetched bearer token.
//!
//! ```ignore
//! use query_batch::{BatchConfig, HttpTransport, SubmitMode, run_batch};
//!
//! let config = BatchConfig::default();
//! let transport = HttpTransport::from_config(&config)?;
//! let report = run_batch(&transport, &transport, SubmitMode::Submit).await?;
//! ```

pub mod batch;
pub mod config;
pub mod error;
pub mod payload;
pub mod transport;

pub use batch::{BatchReport, SubmitMode, run_batch};
pub use config::BatchConfig;
pub use error::{BatchError, Stage};
pub use payload::{Answers, Batch, BearerToken, InputPayload, Sequence, WireQuery};
pub use transport::{HttpTransport, InputSource, OutputSink, RetryPolicy, SubmitReceipt};

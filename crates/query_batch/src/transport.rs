//! Input source and output sink at the network boundary.
//!
//! [`InputSource`] and [`OutputSink`] are the seams a batch run depends on;
//! [`HttpTransport`] implements both over reqwest with bounded retries.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::config::BatchConfig;
use crate::error::{BatchError, Stage};
use crate::payload::{Answers, BearerToken, InputPayload};

/// Supplies the sequence, queries and token for one batch.
#[async_trait]
pub trait InputSource: Send + Sync {
    async fn fetch(&self) -> Result<InputPayload, BatchError>;
}

/// Accepts the answers of one batch.
#[async_trait]
pub trait OutputSink: Send + Sync {
    async fn submit(
        &self,
        token: &BearerToken,
        answers: &Answers,
    ) -> Result<SubmitReceipt, BatchError>;
}

/// What the output endpoint said about a submission.
#[derive(Clone, Debug, PartialEq)]
pub struct SubmitReceipt {
    pub status: u16,
    /// Response body, as JSON when it parses, else as a JSON string.
    pub body: Value,
}

impl SubmitReceipt {
    fn from_body(status: u16, bytes: &[u8]) -> Self {
        let body = serde_json::from_slice(bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()));
        Self { status, body }
    }
}

/// Retry limits shared by fetch and submit.
#[derive(Clone, Copy, Debug)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial: Duration,
    pub max: Duration,
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            initial: Duration::from_millis(1),
            max: Duration::from_millis(1),
        }
    }

    fn from_config(config: &BatchConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            initial: Duration::from_millis(config.retry_initial_ms),
            max: Duration::from_millis(config.retry_max_ms),
        }
    }

    /// Runs `op` until it succeeds, fails with a non-retryable error, or the
    /// retry budget is spent.
    async fn run<T, F, Fut>(&self, stage: Stage, mut op: F) -> Result<T, BatchError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, BatchError>>,
    {
        let mut backoff = ExponentialBackoff::new(self.initial, self.max, 2.0);
        let mut attempt = 0_u32;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < self.max_retries && e.is_retryable() => {
                    attempt += 1;
                    let delay = backoff.next_delay();
                    tracing::warn!(
                        error = %e,
                        %stage,
                        attempt,
                        retry_in_ms = delay.as_millis() as u64,
                        "Request failed, will retry"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// HTTP input source and output sink.
pub struct HttpTransport {
    client: Client,
    input_url: String,
    output_url: String,
    retry: RetryPolicy,
}

impl HttpTransport {
    /// Create a transport from validated configuration.
    pub fn from_config(config: &BatchConfig) -> Result<Self, BatchError> {
        config.validate().map_err(BatchError::Config)?;

        let client = Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| BatchError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            input_url: config.input_url.clone(),
            output_url: config.output_url.clone(),
            retry: RetryPolicy::from_config(config),
        })
    }

    /// Create a transport with default timeouts and no retries.
    pub fn new(input_url: impl Into<String>, output_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            input_url: input_url.into(),
            output_url: output_url.into(),
            retry: RetryPolicy::none(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    async fn fetch_once(&self) -> Result<InputPayload, BatchError> {
        let response = self
            .client
            .get(&self.input_url)
            .send()
            .await
            .map_err(|e| BatchError::transport(Stage::Fetch, e))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| BatchError::transport(Stage::Fetch, e))?;

        if !status.is_success() {
            return Err(BatchError::HttpStatus {
                stage: Stage::Fetch,
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        InputPayload::from_slice(&bytes)
    }

    async fn submit_once(
        &self,
        token: &BearerToken,
        answers: &Answers,
    ) -> Result<SubmitReceipt, BatchError> {
        let response = self
            .client
            .post(&self.output_url)
            .bearer_auth(token.as_str())
            .json(answers)
            .send()
            .await
            .map_err(|e| BatchError::transport(Stage::Submit, e))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| BatchError::transport(Stage::Submit, e))?;

        if !status.is_success() {
            return Err(BatchError::HttpStatus {
                stage: Stage::Submit,
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        Ok(SubmitReceipt::from_body(status.as_u16(), &bytes))
    }
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport")
            .field("input_url", &self.input_url)
            .field("output_url", &self.output_url)
            .field("retry", &self.retry)
            .finish()
    }
}

#[async_trait]
impl InputSource for HttpTransport {
    async fn fetch(&self) -> Result<InputPayload, BatchError> {
        self.retry.run(Stage::Fetch, || self.fetch_once()).await
    }
}

#[async_trait]
impl OutputSink for HttpTransport {
    async fn submit(
        &self,
        token: &BearerToken,
        answers: &Answers,
    ) -> Result<SubmitReceipt, BatchError> {
        self.retry
            .run(Stage::Submit, || self.submit_once(token, answers))
            .await
    }
}

/// Exponential backoff with ±25% jitter
struct ExponentialBackoff {
    max: Duration,
    multiplier: f64,
    current: Duration,
}

impl ExponentialBackoff {
    fn new(initial: Duration, max: Duration, multiplier: f64) -> Self {
        Self {
            max,
            multiplier,
            current: initial,
        }
    }

    fn next_delay(&mut self) -> Duration {
        let delay = self.current;
        self.current = std::cmp::min(
            self.max,
            Duration::from_secs_f64(self.current.as_secs_f64() * self.multiplier),
        );
        let jitter = rand::random::<f64>() * 0.5 - 0.25;
        Duration::from_secs_f64(delay.as_secs_f64() * (1.0 + jitter))
    }
}

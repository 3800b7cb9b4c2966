//! One fetch → build → evaluate → submit cycle.

use crate::error::BatchError;
use crate::payload::{Answers, Sequence};
use crate::transport::{InputSource, OutputSink, SubmitReceipt};

/// Whether computed answers are sent to the output sink.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SubmitMode {
    #[default]
    Submit,
    /// Compute answers but never contact the sink.
    DryRun,
}

/// Outcome of a completed batch.
#[derive(Clone, Debug, PartialEq)]
pub struct BatchReport {
    pub values: usize,
    pub queries: usize,
    pub answers: Answers,
    /// `None` in [`SubmitMode::DryRun`].
    pub receipt: Option<SubmitReceipt>,
}

/// Runs a single batch.
///
/// The engine runs only after the whole payload is fetched and decoded. Any
/// failure before submission aborts the batch, so the sink never sees a
/// partial or misaligned answer list.
pub async fn run_batch<S, K>(
    source: &S,
    sink: &K,
    mode: SubmitMode,
) -> Result<BatchReport, BatchError>
where
    S: InputSource + ?Sized,
    K: OutputSink + ?Sized,
{
    let payload = source.fetch().await.inspect_err(|e| {
        tracing::error!(error = %e, "Failed to fetch input payload");
    })?;

    let batch = payload.decode().inspect_err(|e| {
        tracing::error!(error = %e, query_index = ?e.query_index(), "Rejected input payload");
    })?;

    tracing::info!(
        values = batch.sequence.len(),
        queries = batch.queries.len(),
        float = matches!(batch.sequence, Sequence::Float(_)),
        "Payload received"
    );

    let answers = batch.sequence.answer(&batch.queries).inspect_err(|e| {
        tracing::error!(error = %e, query_index = ?e.query_index(), "Query evaluation failed");
    })?;

    tracing::debug!(answers = answers.len(), "Answers computed");

    let receipt = match mode {
        SubmitMode::DryRun => {
            tracing::info!("Dry run, skipping submission");
            None
        }
        SubmitMode::Submit => {
            let receipt = sink.submit(&batch.token, &answers).await.inspect_err(|e| {
                tracing::error!(error = %e, "Failed to submit answers");
            })?;
            tracing::info!(status = receipt.status, response = %receipt.body, "Answers submitted");
            Some(receipt)
        }
    };

    Ok(BatchReport {
        values: batch.sequence.len(),
        queries: batch.queries.len(),
        answers,
        receipt,
    })
}

use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use query_batch::{BatchConfig, BatchError, HttpTransport, SubmitMode, run_batch};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .with_writer(std::io::stderr)
        .init();

    let config = BatchConfig::parse();

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Batch failed");
            ExitCode::FAILURE
        }
    }
}

/// `RUST_LOG` directives when present and valid, else `info`.
fn env_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

async fn run(config: BatchConfig) -> Result<(), BatchError> {
    let transport = HttpTransport::from_config(&config)?;

    tracing::info!(
        input_url = %config.input_url,
        output_url = %config.output_url,
        max_retries = config.max_retries,
        dry_run = config.dry_run,
        "Starting query batch"
    );

    let mode = if config.dry_run {
        SubmitMode::DryRun
    } else {
        SubmitMode::Submit
    };
    let report = run_batch(&transport, &transport, mode).await?;

    if mode == SubmitMode::DryRun {
        let mut stdout = std::io::stdout().lock();
        serde_json::to_writer(&mut stdout, &report.answers)?;
        writeln!(stdout)?;
    }

    tracing::info!(
        values = report.values,
        queries = report.queries,
        "Batch complete"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::level_filters::LevelFilter;

    #[test]
    fn test_env_filter_defaults_to_info() {
        assert_eq!(env_filter(None).max_level_hint(), Some(LevelFilter::INFO));
        assert_eq!(env_filter(Some("  ")).max_level_hint(), Some(LevelFilter::INFO));
    }

    #[test]
    fn test_env_filter_honors_more_verbose_levels() {
        assert_eq!(
            env_filter(Some("debug")).max_level_hint(),
            Some(LevelFilter::DEBUG)
        );
        assert_eq!(
            env_filter(Some("query_batch=trace")).max_level_hint(),
            Some(LevelFilter::TRACE)
        );
    }
}

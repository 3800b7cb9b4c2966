//! Batch runner configuration and validation
//!
//! Endpoints, HTTP timeouts and retry behavior. Every flag can also be set
//! through the environment.

use std::time::Duration;

use clap::Parser;

pub const DEFAULT_INPUT_URL: &str = "https://share.shub.edu.vn/api/intern-test/input";
pub const DEFAULT_OUTPUT_URL: &str = "https://share.shub.edu.vn/api/intern-test/output";

/// Configuration for one batch run
#[derive(Parser, Debug, Clone)]
#[command(name = "query-batch", about = "Fetch, answer and submit a range-query batch")]
pub struct BatchConfig {
    // === Endpoints ===
    /// URL the input payload is fetched from (HTTP GET)
    #[arg(long, env = "QUERY_BATCH_INPUT_URL", default_value = DEFAULT_INPUT_URL)]
    pub input_url: String,

    /// URL the answers are posted to (HTTP POST, bearer-authenticated)
    #[arg(long, env = "QUERY_BATCH_OUTPUT_URL", default_value = DEFAULT_OUTPUT_URL)]
    pub output_url: String,

    // === HTTP ===
    /// Connection timeout (ms)
    #[arg(long, env = "QUERY_BATCH_CONNECT_TIMEOUT_MS", default_value = "5000")]
    pub connect_timeout_ms: u64,

    /// Per-request timeout (ms)
    #[arg(long, env = "QUERY_BATCH_REQUEST_TIMEOUT_MS", default_value = "30000")]
    pub request_timeout_ms: u64,

    // === Retry behavior ===
    /// Retries after the first failed attempt (0 disables retrying)
    #[arg(long, env = "QUERY_BATCH_MAX_RETRIES", default_value = "2")]
    pub max_retries: u32,

    /// Initial retry delay (ms)
    #[arg(long, env = "QUERY_BATCH_RETRY_INITIAL_MS", default_value = "500")]
    pub retry_initial_ms: u64,

    /// Max retry delay (ms)
    #[arg(long, env = "QUERY_BATCH_RETRY_MAX_MS", default_value = "5000")]
    pub retry_max_ms: u64,

    /// Print answers to stdout instead of submitting them
    #[arg(long, env = "QUERY_BATCH_DRY_RUN", default_value = "false")]
    pub dry_run: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            input_url: DEFAULT_INPUT_URL.to_string(),
            output_url: DEFAULT_OUTPUT_URL.to_string(),
            connect_timeout_ms: 5_000,
            request_timeout_ms: 30_000,
            max_retries: 2,
            retry_initial_ms: 500,
            retry_max_ms: 5_000,
            dry_run: false,
        }
    }
}

impl BatchConfig {
    /// Validate the configuration at startup
    pub fn validate(&self) -> Result<(), String> {
        check_url("input-url", &self.input_url)?;
        check_url("output-url", &self.output_url)?;

        if self.connect_timeout_ms == 0 {
            return Err("connect_timeout_ms must be > 0".to_string());
        }
        if self.request_timeout_ms == 0 {
            return Err("request_timeout_ms must be > 0".to_string());
        }
        if self.retry_initial_ms == 0 {
            return Err("retry_initial_ms must be > 0".to_string());
        }
        if self.retry_max_ms < self.retry_initial_ms {
            return Err("retry_max_ms must be >= retry_initial_ms".to_string());
        }

        Ok(())
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

fn check_url(flag: &str, url: &str) -> Result<(), String> {
    if url.trim().is_empty() {
        return Err(format!("--{flag} must not be empty"));
    }
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(format!("--{flag} must be an http(s) URL, got {url:?}"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(BatchConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_non_http_url() {
        let config = BatchConfig {
            output_url: "ftp://example.com/out".to_string(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.contains("output-url"));
    }

    #[test]
    fn test_validate_rejects_empty_url() {
        let config = BatchConfig {
            input_url: "  ".to_string(),
            ..Default::default()
        };
        assert!(config.validate().unwrap_err().contains("input-url"));
    }

    #[test]
    fn test_validate_retry_bounds() {
        let config = BatchConfig {
            retry_initial_ms: 1_000,
            retry_max_ms: 10,
            ..Default::default()
        };
        assert!(config.validate().unwrap_err().contains("retry_max_ms"));

        let config = BatchConfig {
            request_timeout_ms: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_every_flag_has_env_fallback() {
        use clap::CommandFactory;

        let command = BatchConfig::command();
        for arg in command.get_arguments() {
            if arg.get_long().is_none() || arg.get_id() == "help" {
                continue;
            }
            let env = arg.get_env().map(|e| e.to_string_lossy().into_owned());
            assert!(
                env.as_deref().is_some_and(|e| e.starts_with("QUERY_BATCH_")),
                "--{} has no env fallback",
                arg.get_id()
            );
        }
    }

    #[test]
    fn test_parse_flags() {
        let config = BatchConfig::parse_from([
            "query-batch",
            "--input-url",
            "http://localhost:9000/in",
            "--output-url",
            "http://localhost:9000/out",
            "--max-retries",
            "0",
            "--dry-run",
        ]);
        assert_eq!(config.input_url, "http://localhost:9000/in");
        assert_eq!(config.output_url, "http://localhost:9000/out");
        assert_eq!(config.max_retries, 0);
        assert!(config.dry_run);
        assert!(config.validate().is_ok());
    }
}

use clap::Parser;
use thiserror::Error;
use tokio::time::Duration;

use crate::client::{ClientConfig, PoolConfig, DEFAULT_REQUEST_TIMEOUT};

/// Command-line flags for the load generator.
///
/// Missing flags fall back to empty/zero values so that they are reported by
/// [`Config::validate`] rather than by the argument parser.
#[derive(Parser, Debug, Clone)]
#[command(name = "http-loadgen")]
#[command(version, about = "Fires a fixed number of GET requests at a URL and reports the outcome")]
pub struct Args {
    /// URL of the service to test
    #[arg(long, default_value = "")]
    pub url: String,

    /// Total number of HTTP requests to send
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub requests: i64,

    /// Number of concurrent workers sending requests
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub concurrency: i64,
}

/// Configuration validation error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("--url is required")]
    MissingUrl,

    #[error("--requests must be greater than 0")]
    InvalidRequests,

    #[error("--concurrency must be greater than 0")]
    InvalidConcurrency,

    #[error("--concurrency ({concurrency}) cannot be greater than --requests ({requests})")]
    ConcurrencyExceedsRequests { concurrency: i64, requests: i64 },
}

/// Main configuration for a load test run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub target_url: String,
    pub num_requests: i64,
    pub concurrency: i64,
}

impl Config {
    pub fn new(target_url: impl Into<String>, num_requests: i64, concurrency: i64) -> Self {
        Self {
            target_url: target_url.into(),
            num_requests,
            concurrency,
        }
    }

    /// Checks the configuration without touching it.
    ///
    /// Rules are checked in order; the first one violated is returned.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target_url.trim().is_empty() {
            return Err(ConfigError::MissingUrl);
        }
        if self.num_requests <= 0 {
            return Err(ConfigError::InvalidRequests);
        }
        if self.concurrency <= 0 {
            return Err(ConfigError::InvalidConcurrency);
        }
        if self.concurrency > self.num_requests {
            return Err(ConfigError::ConcurrencyExceedsRequests {
                concurrency: self.concurrency,
                requests: self.num_requests,
            });
        }
        Ok(())
    }

    /// Creates a ClientConfig from this Config.
    pub fn to_client_config(&self) -> ClientConfig {
        let max_idle_per_host = usize::try_from(self.concurrency).unwrap_or(0).max(1);
        ClientConfig {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            pool_config: Some(PoolConfig::new().with_max_idle_per_host(max_idle_per_host)),
        }
    }

    /// Prints the configuration summary to stderr, leaving stdout for the report.
    pub fn print_summary(&self, request_timeout: Duration) {
        eprintln!("Starting load test:");
        eprintln!("  Target URL: {}", self.target_url);
        eprintln!("  Total Requests: {}", self.num_requests);
        eprintln!("  Concurrent Workers: {}", self.concurrency);
        eprintln!("  Request Timeout: {:?}", request_timeout);
    }
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Config::new(args.url, args.requests, args.concurrency)
    }
}

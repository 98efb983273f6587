use std::time::Duration;
use tracing::debug;

/// Per-request timeout applied by every client this crate builds.
///
/// Without it a single hung connection would stall its worker, and with it
/// the whole run, forever.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection pool configuration.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Maximum idle connections to keep per host
    pub max_idle_per_host: usize,

    /// How long idle connections stay in the pool before cleanup
    pub idle_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_idle_per_host: 32,
            idle_timeout: Duration::from_secs(90),
        }
    }
}

impl PoolConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum idle connections per host.
    pub fn with_max_idle_per_host(mut self, max: usize) -> Self {
        self.max_idle_per_host = max;
        self
    }

    /// Apply this configuration to a reqwest ClientBuilder.
    pub fn apply_to_builder(&self, builder: reqwest::ClientBuilder) -> reqwest::ClientBuilder {
        builder
            .pool_max_idle_per_host(self.max_idle_per_host)
            .pool_idle_timeout(self.idle_timeout)
    }
}

/// Configuration for building the HTTP client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub request_timeout: Duration,
    pub pool_config: Option<PoolConfig>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            pool_config: None,
        }
    }
}

/// Builds the reqwest client shared by all workers of a run.
///
/// Clones of the returned client share one connection pool, so workers hitting
/// the same host can reuse each other's idle connections. No default headers
/// are set and the default redirect policy is kept.
pub fn build_client(
    config: &ClientConfig,
) -> Result<reqwest::Client, Box<dyn std::error::Error + Send + Sync>> {
    let pool_config = config.pool_config.clone().unwrap_or_default();
    let client_builder = pool_config.apply_to_builder(reqwest::Client::builder());

    let client = client_builder.timeout(config.request_timeout).build()?;

    debug!(
        timeout = ?config.request_timeout,
        max_idle_per_host = pool_config.max_idle_per_host,
        idle_timeout = ?pool_config.idle_timeout,
        "HTTP client built"
    );

    Ok(client)
}

//! Splits a run across workers, launches them and waits for all of them.

use std::sync::Arc;

use tracing::{error, info};

use crate::config::{Config, ConfigError};
use crate::metrics::{Aggregator, FinalMetrics};
use crate::worker::{run_worker, WorkerConfig};

/// Divides `num_requests` across `concurrency` workers as evenly as possible.
///
/// The first `num_requests % concurrency` workers get one extra request, so
/// the assignments always sum to `num_requests` and differ by at most one.
/// Returns an empty assignment when `concurrency` is zero.
pub fn partition(num_requests: u64, concurrency: usize) -> Vec<u64> {
    if concurrency == 0 {
        return Vec::new();
    }

    let workers = concurrency as u64;
    let base = num_requests / workers;
    let remainder = num_requests % workers;

    (0..workers)
        .map(|i| if i < remainder { base + 1 } else { base })
        .collect()
}

/// Runs a complete load test and returns the frozen counters.
///
/// The configuration is validated before anything is spawned; that is the
/// only way this can fail. Per-request failures are absorbed by the workers.
pub async fn run_load_test(
    client: reqwest::Client,
    config: &Config,
) -> Result<FinalMetrics, ConfigError> {
    config.validate()?;

    let aggregator = Arc::new(Aggregator::start());
    let assignments = partition(config.num_requests as u64, config.concurrency as usize);

    info!(
        url = %config.target_url,
        num_requests = config.num_requests,
        concurrency = config.concurrency,
        "Dispatching workers"
    );

    let mut handles = Vec::with_capacity(assignments.len());
    for (task_id, num_requests) in assignments.into_iter().enumerate() {
        let worker_config = WorkerConfig {
            task_id,
            url: config.target_url.clone(),
            num_requests,
        };

        let client_clone = client.clone();
        let aggregator_clone = Arc::clone(&aggregator);

        let handle = tokio::spawn(async move {
            run_worker(client_clone, worker_config, aggregator_clone).await;
        });
        handles.push(handle);
    }

    for (task_id, handle) in handles.into_iter().enumerate() {
        if let Err(e) = handle.await {
            error!(task_id, error = %e, "Worker task terminated abnormally");
        }
    }

    let final_metrics = aggregator.finalize();
    info!(
        total_requests = final_metrics.total_requests,
        elapsed = ?final_metrics.elapsed(),
        "All workers finished"
    );

    Ok(final_metrics)
}

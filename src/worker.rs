use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::errors::ErrorCategory;
use crate::metrics::{Aggregator, Outcome};

/// Configuration for a worker task.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub task_id: usize,
    pub url: String,
    pub num_requests: u64,
}

/// Runs a single worker task: sends its assigned number of GET requests one
/// after another and records each outcome.
///
/// Failures are recorded and skipped, never retried, so the worker always
/// issues exactly `num_requests` requests.
pub async fn run_worker(
    client: reqwest::Client,
    config: WorkerConfig,
    aggregator: Arc<Aggregator>,
) {
    debug!(
        task_id = config.task_id,
        url = %config.url,
        num_requests = config.num_requests,
        "Worker starting"
    );

    for request_index in 0..config.num_requests {
        let outcome = send_request(&client, &config).await;
        aggregator.record(outcome);

        if let Outcome::Status(status_code) = outcome {
            debug!(
                task_id = config.task_id,
                request_index,
                status_code,
                "Request completed"
            );
        }
    }

    info!(
        task_id = config.task_id,
        num_requests = config.num_requests,
        "Worker finished"
    );
}

async fn send_request(client: &reqwest::Client, config: &WorkerConfig) -> Outcome {
    match client.get(&config.url).send().await {
        Ok(mut response) => {
            let status = response.status().as_u16();

            // Drain the body so the connection goes back to the pool.
            // Content is discarded, and a body error after the status line
            // still counts as a received response.
            while let Ok(Some(_chunk)) = response.chunk().await {}

            Outcome::Status(status)
        }
        Err(e) => {
            let error_category = ErrorCategory::from_reqwest_error(&e);
            warn!(
                task_id = config.task_id,
                url = %config.url,
                error = %e,
                error_category = %error_category.label(),
                "Request failed"
            );
            Outcome::TransportFailure
        }
    }
}

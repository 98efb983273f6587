//! Toy HTTP server used to exercise the load generator by hand and in tests.
//!
//! Endpoints:
//! - `/`          200 with an incrementing request counter in the body
//! - `/slow`      200 after a 100ms delay
//! - `/count`     current counter value, without incrementing it
//! - `/status/X`  status X for X in {404, 500, 503}, otherwise 200
//!
//! Unknown paths are served like `/`.

use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Request, Response, Server, StatusCode};
use tokio::time::{self, Duration};
use tracing::{debug, info};

/// Delay applied by the `/slow` endpoint.
pub const SLOW_DELAY: Duration = Duration::from_millis(100);

const STATUS_PREFIX: &str = "/status";

/// State shared by every connection of the server.
#[derive(Debug, Default)]
pub struct TestServerState {
    request_count: AtomicU64,
}

impl TestServerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_count(&self) -> u64 {
        self.request_count.load(Ordering::SeqCst)
    }

    fn next_request(&self) -> u64 {
        self.request_count.fetch_add(1, Ordering::SeqCst) + 1
    }
}

/// Maps the part of a `/status/...` path after the prefix to a status code.
pub fn status_for_suffix(suffix: &str) -> StatusCode {
    match suffix {
        "404" => StatusCode::NOT_FOUND,
        "500" => StatusCode::INTERNAL_SERVER_ERROR,
        "503" => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::OK,
    }
}

/// Routes one request.
pub async fn handle_request(
    req: Request<Body>,
    state: Arc<TestServerState>,
) -> Result<Response<Body>, Infallible> {
    let path = req.uri().path().to_owned();

    let (status, body) = match path.as_str() {
        "/slow" => {
            time::sleep(SLOW_DELAY).await;
            let count = state.next_request();
            (StatusCode::OK, format!("Slow request #{} completed", count))
        }
        "/count" => (
            StatusCode::OK,
            format!("Total requests processed: {}", state.request_count()),
        ),
        _ if path == STATUS_PREFIX || path.starts_with("/status/") => {
            let suffix = path
                .strip_prefix(STATUS_PREFIX)
                .unwrap_or_default()
                .trim_start_matches('/');
            let status = status_for_suffix(suffix);
            state.next_request();
            (status, format!("Status: {}", status.as_u16()))
        }
        _ => {
            let count = state.next_request();
            (
                StatusCode::OK,
                format!("Request #{} - Hello from test server!", count),
            )
        }
    };

    debug!(path = %path, status = status.as_u16(), "Served request");

    Ok(Response::builder()
        .status(status)
        .header("Content-Type", "text/plain; charset=utf-8")
        .body(Body::from(body))
        .unwrap_or_else(|_| Response::new(Body::empty())))
}

/// Binds the server and returns its actual address together with the future
/// that serves connections until it fails.
///
/// Binding to port 0 picks a free port, which is what the tests rely on.
pub fn bind_test_server(
    addr: SocketAddr,
    state: Arc<TestServerState>,
) -> Result<(SocketAddr, impl Future<Output = Result<(), hyper::Error>>), hyper::Error> {
    let make_svc = make_service_fn(move |_conn| {
        let state = Arc::clone(&state);
        async move {
            Ok::<_, Infallible>(service_fn(move |req| {
                handle_request(req, Arc::clone(&state))
            }))
        }
    });

    let server = Server::try_bind(&addr)?.serve(make_svc);
    let local_addr = server.local_addr();
    info!(addr = %local_addr, "Test server listening");

    Ok((local_addr, server))
}

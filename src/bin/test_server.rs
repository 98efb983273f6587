use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;

use http_loadgen::logging::init_tracing;
use http_loadgen::test_server::{bind_test_server, TestServerState};

#[derive(Parser, Debug)]
#[command(name = "test-server")]
#[command(about = "Toy HTTP server for exercising http-loadgen")]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "0.0.0.0:8080")]
    addr: SocketAddr,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    init_tracing("info");

    let args = Args::parse();
    let state = Arc::new(TestServerState::new());
    let (local_addr, server) = bind_test_server(args.addr, state)?;

    println!("Test server starting on {}", local_addr);
    println!("Endpoints:");
    println!("  /          - Returns 200 OK");
    println!("  /slow      - 100ms delay");
    println!("  /count     - Request counter");
    println!("  /status/X  - Returns status code X (404, 500, 503; otherwise 200)");

    server.await?;
    Ok(())
}

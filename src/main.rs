use clap::Parser;

use http_loadgen::client::build_client;
use http_loadgen::config::{Args, Config};
use http_loadgen::dispatcher::run_load_test;
use http_loadgen::logging::init_tracing;
use http_loadgen::report::print_report;

#[tokio::main]
async fn main() {
    init_tracing("warn");

    let args = match Args::try_parse() {
        Ok(args) => args,
        // --help and --version
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            let _ = e.print();
            std::process::exit(1);
        }
    };

    let config = Config::from(args);
    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Build HTTP client shared by all workers
    let client_config = config.to_client_config();
    let client = match build_client(&client_config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error during load test: {}", e);
            std::process::exit(1);
        }
    };

    config.print_summary(client_config.request_timeout);

    match run_load_test(client, &config).await {
        Ok(final_metrics) => print_report(&final_metrics),
        Err(e) => {
            eprintln!("Error during load test: {}", e);
            std::process::exit(1);
        }
    }
}

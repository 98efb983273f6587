use std::env;

use tracing_subscriber::EnvFilter;

/// Installs the global tracing subscriber, writing to stderr.
///
/// `RUST_LOG` overrides `default_filter`. `LOG_FORMAT=json` switches to JSON
/// lines. Calling this twice is harmless: the second install is ignored.
pub fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let json = env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}

pub mod client;
pub mod config;
pub mod dispatcher;
pub mod errors;
pub mod logging;
pub mod metrics;
pub mod report;
pub mod test_server;
pub mod worker;

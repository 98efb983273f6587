//! Classification of transport-level request failures.
//!
//! Every failed request is recorded under the same sentinel outcome, but the
//! category is attached to the log event so an operator can tell a refused
//! connection from a timeout or a certificate problem.

use std::fmt;

/// Categories of transport failures that can occur while sending a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Network connectivity errors (DNS, connection refused, reset, etc.)
    NetworkError,

    /// Request timeout errors
    TimeoutError,

    /// TLS/SSL certificate errors
    TlsError,

    /// The request could not be built (malformed URL, unsupported scheme)
    InvalidRequest,

    /// Other/unknown errors
    OtherError,
}

impl ErrorCategory {
    /// Categorize a reqwest error.
    pub fn from_reqwest_error(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            ErrorCategory::TimeoutError
        } else if error.is_builder() {
            ErrorCategory::InvalidRequest
        } else if error.is_connect() || error.is_request() {
            // Connect errors wrap TLS handshake failures too.
            Self::from_message(&error_chain_message(error), ErrorCategory::NetworkError)
        } else if error.is_body() || error.is_decode() {
            ErrorCategory::NetworkError
        } else {
            Self::from_message(&error_chain_message(error), ErrorCategory::OtherError)
        }
    }

    fn from_message(message: &str, fallback: ErrorCategory) -> Self {
        let msg = message.to_lowercase();

        if msg.contains("certificate") || msg.contains("tls") || msg.contains("ssl") {
            ErrorCategory::TlsError
        } else if msg.contains("timeout") || msg.contains("timed out") {
            ErrorCategory::TimeoutError
        } else if msg.contains("dns")
            || msg.contains("resolve")
            || msg.contains("connect")
            || msg.contains("connection")
        {
            ErrorCategory::NetworkError
        } else {
            fallback
        }
    }

    /// Get the log label for this error category.
    pub fn label(&self) -> &'static str {
        match self {
            ErrorCategory::NetworkError => "network_error",
            ErrorCategory::TimeoutError => "timeout_error",
            ErrorCategory::TlsError => "tls_error",
            ErrorCategory::InvalidRequest => "invalid_request",
            ErrorCategory::OtherError => "other_error",
        }
    }

    /// Get a human-readable description of this error category.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCategory::NetworkError => "Network/Connection Errors",
            ErrorCategory::TimeoutError => "Request Timeout Errors",
            ErrorCategory::TlsError => "TLS/SSL Certificate Errors",
            ErrorCategory::InvalidRequest => "Invalid Request Errors",
            ErrorCategory::OtherError => "Other/Unknown Errors",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Joins an error with all of its sources, since reqwest keeps the useful
/// detail (e.g. "connection refused") in the source chain.
fn error_chain_message(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(inner) = source {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        source = inner.source();
    }
    message
}

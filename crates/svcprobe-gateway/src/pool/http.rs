//! HTTP client settings for probes and token requests.

use std::io::ErrorKind;
use std::time::Duration;

use anyhow::Context;

/// Timeout budget for outbound requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpSettings {
    /// Time allowed to establish a connection
    pub connect_timeout: Duration,
    /// Time allowed for the response once connected
    pub read_timeout: Duration,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(1),
            read_timeout: Duration::from_secs(1),
        }
    }
}

impl HttpSettings {
    pub fn from_millis(connect_ms: u64, read_ms: u64) -> Self {
        Self {
            connect_timeout: Duration::from_millis(connect_ms),
            read_timeout: Duration::from_millis(read_ms),
        }
    }

    /// Overall bound on one request: connect plus read.
    pub fn request_timeout(&self) -> Duration {
        self.connect_timeout + self.read_timeout
    }

    /// Build the client shared by all connections.
    ///
    /// Idle connections are not pooled, so nothing outlives the request that
    /// opened it. Proxy settings come from the environment.
    pub fn build_client(&self) -> anyhow::Result<reqwest::Client> {
        reqwest::Client::builder()
            .connect_timeout(self.connect_timeout)
            .timeout(self.request_timeout())
            .pool_max_idle_per_host(0)
            .build()
            .context("Failed to build HTTP client")
    }
}

/// Whether the error chain ends in a refused or unroutable connection.
///
/// DNS failures and connect timeouts do not count.
pub fn is_unreachable(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(cause) = current {
        if let Some(io) = cause.downcast_ref::<std::io::Error>() {
            if matches!(
                io.kind(),
                ErrorKind::ConnectionRefused
                    | ErrorKind::HostUnreachable
                    | ErrorKind::NetworkUnreachable
            ) {
                return true;
            }
        }
        current = cause.source();
    }
    false
}

/// Render an error with all of its sources, outermost first.
pub fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

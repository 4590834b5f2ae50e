//! Connection pool
//!
//! - `ServiceConnection` - per-service token cache and health probe
//! - `ConnectionRegistry` - service name to connection, created lazily
//! - `HttpSettings` - timeouts for the shared HTTP client

mod connection;
mod http;
mod registry;

pub use connection::ServiceConnection;
pub use http::{error_chain, is_unreachable, HttpSettings};
pub use registry::ConnectionRegistry;

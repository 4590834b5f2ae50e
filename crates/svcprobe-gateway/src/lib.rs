//! svcprobe Gateway
//!
//! Polls remote services over HTTP to report their operational status:
//! - OAuth2 client-credentials tokens, cached per service
//! - Authenticated health probes with a single re-authentication on 401
//! - One connection per service, checks for the same service serialized
//! - HTTP status API (`/status/{name}`, `/all`, `/reload`)

pub mod logging;
pub mod oauth;
pub mod pool;
pub mod server;
pub mod services;

pub use oauth::{ClientCredentials, OAuthToken, TokenResponse, TokenSlot};
pub use pool::{ConnectionRegistry, HttpSettings, ServiceConnection};
pub use server::{GatewayConfig, GatewayServer};
pub use services::StatusService;

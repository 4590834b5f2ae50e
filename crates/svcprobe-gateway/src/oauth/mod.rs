//! OAuth2 client-credentials support
//!
//! Token types, the per-connection token slot, and the token endpoint exchange.

mod client_credentials;
mod token;

pub use client_credentials::{parse_token_body, request_token, ClientCredentials};
pub use token::{OAuthToken, TokenResponse, TokenSlot, EXPIRY_MARGIN_MS};

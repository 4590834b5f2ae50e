//! OAuth Token types
//!
//! Handles token parsing, expiry and the per-connection token slot.

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

/// Safety margin subtracted from the token lifetime, so a token does not
/// expire while a request using it is in flight.
pub const EXPIRY_MARGIN_MS: i64 = 500;

/// Upper bound applied to `expires_in` (ten years).
const MAX_LIFETIME_SECS: i64 = 10 * 365 * 24 * 60 * 60;

/// Token response from the token endpoint
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    /// Lifetime in seconds
    pub expires_in: i64,
}

/// Access token held by a service connection.
///
/// Replaced wholesale on refresh, never updated in place.
#[derive(Clone)]
pub struct OAuthToken {
    /// Access token for probe requests
    pub access_token: String,

    /// Token type as reported by the endpoint (usually "bearer")
    pub token_type: String,

    pub refresh_token: Option<String>,

    pub client_id: Option<String>,

    /// Lifetime in seconds, as issued
    pub expires_in: i64,

    /// Instant from which the token is no longer used
    pub expire_at: DateTime<Utc>,
}

impl std::fmt::Debug for OAuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthToken")
            .field("access_token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[REDACTED]"))
            .field("client_id", &self.client_id)
            .field("expires_in", &self.expires_in)
            .field("expire_at", &self.expire_at)
            .finish()
    }
}

impl OAuthToken {
    /// Build a token from an endpoint response received at `issued_at`.
    pub fn from_response(response: TokenResponse, issued_at: DateTime<Utc>) -> Self {
        let lifetime = response.expires_in.clamp(0, MAX_LIFETIME_SECS);
        let expire_at =
            issued_at + Duration::seconds(lifetime) - Duration::milliseconds(EXPIRY_MARGIN_MS);

        Self {
            access_token: response.access_token,
            token_type: response.token_type.unwrap_or_default(),
            refresh_token: response.refresh_token,
            client_id: response.client_id,
            expires_in: response.expires_in,
            expire_at,
        }
    }

    /// Whether the token may still be used at `now`.
    pub fn is_usable_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expire_at
    }

    /// Value of the probe `authorization` header.
    pub fn bearer_header(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}

/// Token slot of a service connection.
#[derive(Debug, Clone, Default)]
pub enum TokenSlot {
    /// No token yet, or the last one was invalidated
    #[default]
    Empty,
    Held(OAuthToken),
}

impl TokenSlot {
    /// The held token, if it is still usable at `now`.
    pub fn usable_at(&self, now: DateTime<Utc>) -> Option<&OAuthToken> {
        match self {
            Self::Held(token) if token.is_usable_at(now) => Some(token),
            _ => None,
        }
    }

    /// Drop the held token unconditionally.
    pub fn invalidate(&mut self) {
        *self = Self::Empty;
    }

    /// Store a freshly acquired token, replacing any previous one.
    pub fn replace(&mut self, token: OAuthToken) {
        *self = Self::Held(token);
    }

    /// The held token regardless of expiry.
    pub fn token(&self) -> Option<&OAuthToken> {
        match self {
            Self::Held(token) => Some(token),
            Self::Empty => None,
        }
    }
}

//! Client-credentials token exchange
//!
//! The token endpoint is called with `Content-Type: application/json` and a
//! form-style body. The body is not URL-encoded.

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use svcprobe_core::{CheckError, CheckResult};
use tracing::{debug, info, warn};

use super::token::{OAuthToken, TokenResponse};
use crate::pool::error_chain;

lazy_static! {
    // Any body that opens an object and mentions `"error":` is a failure.
    static ref ERROR_BODY: Regex = Regex::new(r#"(?s)^\{.*"error":"#).unwrap();
}

/// Resolved client credentials for one token request.
#[derive(Clone)]
pub struct ClientCredentials {
    pub token_url: String,
    pub client_id: String,
    pub client_secret: String,
}

impl std::fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("token_url", &self.token_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}

impl ClientCredentials {
    /// Request body sent to the token endpoint.
    fn form_body(&self) -> String {
        format!(
            "grant_type=client_credentials&client_id={}&client_secret={}",
            self.client_id, self.client_secret
        )
    }
}

/// Request a new token from the endpoint named in `credentials`.
///
/// Fails with `Token` when the endpoint reports an error and with
/// `HealthCheck` on any transport or parsing failure.
pub async fn request_token(
    http: &reqwest::Client,
    credentials: &ClientCredentials,
) -> CheckResult<OAuthToken> {
    info!("[OAuth] Requesting token from: {}", credentials.token_url);

    let response = http
        .post(&credentials.token_url)
        .header(reqwest::header::ACCEPT, "application/json")
        .header(reqwest::header::CONTENT_TYPE, "application/json")
        .body(credentials.form_body())
        .send()
        .await
        .map_err(|e| {
            warn!("[OAuth] Token request failed: {}", error_chain(&e));
            CheckError::HealthCheck(error_chain(&e))
        })?;

    let status = response.status();
    debug!("[OAuth] Token endpoint answered {}", status);

    let body = response.text().await.map_err(|e| {
        warn!("[OAuth] Failed to read token response: {}", error_chain(&e));
        CheckError::HealthCheck(error_chain(&e))
    })?;

    let token = parse_token_body(body.trim(), Utc::now())?;
    info!("[OAuth] Successfully retrieved a token");
    Ok(token)
}

/// Interpret a token endpoint response body.
pub fn parse_token_body(body: &str, issued_at: DateTime<Utc>) -> CheckResult<OAuthToken> {
    if is_error_body(body) {
        warn!("[OAuth] Received error from token endpoint: {}", body);
        return Err(CheckError::Token(token_error_message(body)?));
    }

    let response: TokenResponse = serde_json::from_str(body).map_err(|e| {
        warn!("[OAuth] Malformed token response: {}", e);
        CheckError::HealthCheck(format!("Malformed token response: {}", e))
    })?;

    Ok(OAuthToken::from_response(response, issued_at))
}

fn is_error_body(body: &str) -> bool {
    ERROR_BODY.is_match(body)
}

fn token_error_message(body: &str) -> CheckResult<String> {
    let value: serde_json::Value = serde_json::from_str(body).map_err(|e| {
        CheckError::HealthCheck(format!("Malformed token error response: {}", e))
    })?;

    Ok(match value.get("error") {
        Some(serde_json::Value::String(message)) => message.clone(),
        Some(other) => other.to_string(),
        None => body.to_string(),
    })
}

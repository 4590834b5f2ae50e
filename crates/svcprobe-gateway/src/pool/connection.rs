//! Service connection - token cache and health probe for one service
//!
//! A check runs as one critical section under the connection's lock:
//! ensure token -> probe -> (on 401) refresh token -> re-probe -> classify.
//! Checks of different services never contend; each connection has its own lock.

use std::sync::Arc;

use chrono::Utc;
use reqwest::StatusCode;
use svcprobe_core::{CheckError, CheckResult, SecretResolver, ServiceDescriptor, ServiceStatus, StatusKind};
use tokio::sync::Mutex;
use tracing::{debug, info, trace, warn};

use super::http::{error_chain, is_unreachable};
use crate::oauth::{self, ClientCredentials, OAuthToken, TokenSlot};

/// What a single probe produced.
#[derive(Debug)]
enum ProbeOutcome {
    Response { status: StatusCode, body: String },
    /// Connection refused, or no route to the host or network
    Unreachable(String),
}

/// Connection to one monitored service.
pub struct ServiceConnection {
    descriptor: ServiceDescriptor,
    secrets: Arc<SecretResolver>,
    http: reqwest::Client,
    token: Mutex<TokenSlot>,
}

impl std::fmt::Debug for ServiceConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceConnection")
            .field("service", &self.descriptor.name)
            .finish()
    }
}

impl ServiceConnection {
    pub fn new(
        descriptor: ServiceDescriptor,
        secrets: Arc<SecretResolver>,
        http: reqwest::Client,
    ) -> Self {
        Self {
            descriptor,
            secrets,
            http,
            token: Mutex::new(TokenSlot::Empty),
        }
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    /// Whether a usable token is cached right now.
    ///
    /// Waits for an in-flight check of this service to finish.
    pub async fn has_valid_token(&self) -> bool {
        self.token.lock().await.usable_at(Utc::now()).is_some()
    }

    /// Check the service and classify the outcome.
    ///
    /// Fails only with `Token` (endpoint rejected the credentials) or
    /// `HealthCheck` (unexpected I/O, DNS failure, timeout); a refused or
    /// unroutable target is an `error-connect` status.
    pub async fn check_status(&self) -> CheckResult<ServiceStatus> {
        info!(service = %self.name(), "[ServiceConnection] Checking status");

        let mut slot = self.token.lock().await;

        let bearer = self.ensure_valid_token(&mut slot).await?.bearer_header();
        let probe_url = self.probe_url();

        let mut outcome = self.probe(&probe_url, &bearer).await?;

        if matches!(outcome, ProbeOutcome::Response { status, .. } if status == StatusCode::UNAUTHORIZED)
        {
            info!(
                service = %self.name(),
                "[ServiceConnection] Received 401, refreshing token and trying again"
            );
            slot.invalidate();
            let token = self.acquire_token().await?;
            let bearer = token.bearer_header();
            slot.replace(token);

            outcome = self.probe(&probe_url, &bearer).await?;
        }

        Ok(self.classify(outcome))
    }

    /// Make sure the slot holds a usable token, requesting one if it does not.
    async fn ensure_valid_token<'a>(&self, slot: &'a mut TokenSlot) -> CheckResult<&'a OAuthToken> {
        if slot.usable_at(Utc::now()).is_none() {
            info!(
                service = %self.name(),
                "[ServiceConnection] No token or token is expired, requesting new token"
            );
            slot.invalidate();
            let token = self.acquire_token().await?;
            slot.replace(token);
        }

        slot.token()
            .ok_or_else(|| CheckError::HealthCheck("No token available".to_string()))
    }

    /// Run the token acquisition protocol with freshly resolved credentials.
    async fn acquire_token(&self) -> CheckResult<OAuthToken> {
        let credentials = ClientCredentials {
            token_url: self.secrets.resolve(&self.descriptor.token_url),
            client_id: self.secrets.resolve(&self.descriptor.client_id),
            client_secret: self.secrets.resolve_secret(&self.descriptor.client_secret)?,
        };

        oauth::request_token(&self.http, &credentials).await
    }

    /// `protocol://host:port/uri`, resolved against the current environment.
    fn probe_url(&self) -> String {
        let uri = self.secrets.resolve(&self.descriptor.uri);
        format!(
            "{}://{}:{}/{}",
            self.secrets.resolve(&self.descriptor.protocol),
            self.secrets.resolve(&self.descriptor.host),
            self.secrets.resolve(&self.descriptor.port),
            uri.trim_start_matches('/')
        )
    }

    async fn probe(&self, url: &str, bearer: &str) -> CheckResult<ProbeOutcome> {
        info!(service = %self.name(), "[ServiceConnection] Executing check request: {}", url);

        let response = match self
            .http
            .get(url)
            .header(reqwest::header::AUTHORIZATION, bearer)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) if is_unreachable(&e) => {
                let message = error_chain(&e);
                warn!(service = %self.name(), "[ServiceConnection] Connect exception: {}", message);
                return Ok(ProbeOutcome::Unreachable(message));
            }
            Err(e) => {
                let message = error_chain(&e);
                warn!(service = %self.name(), "[ServiceConnection] Check request failed: {}", message);
                return Err(CheckError::HealthCheck(message));
            }
        };

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            let message = error_chain(&e);
            warn!(service = %self.name(), "[ServiceConnection] Error while reading response: {}", message);
            CheckError::HealthCheck(message)
        })?;
        trace!(service = %self.name(), "[ServiceConnection] Response: {}", body);

        Ok(ProbeOutcome::Response {
            status,
            body: body.trim().to_string(),
        })
    }

    fn classify(&self, outcome: ProbeOutcome) -> ServiceStatus {
        match outcome {
            ProbeOutcome::Response { status, .. } if status == StatusCode::OK => {
                debug!(service = %self.name(), "[ServiceConnection] Received status code 200");
                ServiceStatus::ok(self.name())
            }
            ProbeOutcome::Response { status, body } => {
                warn!(
                    service = %self.name(),
                    "[ServiceConnection] Received error status code: {}",
                    status
                );
                ServiceStatus::new(self.name(), StatusKind::ErrorHttp(status.as_u16()), body)
            }
            ProbeOutcome::Unreachable(message) => {
                ServiceStatus::new(self.name(), StatusKind::ErrorConnect, message)
            }
        }
    }
}

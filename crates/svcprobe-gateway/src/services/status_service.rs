//! Status Service - dispatch between the HTTP layer and service connections
//!
//! Applies the disabled-marker override, resolves connections through the
//! registry, and fans `/all` out across services.

use std::sync::Arc;

use futures::future::join_all;
use svcprobe_core::{
    CheckError, CheckResult, DescriptorStore, DisabledMarkers, ServiceStatus, StatusKind,
};
use tracing::{info, warn};

use crate::pool::ConnectionRegistry;

pub struct StatusService {
    store: Arc<DescriptorStore>,
    markers: DisabledMarkers,
    registry: Arc<ConnectionRegistry>,
}

impl StatusService {
    pub fn new(
        store: Arc<DescriptorStore>,
        markers: DisabledMarkers,
        registry: Arc<ConnectionRegistry>,
    ) -> Self {
        Self {
            store,
            markers,
            registry,
        }
    }

    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    pub fn store(&self) -> &Arc<DescriptorStore> {
        &self.store
    }

    /// Check one service.
    ///
    /// Disabled services are answered without touching the descriptor store
    /// or the registry.
    pub async fn check(&self, service_name: &str) -> CheckResult<ServiceStatus> {
        if self.markers.is_disabled(service_name) {
            return Ok(ServiceStatus::disabled(service_name));
        }

        self.ensure_store_loaded().await?;
        let connection = self
            .registry
            .get_or_create(service_name, &*self.store)?;
        connection.check_status().await
    }

    /// Check every configured service concurrently, sorted by name.
    ///
    /// A failing service is reported as an `error` status instead of failing
    /// the whole listing.
    pub async fn check_all(&self) -> CheckResult<Vec<ServiceStatus>> {
        self.ensure_store_loaded().await?;
        let names = self.store.service_names()?;
        info!("[StatusService] Checking {} services", names.len());

        let checks = names.iter().map(|name| async move {
            match self.check(name).await {
                Ok(status) => status,
                Err(e) => {
                    warn!(
                        service = %name,
                        "[StatusService] Exception while checking status: {}",
                        e
                    );
                    ServiceStatus::new(name.as_str(), StatusKind::Error, format!("Exception: {}", e))
                }
            }
        });

        Ok(join_all(checks).await)
    }

    /// Read the services file on the blocking pool if it is not cached.
    async fn ensure_store_loaded(&self) -> CheckResult<()> {
        if self.store.is_loaded() {
            return Ok(());
        }

        let store = self.store.clone();
        tokio::task::spawn_blocking(move || store.load())
            .await
            .map_err(CheckError::health_check)?
    }

    /// Re-read the services file on next access and drop all connections.
    pub fn reload(&self) {
        info!("[StatusService] Reloading service configuration");
        self.store.reset();
        self.registry.clear();
    }
}

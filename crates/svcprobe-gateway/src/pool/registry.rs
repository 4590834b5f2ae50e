//! Connection registry - one `ServiceConnection` per service name
//!
//! The registry lock only guards the map. It is held for the map lookup/insert and
//! never across a network call, so looking up one service never waits on a
//! check of another.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use svcprobe_core::{CheckResult, DescriptorSource, SecretResolver};
use tracing::{debug, info};

use super::ServiceConnection;

pub struct ConnectionRegistry {
    connections: Mutex<HashMap<String, Arc<ServiceConnection>>>,
    secrets: Arc<SecretResolver>,
    http: reqwest::Client,
}

impl ConnectionRegistry {
    pub fn new(secrets: Arc<SecretResolver>, http: reqwest::Client) -> Self {
        Self {
            connections: Mutex::new(HashMap::new()),
            secrets,
            http,
        }
    }

    /// Return the connection for `name`, creating it from `source` on first use.
    ///
    /// The descriptor is looked up outside the map lock. Concurrent callers
    /// asking for the same name get the same instance; the first insert wins.
    pub fn get_or_create(
        &self,
        name: &str,
        source: &dyn DescriptorSource,
    ) -> CheckResult<Arc<ServiceConnection>> {
        debug!(service = %name, "[Registry] Looking up connection");

        if let Some(existing) = self.get(name) {
            return Ok(existing);
        }

        let descriptor = source.lookup(name)?;

        let mut connections = self.connections.lock();
        let connection = connections.entry(name.to_string()).or_insert_with(|| {
            info!(service = %name, "[Registry] Creating new connection");
            Arc::new(ServiceConnection::new(
                descriptor,
                self.secrets.clone(),
                self.http.clone(),
            ))
        });
        Ok(connection.clone())
    }

    /// Existing connection for `name`, if any.
    pub fn get(&self, name: &str) -> Option<Arc<ServiceConnection>> {
        self.connections.lock().get(name).cloned()
    }

    /// Drop every connection. Checks already holding one run to completion.
    pub fn clear(&self) {
        let dropped = {
            let mut connections = self.connections.lock();
            std::mem::take(&mut *connections)
        };
        info!("[Registry] Cleared {} connections", dropped.len());
    }

    pub fn len(&self) -> usize {
        self.connections.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

//! Descriptor store backed by a JSON services file.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::domain::ServiceDescriptor;
use crate::error::{CheckError, CheckResult};

/// Lookup of service descriptors by name.
pub trait DescriptorSource: Send + Sync {
    /// Fetch the descriptor for `name`, failing with `ServiceNotFound`.
    fn lookup(&self, name: &str) -> CheckResult<ServiceDescriptor>;
}

impl DescriptorSource for HashMap<String, ServiceDescriptor> {
    fn lookup(&self, name: &str) -> CheckResult<ServiceDescriptor> {
        self.get(name)
            .cloned()
            .ok_or_else(|| CheckError::ServiceNotFound(name.to_string()))
    }
}

type ServiceMap = Arc<HashMap<String, ServiceDescriptor>>;

/// Service descriptors read from a JSON array file.
///
/// The file is read on first access and cached until [`reset`](Self::reset).
/// Errors mention the file as configured, never its absolute path, because
/// their messages are returned to HTTP callers.
pub struct DescriptorStore {
    path: PathBuf,
    services: Mutex<Option<ServiceMap>>,
}

impl DescriptorStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            services: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Names of all configured services, sorted.
    pub fn service_names(&self) -> CheckResult<Vec<String>> {
        let mut names: Vec<String> = self.services()?.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    /// Whether the services file has been read since the last reset.
    pub fn is_loaded(&self) -> bool {
        self.services.lock().is_some()
    }

    /// Read the services file now unless it is already cached.
    pub fn load(&self) -> CheckResult<()> {
        self.services().map(|_| ())
    }

    /// Drop the cached descriptors; the next access re-reads the file.
    pub fn reset(&self) {
        info!("[DescriptorStore] Resetting cached service descriptors");
        *self.services.lock() = None;
    }

    fn services(&self) -> CheckResult<ServiceMap> {
        let mut guard = self.services.lock();
        if let Some(services) = guard.as_ref() {
            return Ok(services.clone());
        }

        debug!("[DescriptorStore] Service map is empty, loading");
        let services = Arc::new(self.read_services()?);
        *guard = Some(services.clone());
        Ok(services)
    }

    fn read_services(&self) -> CheckResult<HashMap<String, ServiceDescriptor>> {
        let file = self.open_services_file()?;

        info!(
            "[DescriptorStore] Reading services from '{}'",
            self.path.display()
        );

        let entries: Vec<Option<ServiceDescriptor>> =
            serde_json::from_reader(BufReader::new(file)).map_err(|e| {
                warn!("[DescriptorStore] Failed to parse services file: {}", e);
                CheckError::HealthCheck(format!(
                    "Services file '{}' is invalid: {}",
                    self.path.display(),
                    e
                ))
            })?;

        let mut services = HashMap::with_capacity(entries.len());
        for entry in entries {
            let Some(descriptor) = entry else {
                warn!("[DescriptorStore] Services file contains an empty array element which is ignored");
                continue;
            };

            debug!(service = %descriptor.name, "[DescriptorStore] Found service");
            if let Some(previous) = services.insert(descriptor.name.clone(), descriptor) {
                warn!(
                    service = %previous.name,
                    "[DescriptorStore] Duplicate service entry, keeping the last one"
                );
            }
        }

        info!("[DescriptorStore] Found {} services", services.len());
        Ok(services)
    }

    fn open_services_file(&self) -> CheckResult<File> {
        let shown = self.path.display();

        if !self.path.exists() {
            warn!("[DescriptorStore] Services file '{}' not found", shown);
            return Err(CheckError::HealthCheck(format!(
                "Services file '{}' not found",
                shown
            )));
        }

        if !self.path.is_file() {
            warn!("[DescriptorStore] Services file '{}' is not a file", shown);
            return Err(CheckError::HealthCheck(format!(
                "Services file '{}' is not a file",
                shown
            )));
        }

        File::open(&self.path).map_err(|e| {
            warn!("[DescriptorStore] Cannot open services file '{}': {}", shown, e);
            if e.kind() == ErrorKind::PermissionDenied {
                CheckError::HealthCheck(format!("Services file '{}' is not readable", shown))
            } else {
                CheckError::health_check(e)
            }
        })
    }
}

impl DescriptorSource for DescriptorStore {
    fn lookup(&self, name: &str) -> CheckResult<ServiceDescriptor> {
        debug!(service = %name, "[DescriptorStore] Retrieving service info");

        self.services()?.get(name).cloned().ok_or_else(|| {
            warn!(service = %name, "[DescriptorStore] No service info found");
            CheckError::ServiceNotFound(name.to_string())
        })
    }
}

//! Disabled-by-marker check.
//!
//! A service is disabled while a file named after it exists in the marker
//! directory. The service does not have to be configured for this to apply.

use std::path::{Component, Path, PathBuf};

use tracing::{info, trace};

#[derive(Debug, Clone, Default)]
pub struct DisabledMarkers {
    dir: Option<PathBuf>,
}

impl DisabledMarkers {
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self { dir }
    }

    /// Markers that never disable anything.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    pub fn is_disabled(&self, service_name: &str) -> bool {
        let Some(dir) = self.dir.as_deref() else {
            return false;
        };

        trace!(
            service = %service_name,
            "[DisabledMarkers] Checking marker in '{}'",
            dir.display()
        );

        if !dir.is_dir() || !is_plain_file_name(service_name) {
            return false;
        }

        let marker = dir.join(service_name);
        if marker.exists() {
            info!(
                service = %service_name,
                "[DisabledMarkers] Service is disabled by file '{}'",
                marker.display()
            );
            true
        } else {
            false
        }
    }
}

/// A single normal path component, so the marker stays inside the directory.
fn is_plain_file_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.contains(['/', '\\'])
}

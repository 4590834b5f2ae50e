//! # svcprobe Core Library
//!
//! Domain types and configuration plumbing shared by the svcprobe gateway.
//!
//! ## Modules
//!
//! - `domain` - Service descriptors and status results
//! - `error` - The check error taxonomy surfaced to callers
//! - `secrets` - Placeholder expansion and client secret decryption
//! - `config` - Reloadable descriptor store and disabled-service markers

pub mod config;
pub mod domain;
pub mod error;
pub mod secrets;

// Re-export commonly used types
pub use config::{DescriptorSource, DescriptorStore, DisabledMarkers};
pub use domain::*;
pub use error::{CheckError, CheckResult};
pub use secrets::{FieldEncryptor, SecretResolver, ENCRYPTED_PREFIX};

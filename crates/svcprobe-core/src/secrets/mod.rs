//! Secret resolution
//!
//! Descriptor values are templates: `${VAR}` placeholders are expanded from
//! the process environment on every use, and client secrets may additionally
//! be stored in `encrypted:` form.

mod crypto;
mod placeholders;

pub use crypto::{generate_master_key, is_encrypted, FieldEncryptor, ENCRYPTED_PREFIX, KEY_SIZE};
pub use placeholders::{expand_env, expand_placeholders};

use tracing::debug;

use crate::error::{CheckError, CheckResult};

/// Resolves descriptor templates into concrete values.
///
/// Holds no state besides the optional decryption key.
#[derive(Default)]
pub struct SecretResolver {
    encryptor: Option<FieldEncryptor>,
}

impl std::fmt::Debug for SecretResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretResolver")
            .field("decryption_key", &self.encryptor.is_some())
            .finish()
    }
}

impl SecretResolver {
    /// Resolver without a decryption key; encrypted secrets fail to resolve.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_encryptor(encryptor: FieldEncryptor) -> Self {
        Self {
            encryptor: Some(encryptor),
        }
    }

    /// Build a resolver from an optional hex-encoded master key.
    pub fn from_hex_key(hex_key: Option<&str>) -> anyhow::Result<Self> {
        match hex_key {
            Some(key) => Ok(Self::with_encryptor(FieldEncryptor::from_hex_key(key)?)),
            None => Ok(Self::new()),
        }
    }

    pub fn can_decrypt(&self) -> bool {
        self.encryptor.is_some()
    }

    /// Expand `${VAR}` placeholders from the environment.
    pub fn resolve(&self, template: &str) -> String {
        expand_env(template)
    }

    /// Decrypt `value` if it carries the encrypted marker, else return it unchanged.
    pub fn decrypt_if_encrypted(&self, value: &str) -> CheckResult<String> {
        if !is_encrypted(value) {
            return Ok(value.to_string());
        }

        debug!("[SecretResolver] Decrypting encrypted client secret");
        let encryptor = self.encryptor.as_ref().ok_or_else(|| {
            CheckError::HealthCheck(
                "Error decrypting client secret: no secret key configured".to_string(),
            )
        })?;

        encryptor.decrypt(value).map_err(|e| {
            CheckError::HealthCheck(format!("Error decrypting client secret: {}", e))
        })
    }

    /// Expand placeholders, then decrypt the result if needed.
    pub fn resolve_secret(&self, template: &str) -> CheckResult<String> {
        self.decrypt_if_encrypted(&self.resolve(template))
    }
}

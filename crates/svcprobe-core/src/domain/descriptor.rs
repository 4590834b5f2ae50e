//! Service descriptor - static connection parameters for one monitored service

use serde::{Deserialize, Deserializer, Serialize};

/// Connection parameters for a monitored service.
///
/// Every field except `name` may contain `${VAR}` placeholders. They are kept
/// verbatim here and expanded on each use, so environment changes are picked
/// up without a reload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDescriptor {
    /// Unique service name (lookup key)
    pub name: String,
    /// Probe protocol, e.g. `https`
    #[serde(default)]
    pub protocol: String,
    #[serde(default)]
    pub host: String,
    /// Port, accepted as a JSON number or string
    #[serde(default, deserialize_with = "number_or_string")]
    pub port: String,
    /// Probe path (without the leading slash)
    #[serde(default)]
    pub uri: String,
    /// OAuth2 token endpoint
    #[serde(default)]
    pub token_url: String,
    #[serde(default)]
    pub client_id: String,
    /// Client secret, possibly in `encrypted:` form
    #[serde(default)]
    pub client_secret: String,
}

impl ServiceDescriptor {
    /// Create a descriptor for the probe target; token settings start empty.
    pub fn new(
        name: impl Into<String>,
        protocol: impl Into<String>,
        host: impl Into<String>,
        port: impl Into<String>,
        uri: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            protocol: protocol.into(),
            host: host.into(),
            port: port.into(),
            uri: uri.into(),
            token_url: String::new(),
            client_id: String::new(),
            client_secret: String::new(),
        }
    }

    /// Set the client-credentials token endpoint and credentials.
    pub fn with_token_endpoint(
        mut self,
        token_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        self.token_url = token_url.into();
        self.client_id = client_id.into();
        self.client_secret = client_secret.into();
        self
    }
}

fn number_or_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Port {
        Number(u64),
        Text(String),
    }

    Ok(match Port::deserialize(deserializer)? {
        Port::Number(n) => n.to_string(),
        Port::Text(s) => s,
    })
}

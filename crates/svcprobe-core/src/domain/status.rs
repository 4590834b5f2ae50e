//! Service status - result of a single health check

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Message reported for services switched off by a marker file.
pub const DISABLED_MESSAGE: &str = "Disabled by status file";

/// Classification of a health check.
///
/// Rendered on the wire as `ok`, `disabled`, `error-<code>`, `error-connect`
/// or `error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusKind {
    Ok,
    Disabled,
    /// Probe answered with a non-200 HTTP status
    ErrorHttp(u16),
    /// Probe target refused the connection or was unreachable
    ErrorConnect,
    /// Any other failure, as reported by the dispatch layer
    Error,
}

impl StatusKind {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => f.write_str("ok"),
            Self::Disabled => f.write_str("disabled"),
            Self::ErrorHttp(code) => write!(f, "error-{}", code),
            Self::ErrorConnect => f.write_str("error-connect"),
            Self::Error => f.write_str("error"),
        }
    }
}

impl FromStr for StatusKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ok" => Ok(Self::Ok),
            "disabled" => Ok(Self::Disabled),
            "error-connect" => Ok(Self::ErrorConnect),
            "error" => Ok(Self::Error),
            other => other
                .strip_prefix("error-")
                .and_then(|code| code.parse::<u16>().ok())
                .map(Self::ErrorHttp)
                .ok_or_else(|| format!("Unknown status code: {}", other)),
        }
    }
}

impl Serialize for StatusKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for StatusKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Outcome of checking one service. Produced fresh on every check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceStatus {
    #[serde(rename = "serviceName")]
    pub service_name: String,
    #[serde(rename = "serviceStatus")]
    pub status: StatusKind,
    #[serde(rename = "statusMessage")]
    pub message: String,
}

impl ServiceStatus {
    pub fn new(service_name: impl Into<String>, status: StatusKind, message: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            status,
            message: message.into(),
        }
    }

    pub fn ok(service_name: impl Into<String>) -> Self {
        Self::new(service_name, StatusKind::Ok, "ok")
    }

    pub fn disabled(service_name: impl Into<String>) -> Self {
        Self::new(service_name, StatusKind::Disabled, DISABLED_MESSAGE)
    }

    pub fn is_ok(&self) -> bool {
        self.status.is_ok()
    }
}

// ── Shared building blocks ──

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Health as reported by the backend.
///
/// Only the literal `"healthy"` is healthy; every other string (including
/// ones this crate has never seen) is kept verbatim as unhealthy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum HealthStatus {
    Healthy,
    Unhealthy(String),
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Healthy => "healthy",
            Self::Unhealthy(s) => s,
        }
    }
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self::Unhealthy("unknown".into())
    }
}

impl From<String> for HealthStatus {
    fn from(s: String) -> Self {
        if s == "healthy" {
            Self::Healthy
        } else {
            Self::Unhealthy(s)
        }
    }
}

impl From<&str> for HealthStatus {
    fn from(s: &str) -> Self {
        Self::from(s.to_owned())
    }
}

impl From<HealthStatus> for String {
    fn from(status: HealthStatus) -> Self {
        match status {
            HealthStatus::Healthy => "healthy".into(),
            HealthStatus::Unhealthy(s) => s,
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference to a server by uuid (replica-set `master` / `active_master`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServerRef {
    pub uuid: String,
}

impl From<&str> for ServerRef {
    fn from(uuid: &str) -> Self {
        Self { uuid: uuid.into() }
    }
}

/// The node serving the admin API.
///
/// `uuid` is present once the cluster has been bootstrapped through this
/// node; `configured` and `failover` mirror the cluster-wide flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterSelf {
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default)]
    pub configured: bool,
    #[serde(default)]
    pub failover: bool,
}

impl ClusterSelf {
    pub fn is_bootstrapped(&self) -> bool {
        self.uuid.is_some()
    }
}

/// Deserialize `null` as `T::default()`.
///
/// The backend sends `null` for empty role and label lists.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

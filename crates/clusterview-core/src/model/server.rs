// ── Server domain types ──

use serde::{Deserialize, Deserializer, Serialize};

use super::common::{HealthStatus, null_as_default};
use super::replicaset::Replicaset;

/// A user-assigned key/value tag on a server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
    pub value: String,
}

impl Label {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Reference from a server to the replica-set it has joined.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReplicasetRef {
    pub uuid: String,
}

/// Memory statistics reported per server.
///
/// Every figure is optional: older backends report a subset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerStatistics {
    #[serde(default)]
    pub arena_used_ratio: Option<f64>,
    #[serde(default)]
    pub quota_used_ratio: Option<f64>,
    #[serde(default)]
    pub items_used_ratio: Option<f64>,
    #[serde(default)]
    pub arena_used: Option<u64>,
    #[serde(default)]
    pub arena_size: Option<u64>,
    #[serde(default)]
    pub quota_used: Option<u64>,
    #[serde(default)]
    pub quota_size: Option<u64>,
    #[serde(default)]
    pub items_used: Option<u64>,
}

/// A physical server, joined or not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Server {
    pub uri: String,
    /// Present once the server has joined a replica-set.
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub status: HealthStatus,
    /// Free-text status detail from the backend.
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub replicaset: Option<ReplicasetRef>,
    #[serde(default, deserialize_with = "labels_skipping_nulls")]
    pub labels: Vec<Label>,
    #[serde(default)]
    pub statistics: Option<ServerStatistics>,
}

impl Server {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            uuid: None,
            alias: None,
            status: HealthStatus::Healthy,
            message: None,
            replicaset: None,
            labels: Vec::new(),
            statistics: None,
        }
    }

    /// A server is configured once it references a replica-set.
    pub fn is_configured(&self) -> bool {
        self.replicaset.is_some()
    }

    /// Alias if set, otherwise the uri.
    pub fn display_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.uri)
    }
}

/// Per-server statistics keyed by server uuid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerStat {
    pub uuid: String,
    #[serde(default)]
    pub statistics: Option<ServerStatistics>,
}

/// Payload of a statistics fetch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerStatSnapshot {
    #[serde(rename = "serverStat", default, deserialize_with = "null_as_default")]
    pub server_stat: Vec<ServerStat>,
}

/// Payload of a topology fetch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Topology {
    #[serde(default, deserialize_with = "null_as_default")]
    pub servers: Vec<Server>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub replicasets: Vec<Replicaset>,
}

/// Labels may arrive as `null`, and individual entries may be `null`.
fn labels_skipping_nulls<'de, D>(deserializer: D) -> Result<Vec<Label>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<Option<Label>>> = Option::deserialize(deserializer)?;
    Ok(raw.unwrap_or_default().into_iter().flatten().collect())
}

// ── Typed request structs for Command payloads ──

use serde::{Deserialize, Serialize};

/// Join an unconfigured server into an existing replica-set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinServerRequest {
    pub uri: String,
    pub replicaset_uuid: String,
}

/// Create a replica-set seeded with one unconfigured server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateReplicasetRequest {
    pub uri: String,
    pub roles: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vshard_group: Option<String>,
}

/// Partial update of a replica-set. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditReplicasetRequest {
    pub uuid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vshard_group: Option<String>,
    /// Failover priority, highest first. The first entry becomes master.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub master: Option<Vec<String>>,
}

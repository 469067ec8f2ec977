// ── Replica-set domain types ──

use serde::{Deserialize, Serialize};

use super::common::{HealthStatus, ServerRef, null_as_default};
use super::server::Server;
use crate::error::CoreError;

/// Role name that carries vshard weight and group settings.
pub const VSHARD_STORAGE_ROLE: &str = "vshard-storage";

/// Length of the uuid prefix shown as a replica-set's short id.
const SHORT_UUID_LEN: usize = 8;

/// Anything that wraps a [`Server`] inside a replica-set.
///
/// Lets the raw, searchable and filtered replica-set variants share
/// the lookups that only need the underlying server.
pub trait ReplicasetMember {
    fn server(&self) -> &Server;
}

impl ReplicasetMember for Server {
    fn server(&self) -> &Server {
        self
    }
}

/// Leadership of a member within its replica-set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    ActiveMaster,
    Master,
    Replica,
}

/// A group of servers holding the same shard.
///
/// Generic over the member type so the search and filter stages can
/// decorate servers without duplicating the replica-set fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Replicaset<S = Server> {
    pub uuid: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub roles: Vec<String>,
    #[serde(default)]
    pub status: HealthStatus,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub vshard_group: Option<String>,
    pub master: ServerRef,
    pub active_master: ServerRef,
    #[serde(default = "Vec::new")]
    pub servers: Vec<S>,
}

impl<S> Replicaset<S> {
    pub fn is_healthy(&self) -> bool {
        self.status.is_healthy()
    }

    /// First eight characters of the uuid.
    pub fn short_uuid(&self) -> &str {
        self.uuid.get(..SHORT_UUID_LEN).unwrap_or(&self.uuid)
    }

    /// Comma-separated role names; the vshard storage role is annotated
    /// with its weight and group when they are set.
    pub fn roles_text(&self) -> String {
        self.roles
            .iter()
            .map(|role| {
                if role == VSHARD_STORAGE_ROLE {
                    format!("{role}{}", self.vshard_props_text())
                } else {
                    role.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn vshard_props_text(&self) -> String {
        let mut props = Vec::new();
        if let Some(weight) = self.weight {
            props.push(format!("weight: {weight}"));
        }
        if let Some(ref group) = self.vshard_group {
            props.push(format!("group: {group}"));
        }
        if props.is_empty() {
            String::new()
        } else {
            format!(" ({})", props.join(", "))
        }
    }

    /// Leadership of the server with the given uuid.
    pub fn member_role(&self, uuid: Option<&str>) -> MemberRole {
        match uuid {
            Some(u) if u == self.active_master.uuid => MemberRole::ActiveMaster,
            Some(u) if u == self.master.uuid => MemberRole::Master,
            _ => MemberRole::Replica,
        }
    }

    /// Rebuild with a different member type, preserving member order.
    pub fn map_servers<U>(self, f: impl FnMut(S) -> U) -> Replicaset<U> {
        Replicaset {
            uuid: self.uuid,
            roles: self.roles,
            status: self.status,
            weight: self.weight,
            vshard_group: self.vshard_group,
            master: self.master,
            active_master: self.active_master,
            servers: self.servers.into_iter().map(f).collect(),
        }
    }
}

impl<S: ReplicasetMember> Replicaset<S> {
    /// Members paired with their leadership role.
    pub fn members_with_roles(&self) -> impl Iterator<Item = (&S, MemberRole)> {
        self.servers
            .iter()
            .map(|m| (m, self.member_role(m.server().uuid.as_deref())))
    }

    fn has_member(&self, uuid: &str) -> bool {
        self.servers
            .iter()
            .any(|m| m.server().uuid.as_deref() == Some(uuid))
    }

    /// Check that `master` and `active_master` are members.
    pub fn validate(&self) -> Result<(), CoreError> {
        for (field, reference) in [("master", &self.master), ("active_master", &self.active_master)]
        {
            if !self.has_member(&reference.uuid) {
                return Err(CoreError::ValidationFailed {
                    message: format!(
                        "replicaset {}: {field} {} is not a member",
                        self.uuid, reference.uuid
                    ),
                });
            }
        }
        Ok(())
    }
}

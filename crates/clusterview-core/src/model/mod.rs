// ── Cluster domain model ──
//
// Canonical representation of the cluster topology as reported by the
// backend. Field names follow the backend JSON so snapshots deserialize
// without a conversion layer.

pub mod common;
pub mod replicaset;
pub mod server;

// ── Re-exports ──────────────────────────────────────────────────────

pub use common::{ClusterSelf, HealthStatus, ServerRef};
pub use replicaset::{MemberRole, Replicaset, ReplicasetMember, VSHARD_STORAGE_ROLE};
pub use server::{
    Label, ReplicasetRef, Server, ServerStat, ServerStatSnapshot, ServerStatistics, Topology,
};

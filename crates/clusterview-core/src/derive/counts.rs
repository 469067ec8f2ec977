// ── Counter aggregator ──

use serde::Serialize;

use crate::model::{Replicaset, Server};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ServerCounts {
    pub total: usize,
    pub configured: usize,
    pub unconfigured: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReplicasetCounts {
    pub total: usize,
    pub unhealthy: usize,
}

/// Count over the full, unfiltered server list.
pub fn count_servers(servers: &[Server]) -> ServerCounts {
    let configured = servers.iter().filter(|s| s.is_configured()).count();
    ServerCounts {
        total: servers.len(),
        configured,
        unconfigured: servers.len() - configured,
    }
}

pub fn count_replicasets<S>(replicasets: &[Replicaset<S>]) -> ReplicasetCounts {
    ReplicasetCounts {
        total: replicasets.len(),
        unhealthy: replicasets.iter().filter(|r| !r.is_healthy()).count(),
    }
}

/// Headline counters, e.g. `(2 total, 1 unhealthy) (3 servers)`.
pub fn replicasets_title(replicasets: ReplicasetCounts, servers: ServerCounts) -> String {
    let plural = if servers.configured == 1 { "" } else { "s" };
    format!(
        "({} total, {} unhealthy) ({} server{plural})",
        replicasets.total, replicasets.unhealthy, servers.configured
    )
}

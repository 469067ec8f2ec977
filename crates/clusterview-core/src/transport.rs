// ── Transport seam ──
//
// The core never speaks a wire protocol. Whatever talks to the cluster
// (HTTP/GraphQL client, snapshot files, test doubles) implements this trait
// and maps its failures onto `CoreError`.

use std::future::Future;

use crate::command::{Command, CommandResult};
use crate::error::CoreError;
use crate::model::{ClusterSelf, ServerStat, Topology};

/// Source of cluster data and sink for mutation commands.
///
/// Connectivity failures must surface as [`CoreError::ServerUnreachable`]
/// or [`CoreError::Timeout`] so the notification pipeline can classify them.
pub trait ClusterTransport: Send + Sync + 'static {
    /// Describe the node serving the admin API.
    fn cluster_self(&self) -> impl Future<Output = Result<ClusterSelf, CoreError>> + Send;

    /// Fetch the full server and replica-set lists.
    fn fetch_topology(&self) -> impl Future<Output = Result<Topology, CoreError>> + Send;

    /// Fetch per-server memory statistics.
    fn fetch_server_stat(&self) -> impl Future<Output = Result<Vec<ServerStat>, CoreError>> + Send;

    /// Execute a mutation against the cluster.
    fn execute(
        &self,
        command: &Command,
    ) -> impl Future<Output = Result<CommandResult, CoreError>> + Send;
}

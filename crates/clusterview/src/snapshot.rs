//! File-backed transport: serves topology and statistics from JSON
//! snapshots captured from the cluster API.

use std::path::{Path, PathBuf};

use tracing::debug;

use clusterview_core::{
    ClusterSelf, ClusterTransport, Command, CommandResult, CoreError, ServerStat,
    ServerStatSnapshot, Topology,
};

#[derive(Debug, Clone)]
pub struct SnapshotTransport {
    topology: PathBuf,
    stats: Option<PathBuf>,
}

impl SnapshotTransport {
    pub fn new(topology: PathBuf, stats: Option<PathBuf>) -> Self {
        Self { topology, stats }
    }
}

async fn read_snapshot(path: &Path) -> Result<String, CoreError> {
    debug!(path = %path.display(), "reading snapshot");
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| CoreError::Snapshot {
            message: format!("{}: {e}", path.display()),
        })
}

fn parse<T: serde::de::DeserializeOwned>(path: &Path, raw: &str) -> Result<T, CoreError> {
    serde_json::from_str(raw).map_err(|e| CoreError::Snapshot {
        message: format!("{}: {e}", path.display()),
    })
}

impl ClusterTransport for SnapshotTransport {
    /// Snapshots carry no node identity.
    async fn cluster_self(&self) -> Result<ClusterSelf, CoreError> {
        Ok(ClusterSelf::default())
    }

    async fn fetch_topology(&self) -> Result<Topology, CoreError> {
        let raw = read_snapshot(&self.topology).await?;
        parse(&self.topology, &raw)
    }

    async fn fetch_server_stat(&self) -> Result<Vec<ServerStat>, CoreError> {
        let Some(path) = &self.stats else {
            return Ok(Vec::new());
        };
        let raw = read_snapshot(path).await?;
        let snapshot: ServerStatSnapshot = parse(path, &raw)?;
        Ok(snapshot.server_stat)
    }

    async fn execute(&self, command: &Command) -> Result<CommandResult, CoreError> {
        Err(CoreError::Rejected {
            message: format!("snapshots are read-only, cannot run {}", command.kind()),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_stats_file_is_optional() {
        let dir = tempfile::tempdir().unwrap();
        let topology = dir.path().join("topology.json");
        std::fs::write(&topology, r#"{"servers": [], "replicasets": null}"#).unwrap();

        let transport = SnapshotTransport::new(topology, None);
        assert_eq!(transport.fetch_topology().await.unwrap(), Topology::default());
        assert!(transport.fetch_server_stat().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn malformed_snapshot_is_a_snapshot_error() {
        let dir = tempfile::tempdir().unwrap();
        let topology = dir.path().join("topology.json");
        std::fs::write(&topology, "{not json").unwrap();

        let err = SnapshotTransport::new(topology, None)
            .fetch_topology()
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Snapshot { .. }));
        assert!(!err.is_server_unreachable());
    }

    #[tokio::test]
    async fn commands_are_rejected() {
        let transport = SnapshotTransport::new("unused.json".into(), None);
        let err = transport.execute(&Command::BootstrapVshard).await.unwrap_err();
        assert!(matches!(err, CoreError::Rejected { .. }));
    }
}

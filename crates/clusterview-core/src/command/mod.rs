// ── Command API ──
//
// All cluster mutations flow through a unified `Command` enum. The
// transport decides how to deliver them; the controller wraps each one in
// request-lifecycle actions so the notification pipeline can react.

pub mod requests;

use serde::{Deserialize, Serialize};
use strum::{Display, IntoStaticStr};
use tokio::sync::oneshot;

use crate::error::CoreError;

pub use requests::{CreateReplicasetRequest, EditReplicasetRequest, JoinServerRequest};

/// Every request the controller tracks, mutation or fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum RequestKind {
    ClusterSelf,
    PageData,
    RefreshLists,
    ServerStat,
    ProbeServer,
    JoinServer,
    CreateReplicaset,
    EditReplicaset,
    ExpelServer,
    BootstrapVshard,
    ChangeFailover,
    ToggleAuth,
}

/// All possible write operations against the cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    ProbeServer { uri: String },
    JoinServer(JoinServerRequest),
    CreateReplicaset(CreateReplicasetRequest),
    EditReplicaset(EditReplicasetRequest),
    ExpelServer { uuid: String },
    BootstrapVshard,
    ChangeFailover { enabled: bool },
    ToggleAuth { enabled: bool },
}

impl Command {
    pub fn kind(&self) -> RequestKind {
        match self {
            Self::ProbeServer { .. } => RequestKind::ProbeServer,
            Self::JoinServer(_) => RequestKind::JoinServer,
            Self::CreateReplicaset(_) => RequestKind::CreateReplicaset,
            Self::EditReplicaset(_) => RequestKind::EditReplicaset,
            Self::ExpelServer { .. } => RequestKind::ExpelServer,
            Self::BootstrapVshard => RequestKind::BootstrapVshard,
            Self::ChangeFailover { .. } => RequestKind::ChangeFailover,
            Self::ToggleAuth { .. } => RequestKind::ToggleAuth,
        }
    }

    /// Text of the success message shown once the command completes.
    pub fn success_message(&self) -> String {
        match self {
            Self::ProbeServer { uri } => format!("Probe is OK. Server {uri} is reachable"),
            Self::JoinServer(_) => "Join is OK. Please wait for list refresh...".into(),
            Self::CreateReplicaset(_) => "Create is OK. Please wait for list refresh...".into(),
            Self::EditReplicaset(_) => "Edit is OK. Please wait for list refresh...".into(),
            Self::ExpelServer { .. } => "Expel is OK. Please wait for list refresh...".into(),
            Self::BootstrapVshard => {
                "VShard bootstrap is OK. Please wait for list refresh...".into()
            }
            Self::ChangeFailover { enabled } => format!(
                "Failover mode {}",
                if *enabled { "enabled" } else { "disabled" }
            ),
            Self::ToggleAuth { enabled } => format!(
                "Authentication {}",
                if *enabled { "enabled" } else { "disabled" }
            ),
        }
    }

    /// Whether the topology must be refetched after success.
    pub fn changes_topology(&self) -> bool {
        !matches!(self, Self::ChangeFailover { .. } | Self::ToggleAuth { .. })
    }
}

/// Result of a successfully executed command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandResult {
    Ok,
    /// The failover mode now in effect.
    Failover(bool),
    /// Whether authentication is now enforced.
    Auth(bool),
}

/// A command paired with its reply channel, queued to the processor task.
pub(crate) struct CommandEnvelope {
    pub command: Command,
    pub response_tx: oneshot::Sender<Result<CommandResult, CoreError>>,
}

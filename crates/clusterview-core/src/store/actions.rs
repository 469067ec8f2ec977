// ── Store actions ──
//
// Every state change goes through one of these. Subscribers (the
// notification tasks) observe the same stream after the reducer ran.

use std::sync::Arc;

use strum::IntoStaticStr;

use crate::command::RequestKind;
use crate::error::CoreError;
use crate::model::{ClusterSelf, ServerStat, Topology};
use crate::notify::{Message, MessageId, MessageScope};
use crate::selection::SelectionState;

/// Lifecycle of a tracked request.
#[derive(Debug, Clone)]
pub enum RequestOutcome {
    Started,
    Succeeded {
        /// Shown as a success message when set.
        success_message: Option<String>,
    },
    Failed {
        error: Arc<CoreError>,
        /// Show the error text as a danger message.
        show_error: bool,
    },
}

/// A request lifecycle event.
#[derive(Debug, Clone)]
pub struct RequestEvent {
    pub kind: RequestKind,
    pub scope: MessageScope,
    pub outcome: RequestOutcome,
}

impl RequestEvent {
    pub fn started(kind: RequestKind, scope: MessageScope) -> Self {
        Self {
            kind,
            scope,
            outcome: RequestOutcome::Started,
        }
    }

    pub fn succeeded(
        kind: RequestKind,
        scope: MessageScope,
        success_message: Option<String>,
    ) -> Self {
        Self {
            kind,
            scope,
            outcome: RequestOutcome::Succeeded { success_message },
        }
    }

    pub fn failed(
        kind: RequestKind,
        scope: MessageScope,
        error: CoreError,
        show_error: bool,
    ) -> Self {
        Self {
            kind,
            scope,
            outcome: RequestOutcome::Failed {
                error: Arc::new(error),
                show_error,
            },
        }
    }

    /// Completed, successfully or not.
    pub fn is_finished(&self) -> bool {
        !matches!(self.outcome, RequestOutcome::Started)
    }

    pub fn error(&self) -> Option<&CoreError> {
        match &self.outcome {
            RequestOutcome::Failed { error, .. } => Some(error),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Action {
    // ── Requests ─────────────────────────────────────────────────────
    Request(RequestEvent),
    ClusterSelfLoaded(ClusterSelf),
    ListsLoaded(Topology),
    ServerStatLoaded(Vec<ServerStat>),
    FailoverChanged(bool),

    // ── Cluster page ─────────────────────────────────────────────────
    ClusterPageDidMount { selection: SelectionState },
    ClusterPageReset,
    SetFilter(String),
    SelectServer(String),
    CloseServerPopup,
    SelectReplicaset(String),
    CloseReplicasetPopup,

    // ── App ──────────────────────────────────────────────────────────
    SetFailoverModalVisible(bool),
    CreateMessage(Message),
    SetMessageDone(MessageId),
}

impl Action {
    pub fn name(&self) -> &'static str {
        self.into()
    }
}

// ── Application state ──

use std::sync::Arc;

use serde::Serialize;

use crate::model::{ClusterSelf, Replicaset, Server, ServerStat};
use crate::notify::Message;
use crate::selection::SelectionState;

/// Progress of the cluster page's data request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RequestStatus {
    pub loading: bool,
    pub loaded: bool,
    pub error: Option<String>,
}

/// Everything scoped to the mounted cluster page.
///
/// Created on mount and dropped on unmount, so teardown is simply
/// `cluster_page = None`.
#[derive(Debug, Clone, Default)]
pub struct ClusterPageState {
    pub page_mount: bool,
    pub request_status: RequestStatus,
    /// List refreshes in flight. Periodic and post-command refreshes
    /// may overlap.
    pub refreshes_in_flight: u32,
    pub servers: Option<Arc<Vec<Server>>>,
    pub replicasets: Option<Arc<Vec<Replicaset>>>,
    /// `None` until the first statistics fetch succeeds.
    pub server_stat: Option<Arc<Vec<ServerStat>>>,
    pub filter: Arc<str>,
    pub selection: SelectionState,
}

impl ClusterPageState {
    pub(crate) fn mounted(selection: SelectionState) -> Self {
        Self {
            page_mount: true,
            selection,
            filter: Arc::from(""),
            ..Self::default()
        }
    }

    /// Page data is not usable yet. A background refresh over loaded
    /// lists does not count.
    pub fn is_loading(&self) -> bool {
        !self.page_mount || !self.request_status.loaded || self.request_status.loading
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshes_in_flight > 0
    }
}

/// Root of the store.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub cluster_self: Option<ClusterSelf>,
    pub failover_modal_visible: bool,
    pub messages: Vec<Message>,
    pub cluster_page: Option<ClusterPageState>,
}

impl AppState {
    /// Undismissed messages in arrival order.
    pub fn active_messages(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter().filter(|m| !m.done)
    }

    /// The undismissed connectivity warning, if any.
    pub fn active_server_not_reachable(&self) -> Option<&Message> {
        self.active_messages().find(|m| m.is_server_not_reachable())
    }
}

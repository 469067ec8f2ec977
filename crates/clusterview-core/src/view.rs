// ── Cluster page view model ──

use std::sync::Arc;

use serde::Serialize;

use crate::derive::{
    FilteredReplicaset, ReplicasetCounts, Selectors, ServerCounts, replicasets_title,
};
use crate::model::{Replicaset, Server};
use crate::selection::{Resolution, SelectionPhase, selected_replicaset, selected_server};
use crate::store::{ClusterPageState, RequestStatus};

/// Everything the cluster page renders, derived from one state snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct ClusterPageView {
    pub loading: bool,
    pub refreshing: bool,
    pub request_status: RequestStatus,
    pub filter: Arc<str>,
    pub title: Option<String>,
    pub replicasets: Option<Arc<Vec<FilteredReplicaset>>>,
    pub unlinked_servers: Option<Arc<Vec<Server>>>,
    pub server_counts: Option<ServerCounts>,
    pub replicaset_counts: Option<ReplicasetCounts>,
    pub selection: SelectionPhase,
    pub selected_server: Option<Resolution<Server>>,
    pub selected_replicaset: Option<Resolution<Replicaset>>,
    pub join_server_modal_visible: bool,
    pub edit_replicaset_modal_visible: bool,
}

impl ClusterPageView {
    pub fn build(page: &ClusterPageState, selectors: &Selectors) -> Self {
        let server_counts = selectors.server_counts(page);
        let replicaset_counts = selectors.replicaset_counts(page);
        let title = match (replicaset_counts, server_counts) {
            (Some(rs), Some(servers)) => Some(replicasets_title(rs, servers)),
            _ => None,
        };

        Self {
            loading: page.is_loading(),
            refreshing: page.is_refreshing(),
            request_status: page.request_status.clone(),
            filter: Arc::clone(&page.filter),
            title,
            replicasets: selectors.filtered(page),
            unlinked_servers: selectors.unlinked(page),
            server_counts,
            replicaset_counts,
            selection: page.selection.phase(),
            selected_server: selected_server(page),
            selected_replicaset: selected_replicaset(page),
            join_server_modal_visible: page.selection.join_server_modal_visible(),
            edit_replicaset_modal_visible: page.selection.edit_replicaset_modal_visible(),
        }
    }
}

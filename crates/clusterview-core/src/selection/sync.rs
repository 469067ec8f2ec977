// ── Selection reconciliation ──
//
// The URL and the store each hold a selection. Navigation changes the URL
// first; user actions write the URL too. After every render pass the store
// is brought in line with the URL, one axis at a time.

use serde::Serialize;
use tracing::debug;

use super::query::{Location, REPLICASET_PARAM, SERVER_PARAM};
use crate::store::{Action, ClusterPageState};

/// Store-held selection, mirroring the `s` and `r` query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectionState {
    pub selected_server_uri: Option<String>,
    pub selected_replicaset_uuid: Option<String>,
}

/// Which panels are selected. The two axes are independent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPhase {
    Idle,
    ServerSelected,
    ReplicasetSelected,
    Both,
}

impl SelectionState {
    /// Selection encoded in the URL.
    pub fn from_location(location: &Location) -> Self {
        Self {
            selected_server_uri: selection_param(location, SERVER_PARAM).map(str::to_owned),
            selected_replicaset_uuid: selection_param(location, REPLICASET_PARAM)
                .map(str::to_owned),
        }
    }

    pub fn phase(&self) -> SelectionPhase {
        match (
            self.selected_server_uri.is_some(),
            self.selected_replicaset_uuid.is_some(),
        ) {
            (false, false) => SelectionPhase::Idle,
            (true, false) => SelectionPhase::ServerSelected,
            (false, true) => SelectionPhase::ReplicasetSelected,
            (true, true) => SelectionPhase::Both,
        }
    }

    /// The join-server modal follows the server axis.
    pub fn join_server_modal_visible(&self) -> bool {
        self.selected_server_uri.is_some()
    }

    /// The edit-replica-set modal follows the replica-set axis.
    pub fn edit_replicaset_modal_visible(&self) -> bool {
        self.selected_replicaset_uuid.is_some()
    }
}

/// A selection parameter; an empty value counts as absent.
fn selection_param<'a>(location: &'a Location, name: &str) -> Option<&'a str> {
    location.param(name).filter(|value| !value.is_empty())
}

/// Actions that bring the store selection in line with the URL.
///
/// Empty until the page has mounted, and empty when both sides agree.
pub fn reconcile(location: &Location, page: &ClusterPageState) -> Vec<Action> {
    if !page.page_mount {
        return Vec::new();
    }

    let mut actions = Vec::new();
    let url_server = selection_param(location, SERVER_PARAM);
    if url_server != page.selection.selected_server_uri.as_deref() {
        actions.push(match url_server {
            Some(uri) => Action::SelectServer(uri.to_owned()),
            None => Action::CloseServerPopup,
        });
    }

    let url_replicaset = selection_param(location, REPLICASET_PARAM);
    if url_replicaset != page.selection.selected_replicaset_uuid.as_deref() {
        actions.push(match url_replicaset {
            Some(uuid) => Action::SelectReplicaset(uuid.to_owned()),
            None => Action::CloseReplicasetPopup,
        });
    }

    if !actions.is_empty() {
        debug!(location = %location, count = actions.len(), "selection out of sync with url");
    }
    actions
}

// ── URL writers for user actions ─────────────────────────────────────

/// Open the join-server dialog for `uri`.
pub fn open_server(location: &Location, uri: &str) -> Location {
    location.with_param(SERVER_PARAM, Some(uri))
}

pub fn close_server(location: &Location) -> Location {
    location.with_param(SERVER_PARAM, None)
}

/// Open the edit dialog for replica-set `uuid`.
pub fn open_replicaset(location: &Location, uuid: &str) -> Location {
    location.with_param(REPLICASET_PARAM, Some(uuid))
}

pub fn close_replicaset(location: &Location) -> Location {
    location.with_param(REPLICASET_PARAM, None)
}

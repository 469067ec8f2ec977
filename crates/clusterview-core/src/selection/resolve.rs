// ── Selected-entity resolution ──

use serde::Serialize;

use crate::model::{Replicaset, Server};
use crate::store::ClusterPageState;

/// Outcome of looking up a selected entity.
///
/// A miss after the data loaded is `NotFound`, which the page renders as a
/// message rather than treating as an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum Resolution<T> {
    Loading,
    NotFound,
    Found(T),
}

impl<T> Resolution<T> {
    pub fn found(&self) -> Option<&T> {
        match self {
            Self::Found(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

fn resolve<T: Clone>(
    page: &ClusterPageState,
    list: Option<&[T]>,
    matches: impl Fn(&T) -> bool,
) -> Resolution<T> {
    if page.is_loading() {
        return Resolution::Loading;
    }
    list.and_then(|items| items.iter().find(|item| matches(*item)))
        .cloned()
        .map_or(Resolution::NotFound, Resolution::Found)
}

/// The server selected by uri, if any is selected.
pub fn selected_server(page: &ClusterPageState) -> Option<Resolution<Server>> {
    let uri = page.selection.selected_server_uri.as_deref()?;
    Some(resolve(page, page.servers.as_deref().map(Vec::as_slice), |s: &Server| {
        s.uri == uri
    }))
}

/// The replica-set selected by uuid, if any is selected.
pub fn selected_replicaset(page: &ClusterPageState) -> Option<Resolution<Replicaset>> {
    let uuid = page.selection.selected_replicaset_uuid.as_deref()?;
    Some(resolve(page, page.replicasets.as_deref().map(Vec::as_slice), |r: &Replicaset| {
        r.uuid == uuid
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::selection::SelectionState;

    fn selecting(uri: &str) -> ClusterPageState {
        ClusterPageState::mounted(SelectionState {
            selected_server_uri: Some(uri.into()),
            selected_replicaset_uuid: None,
        })
    }

    fn loaded(mut page: ClusterPageState) -> ClusterPageState {
        page.request_status.loaded = true;
        page.servers = Some(Arc::new(vec![Server::new("a:1")]));
        page.replicasets = Some(Arc::new(vec![]));
        page
    }

    #[test]
    fn nothing_selected_resolves_to_none() {
        let page = loaded(ClusterPageState::mounted(SelectionState::default()));
        assert!(selected_server(&page).is_none());
        assert!(selected_replicaset(&page).is_none());
    }

    #[test]
    fn loading_until_request_completes() {
        let page = selecting("a:1");
        assert_eq!(selected_server(&page), Some(Resolution::Loading));

        let mut reloading = loaded(selecting("a:1"));
        reloading.request_status.loading = true;
        assert_eq!(selected_server(&reloading), Some(Resolution::Loading));
    }

    #[test]
    fn background_refresh_keeps_resolution() {
        let mut page = loaded(selecting("a:1"));
        page.refreshes_in_flight = 1;
        assert!(page.is_refreshing());
        assert!(!page.is_loading());
        let resolved = selected_server(&page).unwrap();
        assert_eq!(resolved.found().unwrap().uri, "a:1");
    }

    #[test]
    fn found_and_not_found_after_load() {
        let page = loaded(selecting("a:1"));
        let found = selected_server(&page).unwrap();
        assert_eq!(found.found().unwrap().uri, "a:1");

        let missing = loaded(selecting("a:9"));
        assert_eq!(selected_server(&missing), Some(Resolution::NotFound));
    }
}

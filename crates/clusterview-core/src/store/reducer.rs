// ── Reducer ──
//
// Pure state transition applied inside `Store::dispatch`.

use std::sync::Arc;

use tracing::debug;

use super::actions::{Action, RequestEvent, RequestOutcome};
use super::state::{AppState, ClusterPageState, RequestStatus};
use crate::command::RequestKind;
use crate::notify::{Message, MessageScope};

/// Dismissed messages are pruned, oldest first, once the queue grows past
/// this length.
pub(crate) const MESSAGE_QUEUE_CAPACITY: usize = 64;

pub(crate) fn reduce(state: &mut AppState, action: &Action) {
    match action {
        Action::Request(event) => reduce_request(state, event),
        Action::ClusterSelfLoaded(me) => state.cluster_self = Some(me.clone()),
        Action::FailoverChanged(enabled) => {
            if let Some(me) = state.cluster_self.as_mut() {
                me.failover = *enabled;
            }
        }
        Action::SetFailoverModalVisible(visible) => state.failover_modal_visible = *visible,
        Action::CreateMessage(message) => {
            state.messages.push(message.clone());
            prune_done_messages(&mut state.messages);
        }
        Action::SetMessageDone(id) => {
            if let Some(message) = state.messages.iter_mut().find(|m| m.id == *id) {
                message.done = true;
            }
        }
        Action::ClusterPageDidMount { selection } => {
            state.cluster_page = Some(ClusterPageState::mounted(selection.clone()));
        }
        Action::ClusterPageReset => {
            state.cluster_page = None;
            supersede_page_messages(state);
        }
        page_action => match state.cluster_page.as_mut() {
            Some(page) => reduce_page(page, page_action),
            None => debug!(action = page_action.name(), "cluster page not mounted, ignoring"),
        },
    }
}

fn reduce_page(page: &mut ClusterPageState, action: &Action) {
    match action {
        Action::ListsLoaded(topology) => {
            page.servers = Some(Arc::new(topology.servers.clone()));
            page.replicasets = Some(Arc::new(topology.replicasets.clone()));
        }
        Action::ServerStatLoaded(stats) => page.server_stat = Some(Arc::new(stats.clone())),
        Action::SetFilter(text) => {
            // Keep the Arc when unchanged so memoized filtering stays hot.
            if *page.filter != **text {
                page.filter = Arc::from(text.as_str());
            }
        }
        Action::SelectServer(uri) => page.selection.selected_server_uri = Some(uri.clone()),
        Action::CloseServerPopup => page.selection.selected_server_uri = None,
        Action::SelectReplicaset(uuid) => {
            page.selection.selected_replicaset_uuid = Some(uuid.clone());
        }
        Action::CloseReplicasetPopup => page.selection.selected_replicaset_uuid = None,
        _ => {}
    }
}

fn reduce_request(state: &mut AppState, event: &RequestEvent) {
    let Some(page) = state.cluster_page.as_mut() else {
        return;
    };
    match event.kind {
        RequestKind::PageData => {
            page.request_status = match &event.outcome {
                RequestOutcome::Started => RequestStatus {
                    loading: true,
                    ..page.request_status.clone()
                },
                RequestOutcome::Succeeded { .. } => RequestStatus {
                    loading: false,
                    loaded: true,
                    error: None,
                },
                RequestOutcome::Failed { error, .. } => RequestStatus {
                    loading: false,
                    loaded: true,
                    error: Some(error.user_message()),
                },
            };
        }
        RequestKind::RefreshLists => {
            page.refreshes_in_flight = if event.is_finished() {
                page.refreshes_in_flight.saturating_sub(1)
            } else {
                page.refreshes_in_flight + 1
            };
        }
        _ => {}
    }
}

fn prune_done_messages(messages: &mut Vec<Message>) {
    let mut excess = messages.len().saturating_sub(MESSAGE_QUEUE_CAPACITY);
    if excess == 0 {
        return;
    }
    messages.retain(|m| {
        if m.done && excess > 0 {
            excess -= 1;
            false
        } else {
            true
        }
    });
}

/// Page-scoped messages other than the connectivity warning do not
/// outlive the page.
fn supersede_page_messages(state: &mut AppState) {
    for message in &mut state.messages {
        if !message.done
            && message.scope == MessageScope::ClusterPage
            && !message.is_server_not_reachable()
        {
            message.done = true;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::model::{Server, Topology};
    use crate::notify::MessageId;
    use crate::selection::SelectionState;

    fn mounted() -> AppState {
        let mut state = AppState::default();
        reduce(
            &mut state,
            &Action::ClusterPageDidMount {
                selection: SelectionState::default(),
            },
        );
        state
    }

    #[test]
    fn page_actions_are_ignored_before_mount() {
        let mut state = AppState::default();
        reduce(&mut state, &Action::SetFilter("rack".into()));
        reduce(&mut state, &Action::SelectServer("a:1".into()));
        assert!(state.cluster_page.is_none());
    }

    #[test]
    fn unchanged_filter_keeps_identity() {
        let mut state = mounted();
        reduce(&mut state, &Action::SetFilter("rack".into()));
        let before = Arc::clone(&state.cluster_page.as_ref().unwrap().filter);

        reduce(&mut state, &Action::SetFilter("rack".into()));
        let after = &state.cluster_page.as_ref().unwrap().filter;
        assert!(Arc::ptr_eq(&before, after));
    }

    #[test]
    fn page_data_request_drives_status() {
        let mut state = mounted();
        assert!(state.cluster_page.as_ref().unwrap().is_loading());

        let started = RequestEvent::started(RequestKind::PageData, MessageScope::ClusterPage);
        reduce(&mut state, &Action::Request(started));
        assert!(state.cluster_page.as_ref().unwrap().request_status.loading);

        reduce(
            &mut state,
            &Action::ListsLoaded(Topology {
                servers: vec![Server::new("a:1")],
                replicasets: vec![],
            }),
        );
        let done = RequestEvent::succeeded(RequestKind::PageData, MessageScope::ClusterPage, None);
        reduce(&mut state, &Action::Request(done));

        let page = state.cluster_page.as_ref().unwrap();
        assert!(!page.is_loading());
        assert_eq!(page.servers.as_ref().unwrap().len(), 1);
    }

    #[test]
    fn overlapping_refreshes_are_counted() {
        let mut state = mounted();
        let started = Action::Request(RequestEvent::started(
            RequestKind::RefreshLists,
            MessageScope::ClusterPage,
        ));
        let done = Action::Request(RequestEvent::succeeded(
            RequestKind::RefreshLists,
            MessageScope::ClusterPage,
            None,
        ));

        reduce(&mut state, &started);
        reduce(&mut state, &started);
        reduce(&mut state, &done);
        assert!(state.cluster_page.as_ref().unwrap().is_refreshing());

        reduce(&mut state, &done);
        assert!(!state.cluster_page.as_ref().unwrap().is_refreshing());

        // A stray completion never underflows.
        reduce(&mut state, &done);
        assert_eq!(state.cluster_page.as_ref().unwrap().refreshes_in_flight, 0);
    }

    #[test]
    fn dismissed_messages_are_pruned_past_capacity() {
        let mut state = AppState::default();
        let active = Message::danger(MessageId(0), "kept", MessageScope::Global);
        reduce(&mut state, &Action::CreateMessage(active));
        for n in 1..=u64::try_from(MESSAGE_QUEUE_CAPACITY).unwrap() + 10 {
            reduce(
                &mut state,
                &Action::CreateMessage(Message::success(MessageId(n), "ok", MessageScope::Global)),
            );
            reduce(&mut state, &Action::SetMessageDone(MessageId(n)));
        }

        assert!(state.messages.len() <= MESSAGE_QUEUE_CAPACITY);
        assert_eq!(state.messages[0].id, MessageId(0));
        assert!(!state.messages[0].done);
        assert_eq!(state.active_messages().count(), 1);
    }

    #[test]
    fn failed_page_data_records_error() {
        let mut state = mounted();
        let failed = RequestEvent::failed(
            RequestKind::PageData,
            MessageScope::ClusterPage,
            CoreError::Rejected {
                message: "not allowed".into(),
            },
            false,
        );
        reduce(&mut state, &Action::Request(failed));

        let status = &state.cluster_page.as_ref().unwrap().request_status;
        assert_eq!(status.error.as_deref(), Some("not allowed"));
        assert!(!status.loading);
    }

    #[test]
    fn reset_supersedes_page_messages_only() {
        let mut state = mounted();
        let page_msg = Message::danger(MessageId(1), "edit failed", MessageScope::ClusterPage);
        let global_msg = Message::danger(MessageId(2), "auth failed", MessageScope::Global);
        let unreachable = Message::server_not_reachable(MessageId(3));
        for m in [page_msg, global_msg, unreachable] {
            reduce(&mut state, &Action::CreateMessage(m));
        }

        reduce(&mut state, &Action::ClusterPageReset);

        assert!(state.cluster_page.is_none());
        let done: Vec<bool> = state.messages.iter().map(|m| m.done).collect();
        assert_eq!(done, vec![true, false, false]);
    }

    #[test]
    fn set_message_done_unknown_id_is_noop() {
        let mut state = AppState::default();
        reduce(
            &mut state,
            &Action::CreateMessage(Message::success(MessageId(7), "ok", MessageScope::Global)),
        );
        reduce(&mut state, &Action::SetMessageDone(MessageId(8)));
        assert!(!state.messages[0].done);

        reduce(&mut state, &Action::SetMessageDone(MessageId(7)));
        reduce(&mut state, &Action::SetMessageDone(MessageId(7)));
        assert!(state.messages[0].done);
    }
}

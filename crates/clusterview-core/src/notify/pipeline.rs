// ── Notification tasks ──
//
// Two long-lived tasks observe the store's action stream:
//
// - the observer turns request outcomes into messages (connectivity
//   warning with dedup and auto-heal, error text, success text);
// - the auto-dismiss task marks each success message done after its TTL.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::message::Message;
use crate::store::{Action, ActionReceiver, AppState, RequestEvent, RequestOutcome, Store};

/// Follow-up actions for one request event, given the state after it
/// was reduced.
pub fn react(state: &AppState, event: &RequestEvent, store: &Store) -> Vec<Action> {
    let mut actions = Vec::new();
    let active_unreachable = state.active_server_not_reachable().map(|m| m.id);

    match &event.outcome {
        RequestOutcome::Failed { error, .. } if error.is_server_unreachable() => {
            if active_unreachable.is_none() {
                actions.push(Action::CreateMessage(Message::server_not_reachable(
                    store.next_message_id(),
                )));
            }
        }
        outcome => {
            // Any completed request proves the server answers again.
            if event.is_finished() {
                if let Some(id) = active_unreachable {
                    actions.push(Action::SetMessageDone(id));
                }
            }
            if let RequestOutcome::Failed {
                error,
                show_error: true,
            } = outcome
            {
                actions.push(Action::CreateMessage(Message::danger(
                    store.next_message_id(),
                    error.user_message(),
                    event.scope,
                )));
            }
        }
    }

    if let RequestOutcome::Succeeded {
        success_message: Some(text),
    } = &event.outcome
    {
        actions.push(Action::CreateMessage(Message::success(
            store.next_message_id(),
            text.clone(),
            event.scope,
        )));
    }

    actions
}

/// Spawn the observer and auto-dismiss tasks.
///
/// Both subscribe before returning, so no action dispatched after this
/// call is missed.
pub fn spawn(
    store: Arc<Store>,
    message_ttl: Duration,
    cancel: CancellationToken,
) -> Vec<JoinHandle<()>> {
    let observer_rx = store.subscribe();
    let dismiss_rx = store.subscribe();
    vec![
        tokio::spawn(observer_task(Arc::clone(&store), observer_rx, cancel.clone())),
        tokio::spawn(auto_dismiss_task(store, dismiss_rx, message_ttl, cancel)),
    ]
}

async fn observer_task(store: Arc<Store>, mut rx: ActionReceiver, cancel: CancellationToken) {
    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            action = rx.recv() => {
                let Some(action) = action else { break };
                let Action::Request(ref event) = *action else { continue };
                for follow_up in react(&store.state(), event, &store) {
                    store.dispatch(follow_up);
                }
            }
        }
    }
    debug!("message observer stopped");
}

async fn auto_dismiss_task(
    store: Arc<Store>,
    mut rx: ActionReceiver,
    ttl: Duration,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            action = rx.recv() => {
                let Some(action) = action else { break };
                let Action::CreateMessage(ref message) = *action else { continue };
                if !message.is_success() {
                    continue;
                }

                let id = message.id;
                let store = Arc::clone(&store);
                let cancel = cancel.child_token();
                tokio::spawn(async move {
                    tokio::select! {
                        biased;
                        () = cancel.cancelled() => {}
                        () = tokio::time::sleep(ttl) => store.dispatch(Action::SetMessageDone(id)),
                    }
                });
            }
        }
    }
    debug!("message auto-dismiss stopped");
}

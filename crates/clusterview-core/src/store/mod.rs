// ── Reactive application store ──
//
// Single action queue: the reducer runs synchronously under the watch
// channel, then the action is forwarded to every subscriber queue.

mod actions;
mod reducer;
mod state;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{mpsc, watch};
use tracing::trace;

pub use actions::{Action, RequestEvent, RequestOutcome};
pub use state::{AppState, ClusterPageState, RequestStatus};

use crate::notify::MessageId;

/// Receiving half of a store subscription.
pub type ActionReceiver = mpsc::UnboundedReceiver<Arc<Action>>;

/// Holds [`AppState`] and fans dispatched actions out to subscribers.
pub struct Store {
    state: watch::Sender<Arc<AppState>>,
    subscribers: Mutex<Vec<mpsc::UnboundedSender<Arc<Action>>>>,
    next_message_id: AtomicU64,
}

impl Store {
    pub fn new() -> Self {
        let (state, _) = watch::channel(Arc::new(AppState::default()));
        Self {
            state,
            subscribers: Mutex::new(Vec::new()),
            next_message_id: AtomicU64::new(1),
        }
    }

    /// Current state snapshot.
    pub fn state(&self) -> Arc<AppState> {
        Arc::clone(&self.state.borrow())
    }

    /// Watch state snapshots as they change.
    pub fn watch(&self) -> watch::Receiver<Arc<AppState>> {
        self.state.subscribe()
    }

    /// Apply `action` and forward it to every live subscriber.
    pub fn dispatch(&self, action: Action) {
        trace!(action = action.name(), "dispatch");
        self.state.send_modify(|state| reducer::reduce(Arc::make_mut(state), &action));

        let action = Arc::new(action);
        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        subscribers.retain(|tx| tx.send(Arc::clone(&action)).is_ok());
    }

    /// Receive every action dispatched from now on.
    pub fn subscribe(&self) -> ActionReceiver {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(tx);
        rx
    }

    pub fn next_message_id(&self) -> MessageId {
        MessageId(self.next_message_id.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

// ── Selection sync ──
//
// Keeps modal and panel selection consistent between the URL query string
// and the store across asynchronous data loads.

mod history;
mod query;
mod resolve;
mod sync;

pub use history::History;
pub use query::{Location, REPLICASET_PARAM, SERVER_PARAM, SearchParams};
pub use resolve::{Resolution, selected_replicaset, selected_server};
pub use sync::{
    SelectionPhase, SelectionState, close_replicaset, close_server, open_replicaset, open_server,
    reconcile,
};

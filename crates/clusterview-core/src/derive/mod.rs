// ── Derived-state engine ──
//
// Pure pipeline from topology and statistics snapshots to the filtered,
// counted view model, plus the memo layer that keeps it incremental.

pub mod counts;
pub mod filter;
pub mod memo;
pub mod search;
pub mod selectors;

pub use counts::{
    ReplicasetCounts, ServerCounts, count_replicasets, count_servers, replicasets_title,
};
pub use filter::{
    FilteredReplicaset, FilteredServer, filter_replicasets, label_query, replicaset_matches,
    server_matches, tokenize,
};
pub use memo::{Memo, MemoKey};
pub use search::{
    SearchableReplicaset, SearchableServer, build_searchable, index_replicasets, join_statistics,
};
pub use selectors::Selectors;

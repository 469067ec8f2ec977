// ── Derived-state graph ──
//
// One memo cell per node:
//
//   replicasets ─┬─ with_stat ── searchable ── filtered
//   server_stat ─┘                               │
//                                      filter ───┘
//   servers ── server_counts, unlinked
//   replicasets ── replicaset_counts

use std::sync::Arc;

use tracing::debug;

use super::counts::{ReplicasetCounts, ServerCounts, count_replicasets, count_servers};
use super::filter::{FilteredReplicaset, filter_replicasets};
use super::memo::Memo;
use super::search::{SearchableReplicaset, index_replicasets, join_statistics};
use crate::model::{Replicaset, Server, ServerStat};
use crate::store::ClusterPageState;

type ReplicasetList = Arc<Vec<Replicaset>>;
type StatList = Option<Arc<Vec<ServerStat>>>;

/// Memoized derivations over the cluster page state.
///
/// Owned by the controller; each accessor recomputes only when one of its
/// inputs was replaced.
#[derive(Default)]
pub struct Selectors {
    with_stat: Memo<(ReplicasetList, StatList), Vec<Replicaset>>,
    searchable: Memo<ReplicasetList, Vec<SearchableReplicaset>>,
    filtered: Memo<(Arc<Vec<SearchableReplicaset>>, Arc<str>), Vec<FilteredReplicaset>>,
    server_counts: Memo<Arc<Vec<Server>>, ServerCounts>,
    replicaset_counts: Memo<ReplicasetList, ReplicasetCounts>,
    unlinked: Memo<Arc<Vec<Server>>, Vec<Server>>,
}

impl Selectors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replica-sets with statistics joined onto their members.
    pub fn with_stat(&self, page: &ClusterPageState) -> Option<ReplicasetList> {
        let replicasets = page.replicasets.clone()?;
        Some(self.with_stat.get(
            (replicasets, page.server_stat.clone()),
            |(list, stats)| join_statistics(list, stats.as_deref().map(Vec::as_slice)),
        ))
    }

    pub fn searchable(&self, page: &ClusterPageState) -> Option<Arc<Vec<SearchableReplicaset>>> {
        let with_stat = self.with_stat(page)?;
        Some(self.searchable.get(with_stat, |list| {
            debug!(replicasets = list.len(), "rebuilding search index");
            index_replicasets(list)
        }))
    }

    pub fn filtered(&self, page: &ClusterPageState) -> Option<Arc<Vec<FilteredReplicaset>>> {
        let searchable = self.searchable(page)?;
        Some(self.filtered.get(
            (searchable, Arc::clone(&page.filter)),
            |(list, filter)| {
                debug!(filter = %filter, "refiltering replicasets");
                filter_replicasets(list, filter)
            },
        ))
    }

    pub fn server_counts(&self, page: &ClusterPageState) -> Option<ServerCounts> {
        let servers = page.servers.clone()?;
        Some(*self.server_counts.get(servers, |list| count_servers(list)))
    }

    pub fn replicaset_counts(&self, page: &ClusterPageState) -> Option<ReplicasetCounts> {
        let replicasets = page.replicasets.clone()?;
        Some(*self.replicaset_counts.get(replicasets, |list| count_replicasets(list)))
    }

    /// Servers that have not joined a replica-set.
    pub fn unlinked(&self, page: &ClusterPageState) -> Option<Arc<Vec<Server>>> {
        let servers = page.servers.clone()?;
        Some(self.unlinked.get(servers, |list| {
            list.iter().filter(|s| !s.is_configured()).cloned().collect()
        }))
    }

    /// Number of times each node has been computed, in graph order.
    pub fn computations(&self) -> [u64; 6] {
        [
            self.with_stat.computations(),
            self.searchable.computations(),
            self.filtered.computations(),
            self.server_counts.computations(),
            self.replicaset_counts.computations(),
            self.unlinked.computations(),
        ]
    }
}

// ── Token filter engine ──

use serde::Serialize;

use super::search::{SearchableReplicaset, SearchableServer};
use crate::model::{Label, Replicaset, ReplicasetMember, Server};

/// A searchable server flagged with whether it matches every token.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilteredServer {
    #[serde(flatten)]
    pub searchable: SearchableServer,
    pub filter_matching: bool,
}

impl ReplicasetMember for FilteredServer {
    fn server(&self) -> &Server {
        &self.searchable.server
    }
}

/// A replica-set retained by the filter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilteredReplicaset {
    #[serde(flatten)]
    pub replicaset: Replicaset<FilteredServer>,
    pub search_string: String,
    pub matching_servers_count: usize,
}

/// Lowercase the query and split it into non-empty tokens.
pub fn tokenize(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split_whitespace()
        .map(str::to_owned)
        .collect()
}

/// Replica-set admission: each token hits the bag or prefixes the uuid.
pub fn replicaset_matches(rs: &SearchableReplicaset, tokens: &[String]) -> bool {
    tokens.iter().all(|token| {
        rs.search_string.contains(token.as_str()) || rs.replicaset.uuid.starts_with(token.as_str())
    })
}

/// Server matching has no uuid fallback.
pub fn server_matches(server: &SearchableServer, tokens: &[String]) -> bool {
    tokens
        .iter()
        .all(|token| server.search_string.contains(token.as_str()))
}

/// Retain matching replica-sets and flag their matching servers.
pub fn filter_replicasets(list: &[SearchableReplicaset], query: &str) -> Vec<FilteredReplicaset> {
    let tokens = tokenize(query);

    list.iter()
        .filter(|rs| replicaset_matches(rs, &tokens))
        .cloned()
        .map(|rs| {
            let mut matching_servers_count = 0;
            let replicaset = rs.replicaset.map_servers(|searchable| {
                let filter_matching = server_matches(&searchable, &tokens);
                if filter_matching {
                    matching_servers_count += 1;
                }
                FilteredServer {
                    searchable,
                    filter_matching,
                }
            });
            FilteredReplicaset {
                replicaset,
                search_string: rs.search_string,
                matching_servers_count,
            }
        })
        .collect()
}

/// Filter text applied when a server label is clicked.
pub fn label_query(label: &Label) -> String {
    format!("{}: {}", label.name, label.value)
}

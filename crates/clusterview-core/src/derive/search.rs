// ── Search index builder ──
//
// Decorates replica-sets and their servers with a lowercase search string.
// Statistics are joined first since they arrive from a separate fetch.

use std::collections::HashMap;

use serde::Serialize;

use crate::model::{Replicaset, ReplicasetMember, Server, ServerStat, ServerStatistics};

/// A server plus its search string.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchableServer {
    #[serde(flatten)]
    pub server: Server,
    pub search_string: String,
}

impl ReplicasetMember for SearchableServer {
    fn server(&self) -> &Server {
        &self.server
    }
}

/// A replica-set whose token bag covers its roles and every member.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchableReplicaset {
    #[serde(flatten)]
    pub replicaset: Replicaset<SearchableServer>,
    pub search_string: String,
}

/// Attach statistics to each member by uuid.
///
/// A missing snapshot, a server without uuid and an unmatched uuid all
/// yield `statistics: None`.
pub fn join_statistics(
    replicasets: &[Replicaset],
    stats: Option<&[ServerStat]>,
) -> Vec<Replicaset> {
    let by_uuid: HashMap<&str, Option<&ServerStatistics>> = stats
        .unwrap_or_default()
        .iter()
        .map(|s| (s.uuid.as_str(), s.statistics.as_ref()))
        .collect();

    replicasets
        .iter()
        .cloned()
        .map(|rs| {
            rs.map_servers(|server| {
                let statistics = server
                    .uuid
                    .as_deref()
                    .and_then(|uuid| by_uuid.get(uuid).copied().flatten())
                    .cloned();
                Server {
                    statistics,
                    ..server
                }
            })
        })
        .collect()
}

/// Tokens a server contributes to the index, in order.
pub fn server_tokens(server: &Server) -> Vec<String> {
    let mut tokens = Vec::with_capacity(2 + server.labels.len() * 2);
    tokens.push(server.uri.clone());
    tokens.push(server.alias.clone().unwrap_or_default());
    for label in &server.labels {
        tokens.push(format!("{}:", label.name));
        tokens.push(label.value.clone());
    }
    tokens
}

/// Build search strings for every replica-set and member.
///
/// The replica-set bag lists its roles first, then each member's tokens
/// in member order.
pub fn index_replicasets(replicasets: &[Replicaset]) -> Vec<SearchableReplicaset> {
    replicasets
        .iter()
        .cloned()
        .map(|rs| {
            let mut bag = rs.roles.clone();
            let replicaset = rs.map_servers(|server| {
                let tokens = server_tokens(&server);
                let search_string = tokens.join(" ").to_lowercase();
                bag.extend(tokens);
                SearchableServer {
                    server,
                    search_string,
                }
            });
            SearchableReplicaset {
                replicaset,
                search_string: bag.join(" ").to_lowercase(),
            }
        })
        .collect()
}

/// Join statistics and index in one pass.
pub fn build_searchable(
    replicasets: &[Replicaset],
    stats: Option<&[ServerStat]>,
) -> Vec<SearchableReplicaset> {
    index_replicasets(&join_statistics(replicasets, stats))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{HealthStatus, Label};
    use pretty_assertions::assert_eq;

    fn server(uri: &str, uuid: Option<&str>, alias: Option<&str>, labels: Vec<Label>) -> Server {
        Server {
            uuid: uuid.map(str::to_owned),
            alias: alias.map(str::to_owned),
            labels,
            ..Server::new(uri)
        }
    }

    fn replicaset(roles: &[&str], servers: Vec<Server>) -> Replicaset {
        Replicaset {
            uuid: "rs-1".into(),
            roles: roles.iter().map(|r| (*r).to_owned()).collect(),
            status: HealthStatus::Healthy,
            weight: None,
            vshard_group: None,
            master: "u1".into(),
            active_master: "u1".into(),
            servers,
        }
    }

    #[test]
    fn server_string_has_uri_alias_and_labels() {
        let s = server(
            "Host:3301",
            Some("u1"),
            Some("Storage-1"),
            vec![Label::new("Rack", "A1")],
        );
        let indexed = index_replicasets(&[replicaset(&["vshard-storage"], vec![s])]);

        assert_eq!(
            indexed[0].replicaset.servers[0].search_string,
            "host:3301 storage-1 rack: a1"
        );
        assert_eq!(
            indexed[0].search_string,
            "vshard-storage host:3301 storage-1 rack: a1"
        );
    }

    #[test]
    fn missing_alias_leaves_empty_token() {
        let s = server("h:1", Some("u1"), None, vec![]);
        let indexed = index_replicasets(&[replicaset(&["router"], vec![s])]);
        assert_eq!(indexed[0].replicaset.servers[0].search_string, "h:1 ");
        assert_eq!(indexed[0].search_string, "router h:1 ");
    }

    #[test]
    fn replicaset_bag_contains_every_member_string() {
        let servers = vec![
            server("a:1", Some("u1"), Some("one"), vec![Label::new("dc", "east")]),
            server("a:2", Some("u2"), None, vec![]),
        ];
        let indexed = index_replicasets(&[replicaset(&["r1", "r2"], servers)]);
        let rs = &indexed[0];
        for member in &rs.replicaset.servers {
            for token in member.search_string.split(' ').filter(|t| !t.is_empty()) {
                assert!(rs.search_string.contains(token));
            }
        }
        assert!(rs.search_string.starts_with("r1 r2 "));
    }

    #[test]
    fn statistics_join_by_uuid() {
        let servers = vec![
            server("a:1", Some("u1"), None, vec![]),
            server("a:2", Some("u2"), None, vec![]),
            server("a:3", None, None, vec![]),
        ];
        let stats = vec![ServerStat {
            uuid: "u2".into(),
            statistics: Some(ServerStatistics {
                arena_used: Some(42),
                ..ServerStatistics::default()
            }),
        }];

        let joined = join_statistics(&[replicaset(&[], servers)], Some(&stats));
        let got: Vec<Option<u64>> = joined[0]
            .servers
            .iter()
            .map(|s| s.statistics.as_ref().and_then(|st| st.arena_used))
            .collect();
        assert_eq!(got, vec![None, Some(42), None]);
    }

    #[test]
    fn absent_stats_yield_none_everywhere() {
        let mut s = server("a:1", Some("u1"), None, vec![]);
        s.statistics = Some(ServerStatistics::default());
        let joined = join_statistics(&[replicaset(&[], vec![s])], None);
        assert!(joined[0].servers[0].statistics.is_none());
    }

    #[test]
    fn building_twice_is_identical() {
        let rs = replicaset(&["x"], vec![server("a:1", Some("u1"), Some("A"), vec![])]);
        let first = build_searchable(std::slice::from_ref(&rs), None);
        let second = build_searchable(&[rs], None);
        assert_eq!(first, second);
    }
}

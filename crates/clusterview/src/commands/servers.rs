//! `servers`: every known server with its replica-set and memory use.
//!
//! Statistics are joined onto the flat server list by uuid.

use std::collections::HashMap;

use tabled::Tabled;

use clusterview_core::{Location, Server, ServerStatistics, ViewConfig};

use super::{DEFAULT_LOCATION, RenderContext, with_page};
use crate::cli::ServersArgs;
use crate::error::CliError;
use crate::output;
use crate::snapshot::SnapshotTransport;

const MIB: u64 = 1024 * 1024;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ServerRow {
    #[tabled(rename = "URI")]
    uri: String,
    #[tabled(rename = "Alias")]
    alias: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Replicaset")]
    replicaset: String,
    #[tabled(rename = "Labels")]
    labels: String,
    #[tabled(rename = "Memory")]
    memory: String,
}

fn memory_text(stats: Option<&ServerStatistics>) -> String {
    match stats.map(|s| (s.quota_used, s.quota_size)) {
        Some((Some(used), Some(size))) => format!("{} / {} MiB", used / MIB, size / MIB),
        _ => String::new(),
    }
}

impl ServerRow {
    fn new(s: &Server, color: bool) -> Self {
        Self {
            uri: s.uri.clone(),
            alias: s.alias.clone().unwrap_or_default(),
            status: output::paint_status(&s.status, color),
            replicaset: s
                .replicaset
                .as_ref()
                .map(|r| r.uuid.chars().take(8).collect())
                .unwrap_or_default(),
            labels: s
                .labels
                .iter()
                .map(|l| format!("{}: {}", l.name, l.value))
                .collect::<Vec<_>>()
                .join(", "),
            memory: memory_text(s.statistics.as_ref()),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    transport: SnapshotTransport,
    config: ViewConfig,
    args: ServersArgs,
    ctx: RenderContext,
) -> Result<(), CliError> {
    let location = Location::parse(DEFAULT_LOCATION);

    let entries = with_page(transport, config, &location, |controller| async move {
        let state = controller.store().state();
        let Some(page) = state.cluster_page.as_ref() else {
            return Ok(Vec::new());
        };

        let stats: HashMap<&str, &ServerStatistics> = page
            .server_stat
            .iter()
            .flat_map(|list| list.iter())
            .filter_map(|s| s.statistics.as_ref().map(|st| (s.uuid.as_str(), st)))
            .collect();

        let entries = page
            .servers
            .iter()
            .flat_map(|list| list.iter())
            .filter(|s| !args.unconfigured || !s.is_configured())
            .map(|s| {
                let mut server = s.clone();
                server.statistics = server
                    .uuid
                    .as_deref()
                    .and_then(|uuid| stats.get(uuid))
                    .map(|st| (*st).clone());
                server
            })
            .collect::<Vec<_>>();
        Ok(entries)
    })
    .await?;

    let out = output::render_list(
        ctx.format,
        &entries,
        |s| ServerRow::new(s, ctx.color),
        |s| s.uri.clone(),
    )?;
    output::print_output(&out, ctx.quiet);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_needs_both_figures() {
        let stats = ServerStatistics {
            quota_used: Some(64 * MIB),
            quota_size: Some(256 * MIB),
            ..ServerStatistics::default()
        };
        assert_eq!(memory_text(Some(&stats)), "64 / 256 MiB");

        let partial = ServerStatistics {
            quota_used: Some(MIB),
            ..ServerStatistics::default()
        };
        assert_eq!(memory_text(Some(&partial)), "");
        assert_eq!(memory_text(None), "");
    }
}

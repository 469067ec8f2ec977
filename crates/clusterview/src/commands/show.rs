//! `show`: the cluster page as the admin UI renders it.

use std::fmt::Write;

use tabled::Tabled;

use clusterview_core::model::ReplicasetMember;
use clusterview_core::{ClusterPageView, FilteredReplicaset, Label, Location, Server, ViewConfig};

use super::{DEFAULT_LOCATION, RenderContext, with_page};
use crate::cli::ShowArgs;
use crate::error::CliError;
use crate::output;
use crate::snapshot::SnapshotTransport;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct ReplicasetRow {
    #[tabled(rename = "UUID")]
    uuid: String,
    #[tabled(rename = "Roles")]
    roles: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Master")]
    master: String,
    #[tabled(rename = "Servers")]
    servers: String,
}

impl ReplicasetRow {
    fn new(rs: &FilteredReplicaset, filtered: bool, color: bool) -> Self {
        let replicaset = &rs.replicaset;
        let master = replicaset
            .servers
            .iter()
            .map(ReplicasetMember::server)
            .find(|s| s.uuid.as_deref() == Some(replicaset.active_master.uuid.as_str()))
            .map(|s| s.display_name().to_owned())
            .unwrap_or_default();
        let servers = if filtered {
            format!("{}/{}", rs.matching_servers_count, replicaset.servers.len())
        } else {
            replicaset.servers.len().to_string()
        };
        Self {
            uuid: replicaset.short_uuid().to_owned(),
            roles: replicaset.roles_text(),
            status: output::paint_status(&replicaset.status, color),
            master,
            servers,
        }
    }
}

#[derive(Tabled)]
struct UnlinkedRow {
    #[tabled(rename = "URI")]
    uri: String,
    #[tabled(rename = "Alias")]
    alias: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl UnlinkedRow {
    fn new(server: &Server, color: bool) -> Self {
        Self {
            uri: server.uri.clone(),
            alias: server.alias.clone().unwrap_or_default(),
            status: output::paint_status(&server.status, color),
        }
    }
}

// ── Detail view ─────────────────────────────────────────────────────

fn detail(view: &ClusterPageView, color: bool) -> String {
    let mut out = String::new();
    let filtered = !view.filter.is_empty();

    if let Some(ref title) = view.title {
        let _ = writeln!(out, "Replicasets {title}");
    }
    if filtered {
        let _ = writeln!(out, "Filter: {}", view.filter);
    }

    if let Some(ref unlinked) = view.unlinked_servers {
        if !unlinked.is_empty() {
            let rows: Vec<_> = unlinked.iter().map(|s| UnlinkedRow::new(s, color)).collect();
            let _ = writeln!(out, "\nUnconfigured servers ({})", unlinked.len());
            let _ = writeln!(out, "{}", output::render_table(&rows));
        }
    }

    match view.replicasets.as_deref().map(Vec::as_slice) {
        Some([]) if filtered => {
            let _ = write!(out, "\nNo replicasets match the filter");
        }
        Some(list) => {
            let rows: Vec<_> = list
                .iter()
                .map(|rs| ReplicasetRow::new(rs, filtered, color))
                .collect();
            let _ = write!(out, "\n{}", output::render_table(&rows));
        }
        None => {
            let _ = write!(out, "\nLoading...");
        }
    }

    out
}

fn ids(view: &ClusterPageView) -> String {
    view.replicasets
        .iter()
        .flat_map(|list| list.iter())
        .map(|rs| rs.replicaset.uuid.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    transport: SnapshotTransport,
    config: ViewConfig,
    args: ShowArgs,
    ctx: RenderContext,
) -> Result<(), CliError> {
    let location = Location::parse(DEFAULT_LOCATION);

    let view = with_page(transport, config, &location, |controller| async move {
        match args.label {
            Some((name, value)) => controller.apply_label_filter(&Label::new(name, value)),
            None => controller.set_filter(args.filter),
        }
        controller.view().ok_or_else(|| CliError::Validation {
            field: "page".into(),
            reason: "cluster page is not mounted".into(),
        })
    })
    .await?;

    let out = output::render_single(ctx.format, &view, |v| detail(v, ctx.color), ids)?;
    output::print_output(&out, ctx.quiet);
    Ok(())
}

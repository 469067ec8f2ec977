//! `select`: apply selection changes to a location and resolve them.
//!
//! The page is mounted at the starting location, the URL is rewritten the
//! way the UI's open/close handlers would, and a render pass brings the
//! store in line before the selected entities are resolved.

use std::fmt::Write;

use serde::Serialize;

use clusterview_core::model::MemberRole;
use clusterview_core::selection::{
    REPLICASET_PARAM, SERVER_PARAM, close_replicaset, close_server, open_replicaset, open_server,
};
use clusterview_core::{Location, Replicaset, Resolution, SelectionPhase, Server, ViewConfig};

use super::{RenderContext, with_page};
use crate::cli::SelectArgs;
use crate::error::CliError;
use crate::output;
use crate::snapshot::SnapshotTransport;

#[derive(Debug, Serialize)]
struct SelectOutput {
    location: String,
    /// Store updates applied by the render pass.
    reconciled: usize,
    selection: SelectionPhase,
    server: Option<Resolution<Server>>,
    replicaset: Option<Resolution<Replicaset>>,
}

fn target_location(start: &Location, args: &SelectArgs) -> Location {
    let mut location = start.clone();
    if let Some(ref uri) = args.server {
        location = open_server(&location, uri);
    } else if args.close_server {
        location = close_server(&location);
    }
    if let Some(ref uuid) = args.replicaset {
        location = open_replicaset(&location, uuid);
    } else if args.close_replicaset {
        location = close_replicaset(&location);
    }
    location
}

fn role_text(role: MemberRole) -> &'static str {
    match role {
        MemberRole::ActiveMaster => "active master",
        MemberRole::Master => "master",
        MemberRole::Replica => "replica",
    }
}

fn detail(out: &SelectOutput, color: bool) -> String {
    let mut text = String::new();
    let _ = writeln!(text, "Location: {}", out.location);

    if let Some(Resolution::Found(ref s)) = out.server {
        let _ = writeln!(
            text,
            "\nServer {} ({})  {}",
            s.uri,
            s.display_name(),
            output::paint_status(&s.status, color)
        );
        if let Some(ref rs) = s.replicaset {
            let _ = writeln!(text, "  replicaset: {}", rs.uuid);
        }
        for label in &s.labels {
            let _ = writeln!(text, "  {}: {}", label.name, label.value);
        }
    }

    if let Some(Resolution::Found(ref rs)) = out.replicaset {
        let _ = writeln!(
            text,
            "\nReplicaset {}  {}  {}",
            rs.short_uuid(),
            rs.roles_text(),
            output::paint_status(&rs.status, color)
        );
        for (server, role) in rs.members_with_roles() {
            let _ = writeln!(text, "  {} ({})", server.display_name(), role_text(role));
        }
    }

    text.trim_end().to_owned()
}

fn not_found<T>(
    resolution: Option<&Resolution<T>>,
    resource_type: &str,
    id: Option<String>,
) -> Option<CliError> {
    match (resolution, id) {
        (Some(Resolution::NotFound), Some(identifier)) => Some(CliError::NotFound {
            resource_type: resource_type.into(),
            identifier,
            list_command: if resource_type == "server" {
                "servers".into()
            } else {
                "show".into()
            },
        }),
        _ => None,
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    transport: SnapshotTransport,
    config: ViewConfig,
    args: SelectArgs,
    ctx: RenderContext,
) -> Result<(), CliError> {
    let start = Location::parse(&args.location);
    let target = target_location(&start, &args);
    let server_id = target.param(SERVER_PARAM).map(str::to_owned);
    let replicaset_id = target.param(REPLICASET_PARAM).map(str::to_owned);

    let result = with_page(transport, config, &start, |controller| async move {
        let reconciled = controller.render_pass(&target);
        let view = controller.view().ok_or_else(|| CliError::Validation {
            field: "page".into(),
            reason: "cluster page is not mounted".into(),
        })?;
        Ok(SelectOutput {
            location: target.to_string(),
            reconciled,
            selection: view.selection,
            server: view.selected_server,
            replicaset: view.selected_replicaset,
        })
    })
    .await?;

    if let Some(err) = not_found(result.server.as_ref(), "server", server_id)
        .or_else(|| not_found(result.replicaset.as_ref(), "replicaset", replicaset_id))
    {
        return Err(err);
    }

    let out = output::render_single(
        ctx.format,
        &result,
        |r| detail(r, ctx.color),
        |r| r.location.clone(),
    )?;
    output::print_output(&out, ctx.quiet);
    Ok(())
}

//! Command dispatch: bridges CLI args -> a mounted cluster page -> output.

pub mod config_cmd;
pub mod select;
pub mod servers;
pub mod show;

use std::future::Future;

use clap::ValueEnum;

use clusterview_config::{Config, config_path};
use clusterview_core::{Controller, CoreError, Location, ViewConfig};

use crate::cli::{ColorMode, Command, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;
use crate::snapshot::SnapshotTransport;

/// Location the cluster page is mounted at when none is given.
pub const DEFAULT_LOCATION: &str = "/cluster/dashboard";

/// Resolved presentation settings: CLI flags first, then the config file.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext {
    pub format: OutputFormat,
    pub color: bool,
    pub quiet: bool,
}

impl RenderContext {
    pub fn new(global: &GlobalOpts, cfg: &Config) -> Self {
        let format = global
            .output
            .or_else(|| OutputFormat::from_str(&cfg.defaults.output, true).ok())
            .unwrap_or(OutputFormat::Table);
        let color = global
            .color
            .or_else(|| ColorMode::from_str(&cfg.defaults.color, true).ok())
            .unwrap_or(ColorMode::Auto);
        Self {
            format,
            color: output::should_color(color),
            quiet: global.quiet,
        }
    }
}

/// Build the snapshot transport from flags, falling back to the config file.
fn snapshot_transport(global: &GlobalOpts, cfg: &Config) -> Result<SnapshotTransport, CliError> {
    let topology = global
        .topology
        .clone()
        .or_else(|| cfg.defaults.topology.clone())
        .ok_or_else(|| CliError::NoTopology {
            path: config_path().display().to_string(),
        })?;
    let stats = global.stats.clone().or_else(|| cfg.defaults.stats.clone());
    Ok(SnapshotTransport::new(topology, stats))
}

/// Mount the cluster page at `location`, wait for lists and statistics,
/// then hand the controller to `f`.
pub(crate) async fn with_page<F, Fut, R>(
    transport: SnapshotTransport,
    config: ViewConfig,
    location: &Location,
    f: F,
) -> Result<R, CliError>
where
    F: FnOnce(Controller<SnapshotTransport>) -> Fut,
    Fut: Future<Output = Result<R, CliError>>,
{
    Controller::oneshot(transport, config, |controller| async move {
        controller.mount_cluster_page(location).await?;
        controller.refresh_lists().await?;
        Ok::<_, CoreError>(f(controller).await)
    })
    .await?
}

/// Dispatch a snapshot-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, global: &GlobalOpts, cfg: &Config) -> Result<(), CliError> {
    let transport = snapshot_transport(global, cfg)?;
    let view_config = cfg.to_view_config();
    let ctx = RenderContext::new(global, cfg);

    match cmd {
        Command::Show(args) => show::handle(transport, view_config, args, ctx).await,
        Command::Servers(args) => servers::handle(transport, view_config, args, ctx).await,
        Command::Select(args) => select::handle(transport, view_config, args, ctx).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}

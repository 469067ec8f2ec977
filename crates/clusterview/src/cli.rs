//! Clap derive structures for the `clusterview` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// clusterview -- inspect replica-set topology snapshots
#[derive(Debug, Parser)]
#[command(
    name = "clusterview",
    version,
    about = "Inspect cluster topology snapshots from the command line",
    long_about = "Loads a topology snapshot (servers and replica-sets) and an optional\n\
        statistics snapshot, then renders the filtered cluster page the way the\n\
        admin UI would: search, counters, and URL-driven selection.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Topology snapshot (JSON with `servers` and `replicasets`)
    #[arg(long, short = 't', env = "CLUSTERVIEW_TOPOLOGY", global = true)]
    pub topology: Option<PathBuf>,

    /// Statistics snapshot (JSON with `serverStat`)
    #[arg(long, short = 's', env = "CLUSTERVIEW_STATS", global = true)]
    pub stats: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'o', env = "CLUSTERVIEW_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Render the cluster page: filtered replica-sets and counters
    #[command(alias = "rs")]
    Show(ShowArgs),

    /// List servers, configured and unconfigured
    #[command(alias = "srv")]
    Servers(ServersArgs),

    /// Resolve a server or replica-set selection against the snapshot
    Select(SelectArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Command Arguments ────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Search query, space-separated tokens (e.g. "storage rack: 1")
    #[arg(long, short = 'f', default_value = "")]
    pub filter: String,

    /// Filter by a server label, written NAME=VALUE
    #[arg(long, short = 'l', conflicts_with = "filter", value_parser = parse_label)]
    pub label: Option<(String, String)>,
}

#[derive(Debug, Args)]
pub struct ServersArgs {
    /// Only servers that have not joined a replica-set
    #[arg(long, short = 'u')]
    pub unconfigured: bool,
}

#[derive(Debug, Args)]
pub struct SelectArgs {
    /// Starting location, e.g. "/cluster/dashboard?s=localhost:3301"
    #[arg(long, default_value = "/cluster/dashboard")]
    pub location: String,

    /// Open the server details for this uri
    #[arg(long)]
    pub server: Option<String>,

    /// Open the replica-set editor for this uuid
    #[arg(long)]
    pub replicaset: Option<String>,

    /// Close any open server details
    #[arg(long, conflicts_with = "server")]
    pub close_server: bool,

    /// Close any open replica-set editor
    #[arg(long, conflicts_with = "replicaset")]
    pub close_replicaset: bool,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Write a config file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Display current resolved configuration
    Show,

    /// Print the config file location
    Path,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

fn parse_label(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(name, value)| (name.trim().to_owned(), value.trim().to_owned()))
        .filter(|(name, _)| !name.is_empty())
        .ok_or_else(|| format!("expected NAME=VALUE, got '{raw}'"))
}

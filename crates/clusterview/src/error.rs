//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with help text.

use miette::Diagnostic;
use thiserror::Error;

use clusterview_config::ConfigError;
use clusterview_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const DATA: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Input ────────────────────────────────────────────────────────

    #[error("No topology snapshot given")]
    #[diagnostic(
        code(clusterview::no_topology),
        help(
            "Pass --topology <FILE>, set CLUSTERVIEW_TOPOLOGY,\n\
             or set defaults.topology in {path}"
        )
    )]
    NoTopology { path: String },

    #[error("Could not read snapshot: {message}")]
    #[diagnostic(
        code(clusterview::snapshot),
        help(
            "Topology snapshots hold {{\"servers\": [...], \"replicasets\": [...]}}.\n\
             Statistics snapshots hold {{\"serverStat\": [...]}}."
        )
    )]
    Snapshot { message: String },

    // ── Resources ────────────────────────────────────────────────────

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(clusterview::not_found),
        help("Run: clusterview {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("Cluster rejected the operation: {message}")]
    #[diagnostic(code(clusterview::rejected))]
    Rejected { message: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(clusterview::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Config file already exists at {path}")]
    #[diagnostic(code(clusterview::config_exists), help("Use --force to overwrite it."))]
    ConfigExists { path: String },

    #[error(transparent)]
    #[diagnostic(code(clusterview::config))]
    Config(#[from] ConfigError),

    // ── Runtime ──────────────────────────────────────────────────────

    #[error("{0}")]
    #[diagnostic(code(clusterview::core))]
    Core(CoreError),

    // ── IO / Serialization ───────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render output: {0}")]
    Render(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Rejected { .. } | Self::ConfigExists { .. } => exit_code::CONFLICT,
            Self::Validation { .. } | Self::NoTopology { .. } | Self::Config(_) => {
                exit_code::USAGE
            }
            Self::Snapshot { .. } => exit_code::DATA,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Snapshot { message } => CliError::Snapshot { message },

            CoreError::NotFound {
                entity_type,
                identifier,
            } => CliError::NotFound {
                list_command: if entity_type == "server" {
                    "servers".into()
                } else {
                    "show".into()
                },
                resource_type: entity_type,
                identifier,
            },

            CoreError::Rejected { message } => CliError::Rejected { message },

            CoreError::ValidationFailed { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },

            other => CliError::Core(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_map_to_exit_codes() {
        let err = CliError::from(CoreError::Snapshot {
            message: "expected value at line 1".into(),
        });
        assert_eq!(err.exit_code(), exit_code::DATA);

        let err = CliError::from(CoreError::NotFound {
            entity_type: "server".into(),
            identifier: "localhost:3399".into(),
        });
        assert_eq!(err.exit_code(), exit_code::NOT_FOUND);

        let err = CliError::from(CoreError::Internal("boom".into()));
        assert_eq!(err.exit_code(), exit_code::GENERAL);
    }
}

//! Shared configuration for clusterview tools.
//!
//! TOML file plus `CLUSTERVIEW_*` environment overrides, translated into
//! `clusterview_core::ViewConfig` for the controller.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use clusterview_core::ViewConfig;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Output and presentation defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Cluster page behaviour.
    #[serde(default)]
    pub view: ViewSection,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Default topology snapshot, used when `--topology` is not given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topology: Option<PathBuf>,

    /// Default statistics snapshot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<PathBuf>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            topology: None,
            stats: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ViewSection {
    /// Seconds a success message stays visible.
    #[serde(default = "default_message_ttl")]
    pub message_ttl_secs: u64,

    /// Periodic list refresh, 0 disables it.
    #[serde(default)]
    pub refresh_interval_secs: u64,

    #[serde(default = "default_true")]
    pub validate_topology: bool,
}

impl Default for ViewSection {
    fn default() -> Self {
        Self {
            message_ttl_secs: default_message_ttl(),
            refresh_interval_secs: 0,
            validate_topology: true,
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_message_ttl() -> u64 {
    3
}
fn default_true() -> bool {
    true
}

impl Config {
    /// Check values the TOML types cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        const OUTPUTS: &[&str] = &["table", "json", "json-compact", "yaml", "plain"];
        const COLORS: &[&str] = &["auto", "always", "never"];

        if !OUTPUTS.contains(&self.defaults.output.as_str()) {
            return Err(ConfigError::Validation {
                field: "defaults.output".into(),
                reason: format!(
                    "expected one of {}, got '{}'",
                    OUTPUTS.join(", "),
                    self.defaults.output
                ),
            });
        }
        if !COLORS.contains(&self.defaults.color.as_str()) {
            return Err(ConfigError::Validation {
                field: "defaults.color".into(),
                reason: format!(
                    "expected 'auto', 'always', or 'never', got '{}'",
                    self.defaults.color
                ),
            });
        }
        if self.view.message_ttl_secs == 0 {
            return Err(ConfigError::Validation {
                field: "view.message_ttl_secs".into(),
                reason: "must be at least 1 second".into(),
            });
        }
        Ok(())
    }

    /// Runtime configuration for the core controller.
    pub fn to_view_config(&self) -> ViewConfig {
        ViewConfig {
            message_ttl: Duration::from_secs(self.view.message_ttl_secs),
            refresh_interval_secs: self.view.refresh_interval_secs,
            validate_topology: self.view.validate_topology,
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "clusterview", "clusterview").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("clusterview");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file path. A missing file yields the defaults
/// plus any environment overrides.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("CLUSTERVIEW_").split("__"));

    let config: Config = figment.extract()?;
    config.validate()?;
    Ok(config)
}

/// Load config, returning a default if loading fails.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Runtime view configuration ──
//
// Tuning for the controller's background tasks. Never touches disk:
// `clusterview-config` builds a `ViewConfig` and hands it in.

use std::time::Duration;

/// How long a success message stays visible before it is marked done.
pub const DEFAULT_MESSAGE_TTL: Duration = Duration::from_secs(3);

/// Configuration for a [`Controller`](crate::Controller).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewConfig {
    /// Lifetime of success messages. Danger messages never expire.
    pub message_ttl: Duration,
    /// How often to refetch topology and statistics (seconds). 0 = never.
    pub refresh_interval_secs: u64,
    /// Validate replica-set master references on every topology load.
    pub validate_topology: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            message_ttl: DEFAULT_MESSAGE_TTL,
            refresh_interval_secs: 0,
            validate_topology: true,
        }
    }
}

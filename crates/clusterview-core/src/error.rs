// ── Core error types ──
//
// User-facing errors from clusterview-core. Transports translate their own
// failures into these variants; the notification pipeline only needs to
// know whether an error is connectivity-class and what text to show.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Clone, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Server is not reachable at {url}: {reason}")]
    ServerUnreachable { url: String, reason: String },

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Entity not found: {entity_type} {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    #[error("Invalid snapshot: {message}")]
    Snapshot { message: String },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Operation rejected by cluster: {message}")]
    Rejected { message: String },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    #[error("Operation failed: {message}")]
    OperationFailed { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Connectivity-class failures drive the deduplicated
    /// "server is not reachable" message.
    pub fn is_server_unreachable(&self) -> bool {
        matches!(self, Self::ServerUnreachable { .. } | Self::Timeout { .. })
    }

    /// Text shown to the user for a failed request.
    ///
    /// Rejections and validation failures carry backend text that is
    /// already user-facing, so it is shown without the variant prefix.
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected { message } | Self::ValidationFailed { message } => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Snapshot {
            message: err.to_string(),
        }
    }
}

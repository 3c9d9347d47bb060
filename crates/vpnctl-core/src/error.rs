// ── Core error types ──
//
// Errors raised at the edges of the core. Server field validation is
// not an error: it is reported through `AddServerResult` codes.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Boundary errors ──────────────────────────────────────────────
    #[error("Invalid arguments for {channel}.{method}: {reason}")]
    InvalidArgument {
        channel: String,
        method: String,
        reason: String,
    },

    #[error("Method not implemented: {channel}.{method}")]
    NotImplemented { channel: String, method: String },

    #[error("Unknown event channel: {channel}")]
    UnknownEventChannel { channel: String },

    // ── Value errors ─────────────────────────────────────────────────
    #[error("{kind} has no variant with value {value}")]
    UnknownVariant { kind: &'static str, value: i64 },

    #[error("Duplicate {kind} id {id}")]
    DuplicateId { kind: &'static str, id: i64 },

    // ── Runtime errors ───────────────────────────────────────────────
    #[error("No tokio runtime available: {0}")]
    NoRuntime(String),

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Short machine-readable code for transport adapters.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidArgument { .. }
            | Self::UnknownVariant { .. }
            | Self::DuplicateId { .. } => "bad-args",
            Self::NotImplemented { .. } | Self::UnknownEventChannel { .. } => "not-implemented",
            Self::NoRuntime(_) | Self::Internal(_) => "internal",
        }
    }

    pub(crate) fn invalid_argument(channel: &str, method: &str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            channel: channel.into(),
            method: method.into(),
            reason: reason.into(),
        }
    }
}

impl From<tokio::runtime::TryCurrentError> for CoreError {
    fn from(err: tokio::runtime::TryCurrentError) -> Self {
        Self::NoRuntime(err.to_string())
    }
}

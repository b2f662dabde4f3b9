use axum::http::StatusCode;
use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `pageroast`.
///
/// Every component boundary converts its failures into one of these variants.
/// Adapter internals keep using `anyhow::Result` for ad-hoc context chains and
/// are folded in here with a human-readable message before reaching a caller.
#[derive(Debug, Error)]
pub enum RoastError {
    // ── Caller input ────────────────────────────────────────────────────
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    // ── Process configuration ───────────────────────────────────────────
    #[error("configuration: {0}")]
    Configuration(String),

    // ── External collaborators ──────────────────────────────────────────
    #[error("screenshot capture failed: {0}")]
    Capture(String),

    #[error("analysis failed: {0}")]
    Upstream(String),

    #[error("storage failed: {0}")]
    Storage(String),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RoastError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn capture(message: impl Into<String>) -> Self {
        Self::Capture(message.into())
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream(message.into())
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// HTTP status the gateway answers with for this failure.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Configuration(_)
            | Self::Capture(_)
            | Self::Upstream(_)
            | Self::Storage(_)
            | Self::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short stable label used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::NotFound(_) => "not_found",
            Self::Configuration(_) => "configuration",
            Self::Capture(_) => "capture",
            Self::Upstream(_) => "upstream",
            Self::Storage(_) => "storage",
            Self::Other(_) => "internal",
        }
    }
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, RoastError>;

//! Error types for `pagecraft-core`.
//!
//! Each error variant carries enough context to show the user directly:
//! validation errors name the offending field, generation errors tell the user
//! to try again, and storage errors keep the backend's message intact.

use pagecraft_storage::StorageError;

/// User-facing guidance attached to every generation failure.
pub const RETRY_GUIDANCE: &str =
    "AI generation is not always reliable. Please press Generate again to retry.";

/// Errors from theme and color operations.
#[derive(Debug, thiserror::Error)]
pub enum ThemeError {
    /// The color is not a 6-digit hex string.
    #[error("invalid color format '{color}': expected #RRGGBB")]
    InvalidColorFormat { color: String },
}

/// Errors from parsing or normalizing a landing-page config document.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required top-level section is absent or has the wrong shape.
    #[error("config is missing required field '{field}'")]
    MissingField { field: &'static str },

    /// The document does not match the config shape.
    #[error("malformed config: {reason}")]
    Malformed { reason: String },
}

/// Errors from AI config generation.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// The prompt was empty or whitespace.
    #[error("prompt must not be empty")]
    EmptyPrompt,

    /// The external call failed or returned something that is not a valid
    /// config.
    #[error("generation failed: {detail}. {guidance}", guidance = RETRY_GUIDANCE)]
    Failed { detail: String },
}

impl From<ConfigError> for GenerationError {
    fn from(err: ConfigError) -> Self {
        Self::Failed {
            detail: err.to_string(),
        }
    }
}

/// Errors from analytics event and lead capture.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    /// A mandatory field was absent or blank.
    #[error("missing required field '{field}'")]
    MissingField { field: &'static str },

    /// A field was present but not acceptable.
    #[error("invalid field '{field}': {reason}")]
    InvalidField { field: &'static str, reason: String },

    /// The datastore rejected the write. The message is passed through.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors from page management.
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    /// The page does not exist, or is not visible to the caller.
    #[error("page not found: {key}")]
    NotFound { key: String },

    /// A page id or slug was syntactically invalid.
    #[error("invalid page reference: {reason}")]
    InvalidReference { reason: String },

    /// Config generation failed; nothing was persisted.
    #[error(transparent)]
    Generation(#[from] GenerationError),

    /// A submitted config was rejected.
    #[error("invalid config: {0}")]
    Config(#[from] ConfigError),

    /// The datastore returned an error.
    #[error("page storage error: {0}")]
    Storage(#[from] StorageError),
}

//! Rotomdex error types

/// Rotomdex error types
#[derive(Debug, thiserror::Error)]
pub enum DexError {
    // Transport/network errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("resource not found: {0}")]
    NotFound(String),

    // Input errors, caught before any I/O
    #[error("invalid pokemon id: {0}")]
    InvalidId(u32),

    #[error("unknown type tag: {0}")]
    UnknownType(String),

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Persistence errors (favorites file)
    #[error("storage error: {0}")]
    Storage(String),
}

impl DexError {
    /// HTTP status code carried by this error, if any.
    ///
    /// The retry policy uses this to decide whether an error class is
    /// worth retrying; errors without a status (transport failures,
    /// decode failures) are treated as transient.
    pub fn status(&self) -> Option<u16> {
        match self {
            DexError::Api { status, .. } => Some(*status),
            DexError::NotFound(_) => Some(404),
            _ => None,
        }
    }

    /// Whether the remote said the resource does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DexError::NotFound(_))
    }
}

/// Result type alias for Rotomdex operations
pub type Result<T> = std::result::Result<T, DexError>;

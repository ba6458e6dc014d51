use thiserror::Error;

/// Result type alias for mimic operations
pub type Result<T> = std::result::Result<T, MimicError>;

/// Errors that can occur while generating or storing mimic data
#[derive(Error, Debug)]
pub enum MimicError {
    /// DNS mimic requested without a target domain
    #[error("domain is required for DNS mimic")]
    DomainRequired,

    /// DNS name or message could not be encoded
    #[error("DNS encoding error: {0}")]
    Dns(String),

    /// JSON parsing/serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Settings file could not be read or written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MimicError {
    /// Returns true if the error stems from user input and should be shown
    /// to the user rather than retried
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(self, Self::DomainRequired)
    }
}

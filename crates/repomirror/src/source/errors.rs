use thiserror::Error;

/// Errors that can occur while fetching repositories from the remote.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The remote call failed or timed out (network, auth, rate limit).
    #[error("Source unavailable for {owner}: {message}")]
    Unavailable { owner: String, message: String },

    /// The remote call succeeded but returned no repositories.
    #[error("No repositories returned for {owner}")]
    Empty { owner: String },

    /// The client could not be constructed.
    #[error("Client error: {0}")]
    Client(String),
}

impl SourceError {
    /// Create an unavailable error for an owner.
    pub fn unavailable(owner: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Unavailable {
            owner: owner.into(),
            message: message.into(),
        }
    }

    /// Check whether this error reports an empty listing.
    #[inline]
    pub fn is_empty_result(&self) -> bool {
        matches!(self, Self::Empty { .. })
    }
}

/// Result type alias for source operations.
pub type Result<T> = std::result::Result<T, SourceError>;

/// Extract the first line of an error message.
///
/// Remote client errors can carry multi-line bodies; logs and error variants
/// only keep the headline.
#[inline]
pub fn short_error_message(e: &impl std::error::Error) -> String {
    let full = e.to_string();
    full.lines().next().unwrap_or(&full).to_string()
}

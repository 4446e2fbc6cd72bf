//! Error types for GitHub Contents API operations

use thiserror::Error;

/// Result type for GitHub operations
pub type GitHubResult<T> = Result<T, GitHubError>;

/// Errors that can occur while committing a file to GitHub
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GitHubError {
    /// Owner, repository or token missing from server configuration
    #[error("GitHub target not configured, missing: {0}")]
    NotConfigured(String),

    /// GitHub answered with a non-2xx status
    #[error("GitHub responded with {status}: {message}")]
    Upstream {
        /// Upstream HTTP status code
        status: u16,
        /// `message` field of the upstream error body
        message: String,
    },

    /// The request never produced a response (connect, TLS, timeout, bad URL)
    #[error("{0}")]
    Transport(String),

    /// A successful response could not be decoded
    #[error("{0}")]
    Decode(String),
}

impl From<reqwest_middleware::Error> for GitHubError {
    fn from(error: reqwest_middleware::Error) -> Self {
        Self::Transport(error.to_string())
    }
}

impl From<reqwest::Error> for GitHubError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            Self::Decode(error.to_string())
        } else {
            Self::Transport(error.to_string())
        }
    }
}

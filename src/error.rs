//! Error types shared by the content client, proxy and renderers

use thiserror::Error;

/// Errors raised while talking to the content API or rendering its documents
#[derive(Debug, Error)]
pub enum BlogError {
    /// The content API could not be reached
    #[error("content API request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The content API answered with a non-success status
    #[error("content API returned {status}: {body}")]
    Upstream { status: u16, body: String },

    /// The content API answered with a body we could not decode
    #[error("failed to decode content API response: {0}")]
    Decode(#[from] serde_json::Error),

    /// No document exists for the requested uid
    #[error("post not found: {0}")]
    NotFound(String),

    /// A pagination cursor could not be decoded or points somewhere it should not
    #[error("malformed cursor: {0}")]
    MalformedCursor(String),

    /// A document exists but cannot be displayed as a post
    #[error("invalid document {uid}: {reason}")]
    InvalidDocument { uid: String, reason: String },

    /// Site configuration is unusable
    #[error("configuration error: {0}")]
    Config(String),

    #[error("template error: {0}")]
    Template(#[from] tera::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl BlogError {
    /// Whether the error means "there is nothing to show" rather than a failure
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            BlogError::NotFound(_) | BlogError::InvalidDocument { .. }
        )
    }
}

/// Result alias for library operations
pub type Result<T> = std::result::Result<T, BlogError>;

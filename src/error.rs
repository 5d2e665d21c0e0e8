//! Error types for the mailbox-to-ticket pipeline

use thiserror::Error;

/// Errors that can occur while talking to the mail provider or the tracker
#[derive(Error, Debug)]
pub enum Error {
    /// Neither the password grant nor the client-credentials grant produced a token
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Transport-level HTTP failure
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Mail provider rejected a request
    #[error("mail provider returned {status} during {operation}")]
    Provider { operation: String, status: u16 },

    /// Issue tracker rejected a request
    #[error("issue tracker returned {status} during {operation}")]
    Tracker { operation: String, status: u16 },

    /// Watched folder is missing from the mailbox
    #[error("mail folder not found: {0}")]
    FolderNotFound(String),

    /// Collaborator API returned a payload missing an expected field
    #[error("unexpected response shape: {0}")]
    Response(String),

    /// Confirmation template failed to render
    #[error("template rendering failed: {0}")]
    Template(#[from] tera::Error),
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

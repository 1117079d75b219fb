//! Server error types.

use thiserror::Error;

use crate::domain::{NotificationError, RepositoryError};

/// Failures that stop the server process.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("notification bus failed: {0}")]
    Subscription(#[from] NotificationError),
}

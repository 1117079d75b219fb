//! Use case error types.

use thiserror::Error;

use crate::domain::{NotificationError, RepositoryError};

/// A client command or timer that could not take effect.
///
/// Race losses are not errors; see the outcome enums returned by the use cases.
#[derive(Debug, Error)]
pub enum GameCommandError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Notification(#[from] NotificationError),
}

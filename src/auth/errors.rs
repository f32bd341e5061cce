//! Error types for the session holders.

use thiserror::Error;

use crate::clients::HttpError;
use crate::storage::StorageError;

/// Errors returned by [`UserSession`](crate::UserSession) and
/// [`AdminSession`](crate::AdminSession).
#[derive(Debug, Error)]
pub enum AuthError {
    /// Input rejected before any request was made.
    #[error("{0}")]
    InvalidInput(String),

    /// The login or registration response had no token.
    #[error("No authentication token received")]
    MissingToken,

    /// The login or registration response had no profile.
    #[error("No {kind} data received")]
    MissingProfile {
        /// `user` or `admin`.
        kind: &'static str,
    },

    /// The response did not have the expected shape.
    #[error("Invalid response format from server")]
    UnexpectedResponse,

    /// The operation needs a signed-in session.
    #[error("You must be logged in to do that")]
    NotAuthenticated,

    /// The request failed.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// Reading or writing the stored token failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl AuthError {
    /// Returns the text to show the user for this error.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Http(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}

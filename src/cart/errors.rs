use thiserror::Error;

use crate::clients::HttpError;
use crate::storage::StorageError;

/// Errors returned by [`Cart`](super::Cart) operations.
///
/// Whatever the error, the cart's lines are what they were before the call.
/// The one exception is a 401, after which the cart is back in guest mode.
#[derive(Debug, Error)]
pub enum CartError {
    /// The product id was empty.
    #[error("Invalid product ID")]
    InvalidProduct,

    /// The backend request failed.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// The guest cart could not be persisted.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl CartError {
    /// Returns `true` if the backend rejected the customer's token and the
    /// customer has to sign in again.
    #[must_use]
    pub const fn requires_login(&self) -> bool {
        matches!(self, Self::Http(e) if e.is_unauthorized())
    }

    /// Returns the text to show the user for this error.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Http(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}

//! HTTP-specific error types for the storefront SDK.
//!
//! This module contains error types for HTTP operations, including response
//! errors, authentication and validation failures, and request validation.
//!
//! # Error Handling
//!
//! The SDK distinguishes the failure kinds a caller reacts to differently:
//!
//! - [`HttpError::Network`]: no response at all; show a generic "no response" notice
//! - [`HttpError::Unauthorized`]: 401; the realm's token has already been cleared
//! - [`HttpError::Validation`]: 400/422 with a server message and optional field errors
//! - [`HttpError::Response`]: any other non-2xx response
//! - [`HttpError::Decode`]: a 2xx body that does not have the expected shape
//!
//! # Example
//!
//! ```rust,ignore
//! use storefront_sdk::clients::HttpError;
//!
//! match client.get("/api/products").await {
//!     Ok(response) => println!("{}", response.body),
//!     Err(HttpError::Validation { message, fields, .. }) => {
//!         for (field, errors) in fields {
//!             println!("{field}: {}", errors.join(", "));
//!         }
//!         println!("{message}");
//!     }
//!     Err(e) => println!("{}", e.user_message()),
//! }
//! ```

use std::collections::HashMap;

use thiserror::Error;

use crate::auth::AuthRealm;
use crate::storage::StorageError;

/// Message used when the server gives no `message` or `error` field.
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred";

/// Notice shown when a request never received a response.
pub const NO_RESPONSE_MESSAGE: &str = "No response from server. Please check your connection.";

/// Error returned when an HTTP request receives a non-successful response.
///
/// # Example
///
/// ```rust
/// use storefront_sdk::clients::HttpResponseError;
///
/// let error = HttpResponseError {
///     code: 404,
///     message: "Product not found".to_string(),
/// };
///
/// assert_eq!(error.to_string(), "Product not found");
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct HttpResponseError {
    /// The HTTP status code of the response.
    pub code: u16,
    /// The server-supplied message, or [`GENERIC_ERROR_MESSAGE`].
    pub message: String,
}

/// Error returned when an HTTP request fails validation before it is sent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// A POST, PUT or PATCH request was made without a body.
    #[error("Cannot use {method} without specifying data.")]
    MissingBody {
        /// The HTTP method that requires a body.
        method: String,
    },

    /// The request path is not absolute.
    #[error("Request path '{path}' must start with '/'.")]
    RelativePath {
        /// The rejected path.
        path: String,
    },

    /// A required text field was blank.
    #[error("{field} cannot be empty.")]
    BlankField {
        /// The field that was blank.
        field: &'static str,
    },
}

/// Unified error type for all HTTP-related errors.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Network or connection error; the server never answered.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered 401. The realm's stored token has been removed.
    #[error("Unauthorized ({realm}): {message}")]
    Unauthorized {
        /// The realm whose token was rejected.
        realm: AuthRealm,
        /// The server-supplied message.
        message: String,
    },

    /// The server rejected the input (400 or 422).
    #[error("{message}")]
    Validation {
        /// The HTTP status code (400 or 422).
        code: u16,
        /// The server-supplied message.
        message: String,
        /// Field-level messages, keyed by field name.
        fields: HashMap<String, Vec<String>>,
    },

    /// Any other non-2xx response.
    #[error(transparent)]
    Response(#[from] HttpResponseError),

    /// A successful response body did not match the expected shape.
    #[error("Unexpected response body from {path}: {source}")]
    Decode {
        /// The request path.
        path: String,
        /// The underlying decoding error.
        #[source]
        source: serde_json::Error,
    },

    /// Request validation failed.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidHttpRequestError),

    /// Reading or clearing a stored token failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl HttpError {
    /// Returns the HTTP status code, if the server answered.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::Validation { code, .. } => Some(*code),
            Self::Response(e) => Some(e.code),
            _ => None,
        }
    }

    /// Returns `true` for a 401 response.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Returns the text to show the user for this error.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(_) => NO_RESPONSE_MESSAGE.to_string(),
            Self::Unauthorized { message, .. } | Self::Validation { message, .. } => {
                message.clone()
            }
            Self::Response(e) => e.message.clone(),
            Self::Decode { .. } => "Unexpected response from server".to_string(),
            Self::InvalidRequest(_) => {
                "An error occurred while setting up the request.".to_string()
            }
            Self::Storage(e) => e.to_string(),
        }
    }
}

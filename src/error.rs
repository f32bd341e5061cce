//! Error types for SDK configuration.
//!
//! This module contains the error type used when building a
//! [`StorefrontConfig`](crate::StorefrontConfig) or constructing one of the
//! validated newtypes.
//!
//! # Error Handling
//!
//! All configuration constructors return `Result<T, ConfigError>` to enable
//! fail-fast validation. Error messages are designed to be clear and actionable.
//!
//! # Example
//!
//! ```rust
//! use storefront_sdk::{ApiBaseUrl, ConfigError};
//!
//! let result = ApiBaseUrl::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyBaseUrl)));
//! ```

use thiserror::Error;

/// Errors that can occur during SDK configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// API base URL cannot be empty.
    #[error("API base URL cannot be empty. Please provide the storefront API origin (e.g., 'http://localhost:5000').")]
    EmptyBaseUrl,

    /// API base URL is malformed.
    #[error("Invalid base URL '{url}'. Expected an http or https URL such as 'https://shop.example.com'.")]
    InvalidBaseUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// Email address is malformed.
    #[error("Invalid email address '{email}'.")]
    InvalidEmail {
        /// The invalid email that was provided.
        email: String,
    },

    /// Tax rate is outside `0..=1`.
    #[error("Invalid tax rate '{rate}'. Expected a fraction between 0 and 1.")]
    InvalidTaxRate {
        /// The rejected rate, formatted.
        rate: String,
    },

    /// The default variant label cannot be empty.
    #[error("Default variant label cannot be empty.")]
    EmptyVariant,

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_base_url_error_message() {
        let error = ConfigError::InvalidBaseUrl {
            url: "ftp://nope".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("ftp://nope"));
        assert!(message.contains("http or https"));
    }

    #[test]
    fn test_missing_required_field_error_message() {
        let error = ConfigError::MissingRequiredField {
            field: "api_base_url",
        };
        let message = error.to_string();
        assert!(message.contains("api_base_url"));
        assert!(message.contains("must be set"));
    }

    #[test]
    fn test_error_implements_std_error() {
        let error = ConfigError::EmptyBaseUrl;
        let _: &dyn std::error::Error = &error;
    }
}

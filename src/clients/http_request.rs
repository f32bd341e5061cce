//! HTTP request types for the storefront SDK.
//!
//! This module provides the [`HttpRequest`] type and its builder for
//! constructing requests to the storefront API.

use std::collections::HashMap;
use std::fmt;

use crate::auth::AuthRealm;
use crate::clients::errors::InvalidHttpRequestError;

/// HTTP methods used by the storefront API.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    /// HTTP GET method for retrieving resources.
    Get,
    /// HTTP POST method for creating resources.
    Post,
    /// HTTP PUT method for replacing resources.
    Put,
    /// HTTP PATCH method for partial updates.
    Patch,
    /// HTTP DELETE method for removing resources.
    Delete,
}

impl HttpMethod {
    /// Returns `true` for methods that must carry a body.
    #[must_use]
    pub const fn requires_body(self) -> bool {
        matches!(self, Self::Post | Self::Put | Self::Patch)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "get"),
            Self::Post => write!(f, "post"),
            Self::Put => write!(f, "put"),
            Self::Patch => write!(f, "patch"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// An HTTP request to be sent to the storefront API.
///
/// Bodies are always JSON. Paths are absolute (`/api/...`) and appended to
/// the configured origin.
///
/// # Example
///
/// ```rust
/// use storefront_sdk::clients::{HttpRequest, HttpMethod};
/// use serde_json::json;
///
/// let get_request = HttpRequest::builder(HttpMethod::Get, "/api/blogs")
///     .query_param("page", "1")
///     .query_param("limit", "9")
///     .build()
///     .unwrap();
///
/// let post_request = HttpRequest::builder(HttpMethod::Post, "/api/cart")
///     .body(json!({"product": "p1", "quantity": 1, "size": "M"}))
///     .build()
///     .unwrap();
/// ```
#[derive(Clone, Debug)]
pub struct HttpRequest {
    /// The HTTP method for this request.
    pub http_method: HttpMethod,
    /// The absolute path for this request.
    pub path: String,
    /// The JSON request body, if any.
    pub body: Option<serde_json::Value>,
    /// Query parameters, in the order they were added.
    pub query: Vec<(String, String)>,
    /// Additional headers to include in the request.
    pub extra_headers: Option<HashMap<String, String>>,
    /// Forces the authentication realm instead of deriving it from the path.
    pub realm: Option<AuthRealm>,
}

impl HttpRequest {
    /// Creates a new builder for constructing an `HttpRequest`.
    #[must_use]
    pub fn builder(method: HttpMethod, path: impl Into<String>) -> HttpRequestBuilder {
        HttpRequestBuilder::new(method, path)
    }

    /// Validates the request, ensuring it meets all requirements.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError`] if:
    /// - `path` does not start with `/`
    /// - `http_method` is `Post`, `Put` or `Patch` but `body` is `None`
    pub fn verify(&self) -> Result<(), InvalidHttpRequestError> {
        if !self.path.starts_with('/') {
            return Err(InvalidHttpRequestError::RelativePath {
                path: self.path.clone(),
            });
        }

        if self.http_method.requires_body() && self.body.is_none() {
            return Err(InvalidHttpRequestError::MissingBody {
                method: self.http_method.to_string(),
            });
        }

        Ok(())
    }
}

/// Builder for constructing [`HttpRequest`] instances.
#[derive(Debug)]
pub struct HttpRequestBuilder {
    http_method: HttpMethod,
    path: String,
    body: Option<serde_json::Value>,
    query: Vec<(String, String)>,
    extra_headers: Option<HashMap<String, String>>,
    realm: Option<AuthRealm>,
}

impl HttpRequestBuilder {
    fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            http_method: method,
            path: path.into(),
            body: None,
            query: Vec::new(),
            extra_headers: None,
            realm: None,
        }
    }

    /// Sets the JSON request body.
    #[must_use]
    pub fn body(mut self, body: impl Into<serde_json::Value>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Adds a single query parameter.
    #[must_use]
    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Adds a single extra header.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Sends the request with the given realm's token regardless of its path.
    #[must_use]
    pub const fn realm(mut self, realm: AuthRealm) -> Self {
        self.realm = Some(realm);
        self
    }

    /// Builds the [`HttpRequest`], validating it in the process.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError`] if the request fails validation.
    pub fn build(self) -> Result<HttpRequest, InvalidHttpRequestError> {
        let request = HttpRequest {
            http_method: self.http_method,
            path: self.path,
            body: self.body,
            query: self.query,
            extra_headers: self.extra_headers,
            realm: self.realm,
        };
        request.verify()?;
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_request_without_body() {
        let request = HttpRequest::builder(HttpMethod::Get, "/api/products")
            .build()
            .unwrap();
        assert_eq!(request.http_method, HttpMethod::Get);
        assert!(request.body.is_none());
        assert!(request.realm.is_none());
    }

    #[test]
    fn test_methods_requiring_body_are_rejected_without_one() {
        for method in [HttpMethod::Post, HttpMethod::Put, HttpMethod::Patch] {
            let result = HttpRequest::builder(method, "/api/cart").build();
            assert!(matches!(
                result,
                Err(InvalidHttpRequestError::MissingBody { .. })
            ));
        }
    }

    #[test]
    fn test_delete_without_body_is_valid() {
        assert!(HttpRequest::builder(HttpMethod::Delete, "/api/cart")
            .build()
            .is_ok());
    }

    #[test]
    fn test_relative_path_is_rejected() {
        let result = HttpRequest::builder(HttpMethod::Get, "api/products").build();
        assert!(matches!(
            result,
            Err(InvalidHttpRequestError::RelativePath { .. })
        ));
    }

    #[test]
    fn test_query_params_keep_insertion_order() {
        let request = HttpRequest::builder(HttpMethod::Get, "/api/blogs")
            .query_param("page", "2")
            .query_param("limit", "9")
            .query_param("status", "published")
            .build()
            .unwrap();

        let keys: Vec<&str> = request.query.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["page", "limit", "status"]);
    }

    #[test]
    fn test_realm_override_and_headers() {
        let request = HttpRequest::builder(HttpMethod::Patch, "/api/orders/o1")
            .body(json!({"status": "shipped"}))
            .header("X-Trace", "1")
            .realm(AuthRealm::Admin)
            .build()
            .unwrap();

        assert_eq!(request.realm, Some(AuthRealm::Admin));
        assert_eq!(
            request.extra_headers.unwrap().get("X-Trace"),
            Some(&"1".to_string())
        );
    }

    #[test]
    fn test_method_display() {
        assert_eq!(HttpMethod::Patch.to_string(), "patch");
        assert_eq!(HttpMethod::Delete.to_string(), "delete");
    }
}

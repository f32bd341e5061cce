//! HTTP client for storefront API communication.
//!
//! This module provides the [`HttpClient`] type for making authenticated
//! requests to the storefront API. It picks the bearer token for each request,
//! clears a rejected token on 401 and turns error bodies into [`HttpError`].

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use serde_json::Value;

use crate::auth::AuthRealm;
use crate::clients::errors::{HttpError, HttpResponseError};
use crate::clients::http_request::{HttpMethod, HttpRequest};
use crate::clients::http_response::HttpResponse;
use crate::config::{ApiBaseUrl, StorefrontConfig};
use crate::storage::{KeyValueStore, StorageError};

/// SDK version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// HTTP client for making requests to the storefront API.
///
/// The client handles:
/// - URL construction from the configured origin
/// - Default headers including User-Agent and Accept
/// - Bearer token selection between the user and admin realms
/// - Clearing the realm's token when the server answers 401
/// - Error message extraction from `message` or `error`
///
/// Tokens are read from the shared [`KeyValueStore`] on every request, so a
/// login or logout through a session holder takes effect immediately.
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use storefront_sdk::{HttpClient, StorefrontConfig};
/// use storefront_sdk::storage::MemoryStore;
///
/// let config = StorefrontConfig::from_env()?;
/// let client = HttpClient::new(&config, Arc::new(MemoryStore::new()))?;
///
/// let response = client.get("/api/products").await?;
/// ```
#[derive(Debug)]
pub struct HttpClient {
    /// The internal reqwest HTTP client.
    client: reqwest::Client,
    /// API origin (e.g., `http://localhost:5000`).
    base_url: ApiBaseUrl,
    /// Default headers to include in all requests.
    default_headers: HashMap<String, String>,
    /// Where bearer tokens are kept.
    store: Arc<dyn KeyValueStore>,
    /// The route the caller is currently showing.
    current_route: RwLock<String>,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] if the underlying reqwest client cannot
    /// be created (for example, TLS initialization failure).
    pub fn new(config: &StorefrontConfig, store: Arc<dyn KeyValueStore>) -> Result<Self, HttpError> {
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let rust_version = env!("CARGO_PKG_RUST_VERSION");
        let user_agent =
            format!("{user_agent_prefix}Storefront SDK v{SDK_VERSION} | Rust {rust_version}");

        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);
        default_headers.insert("Accept".to_string(), "application/json".to_string());

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_base_url().clone(),
            default_headers,
            store,
            current_route: RwLock::new("/".to_string()),
        })
    }

    /// Returns the API origin for this client.
    #[must_use]
    pub const fn base_url(&self) -> &ApiBaseUrl {
        &self.base_url
    }

    /// Returns the default headers for this client.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Returns the store holding bearer tokens and other client state.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    /// Records the route the caller is currently showing.
    ///
    /// Requests made while on an `/admin` route use the admin token.
    pub fn set_current_route(&self, route: impl Into<String>) {
        *self
            .current_route
            .write()
            .unwrap_or_else(PoisonError::into_inner) = route.into();
    }

    /// Returns the route last passed to [`set_current_route`](Self::set_current_route).
    #[must_use]
    pub fn current_route(&self) -> String {
        self.current_route
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the stored bearer token for `realm`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the store cannot be read.
    pub fn token(&self, realm: AuthRealm) -> Result<Option<String>, StorageError> {
        Ok(self
            .store
            .get(realm.token_key())?
            .filter(|token| !token.trim().is_empty()))
    }

    /// Stores the bearer token for `realm`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the store cannot be written.
    pub fn set_token(&self, realm: AuthRealm, token: &str) -> Result<(), StorageError> {
        self.store.set(realm.token_key(), token)
    }

    /// Removes the bearer token for `realm`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the store cannot be written.
    pub fn clear_token(&self, realm: AuthRealm) -> Result<(), StorageError> {
        self.store.remove(realm.token_key())
    }

    /// Returns the realm a request will authenticate as.
    #[must_use]
    pub fn realm_for(&self, request: &HttpRequest) -> AuthRealm {
        request
            .realm
            .unwrap_or_else(|| AuthRealm::for_request(&request.path, &self.current_route()))
    }

    /// Sends an HTTP request to the storefront API.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if:
    /// - Request validation fails (`InvalidRequest`)
    /// - No response is received (`Network`)
    /// - The server answers 401 (`Unauthorized`); the realm's token is removed
    /// - The server answers 400 or 422 (`Validation`)
    /// - Any other non-2xx response is received (`Response`)
    pub async fn request(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        request.verify()?;

        let url = self.base_url.join(&request.path);
        let realm = self.realm_for(&request);

        let mut headers = self.default_headers.clone();
        if request.body.is_some() {
            headers.insert("Content-Type".to_string(), "application/json".to_string());
        }
        if let Some(token) = self.token(realm)? {
            headers.insert("Authorization".to_string(), format!("Bearer {token}"));
        }
        if let Some(extra) = &request.extra_headers {
            for (key, value) in extra {
                headers.insert(key.clone(), value.clone());
            }
        }

        let mut req_builder = match request.http_method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
            HttpMethod::Put => self.client.put(&url),
            HttpMethod::Patch => self.client.patch(&url),
            HttpMethod::Delete => self.client.delete(&url),
        };

        for (key, value) in &headers {
            req_builder = req_builder.header(key, value);
        }
        if !request.query.is_empty() {
            req_builder = req_builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            req_builder = req_builder.body(body.to_string());
        }

        let res = match req_builder.send().await {
            Ok(res) => res,
            Err(err) => {
                tracing::error!(
                    method = %request.http_method,
                    path = %request.path,
                    error = %err,
                    "No response from storefront API"
                );
                return Err(HttpError::Network(err));
            }
        };

        let code = res.status().as_u16();
        let res_headers = Self::parse_response_headers(res.headers());
        let body_text = res.text().await.unwrap_or_default();

        let body = if body_text.trim().is_empty() {
            serde_json::json!({})
        } else {
            serde_json::from_str(&body_text).unwrap_or_else(|_| {
                if code >= 500 {
                    serde_json::json!({ "raw_body": body_text })
                } else {
                    serde_json::json!({})
                }
            })
        };

        let response = HttpResponse::new(code, res_headers, body, request.path.clone());

        if response.is_ok() {
            tracing::debug!(
                method = %request.http_method,
                path = %request.path,
                status = code,
                "Storefront API request succeeded"
            );
            return Ok(response);
        }

        let message = response.message();
        tracing::warn!(
            method = %request.http_method,
            path = %request.path,
            status = code,
            %realm,
            "Storefront API request failed: {message}"
        );

        match code {
            401 => {
                if let Err(err) = self.clear_token(realm) {
                    tracing::error!(%realm, error = %err, "Failed to clear rejected token");
                }
                Err(HttpError::Unauthorized { realm, message })
            }
            400 | 422 => Err(HttpError::Validation {
                code,
                message,
                fields: response.field_errors(),
            }),
            _ => Err(HttpError::Response(HttpResponseError { code, message })),
        }
    }

    /// Sends a GET request.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn get(&self, path: &str) -> Result<HttpResponse, HttpError> {
        self.get_with_query(path, &[]).await
    }

    /// Sends a GET request with query parameters.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn get_with_query(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<HttpResponse, HttpError> {
        let builder = query.iter().fold(
            HttpRequest::builder(HttpMethod::Get, path),
            |builder, (key, value)| builder.query_param(*key, *value),
        );
        self.request(builder.build()?).await
    }

    /// Sends a POST request with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn post(&self, path: &str, body: Value) -> Result<HttpResponse, HttpError> {
        self.send_with_body(HttpMethod::Post, path, body).await
    }

    /// Sends a PUT request with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn put(&self, path: &str, body: Value) -> Result<HttpResponse, HttpError> {
        self.send_with_body(HttpMethod::Put, path, body).await
    }

    /// Sends a PATCH request with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn patch(&self, path: &str, body: Value) -> Result<HttpResponse, HttpError> {
        self.send_with_body(HttpMethod::Patch, path, body).await
    }

    /// Sends a DELETE request.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn delete(&self, path: &str) -> Result<HttpResponse, HttpError> {
        let request = HttpRequest::builder(HttpMethod::Delete, path).build()?;
        self.request(request).await
    }

    async fn send_with_body(
        &self,
        method: HttpMethod,
        path: &str,
        body: Value,
    ) -> Result<HttpResponse, HttpError> {
        let request = HttpRequest::builder(method, path).body(body).build()?;
        self.request(request).await
    }

    /// Parses response headers into a `HashMap`.
    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }
}

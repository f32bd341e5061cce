//! # Storefront SDK
//!
//! A Rust client for a storefront and admin back-office REST API: typed
//! configuration, customer and administrator sessions, a cart that survives
//! signing in, a checkout wizard and a product catalog with debounced search.
//!
//! ## Overview
//!
//! This SDK provides:
//! - Type-safe configuration via [`StorefrontConfig`] and [`StorefrontConfigBuilder`]
//! - An async [`HttpClient`] that picks the customer or admin bearer token per
//!   request and turns error bodies into [`HttpError`]
//! - Explicit session objects, [`UserSession`] and [`AdminSession`]
//! - A [`Cart`](cart::Cart) that lives in local storage for guests and on the
//!   server for customers, merging the two on sign-in
//! - A three-stage [`CheckoutWizard`](checkout::CheckoutWizard)
//! - A product [`Catalog`](shop::Catalog) with a [`SearchDebouncer`](shop::SearchDebouncer)
//! - Typed endpoint wrappers for orders, blogs and admin resources in [`api`]
//!
//! ## Quick Start
//!
//! ```rust
//! use storefront_sdk::{ApiBaseUrl, StorefrontConfig};
//!
//! let config = StorefrontConfig::builder()
//!     .api_base_url(ApiBaseUrl::new("http://localhost:5000").unwrap())
//!     .user_agent_prefix("MyShop/1.0")
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.default_variant(), "M");
//! ```
//!
//! ## Wiring it together
//!
//! Local state (tokens, the guest cart, the checkout hand-off) lives in a
//! [`KeyValueStore`](storage::KeyValueStore). User-facing notices go to a
//! [`Notifier`](notify::Notifier). Both are shared by every container.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use storefront_sdk::{HttpClient, StorefrontConfig, UserSession};
//! use storefront_sdk::cart::Cart;
//! use storefront_sdk::notify::TracingNotifier;
//! use storefront_sdk::storage::JsonFileStore;
//!
//! let config = StorefrontConfig::from_env()?;
//! let store = Arc::new(JsonFileStore::open("storefront.json")?);
//! let client = Arc::new(HttpClient::new(&config, store)?);
//! let notifier = Arc::new(TracingNotifier);
//!
//! let mut session = UserSession::new(client.clone(), notifier.clone());
//! session.check_auth().await;
//!
//! let mut cart = Cart::new(client.clone(), notifier.clone(), &config);
//! cart.sync_session(&session).await?;
//! ```
//!
//! ## Logging
//!
//! The SDK logs through [`tracing`] and never installs a subscriber.
//! Failed requests are logged at `warn`, network failures at `error`.
//!
//! ## Design Principles
//!
//! - **No global state**: configuration and sessions are passed explicitly
//! - **Fail-fast validation**: all newtypes validate on construction
//! - **Unchanged on failure**: a failed request never alters container state
//! - **Async-first**: designed for use with the Tokio runtime

pub mod api;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod notify;
pub mod shop;
pub mod storage;

// Re-export public types at crate root for convenience
pub use auth::{AdminSession, AuthError, AuthRealm, BearerToken, UserSession};
pub use config::{ApiBaseUrl, Email, StorefrontConfig, StorefrontConfigBuilder};
pub use error::ConfigError;

// Re-export HTTP client types
pub use clients::{
    HttpClient, HttpError, HttpMethod, HttpRequest, HttpRequestBuilder, HttpResponse,
    HttpResponseError, InvalidHttpRequestError,
};

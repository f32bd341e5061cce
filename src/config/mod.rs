//! Configuration types for the storefront SDK.
//!
//! This module provides the configuration used to build the API client and
//! the state containers.
//!
//! # Overview
//!
//! - [`StorefrontConfig`]: The main configuration struct holding all SDK settings
//! - [`StorefrontConfigBuilder`]: A builder for constructing [`StorefrontConfig`] instances
//! - [`ApiBaseUrl`]: A validated API origin
//! - [`Email`]: A validated email address
//!
//! # Example
//!
//! ```rust
//! use storefront_sdk::{ApiBaseUrl, StorefrontConfig};
//! use std::time::Duration;
//!
//! let config = StorefrontConfig::builder()
//!     .api_base_url(ApiBaseUrl::new("https://shop.example.com").unwrap())
//!     .request_timeout(Duration::from_secs(10))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.asset_host().as_ref(), "https://shop.example.com");
//! ```

mod newtypes;

pub use newtypes::{ApiBaseUrl, Email};

use std::time::Duration;

use rust_decimal::Decimal;

use crate::error::ConfigError;

/// Environment variable holding the API origin.
pub const API_URL_ENV: &str = "STOREFRONT_API_URL";

/// Environment variable holding the host that relative image paths resolve against.
pub const ASSET_HOST_ENV: &str = "STOREFRONT_ASSET_HOST";

/// Origin used by [`StorefrontConfig::from_env`] when no URL is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Configuration for the storefront SDK.
///
/// # Thread Safety
///
/// `StorefrontConfig` is `Clone`, `Send`, and `Sync`.
#[derive(Clone, Debug)]
pub struct StorefrontConfig {
    api_base_url: ApiBaseUrl,
    asset_host: Option<ApiBaseUrl>,
    user_agent_prefix: Option<String>,
    request_timeout: Duration,
    search_debounce: Duration,
    tax_rate: Decimal,
    delivery_fee: Decimal,
    default_variant: String,
}

impl StorefrontConfig {
    /// Creates a new builder for constructing a `StorefrontConfig`.
    #[must_use]
    pub fn builder() -> StorefrontConfigBuilder {
        StorefrontConfigBuilder::new()
    }

    /// Builds a configuration from `STOREFRONT_API_URL` and
    /// `STOREFRONT_ASSET_HOST`, with defaults for everything else.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if either variable holds an invalid URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_url = std::env::var(API_URL_ENV).unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let mut builder = Self::builder().api_base_url(ApiBaseUrl::new(api_url)?);

        if let Ok(asset_host) = std::env::var(ASSET_HOST_ENV) {
            builder = builder.asset_host(ApiBaseUrl::new(asset_host)?);
        }

        builder.build()
    }

    /// Returns the API origin.
    #[must_use]
    pub const fn api_base_url(&self) -> &ApiBaseUrl {
        &self.api_base_url
    }

    /// Returns the host relative image paths are resolved against.
    ///
    /// Falls back to the API origin when no asset host is configured.
    #[must_use]
    pub fn asset_host(&self) -> &ApiBaseUrl {
        self.asset_host.as_ref().unwrap_or(&self.api_base_url)
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }

    /// Returns the per-request timeout.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Returns the search-as-you-type debounce interval.
    #[must_use]
    pub const fn search_debounce(&self) -> Duration {
        self.search_debounce
    }

    /// Returns the tax rate applied at checkout, as a fraction.
    #[must_use]
    pub const fn tax_rate(&self) -> Decimal {
        self.tax_rate
    }

    /// Returns the flat delivery fee shown on the cart page.
    #[must_use]
    pub const fn delivery_fee(&self) -> Decimal {
        self.delivery_fee
    }

    /// Returns the variant label used when an item is added without one.
    #[must_use]
    pub fn default_variant(&self) -> &str {
        &self.default_variant
    }
}

// Verify StorefrontConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<StorefrontConfig>();
};

/// Builder for constructing [`StorefrontConfig`] instances.
///
/// `api_base_url` is required. All other fields have defaults.
///
/// # Defaults
///
/// - `asset_host`: the API origin
/// - `request_timeout`: 30 seconds
/// - `search_debounce`: 300 milliseconds
/// - `tax_rate`: 10%
/// - `delivery_fee`: 10
/// - `default_variant`: `"M"`
#[derive(Debug, Default)]
pub struct StorefrontConfigBuilder {
    api_base_url: Option<ApiBaseUrl>,
    asset_host: Option<ApiBaseUrl>,
    user_agent_prefix: Option<String>,
    request_timeout: Option<Duration>,
    search_debounce: Option<Duration>,
    tax_rate: Option<Decimal>,
    delivery_fee: Option<Decimal>,
    default_variant: Option<String>,
}

impl StorefrontConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API origin (required).
    #[must_use]
    pub fn api_base_url(mut self, url: ApiBaseUrl) -> Self {
        self.api_base_url = Some(url);
        self
    }

    /// Sets the host that relative image paths resolve against.
    #[must_use]
    pub fn asset_host(mut self, host: ApiBaseUrl) -> Self {
        self.asset_host = Some(host);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub const fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Sets the search debounce interval.
    #[must_use]
    pub const fn search_debounce(mut self, interval: Duration) -> Self {
        self.search_debounce = Some(interval);
        self
    }

    /// Sets the checkout tax rate as a fraction (e.g. `0.1` for 10%).
    #[must_use]
    pub const fn tax_rate(mut self, rate: Decimal) -> Self {
        self.tax_rate = Some(rate);
        self
    }

    /// Sets the flat delivery fee.
    #[must_use]
    pub const fn delivery_fee(mut self, fee: Decimal) -> Self {
        self.delivery_fee = Some(fee);
        self
    }

    /// Sets the variant label used when none is given.
    #[must_use]
    pub fn default_variant(mut self, variant: impl Into<String>) -> Self {
        self.default_variant = Some(variant.into());
        self
    }

    /// Builds the [`StorefrontConfig`], validating it in the process.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `api_base_url` is not
    /// set, [`ConfigError::InvalidTaxRate`] for a rate outside `0..=1`, and
    /// [`ConfigError::EmptyVariant`] for a blank default variant.
    pub fn build(self) -> Result<StorefrontConfig, ConfigError> {
        let api_base_url = self
            .api_base_url
            .ok_or(ConfigError::MissingRequiredField {
                field: "api_base_url",
            })?;

        let tax_rate = self.tax_rate.unwrap_or_else(|| Decimal::new(10, 2));
        if tax_rate.is_sign_negative() || tax_rate > Decimal::ONE {
            return Err(ConfigError::InvalidTaxRate {
                rate: tax_rate.to_string(),
            });
        }

        let default_variant = self.default_variant.unwrap_or_else(|| "M".to_string());
        if default_variant.trim().is_empty() {
            return Err(ConfigError::EmptyVariant);
        }

        Ok(StorefrontConfig {
            api_base_url,
            asset_host: self.asset_host,
            user_agent_prefix: self.user_agent_prefix,
            request_timeout: self.request_timeout.unwrap_or(Duration::from_secs(30)),
            search_debounce: self.search_debounce.unwrap_or(Duration::from_millis(300)),
            tax_rate,
            delivery_fee: self.delivery_fee.unwrap_or_else(|| Decimal::from(10)),
            default_variant,
        })
    }
}

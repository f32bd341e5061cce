//! The product catalog container.
//!
//! [`Catalog`] holds the product list shown on the shop pages, resolves
//! product image references against the asset host, and filters locally for
//! search-as-you-type. [`SearchDebouncer`] decides when a typed term is
//! worth searching for.
//!
//! # Example
//!
//! ```rust,ignore
//! use storefront_sdk::shop::Catalog;
//!
//! let mut catalog = Catalog::new(client.clone(), &config);
//! catalog.fetch_products().await?;
//!
//! let mut debouncer = catalog.search_debouncer();
//! let mut settled = debouncer.subscribe();
//! debouncer.input("linen");
//!
//! settled.changed().await?;
//! let term = settled.borrow().clone().unwrap_or_default();
//! let hits = catalog.search(&term);
//! ```

mod debounce;

pub use debounce::SearchDebouncer;

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;

use crate::api;
use crate::clients::HttpError;
use crate::config::{ApiBaseUrl, StorefrontConfig};
use crate::models::Product;
use crate::HttpClient;

/// Currency symbol prices are shown with.
pub const CURRENCY: &str = "$";

/// Holds the product list and its loading state.
#[derive(Debug)]
pub struct Catalog {
    client: Arc<HttpClient>,
    asset_host: ApiBaseUrl,
    delivery_fee: Decimal,
    search_debounce: Duration,
    products: Vec<Product>,
    loading: bool,
    error: Option<String>,
}

impl Catalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new(client: Arc<HttpClient>, config: &StorefrontConfig) -> Self {
        Self {
            client,
            asset_host: config.asset_host().clone(),
            delivery_fee: config.delivery_fee(),
            search_debounce: config.search_debounce(),
            products: Vec::new(),
            loading: false,
            error: None,
        }
    }

    /// Returns the loaded products.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Returns `true` while products are being fetched.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Returns the message of the last failed fetch.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Returns the flat delivery fee shown on the cart page.
    #[must_use]
    pub const fn delivery_fee(&self) -> Decimal {
        self.delivery_fee
    }

    /// Returns the currency symbol.
    #[must_use]
    pub const fn currency(&self) -> &'static str {
        CURRENCY
    }

    /// Loads every product, replacing the current list.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if the request fails. The previous list is kept
    /// and the message is available from [`error`](Self::error).
    pub async fn fetch_products(&mut self) -> Result<&[Product], HttpError> {
        self.loading = true;
        self.error = None;
        let result = api::products::list(&self.client).await;
        self.loading = false;

        match result {
            Ok(products) => {
                self.products = self.normalized(products);
                tracing::debug!(count = self.products.len(), "Loaded products");
                Ok(&self.products)
            }
            Err(err) => {
                tracing::warn!(error = %err, "Error fetching products");
                self.error = Some(err.user_message());
                Err(err)
            }
        }
    }

    /// Fetches one product.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if the request fails.
    pub async fn get_product(&self, id: &str) -> Result<Product, HttpError> {
        let mut product = api::products::get(&self.client, id).await?;
        product.normalize_image(&self.asset_host);
        Ok(product)
    }

    /// Fetches the featured products.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if the request fails.
    pub async fn featured_products(&self) -> Result<Vec<Product>, HttpError> {
        let products = api::products::featured(&self.client).await?;
        Ok(self.normalized(products))
    }

    /// Fetches the products of one category.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if the request fails.
    pub async fn products_by_category(&self, category: &str) -> Result<Vec<Product>, HttpError> {
        let products = api::products::by_category(&self.client, category).await?;
        Ok(self.normalized(products))
    }

    /// Runs a server-side search. A blank term returns nothing without a
    /// request.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if the request fails.
    pub async fn search_products(&self, term: &str) -> Result<Vec<Product>, HttpError> {
        if term.trim().is_empty() {
            return Ok(Vec::new());
        }
        let products = api::products::search(&self.client, term).await?;
        Ok(self.normalized(products))
    }

    /// Filters the loaded products by name or description, ignoring case.
    /// A blank term matches nothing.
    #[must_use]
    pub fn search(&self, term: &str) -> Vec<&Product> {
        self.products.iter().filter(|product| product.matches(term)).collect()
    }

    /// Returns a loaded product by id.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }

    /// Creates a debouncer with the configured interval.
    #[must_use]
    pub fn search_debouncer(&self) -> SearchDebouncer {
        SearchDebouncer::new(self.search_debounce)
    }

    fn normalized(&self, mut products: Vec<Product>) -> Vec<Product> {
        for product in &mut products {
            product.normalize_image(&self.asset_host);
        }
        products
    }
}

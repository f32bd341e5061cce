//! The shopping cart.
//!
//! A [`Cart`] is in one of two modes:
//!
//! - **guest**: lines live in a [`GuestCart`] that is written to local
//!   storage after every change
//! - **server**: lines belong to the signed-in customer and every change is a
//!   request whose response replaces the local list
//!
//! [`Cart::sync_session`] moves between the modes. When a customer signs in
//! with a non-empty guest cart, each guest line is posted to the server cart,
//! where matching product and variant lines are summed. A line leaves local
//! storage as soon as the server has accepted it, so an interrupted merge
//! can be resumed without posting anything twice.
//!
//! A 401 from any server-cart request means the customer's token is gone:
//! the cart drops back to guest mode and the error reports
//! [`CartError::requires_login`].
//!
//! # Example
//!
//! ```rust,ignore
//! use storefront_sdk::cart::Cart;
//! use storefront_sdk::models::CartEntry;
//!
//! let mut cart = Cart::new(client.clone(), notifier.clone(), &config);
//! cart.add(CartEntry::for_product(&product, "M", 2)).await?;
//!
//! session.login("jane@example.com", "hunter22").await?;
//! cart.sync_session(&session).await?;
//! assert_eq!(cart.count(), 2);
//! ```

mod errors;
mod guest;

pub use errors::CartError;
pub use guest::{GuestCart, GuestLine};

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::api;
use crate::clients::HttpError;
use crate::config::StorefrontConfig;
use crate::models::CartEntry;
use crate::notify::Notifier;
use crate::storage::{KeyValueStore, CART_KEY, CHECKOUT_DATA_KEY};
use crate::{HttpClient, UserSession};

/// Where the cart's lines currently live.
#[derive(Debug, Clone, PartialEq)]
pub enum CartState {
    /// Local lines of a signed-out visitor.
    Guest(GuestCart),
    /// The signed-in customer's server cart, as last returned by the backend.
    Server(Vec<CartEntry>),
}

/// The cart state container.
#[derive(Debug)]
pub struct Cart {
    client: Arc<HttpClient>,
    notifier: Arc<dyn Notifier>,
    default_variant: String,
    state: CartState,
    loading: bool,
}

impl Cart {
    /// Creates a guest-mode cart from whatever is in local storage.
    #[must_use]
    pub fn new(
        client: Arc<HttpClient>,
        notifier: Arc<dyn Notifier>,
        config: &StorefrontConfig,
    ) -> Self {
        let guest = GuestCart::load(client.store().as_ref());
        Self {
            client,
            notifier,
            default_variant: config.default_variant().to_string(),
            state: CartState::Guest(guest),
            loading: false,
        }
    }

    /// Returns the current mode and lines.
    #[must_use]
    pub const fn state(&self) -> &CartState {
        &self.state
    }

    /// Returns `true` in guest mode.
    #[must_use]
    pub const fn is_guest(&self) -> bool {
        matches!(self.state, CartState::Guest(_))
    }

    /// Returns `true` while the server cart is being fetched.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Returns the current lines.
    #[must_use]
    pub fn entries(&self) -> Vec<CartEntry> {
        match &self.state {
            CartState::Guest(guest) => guest.entries(),
            CartState::Server(entries) => entries.clone(),
        }
    }

    /// Returns `true` if the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match &self.state {
            CartState::Guest(guest) => guest.is_empty(),
            CartState::Server(entries) => entries.is_empty(),
        }
    }

    /// Returns the number of units across all lines.
    #[must_use]
    pub fn count(&self) -> u64 {
        match &self.state {
            CartState::Guest(guest) => guest.count(),
            CartState::Server(entries) => entries
                .iter()
                .map(|entry| u64::from(entry.quantity))
                .sum(),
        }
    }

    /// Returns `Σ price × quantity`.
    ///
    /// Server lines are priced with the product price the backend echoes,
    /// falling back to the snapshot; guest lines use the snapshot.
    #[must_use]
    pub fn total(&self) -> Decimal {
        match &self.state {
            CartState::Guest(guest) => guest.entries().iter().map(CartEntry::line_total).sum(),
            CartState::Server(entries) => entries.iter().map(CartEntry::line_total).sum(),
        }
    }

    /// (Re)loads the lines: the server cart when `session` is signed in,
    /// else local storage.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Http`] if the server cart cannot be fetched; the
    /// previous lines are kept.
    pub async fn load(&mut self, session: &UserSession) -> Result<(), CartError> {
        if !session.is_authenticated() {
            self.state = CartState::Guest(GuestCart::load(self.store()));
            return Ok(());
        }

        self.loading = true;
        let result = api::cart::fetch(&self.client).await;
        self.loading = false;

        match result {
            Ok(entries) => {
                self.state = CartState::Server(entries);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "Could not load server cart");
                self.notifier.error(&err.user_message());
                self.on_server_error(&err);
                Err(err.into())
            }
        }
    }

    /// Brings the cart in line with the session.
    ///
    /// Signed out: falls back to the guest cart. Signed in: merges any stored
    /// guest lines into the server cart, then switches to server mode.
    /// Calling this again after a completed merge only refreshes the server
    /// cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartError`] if a merge request or the server fetch fails.
    /// Lines merged before the failure stay merged; the rest stay in local
    /// storage for the next call.
    pub async fn sync_session(&mut self, session: &UserSession) -> Result<(), CartError> {
        if !session.is_authenticated() {
            if !self.is_guest() {
                self.on_logout();
            }
            return Ok(());
        }

        let store = Arc::clone(self.client.store());
        let mut guest = GuestCart::load(store.as_ref());
        if guest.is_empty() {
            return self.load(session).await;
        }

        let lines = guest.entries();
        tracing::debug!(lines = lines.len(), "Merging guest cart into server cart");

        for entry in &lines {
            match api::cart::add(&self.client, entry).await {
                Ok(entries) => {
                    self.state = CartState::Server(entries);
                    guest.remove(entry.product_id(), &entry.size);
                    guest.save(store.as_ref())?;
                }
                Err(err) => {
                    tracing::warn!(
                        product = %entry.product_id(),
                        error = %err,
                        "Guest cart merge interrupted"
                    );
                    self.notifier.error(&err.user_message());
                    self.on_server_error(&err);
                    return Err(err.into());
                }
            }
        }

        store.remove(CART_KEY)?;
        Ok(())
    }

    /// Adds a line, summing with an existing line for the same product and
    /// variant.
    ///
    /// A zero quantity counts as one; a blank size uses the default variant.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidProduct`] for an empty product id, and
    /// [`CartError::Http`] or [`CartError::Storage`] if the change cannot be
    /// saved. The cart is unchanged on error, except that a 401 switches it
    /// to guest mode.
    pub async fn add(&mut self, mut entry: CartEntry) -> Result<(), CartError> {
        if entry.product_id().trim().is_empty() {
            self.notifier.error("Invalid product ID");
            return Err(CartError::InvalidProduct);
        }
        entry.quantity = entry.quantity.max(1);
        if entry.size.trim().is_empty() {
            entry.size.clone_from(&self.default_variant);
        }

        if self.is_guest() {
            self.commit_guest(|guest| guest.add(&entry))?;
        } else {
            let result = api::cart::add(&self.client, &entry).await;
            self.commit_server(result, Some("Failed to add item to cart"))?;
        }

        self.notifier.success("Item added to cart");
        Ok(())
    }

    /// Sets a line's quantity. Zero or less removes the line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError`] if the change cannot be saved. The cart is
    /// unchanged on error, except that a 401 switches it to guest mode.
    pub async fn update_quantity(
        &mut self,
        product_id: &str,
        variant: &str,
        quantity: i64,
    ) -> Result<(), CartError> {
        if quantity <= 0 {
            return self.remove(product_id, variant).await;
        }
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);

        if self.is_guest() {
            self.commit_guest(|guest| guest.set_quantity(product_id, variant, quantity))
        } else {
            let result = api::cart::update(&self.client, product_id, variant, quantity).await;
            self.commit_server(result, None)
        }
    }

    /// Removes a line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError`] if the change cannot be saved. The cart is
    /// unchanged on error, except that a 401 switches it to guest mode.
    pub async fn remove(&mut self, product_id: &str, variant: &str) -> Result<(), CartError> {
        if self.is_guest() {
            self.commit_guest(|guest| guest.remove(product_id, variant))?;
        } else {
            let result = api::cart::remove(&self.client, product_id, variant).await;
            self.commit_server(result, None)?;
        }

        self.notifier.success("Item removed from cart");
        Ok(())
    }

    /// Empties the cart and forgets the stored guest cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartError`] if the server cart cannot be cleared or local
    /// storage cannot be written.
    pub async fn clear(&mut self) -> Result<(), CartError> {
        if self.is_guest() {
            self.store().remove(CART_KEY)?;
            self.state = CartState::Guest(GuestCart::default());
        } else {
            if let Err(err) = api::cart::clear(&self.client).await {
                self.notifier.error(&err.user_message());
                self.on_server_error(&err);
                return Err(err.into());
            }
            self.state = CartState::Server(Vec::new());
            self.store().remove(CART_KEY)?;
        }

        self.notifier.success("Cart cleared");
        Ok(())
    }

    /// Empties the cart after an order went through, together with the
    /// checkout hand-off.
    ///
    /// Never fails: the order already exists, so cleanup problems are only
    /// logged.
    pub async fn complete_order(&mut self) {
        if self.is_guest() {
            self.state = CartState::Guest(GuestCart::default());
        } else {
            if let Err(err) = api::cart::clear(&self.client).await {
                tracing::warn!(error = %err, "Could not clear server cart after order");
            }
            self.state = CartState::Server(Vec::new());
        }

        for key in [CART_KEY, CHECKOUT_DATA_KEY] {
            if let Err(err) = self.store().remove(key) {
                tracing::warn!(key, error = %err, "Could not clear stored checkout state");
            }
        }
    }

    /// Drops the server lines and returns to the stored guest cart.
    pub fn on_logout(&mut self) {
        self.state = CartState::Guest(GuestCart::load(self.store()));
    }

    /// Returns the variant label used when none is given.
    #[must_use]
    pub fn default_variant(&self) -> &str {
        &self.default_variant
    }

    fn store(&self) -> &dyn KeyValueStore {
        self.client.store().as_ref()
    }

    fn commit_guest(&mut self, change: impl FnOnce(&mut GuestCart)) -> Result<(), CartError> {
        let CartState::Guest(current) = &self.state else {
            return Ok(());
        };

        let mut next = current.clone();
        change(&mut next);

        if let Err(err) = next.save(self.store()) {
            tracing::error!(error = %err, "Could not persist guest cart");
            self.notifier.error("Could not save your cart");
            return Err(err.into());
        }
        self.state = CartState::Guest(next);
        Ok(())
    }

    fn commit_server(
        &mut self,
        result: Result<Vec<CartEntry>, HttpError>,
        failure: Option<&str>,
    ) -> Result<(), CartError> {
        match result {
            Ok(entries) => {
                self.state = CartState::Server(entries);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "Cart update rejected, keeping last server state");
                let message = failure.map_or_else(|| err.user_message(), String::from);
                self.notifier.error(&message);
                self.on_server_error(&err);
                Err(err.into())
            }
        }
    }

    /// Falls back to the guest cart once the backend has rejected the token.
    fn on_server_error(&mut self, err: &HttpError) {
        if err.is_unauthorized() && !self.is_guest() {
            tracing::debug!("Customer token rejected, switching to guest cart");
            self.on_logout();
        }
    }
}

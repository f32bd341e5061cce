//! Order totals and the cart-to-checkout hand-off.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::cart::Cart;
use crate::config::StorefrontConfig;
use crate::models::CartEntry;
use crate::storage::{KeyValueStore, StorageError, CHECKOUT_DATA_KEY};

fn round(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// The price breakdown shown on the review stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    /// Cart total.
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
    /// Shipping charge.
    #[serde(with = "rust_decimal::serde::float")]
    pub shipping: Decimal,
    /// Tax on the subtotal.
    #[serde(with = "rust_decimal::serde::float")]
    pub tax: Decimal,
    /// `subtotal + shipping + tax`.
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

impl OrderSummary {
    /// Computes the breakdown. Each amount is rounded to cents, and the total
    /// is the sum of the rounded parts.
    #[must_use]
    pub fn compute(subtotal: Decimal, shipping: Decimal, tax_rate: Decimal) -> Self {
        let subtotal = round(subtotal);
        let shipping = round(shipping);
        let tax = round(subtotal * tax_rate);
        Self {
            subtotal,
            shipping,
            tax,
            total: subtotal + shipping + tax,
        }
    }
}

/// What the cart view hands to checkout under `checkoutData`.
///
/// Written when the customer leaves the cart for checkout and removed once
/// the order is placed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutData {
    /// Cart lines at hand-off time.
    pub items: Vec<CartEntry>,
    /// Totals at hand-off time, using the flat delivery fee.
    #[serde(flatten)]
    pub summary: OrderSummary,
}

impl CheckoutData {
    /// Snapshots a cart, charging the configured flat delivery fee.
    #[must_use]
    pub fn from_cart(cart: &Cart, config: &StorefrontConfig) -> Self {
        Self {
            items: cart.entries(),
            summary: OrderSummary::compute(cart.total(), config.delivery_fee(), config.tax_rate()),
        }
    }

    /// Writes the hand-off to `store`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the store cannot be written.
    pub fn stash(&self, store: &dyn KeyValueStore) -> Result<(), StorageError> {
        store.set(CHECKOUT_DATA_KEY, &serde_json::to_string(self)?)
    }

    /// Reads the hand-off, if one is stored and readable.
    #[must_use]
    pub fn load(store: &dyn KeyValueStore) -> Option<Self> {
        let raw = store.get(CHECKOUT_DATA_KEY).ok()??;
        match serde_json::from_str(&raw) {
            Ok(data) => Some(data),
            Err(err) => {
                tracing::warn!(error = %err, "Ignoring malformed checkout data");
                None
            }
        }
    }

    /// Removes the hand-off.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the store cannot be written.
    pub fn discard(store: &dyn KeyValueStore) -> Result<(), StorageError> {
        store.remove(CHECKOUT_DATA_KEY)
    }
}

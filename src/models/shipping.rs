//! Shipping methods.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A way of shipping an order, with its price.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ShippingMethod {
    /// Method id.
    #[serde(alias = "_id", default)]
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Price charged for the whole order.
    #[serde(default, with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Expected delivery window, e.g. `3-5 business days`.
    #[serde(default)]
    pub delivery_time: String,
    /// Whether the method is free of charge.
    #[serde(default)]
    pub is_free: bool,
}

impl ShippingMethod {
    /// The methods offered when the backend has none configured.
    ///
    /// Standard (5.99), express (12.99) and free.
    #[must_use]
    pub fn defaults() -> Vec<Self> {
        vec![
            Self {
                id: "standard".into(),
                name: "Standard Shipping".into(),
                price: Decimal::new(599, 2),
                delivery_time: "3-5 business days".into(),
                is_free: false,
            },
            Self {
                id: "express".into(),
                name: "Express Shipping".into(),
                price: Decimal::new(1299, 2),
                delivery_time: "1-2 business days".into(),
                is_free: false,
            },
            Self {
                id: "free".into(),
                name: "Free Shipping".into(),
                price: Decimal::ZERO,
                delivery_time: "5-7 business days".into(),
                is_free: true,
            },
        ]
    }

    /// Returns the amount charged: zero for free methods.
    #[must_use]
    pub fn charge(&self) -> Decimal {
        if self.is_free {
            Decimal::ZERO
        } else {
            self.price
        }
    }
}

/// Fields sent to create a shipping method.
#[derive(Debug, Clone, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewShippingMethod {
    /// Display name.
    pub name: String,
    /// Price.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Expected delivery window.
    pub delivery_time: String,
    /// Whether the method is free of charge.
    pub is_free: bool,
}

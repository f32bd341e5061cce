//! The guest cart kept in local storage.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{CartEntry, ProductRef};
use crate::storage::{KeyValueStore, StorageError, CART_KEY};

/// One guest line: quantity plus the snapshot taken when it was added.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "StoredLine", rename_all = "camelCase")]
pub struct GuestLine {
    /// Units in the cart. Never zero.
    pub quantity: u32,
    /// Unit price when added.
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<Decimal>,
    /// Product name when added.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Product image when added.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

// Older builds stored a bare quantity per variant.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredLine {
    Quantity(u32),
    Line {
        quantity: u32,
        #[serde(default, with = "rust_decimal::serde::float_option")]
        price: Option<Decimal>,
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        image: Option<String>,
    },
}

impl From<StoredLine> for GuestLine {
    fn from(line: StoredLine) -> Self {
        match line {
            StoredLine::Quantity(quantity) => Self {
                quantity,
                price: None,
                name: None,
                image: None,
            },
            StoredLine::Line {
                quantity,
                price,
                name,
                image,
            } => Self {
                quantity,
                price,
                name,
                image,
            },
        }
    }
}

// The array shape comes from builds that stored server-style entries.
#[derive(Deserialize)]
#[serde(untagged)]
enum Stored {
    Map(BTreeMap<String, BTreeMap<String, GuestLine>>),
    List(Vec<CartEntry>),
}

/// A cart that lives only in local storage: product id, then variant, then
/// line.
///
/// Lines with quantity zero are never stored. The map is ordered, so
/// [`entries`](Self::entries) and the persisted JSON are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct GuestCart {
    lines: BTreeMap<String, BTreeMap<String, GuestLine>>,
}

impl GuestCart {
    /// Reads the guest cart from `store`.
    ///
    /// A missing, unreadable or malformed blob yields an empty cart.
    #[must_use]
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let raw = match store.get(CART_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Self::default(),
            Err(err) => {
                tracing::warn!(error = %err, "Could not read guest cart");
                return Self::default();
            }
        };

        match serde_json::from_str::<Stored>(&raw) {
            Ok(stored) => Self::from(stored),
            Err(err) => {
                tracing::warn!(error = %err, "Discarding malformed guest cart");
                Self::default()
            }
        }
    }

    /// Writes the whole cart to `store`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the store cannot be written.
    pub fn save(&self, store: &dyn KeyValueStore) -> Result<(), StorageError> {
        store.set(CART_KEY, &serde_json::to_string(self)?)
    }

    /// Adds `quantity` units, summing with an existing line.
    ///
    /// A newer snapshot replaces the stored one.
    pub fn add(&mut self, entry: &CartEntry) {
        if entry.quantity == 0 || entry.product_id().is_empty() {
            return;
        }
        let line = self
            .lines
            .entry(entry.product_id().to_string())
            .or_default()
            .entry(entry.size.clone())
            .or_insert_with(|| GuestLine {
                quantity: 0,
                price: None,
                name: None,
                image: None,
            });

        line.quantity = line.quantity.saturating_add(entry.quantity);
        if entry.price.is_some() {
            line.price = entry.price;
        }
        if entry.name.is_some() {
            line.name.clone_from(&entry.name);
        }
        if entry.image.is_some() {
            line.image.clone_from(&entry.image);
        }
    }

    /// Sets a line's quantity. Zero removes the line; a missing line is left
    /// missing.
    pub fn set_quantity(&mut self, product_id: &str, variant: &str, quantity: u32) {
        if quantity == 0 {
            self.remove(product_id, variant);
        } else if let Some(line) = self
            .lines
            .get_mut(product_id)
            .and_then(|variants| variants.get_mut(variant))
        {
            line.quantity = quantity;
        }
    }

    /// Removes a line, and the product when it has no lines left.
    pub fn remove(&mut self, product_id: &str, variant: &str) {
        if let Some(variants) = self.lines.get_mut(product_id) {
            variants.remove(variant);
            if variants.is_empty() {
                self.lines.remove(product_id);
            }
        }
    }

    /// Returns the line for a product and variant.
    #[must_use]
    pub fn line(&self, product_id: &str, variant: &str) -> Option<&GuestLine> {
        self.lines.get(product_id)?.get(variant)
    }

    /// Returns `true` if the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Returns the lines as cart entries, ordered by product id then variant.
    #[must_use]
    pub fn entries(&self) -> Vec<CartEntry> {
        self.lines
            .iter()
            .flat_map(|(product_id, variants)| {
                variants.iter().map(move |(variant, line)| CartEntry {
                    id: None,
                    product: ProductRef::Id(product_id.clone()),
                    quantity: line.quantity,
                    size: variant.clone(),
                    price: line.price,
                    name: line.name.clone(),
                    image: line.image.clone(),
                })
            })
            .collect()
    }

    /// Returns the total number of units.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.lines
            .values()
            .flat_map(BTreeMap::values)
            .map(|line| u64::from(line.quantity))
            .sum()
    }
}

impl From<Stored> for GuestCart {
    fn from(stored: Stored) -> Self {
        let mut cart = Self::default();
        match stored {
            Stored::Map(lines) => {
                for (product_id, variants) in lines {
                    for (variant, line) in variants {
                        if line.quantity > 0 && !product_id.is_empty() {
                            cart.lines
                                .entry(product_id.clone())
                                .or_default()
                                .insert(variant, line);
                        }
                    }
                }
            }
            Stored::List(entries) => {
                for entry in &entries {
                    cart.add(entry);
                }
            }
        }
        cart
    }
}

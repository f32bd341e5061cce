//! Server-side cart lines.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::product::{ImageRef, Product};

/// Variant label used when none is given.
pub const DEFAULT_VARIANT: &str = "M";

fn default_variant() -> String {
    DEFAULT_VARIANT.to_string()
}

/// The product a cart line points at.
///
/// The backend returns either the bare id or the populated product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ProductRef {
    /// Only the product id.
    Id(String),
    /// The full product document.
    Populated(Box<Product>),
}

impl ProductRef {
    /// Returns the product id.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Id(id) => id,
            Self::Populated(product) => &product.id,
        }
    }

    /// Returns the populated product, if the backend included it.
    #[must_use]
    pub fn product(&self) -> Option<&Product> {
        match self {
            Self::Id(_) => None,
            Self::Populated(product) => Some(product),
        }
    }
}

/// One line of a cart: a product, a variant and a quantity.
///
/// `price`, `name` and `image` are a snapshot taken when the line was added.
/// The live price from a populated [`ProductRef`] takes precedence over the
/// snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartEntry {
    /// Server-side line id, if any.
    #[serde(alias = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// The product this line is for.
    pub product: ProductRef,

    /// Number of units. Never zero for a stored line.
    pub quantity: u32,

    /// Size or variant label.
    #[serde(default = "default_variant", alias = "variant")]
    pub size: String,

    /// Unit price when the line was added.
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<Decimal>,

    /// Product name when the line was added.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Product image when the line was added.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl CartEntry {
    /// Creates a line for `product`, snapshotting its price, name and image.
    #[must_use]
    pub fn for_product(product: &Product, size: impl Into<String>, quantity: u32) -> Self {
        Self {
            id: None,
            product: ProductRef::Id(product.id.clone()),
            quantity,
            size: size.into(),
            price: Some(product.price),
            name: Some(product.name.clone()).filter(|name| !name.is_empty()),
            image: product
                .image_url()
                .or_else(|| product.images.first().map(String::as_str))
                .map(String::from),
        }
    }

    /// Returns the product id of this line.
    #[must_use]
    pub fn product_id(&self) -> &str {
        self.product.id()
    }

    /// Returns the price echoed by the server in the populated product.
    #[must_use]
    pub fn live_price(&self) -> Option<Decimal> {
        self.product.product().map(|p| p.price)
    }

    /// Returns the unit price used for totals: live price, else snapshot,
    /// else zero.
    #[must_use]
    pub fn unit_price(&self) -> Decimal {
        self.live_price().or(self.price).unwrap_or(Decimal::ZERO)
    }

    /// Returns `unit_price × quantity`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price() * Decimal::from(self.quantity)
    }

    /// Returns the display name: live name, else snapshot.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.product
            .product()
            .map(|p| p.name.as_str())
            .filter(|name| !name.is_empty())
            .or(self.name.as_deref())
            .unwrap_or("Unknown Product")
    }

    /// Returns the display image: live image, else snapshot.
    #[must_use]
    pub fn display_image(&self) -> Option<&str> {
        let live = self.product.product().and_then(|p| match &p.image {
            Some(ImageRef::Url(url)) => Some(url.as_str()),
            _ => p.images.first().map(String::as_str),
        });
        live.or(self.image.as_deref())
    }

    /// Returns `true` if this line is for `product_id` in `variant`.
    #[must_use]
    pub fn is_line(&self, product_id: &str, variant: &str) -> bool {
        self.product_id() == product_id && self.size == variant
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserializes_id_reference_with_default_size() {
        let entry: CartEntry = serde_json::from_value(json!({
            "product": "p1",
            "quantity": 2,
            "price": 10
        }))
        .unwrap();

        assert_eq!(entry.product_id(), "p1");
        assert_eq!(entry.size, "M");
        assert_eq!(entry.unit_price(), Decimal::from(10));
        assert_eq!(entry.line_total(), Decimal::from(20));
        assert_eq!(entry.display_name(), "Unknown Product");
    }

    #[test]
    fn test_populated_product_price_wins_over_snapshot() {
        let entry: CartEntry = serde_json::from_value(json!({
            "_id": "line1",
            "product": {"_id": "p1", "name": "Linen Shirt", "price": 12.5},
            "quantity": 2,
            "size": "L",
            "price": 10,
            "name": "Old Name"
        }))
        .unwrap();

        assert_eq!(entry.id.as_deref(), Some("line1"));
        assert_eq!(entry.live_price(), Some(Decimal::new(125, 1)));
        assert_eq!(entry.line_total(), Decimal::from(25));
        assert_eq!(entry.display_name(), "Linen Shirt");
        assert!(entry.is_line("p1", "L"));
        assert!(!entry.is_line("p1", "M"));
    }

    #[test]
    fn test_missing_prices_count_as_zero() {
        let entry: CartEntry =
            serde_json::from_value(json!({"product": "p1", "quantity": 3})).unwrap();
        assert_eq!(entry.line_total(), Decimal::ZERO);
    }
}

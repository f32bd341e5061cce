//! Orders, shipping addresses and shipment tracking.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::cart::ProductRef;

/// Lifecycle status of an order.
///
/// Deserialization is lenient: case and separators are ignored, the tracking
/// value `in_transit` reads as [`OrderStatus::Shipped`], `completed` as
/// [`OrderStatus::Delivered`], and anything unrecognized as
/// [`OrderStatus::Processing`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    /// Placed and awaiting fulfilment.
    #[default]
    Processing,
    /// Handed to the courier.
    Shipped,
    /// With the courier for final delivery.
    OutForDelivery,
    /// Delivered to the customer.
    Delivered,
    /// Cancelled before delivery.
    Cancelled,
    /// Payment or fulfilment failed.
    Failed,
}

impl OrderStatus {
    /// All statuses, in lifecycle order.
    pub const ALL: [Self; 6] = [
        Self::Processing,
        Self::Shipped,
        Self::OutForDelivery,
        Self::Delivered,
        Self::Cancelled,
        Self::Failed,
    ];

    /// Returns the wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::OutForDelivery => "out_for_delivery",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
            Self::Failed => "failed",
        }
    }

    /// Parses a status string leniently. See the type docs.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let normalized = raw.trim().to_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "shipped" | "in_transit" => Self::Shipped,
            "out_for_delivery" => Self::OutForDelivery,
            "delivered" | "completed" => Self::Delivered,
            "cancelled" | "canceled" => Self::Cancelled,
            "failed" => Self::Failed,
            _ => Self::Processing,
        }
    }

    /// Returns `true` once the order can no longer change.
    #[must_use]
    pub const fn is_final(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled | Self::Failed)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for OrderStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for OrderStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map_or(Self::Processing, Self::parse))
    }
}

/// How the customer pays.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Card payment, handled by the payment gateway.
    #[default]
    Card,
    /// Cash on delivery.
    Cod,
    /// A method this SDK does not know about.
    #[serde(other)]
    Other,
}

/// Where an order ships to.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    /// Street and house number.
    #[serde(default, alias = "address")]
    pub street: String,
    /// City.
    #[serde(default)]
    pub city: String,
    /// State or province.
    #[serde(default)]
    pub state: String,
    /// Postal or ZIP code.
    #[serde(default, alias = "zipCode")]
    pub postal_code: String,
    /// Country name or code.
    #[serde(default)]
    pub country: String,
}

/// Status values a courier update can carry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackingStatus {
    /// Not yet shipped.
    Processing,
    /// With the courier.
    #[default]
    InTransit,
    /// Out for final delivery.
    OutForDelivery,
    /// Delivered.
    Delivered,
}

impl TrackingStatus {
    /// Returns the order status this tracking status implies.
    #[must_use]
    pub const fn order_status(self) -> OrderStatus {
        match self {
            Self::Processing => OrderStatus::Processing,
            Self::InTransit => OrderStatus::Shipped,
            Self::OutForDelivery => OrderStatus::OutForDelivery,
            Self::Delivered => OrderStatus::Delivered,
        }
    }
}

/// Courier details for an order.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TrackingInfo {
    /// Courier company.
    #[serde(default)]
    pub courier_name: String,
    /// Courier's tracking number.
    #[serde(default)]
    pub tracking_number: String,
    /// Estimated delivery date, as entered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_delivery: Option<String>,
    /// Shipment status.
    #[serde(default)]
    pub status: TrackingStatus,
    /// Free-text notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A purchased line, snapshotted at order time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// The purchased product.
    pub product: ProductRef,
    /// Units purchased.
    pub quantity: u32,
    /// Unit price at purchase time.
    #[serde(default, with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Variant label.
    #[serde(default)]
    pub size: String,
    /// Product name at purchase time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// An order as stored by the backend.
///
/// Orders are created once at checkout. Only admins (status) and couriers
/// (tracking) change them afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// The unique identifier of the order.
    #[serde(alias = "_id", default)]
    pub id: String,

    /// Purchased lines.
    #[serde(default, alias = "items")]
    pub order_items: Vec<OrderItem>,

    /// Destination address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<ShippingAddress>,

    /// Payment method.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,

    /// Sum of line totals.
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub items_price: Option<Decimal>,

    /// Shipping charge.
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub shipping_price: Option<Decimal>,

    /// Tax charge.
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub tax_price: Option<Decimal>,

    /// Grand total.
    #[serde(
        default,
        alias = "totalAmount",
        alias = "total",
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub total_price: Option<Decimal>,

    /// Current status.
    #[serde(default)]
    pub status: OrderStatus,

    /// Courier details, once shipped.
    #[serde(default, alias = "trackingInfo", skip_serializing_if = "Option::is_none")]
    pub tracking: Option<TrackingInfo>,

    /// Name on the order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,

    /// Contact email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,

    /// Contact phone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,

    /// When the order was placed.
    #[serde(default, alias = "date", skip_serializing)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Returns the grand total, or zero when the backend omitted it.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.total_price.unwrap_or(Decimal::ZERO)
    }

    /// Returns the short reference shown to customers: the last six
    /// characters of the id.
    #[must_use]
    pub fn short_id(&self) -> &str {
        let start = self
            .id
            .char_indices()
            .rev()
            .nth(5)
            .map_or(0, |(i, _)| i);
        &self.id[start..]
    }
}

/// A line of a new order.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderItem {
    /// Product id.
    pub product: String,
    /// Units to buy.
    pub quantity: u32,
    /// Unit price.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Variant label.
    pub size: String,
}

/// The order-creation request body.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    /// Lines being bought.
    pub order_items: Vec<NewOrderItem>,
    /// Destination.
    pub shipping_address: ShippingAddress,
    /// How the customer pays.
    pub payment_method: PaymentMethod,
    /// Selected shipping method id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_method: Option<String>,
    /// Sum of line totals.
    #[serde(with = "rust_decimal::serde::float")]
    pub items_price: Decimal,
    /// Tax charge.
    #[serde(with = "rust_decimal::serde::float")]
    pub tax_price: Decimal,
    /// Shipping charge.
    #[serde(with = "rust_decimal::serde::float")]
    pub shipping_price: Decimal,
    /// Grand total.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
    /// Full name of the customer.
    pub customer_name: String,
    /// Contact email.
    pub customer_email: String,
    /// Contact phone.
    pub customer_phone: String,
    /// Account id, `None` for guest orders.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

/// Figures for the admin dashboard.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardStats {
    /// Number of orders.
    pub total_orders: usize,
    /// Sum of order totals.
    pub total_revenue: Decimal,
    /// Number of products in the catalog.
    pub total_products: usize,
    /// Number of registered customers.
    pub total_customers: usize,
    /// The five most recent orders, newest first.
    pub recent_orders: Vec<Order>,
}

impl DashboardStats {
    /// Number of orders listed in [`DashboardStats::recent_orders`].
    pub const RECENT_ORDERS: usize = 5;

    /// Computes dashboard figures from the full order list.
    #[must_use]
    pub fn compute(mut orders: Vec<Order>, total_products: usize, total_customers: usize) -> Self {
        let total_orders = orders.len();
        let total_revenue = orders.iter().map(Order::total).sum();

        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        orders.truncate(Self::RECENT_ORDERS);

        Self {
            total_orders,
            total_revenue,
            total_products,
            total_customers,
            recent_orders: orders,
        }
    }
}

//! Typed shapes of the storefront API's documents.
//!
//! The backend stores documents with Mongo-style `_id` keys and camelCase
//! field names. Every model accepts `_id` as an alias for `id` and tolerates
//! missing optional fields, so a partially populated document still loads.
//!
//! Money is [`rust_decimal::Decimal`], sent and received as a JSON number.

mod blog;
mod cart;
mod order;
mod product;
mod settings;
mod shipping;
mod user;

pub use blog::{
    unique_tags, AuthorRef, Blog, BlogInput, BlogPage, BlogQuery, BlogStatus, Comment, LikeState,
    DEFAULT_PAGE_SIZE,
};
pub use cart::{CartEntry, ProductRef, DEFAULT_VARIANT};
pub use order::{
    DashboardStats, NewOrder, NewOrderItem, Order, OrderItem, OrderStatus, PaymentMethod,
    ShippingAddress, TrackingInfo, TrackingStatus,
};
pub use product::{ImageRef, Product, ProductInput, PLACEHOLDER_IMAGE};
pub use settings::{AdminSettings, BlogSettings, EmailSettings, SocialMedia};
pub use shipping::{NewShippingMethod, ShippingMethod};
pub use user::{Admin, AdminProfileUpdate, ProfileUpdate, Registration, User};

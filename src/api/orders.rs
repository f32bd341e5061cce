//! Order endpoints.

use serde_json::json;

use super::{segment, send, single, to_body};
use crate::auth::AuthRealm;
use crate::clients::{HttpError, HttpMethod};
use crate::models::{NewOrder, Order, OrderStatus, TrackingInfo};
use crate::HttpClient;

/// Places an order.
///
/// Customers place orders in [`AuthRealm::User`]; orders entered from the
/// back office use [`AuthRealm::Admin`].
///
/// # Errors
///
/// Returns [`HttpError::Validation`] if the backend rejects the order.
pub async fn create(
    client: &HttpClient,
    order: &NewOrder,
    realm: AuthRealm,
) -> Result<Order, HttpError> {
    let path = "/api/orders";
    let body = to_body(path, order)?;
    let response = send(client, HttpMethod::Post, path, Some(body), Some(realm)).await?;
    single(&response, "order")
}

/// Lists the signed-in customer's orders.
///
/// # Errors
///
/// Returns [`HttpError`] if the request fails or an order does not decode.
pub async fn my_orders(client: &HttpClient) -> Result<Vec<Order>, HttpError> {
    send(client, HttpMethod::Get, "/api/orders/my-orders", None, Some(AuthRealm::User))
        .await?
        .list(Some("orders"))
}

/// Lists every order. Admin only.
///
/// # Errors
///
/// Returns [`HttpError`] if the request fails or an order does not decode.
pub async fn all(client: &HttpClient) -> Result<Vec<Order>, HttpError> {
    send(client, HttpMethod::Get, "/api/orders", None, Some(AuthRealm::Admin))
        .await?
        .list(Some("orders"))
}

/// Sets an order's status. Admin only.
///
/// # Errors
///
/// Returns [`HttpError`] if the request fails.
pub async fn update_status(
    client: &HttpClient,
    id: &str,
    status: OrderStatus,
) -> Result<Order, HttpError> {
    let path = format!("/api/admin/orders/{}", segment(id));
    let body = json!({ "status": status });
    let response = send(client, HttpMethod::Patch, &path, Some(body), Some(AuthRealm::Admin)).await?;
    single(&response, "order")
}

/// Records courier details for an order. Admin only.
///
/// # Errors
///
/// Returns [`HttpError`] if the request fails.
pub async fn update_tracking(
    client: &HttpClient,
    id: &str,
    tracking: &TrackingInfo,
) -> Result<Order, HttpError> {
    let path = format!("/api/orders/{}/tracking", segment(id));
    let body = to_body(&path, tracking)?;
    let response = send(client, HttpMethod::Put, &path, Some(body), Some(AuthRealm::Admin)).await?;
    single(&response, "order")
}

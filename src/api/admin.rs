//! Back-office endpoints: shipping methods, store settings, customers and
//! the dashboard figures.

use super::{orders, products, segment, send, single, to_body};
use crate::auth::AuthRealm;
use crate::clients::{HttpError, HttpMethod};
use crate::models::{AdminSettings, DashboardStats, NewShippingMethod, ShippingMethod, User};
use crate::HttpClient;

const SHIPPING_METHODS: &str = "/api/admin/shipping-methods";
const SETTINGS: &str = "/api/admin/settings";

/// Lists the configured shipping methods.
///
/// Also used by checkout, which falls back to
/// [`ShippingMethod::defaults`] when this fails.
///
/// # Errors
///
/// Returns [`HttpError`] if the request fails or a method does not decode.
pub async fn shipping_methods(client: &HttpClient) -> Result<Vec<ShippingMethod>, HttpError> {
    client.get(SHIPPING_METHODS).await?.list(Some("shippingMethods"))
}

/// Adds a shipping method.
///
/// # Errors
///
/// Returns [`HttpError::Validation`] if the backend rejects the input.
pub async fn create_shipping_method(
    client: &HttpClient,
    method: &NewShippingMethod,
) -> Result<ShippingMethod, HttpError> {
    let body = to_body(SHIPPING_METHODS, method)?;
    let response = send(
        client,
        HttpMethod::Post,
        SHIPPING_METHODS,
        Some(body),
        Some(AuthRealm::Admin),
    )
    .await?;
    single(&response, "shippingMethod")
}

/// Removes a shipping method.
///
/// # Errors
///
/// Returns [`HttpError`] if the request fails.
pub async fn delete_shipping_method(client: &HttpClient, id: &str) -> Result<(), HttpError> {
    let path = format!("{SHIPPING_METHODS}/{}", segment(id));
    send(client, HttpMethod::Delete, &path, None, Some(AuthRealm::Admin)).await?;
    Ok(())
}

/// Fetches the store settings.
///
/// # Errors
///
/// Returns [`HttpError`] if the request fails.
pub async fn settings(client: &HttpClient) -> Result<AdminSettings, HttpError> {
    let response = send(client, HttpMethod::Get, SETTINGS, None, Some(AuthRealm::Admin)).await?;
    single(&response, "settings")
}

/// Saves the store settings and returns what the backend stored.
///
/// # Errors
///
/// Returns [`HttpError::Validation`] if the backend rejects the document.
pub async fn update_settings(
    client: &HttpClient,
    settings: &AdminSettings,
) -> Result<AdminSettings, HttpError> {
    let body = to_body(SETTINGS, settings)?;
    let response = send(client, HttpMethod::Put, SETTINGS, Some(body), Some(AuthRealm::Admin)).await?;
    single(&response, "settings")
}

/// Lists registered customers.
///
/// # Errors
///
/// Returns [`HttpError`] if the request fails or a customer does not decode.
pub async fn customers(client: &HttpClient) -> Result<Vec<User>, HttpError> {
    send(client, HttpMethod::Get, "/api/users", None, Some(AuthRealm::Admin))
        .await?
        .list(Some("users"))
}

/// Gathers the dashboard figures from the order, product and customer
/// lists.
///
/// # Errors
///
/// Returns the first [`HttpError`] among the three requests.
pub async fn dashboard_stats(client: &HttpClient) -> Result<DashboardStats, HttpError> {
    let (orders, products, customers) = tokio::try_join!(
        orders::all(client),
        products::list(client),
        customers(client),
    )?;

    tracing::debug!(
        orders = orders.len(),
        products = products.len(),
        customers = customers.len(),
        "Loaded dashboard data"
    );

    Ok(DashboardStats::compute(orders, products.len(), customers.len()))
}

//! Server cart endpoints.
//!
//! Every mutation answers with the whole cart. When the backend answers with
//! something else (a bare acknowledgement, say), the cart is fetched again so
//! callers always get the authoritative list.

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{json, Value};

use super::{segment, send, to_body};
use crate::auth::AuthRealm;
use crate::clients::{HttpError, HttpMethod, HttpRequest, HttpResponse};
use crate::models::CartEntry;
use crate::HttpClient;

#[derive(Serialize)]
struct NewLine<'a> {
    product: &'a str,
    quantity: u32,
    #[serde(with = "rust_decimal::serde::float_option", skip_serializing_if = "Option::is_none")]
    price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<&'a str>,
    size: &'a str,
}

/// Fetches the signed-in customer's cart.
///
/// # Errors
///
/// Returns [`HttpError`] if the request fails or an entry does not decode.
pub async fn fetch(client: &HttpClient) -> Result<Vec<CartEntry>, HttpError> {
    let response = send(client, HttpMethod::Get, "/api/cart", None, Some(AuthRealm::User)).await?;
    entries(&response)
}

/// Adds `entry.quantity` units of a line, summing with an existing line for
/// the same product and variant.
///
/// # Errors
///
/// Returns [`HttpError`] if the request fails.
pub async fn add(client: &HttpClient, entry: &CartEntry) -> Result<Vec<CartEntry>, HttpError> {
    let path = "/api/cart";
    let line = NewLine {
        product: entry.product_id(),
        quantity: entry.quantity,
        price: entry.price,
        name: entry.name.as_deref(),
        image: entry.image.as_deref(),
        size: &entry.size,
    };
    mutate(client, HttpMethod::Post, path, Some(to_body(path, &line)?)).await
}

/// Sets the quantity of a line.
///
/// # Errors
///
/// Returns [`HttpError`] if the request fails.
pub async fn update(
    client: &HttpClient,
    product_id: &str,
    variant: &str,
    quantity: u32,
) -> Result<Vec<CartEntry>, HttpError> {
    let path = format!("/api/cart/{}", segment(product_id));
    let body = json!({ "quantity": quantity, "size": variant });
    mutate(client, HttpMethod::Put, &path, Some(body)).await
}

/// Removes a line.
///
/// # Errors
///
/// Returns [`HttpError`] if the request fails.
pub async fn remove(
    client: &HttpClient,
    product_id: &str,
    variant: &str,
) -> Result<Vec<CartEntry>, HttpError> {
    let path = format!("/api/cart/{}", segment(product_id));
    let request = HttpRequest::builder(HttpMethod::Delete, path)
        .query_param("size", variant)
        .realm(AuthRealm::User)
        .build()?;
    let response = client.request(request).await?;
    authoritative(client, &response).await
}

/// Empties the cart.
///
/// # Errors
///
/// Returns [`HttpError`] if the request fails.
pub async fn clear(client: &HttpClient) -> Result<(), HttpError> {
    send(client, HttpMethod::Delete, "/api/cart", None, Some(AuthRealm::User)).await?;
    Ok(())
}

async fn mutate(
    client: &HttpClient,
    method: HttpMethod,
    path: &str,
    body: Option<Value>,
) -> Result<Vec<CartEntry>, HttpError> {
    let response = send(client, method, path, body, Some(AuthRealm::User)).await?;
    authoritative(client, &response).await
}

async fn authoritative(
    client: &HttpClient,
    response: &HttpResponse,
) -> Result<Vec<CartEntry>, HttpError> {
    if response.has_list(Some("items")) {
        entries(response)
    } else {
        tracing::debug!(path = %response.path, "Cart mutation returned no cart, refetching");
        fetch(client).await
    }
}

fn entries(response: &HttpResponse) -> Result<Vec<CartEntry>, HttpError> {
    let mut entries: Vec<CartEntry> = response.list(Some("items"))?;
    entries.retain(|entry| entry.quantity > 0);
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_entries_drop_zero_quantity_lines() {
        let response = HttpResponse::new(
            200,
            HashMap::new(),
            json!([
                {"product": "p1", "quantity": 2, "size": "M"},
                {"product": "p2", "quantity": 0, "size": "L"}
            ]),
            "/api/cart",
        );
        let entries = entries(&response).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].product_id(), "p1");
    }
}

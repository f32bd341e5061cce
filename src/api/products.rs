//! Product endpoints.
//!
//! Listing calls return products exactly as the backend sent them; image
//! references are resolved by [`Catalog`](crate::shop::Catalog), which knows
//! the asset host.

use serde_json::json;

use super::{segment, send, single, to_body};
use crate::auth::AuthRealm;
use crate::clients::{HttpError, HttpMethod};
use crate::models::{Product, ProductInput};
use crate::HttpClient;

/// Lists every product.
///
/// # Errors
///
/// Returns [`HttpError`] if the request fails or a product does not decode.
pub async fn list(client: &HttpClient) -> Result<Vec<Product>, HttpError> {
    client.get("/api/products").await?.list(Some("products"))
}

/// Lists products flagged as featured.
///
/// # Errors
///
/// Returns [`HttpError`] if the request fails or a product does not decode.
pub async fn featured(client: &HttpClient) -> Result<Vec<Product>, HttpError> {
    client
        .get_with_query("/api/products", &[("featured", "true")])
        .await?
        .list(Some("products"))
}

/// Fetches one product by id.
///
/// # Errors
///
/// Returns [`HttpError::Response`] with code 404 for an unknown id.
pub async fn get(client: &HttpClient, id: &str) -> Result<Product, HttpError> {
    let path = format!("/api/products/{}", segment(id));
    let response = client.get(&path).await?;
    single(&response, "product")
}

/// Lists the products in a category.
///
/// # Errors
///
/// Returns [`HttpError`] if the request fails or a product does not decode.
pub async fn by_category(client: &HttpClient, category: &str) -> Result<Vec<Product>, HttpError> {
    let path = format!("/api/products/category/{}", segment(category));
    client.get(&path).await?.list(Some("products"))
}

/// Runs a server-side search.
///
/// # Errors
///
/// Returns [`HttpError`] if the request fails or a product does not decode.
pub async fn search(client: &HttpClient, term: &str) -> Result<Vec<Product>, HttpError> {
    client
        .get_with_query("/api/products/search", &[("q", term.trim())])
        .await?
        .list(Some("products"))
}

/// Adds a product to the signed-in customer's wishlist.
///
/// # Errors
///
/// Returns [`HttpError::Unauthorized`] when no customer is signed in.
pub async fn add_to_wishlist(client: &HttpClient, product_id: &str) -> Result<(), HttpError> {
    send(
        client,
        HttpMethod::Post,
        "/api/wishlist",
        Some(json!({ "productId": product_id })),
        Some(AuthRealm::User),
    )
    .await?;
    Ok(())
}

/// Creates a product. Admin only.
///
/// # Errors
///
/// Returns [`HttpError::Validation`] if the backend rejects the input.
pub async fn create(client: &HttpClient, input: &ProductInput) -> Result<Product, HttpError> {
    let path = "/api/products";
    let body = to_body(path, input)?;
    let response = send(client, HttpMethod::Post, path, Some(body), Some(AuthRealm::Admin)).await?;
    single(&response, "product")
}

/// Replaces a product's fields. Admin only.
///
/// # Errors
///
/// Returns [`HttpError::Validation`] if the backend rejects the input.
pub async fn update(
    client: &HttpClient,
    id: &str,
    input: &ProductInput,
) -> Result<Product, HttpError> {
    let path = format!("/api/products/{}", segment(id));
    let body = to_body(&path, input)?;
    let response = send(client, HttpMethod::Put, &path, Some(body), Some(AuthRealm::Admin)).await?;
    single(&response, "product")
}

/// Deletes a product. Admin only.
///
/// # Errors
///
/// Returns [`HttpError`] if the request fails.
pub async fn delete(client: &HttpClient, id: &str) -> Result<(), HttpError> {
    let path = format!("/api/products/{}", segment(id));
    send(client, HttpMethod::Delete, &path, None, Some(AuthRealm::Admin)).await?;
    Ok(())
}

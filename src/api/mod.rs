//! Typed wrappers over the storefront REST endpoints.
//!
//! Each submodule groups the calls for one resource. The functions take a
//! borrowed [`HttpClient`] and return models from [`crate::models`], so the
//! response-shape quirks of the backend (bare arrays, `{data: [...]}`,
//! `{products: [...]}` and so on) never leak past this layer.
//!
//! Calls that only administrators may make are pinned to
//! [`AuthRealm::Admin`]; customer calls such as the cart are pinned to
//! [`AuthRealm::User`]. Everything else follows the client's route-based
//! realm selection.
//!
//! # Example
//!
//! ```rust,ignore
//! use storefront_sdk::api::{blogs, products};
//! use storefront_sdk::models::BlogQuery;
//!
//! let featured = products::featured(&client).await?;
//! let page = blogs::list(&client, &BlogQuery::default()).await?;
//! ```

pub mod admin;
pub mod blogs;
pub mod cart;
pub mod orders;
pub mod products;

use std::borrow::Cow;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::auth::AuthRealm;
use crate::clients::{HttpError, HttpMethod, HttpRequest, HttpResponse};
use crate::HttpClient;

/// Percent-encodes an id or slug for use as a path segment.
pub(crate) fn segment(raw: &str) -> Cow<'_, str> {
    urlencoding::encode(raw.trim())
}

/// Sends a request, optionally pinned to a realm.
pub(crate) async fn send(
    client: &HttpClient,
    method: HttpMethod,
    path: &str,
    body: Option<Value>,
    realm: Option<AuthRealm>,
) -> Result<HttpResponse, HttpError> {
    let mut builder = HttpRequest::builder(method, path);
    if let Some(body) = body {
        builder = builder.body(body);
    }
    if let Some(realm) = realm {
        builder = builder.realm(realm);
    }
    client.request(builder.build()?).await
}

/// Serializes a request body.
pub(crate) fn to_body<T: Serialize>(path: &str, value: &T) -> Result<Value, HttpError> {
    serde_json::to_value(value).map_err(|source| HttpError::Decode {
        path: path.to_string(),
        source,
    })
}

/// Decodes a single document that may be wrapped as `{key: {...}}`,
/// `{data: {key: {...}}}` or `{data: {...}}`, or sent bare.
pub(crate) fn single<T: DeserializeOwned>(
    response: &HttpResponse,
    key: &str,
) -> Result<T, HttpError> {
    let body = &response.body;
    let value = body
        .get(key)
        .or_else(|| body.get("data").and_then(|data| data.get(key)))
        .or_else(|| body.get("data").filter(|data| data.is_object()))
        .unwrap_or(body);

    serde_json::from_value(value.clone()).map_err(|source| HttpError::Decode {
        path: response.path.clone(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Product;
    use serde_json::json;
    use std::collections::HashMap;

    fn response(body: Value) -> HttpResponse {
        HttpResponse::new(200, HashMap::new(), body, "/api/products/p1")
    }

    #[test]
    fn test_single_accepts_every_wrapper() {
        let doc = json!({"_id": "p1", "name": "Linen Shirt", "price": 25});
        for body in [
            doc.clone(),
            json!({"product": doc.clone()}),
            json!({"data": {"product": doc.clone()}}),
            json!({"data": doc.clone()}),
        ] {
            let product: Product = single(&response(body), "product").unwrap();
            assert_eq!(product.id, "p1");
            assert_eq!(product.name, "Linen Shirt");
        }
    }

    #[test]
    fn test_segment_encodes_reserved_characters() {
        assert_eq!(segment("summer/sale"), "summer%2Fsale");
        assert_eq!(segment(" p1 "), "p1");
    }
}

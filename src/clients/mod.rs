//! HTTP client types for storefront API communication.
//!
//! This module provides the foundational HTTP client layer that every other
//! part of the SDK talks to the backend through.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`HttpClient`]: The async HTTP client for API communication
//! - [`HttpRequest`]: A request to be sent to the API
//! - [`HttpResponse`]: A parsed response from the API
//! - [`HttpMethod`]: Supported HTTP methods (GET, POST, PUT, PATCH, DELETE)
//! - [`HttpError`]: Everything that can go wrong with a request
//!
//! # Authentication
//!
//! Each request carries at most one bearer token. Requests whose path starts
//! with `/admin` or `/api/admin`, and any request made while the caller is on
//! an `/admin` route, use the admin token; all others use the customer token.
//! A 401 response removes the token that was sent.
//!
//! # Example
//!
//! ```rust,ignore
//! use storefront_sdk::clients::{HttpClient, HttpMethod, HttpRequest};
//!
//! let request = HttpRequest::builder(HttpMethod::Get, "/api/products/search")
//!     .query_param("q", "linen")
//!     .build()?;
//!
//! let response = client.request(request).await?;
//! ```

mod errors;
mod http_client;
mod http_request;
mod http_response;

pub use errors::{
    HttpError, HttpResponseError, InvalidHttpRequestError, GENERIC_ERROR_MESSAGE,
    NO_RESPONSE_MESSAGE,
};
pub use http_client::{HttpClient, SDK_VERSION};
pub use http_request::{HttpMethod, HttpRequest, HttpRequestBuilder};
pub use http_response::HttpResponse;

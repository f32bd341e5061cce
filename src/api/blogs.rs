//! Blog endpoints.

use serde_json::json;

use super::{segment, send, single, to_body};
use crate::auth::AuthRealm;
use crate::clients::{HttpError, HttpMethod, HttpRequest, InvalidHttpRequestError};
use crate::models::{Blog, BlogInput, BlogPage, BlogQuery, LikeState};
use crate::HttpClient;

/// Fetches one page of posts.
///
/// A query without a status filter lists drafts too, which only
/// administrators may see, so it is sent with the admin token.
///
/// # Errors
///
/// Returns [`HttpError`] if the request fails or the page does not decode.
pub async fn list(client: &HttpClient, query: &BlogQuery) -> Result<BlogPage, HttpError> {
    let mut builder = HttpRequest::builder(HttpMethod::Get, "/api/blogs");
    for (key, value) in query.params() {
        builder = builder.query_param(key, value);
    }
    if query.status.is_none() {
        builder = builder.realm(AuthRealm::Admin);
    }

    let response = client.request(builder.build()?).await?;
    if response.body.is_array() {
        return Ok(BlogPage {
            blogs: response.list(None)?,
            total_pages: 1,
        });
    }
    response.json()
}

/// Fetches a post by slug.
///
/// # Errors
///
/// Returns [`HttpError::Response`] with code 404 for an unknown slug.
pub async fn get(client: &HttpClient, slug: &str) -> Result<Blog, HttpError> {
    let path = format!("/api/blogs/{}", segment(slug));
    let response = client.get(&path).await?;
    single(&response, "blog")
}

/// Toggles the signed-in customer's like on a post.
///
/// # Errors
///
/// Returns [`HttpError::Unauthorized`] when no customer is signed in.
pub async fn like(client: &HttpClient, id: &str) -> Result<LikeState, HttpError> {
    let path = format!("/api/blogs/{}/like", segment(id));
    let response = send(client, HttpMethod::Post, &path, Some(json!({})), Some(AuthRealm::User)).await?;
    single(&response, "data")
}

/// Adds a comment and returns the updated post.
///
/// # Errors
///
/// Returns [`InvalidHttpRequestError::BlankField`] without sending anything
/// if `content` is blank.
pub async fn comment(client: &HttpClient, id: &str, content: &str) -> Result<Blog, HttpError> {
    let content = content.trim();
    if content.is_empty() {
        return Err(InvalidHttpRequestError::BlankField { field: "Comment" }.into());
    }

    let path = format!("/api/blogs/{}/comment", segment(id));
    let body = json!({ "content": content });
    let response = send(client, HttpMethod::Post, &path, Some(body), Some(AuthRealm::User)).await?;
    single(&response, "blog")
}

/// Creates a post.
///
/// # Errors
///
/// Returns [`HttpError::Validation`] if the backend rejects the input.
pub async fn create(client: &HttpClient, input: &BlogInput) -> Result<Blog, HttpError> {
    let path = "/api/blogs";
    let response = client.post(path, to_body(path, input)?).await?;
    single(&response, "blog")
}

/// Edits a post.
///
/// # Errors
///
/// Returns [`HttpError::Validation`] if the backend rejects the input.
pub async fn update(client: &HttpClient, id: &str, input: &BlogInput) -> Result<Blog, HttpError> {
    let path = format!("/api/blogs/{}", segment(id));
    let response = client.put(&path, to_body(&path, input)?).await?;
    single(&response, "blog")
}

/// Deletes a post.
///
/// # Errors
///
/// Returns [`HttpError`] if the request fails.
pub async fn delete(client: &HttpClient, id: &str) -> Result<(), HttpError> {
    client.delete(&format!("/api/blogs/{}", segment(id))).await?;
    Ok(())
}

/// Lists the signed-in customer's own posts, drafts included.
///
/// # Errors
///
/// Returns [`HttpError`] if the request fails or a post does not decode.
pub async fn mine(client: &HttpClient) -> Result<Vec<Blog>, HttpError> {
    send(client, HttpMethod::Get, "/api/blogs/user", None, Some(AuthRealm::User))
        .await?
        .list(Some("blogs"))
}

//! Plumbing shared by the user and admin session holders.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::auth::{AuthError, AuthRealm, BearerToken};
use crate::clients::{HttpClient, HttpResponse};

/// Returns the realm's stored token, dropping it if it has expired.
pub(crate) fn restore_token(client: &HttpClient, realm: AuthRealm) -> Option<BearerToken> {
    let raw = match client.token(realm) {
        Ok(raw) => raw?,
        Err(err) => {
            tracing::warn!(%realm, error = %err, "Could not read stored token");
            return None;
        }
    };

    let token = BearerToken::new(raw)?;
    if token.is_expired() {
        tracing::debug!(%realm, "Discarding expired token");
        forget_token(client, realm);
        return None;
    }
    Some(token)
}

/// Removes the realm's token, logging storage failures.
pub(crate) fn forget_token(client: &HttpClient, realm: AuthRealm) {
    if let Err(err) = client.clear_token(realm) {
        tracing::warn!(%realm, error = %err, "Could not clear stored token");
    }
}

/// Pulls the token and the profile at `profile_pointer` out of a login or
/// registration response.
pub(crate) fn credentials<P: DeserializeOwned>(
    response: &HttpResponse,
    profile_pointer: &str,
    kind: &'static str,
) -> Result<(BearerToken, P), AuthError> {
    let token = response
        .body
        .get("token")
        .and_then(Value::as_str)
        .and_then(BearerToken::new)
        .ok_or(AuthError::MissingToken)?;

    let profile = profile(response, profile_pointer)?.ok_or(AuthError::MissingProfile { kind })?;

    Ok((token, profile))
}

/// Decodes the object at `pointer`, or `None` when it is absent or null.
pub(crate) fn profile<P: DeserializeOwned>(
    response: &HttpResponse,
    pointer: &str,
) -> Result<Option<P>, AuthError> {
    match response.body.pointer(pointer) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_json::from_value(value.clone())
            .map(Some)
            .map_err(|_| AuthError::UnexpectedResponse),
    }
}

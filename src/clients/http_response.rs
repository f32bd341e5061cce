//! HTTP response types for the storefront SDK.
//!
//! This module provides the [`HttpResponse`] type and the helpers that turn
//! the backend's loosely shaped JSON bodies into typed values.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::clients::errors::{HttpError, GENERIC_ERROR_MESSAGE};

/// An HTTP response from the storefront API.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// Response headers (headers may have multiple values).
    pub headers: HashMap<String, Vec<String>>,
    /// The parsed response body. An empty body is `{}`.
    pub body: Value,
    /// The request path, kept for error reporting.
    pub path: String,
}

impl HttpResponse {
    /// Creates a new `HttpResponse`.
    #[must_use]
    pub fn new(
        code: u16,
        headers: HashMap<String, Vec<String>>,
        body: Value,
        path: impl Into<String>,
    ) -> Self {
        Self {
            code,
            headers,
            body,
            path: path.into(),
        }
    }

    /// Returns `true` if the response status code is in the 2xx range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code <= 299
    }

    /// Returns the server's human-readable message.
    ///
    /// Looks at `message`, then `error`, falling back to
    /// [`GENERIC_ERROR_MESSAGE`].
    #[must_use]
    pub fn message(&self) -> String {
        ["message", "error"]
            .iter()
            .find_map(|key| self.body.get(key).and_then(Value::as_str))
            .filter(|message| !message.trim().is_empty())
            .unwrap_or(GENERIC_ERROR_MESSAGE)
            .to_string()
    }

    /// Extracts field-level validation messages from the body.
    ///
    /// Two shapes are recognized under `errors`:
    /// - an object mapping field names to a message, a list of messages, or
    ///   an object with a `message`
    /// - a list of objects carrying `path`, `param` or `field` and `msg` or
    ///   `message`
    #[must_use]
    pub fn field_errors(&self) -> HashMap<String, Vec<String>> {
        let mut fields: HashMap<String, Vec<String>> = HashMap::new();

        match self.body.get("errors") {
            Some(Value::Object(map)) => {
                for (field, value) in map {
                    let messages: Vec<String> = match value {
                        Value::String(s) => vec![s.clone()],
                        Value::Array(items) => items
                            .iter()
                            .filter_map(Value::as_str)
                            .map(String::from)
                            .collect(),
                        Value::Object(inner) => inner
                            .get("message")
                            .and_then(Value::as_str)
                            .map(|s| vec![s.to_string()])
                            .unwrap_or_default(),
                        _ => Vec::new(),
                    };
                    if !messages.is_empty() {
                        fields.entry(field.clone()).or_default().extend(messages);
                    }
                }
            }
            Some(Value::Array(items)) => {
                for item in items {
                    let field = ["path", "param", "field"]
                        .iter()
                        .find_map(|key| item.get(key).and_then(Value::as_str));
                    let message = ["msg", "message"]
                        .iter()
                        .find_map(|key| item.get(key).and_then(Value::as_str));
                    if let (Some(field), Some(message)) = (field, message) {
                        fields
                            .entry(field.to_string())
                            .or_default()
                            .push(message.to_string());
                    }
                }
            }
            _ => {}
        }

        fields
    }

    /// Deserializes the whole body.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Decode`] if the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, HttpError> {
        self.decode(self.body.clone())
    }

    /// Deserializes the value under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Decode`] if the key is missing or does not
    /// match `T`.
    pub fn field<T: DeserializeOwned>(&self, key: &str) -> Result<T, HttpError> {
        self.decode(self.body.get(key).cloned().unwrap_or(Value::Null))
    }

    /// Deserializes a list that the backend may wrap in several ways.
    ///
    /// Accepts a bare array, `{"data": [...]}`, `{"<key>": [...]}` and
    /// `{"data": {"<key>": [...]}}`. Anything else is an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Decode`] if an element does not match `T`.
    pub fn list<T: DeserializeOwned>(&self, key: Option<&str>) -> Result<Vec<T>, HttpError> {
        match self.list_value(key) {
            Some(items) => self.decode(items.clone()),
            None => Ok(Vec::new()),
        }
    }

    /// Returns `true` if the body holds a list in one of the shapes
    /// [`list`](Self::list) accepts.
    #[must_use]
    pub fn has_list(&self, key: Option<&str>) -> bool {
        self.list_value(key).is_some()
    }

    fn list_value(&self, key: Option<&str>) -> Option<&Value> {
        let body = &self.body;
        if body.is_array() {
            return Some(body);
        }

        let mut candidates = vec![body.get("data")];
        if let Some(key) = key {
            candidates.push(body.get(key));
            candidates.push(body.get("data").and_then(|data| data.get(key)));
        }

        candidates.into_iter().flatten().find(|value| value.is_array())
    }

    fn decode<T: DeserializeOwned>(&self, value: Value) -> Result<T, HttpError> {
        serde_json::from_value(value).map_err(|source| HttpError::Decode {
            path: self.path.clone(),
            source,
        })
    }
}

//! The storefront customer session.

use std::sync::Arc;

use serde_json::json;

use crate::auth::session::{credentials, forget_token, profile, restore_token};
use crate::auth::{AuthError, AuthRealm};
use crate::clients::{HttpMethod, HttpRequest, HttpResponse};
use crate::config::Email;
use crate::models::{ProfileUpdate, Registration, User};
use crate::notify::Notifier;
use crate::HttpClient;

/// Minimum password length accepted at sign-up.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Holds the signed-in customer, if any.
///
/// The session is an explicit object: the cart and the checkout wizard take
/// a reference to it rather than reaching for global state. Its bearer token
/// lives in the client's store under `token`, so it survives restarts;
/// [`check_auth`](Self::check_auth) turns a stored token back into a profile.
///
/// # Example
///
/// ```rust,ignore
/// let mut session = UserSession::new(client.clone(), notifier.clone());
/// session.check_auth().await;
///
/// if !session.is_authenticated() {
///     session.login("jane@example.com", "hunter22").await?;
/// }
/// ```
#[derive(Debug)]
pub struct UserSession {
    client: Arc<HttpClient>,
    notifier: Arc<dyn Notifier>,
    user: Option<User>,
    loading: bool,
}

impl UserSession {
    /// Creates a signed-out session. Call [`check_auth`](Self::check_auth)
    /// to restore a stored login.
    #[must_use]
    pub fn new(client: Arc<HttpClient>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            client,
            notifier,
            user: None,
            loading: true,
        }
    }

    /// Returns the signed-in customer.
    ///
    /// `None` as soon as the stored token is gone, which happens when the
    /// backend answers 401 to any request in this realm.
    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref().filter(|_| self.has_token())
    }

    /// Returns `true` if a customer is signed in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user().is_some()
    }

    /// Returns `true` until the first [`check_auth`](Self::check_auth)
    /// completes.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Returns the client this session talks through.
    #[must_use]
    pub fn client(&self) -> &Arc<HttpClient> {
        &self.client
    }

    /// Restores the session from the stored token.
    ///
    /// With no usable token the session is anonymous. Otherwise the token is
    /// verified with the backend; if verification fails or returns no user,
    /// the token is removed.
    pub async fn check_auth(&mut self) -> Option<&User> {
        self.user = None;

        if restore_token(&self.client, AuthRealm::User).is_some() {
            match self.send(HttpMethod::Get, "/api/auth/verify", None).await {
                Ok(response) => match profile::<User>(&response, "/user") {
                    Ok(Some(user)) => self.user = Some(user),
                    Ok(None) | Err(_) => forget_token(&self.client, AuthRealm::User),
                },
                Err(err) => {
                    tracing::warn!(error = %err, "Auth check failed");
                    forget_token(&self.client, AuthRealm::User);
                }
            }
        }

        self.loading = false;
        self.user.as_ref()
    }

    /// Signs in with email and password.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Http`] if the backend rejects the credentials and
    /// [`AuthError::MissingToken`] or [`AuthError::MissingProfile`] if the
    /// response is incomplete.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<&User, AuthError> {
        let body = json!({ "email": email.trim(), "password": password });
        let result = async {
            let response = self.send(HttpMethod::Post, "/api/auth/login", Some(body)).await?;
            credentials::<User>(&response, "/data/user", "user")
        }
        .await;

        match result {
            Ok((token, user)) => {
                self.client.set_token(AuthRealm::User, token.as_str())?;
                tracing::debug!(user = %user.id, "Customer signed in");
                self.notifier.success("Login successful!");
                Ok(self.user.insert(user))
            }
            Err(err) => {
                self.notifier.error(&err.user_message());
                Err(err)
            }
        }
    }

    /// Creates an account and signs in.
    ///
    /// Name, email and password are required, the email must be well formed
    /// and the password at least [`MIN_PASSWORD_LEN`] characters.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidInput`] without contacting the backend if
    /// the form is invalid, [`AuthError::UnexpectedResponse`] if the backend
    /// does not confirm with `status: "success"`, and [`AuthError::Http`] for
    /// request failures.
    pub async fn register(&mut self, registration: &Registration) -> Result<&User, AuthError> {
        let result = async {
            Self::validate_registration(registration)?;

            let response = self
                .send(
                    HttpMethod::Post,
                    "/api/auth/register",
                    Some(serde_json::to_value(registration).map_err(|_| AuthError::UnexpectedResponse)?),
                )
                .await?;

            if response.body.get("status").and_then(serde_json::Value::as_str) != Some("success") {
                return Err(AuthError::UnexpectedResponse);
            }
            credentials::<User>(&response, "/data/user", "user")
        }
        .await;

        match result {
            Ok((token, user)) => {
                self.client.set_token(AuthRealm::User, token.as_str())?;
                self.notifier.success("Registration successful!");
                Ok(self.user.insert(user))
            }
            Err(err) => {
                self.notifier.error(&err.user_message());
                Err(err)
            }
        }
    }

    /// Signs out and removes the stored token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Storage`] if the token cannot be removed.
    pub fn logout(&mut self) -> Result<(), AuthError> {
        self.client.clear_token(AuthRealm::User)?;
        self.user = None;
        self.notifier.success("Logged out successfully");
        Ok(())
    }

    /// Updates the signed-in customer's profile.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::NotAuthenticated`] when signed out,
    /// [`AuthError::UnexpectedResponse`] if the response has no `user`, and
    /// [`AuthError::Http`] for request failures.
    pub async fn update_profile(&mut self, update: &ProfileUpdate) -> Result<&User, AuthError> {
        let result = async {
            if self.user().is_none() {
                return Err(AuthError::NotAuthenticated);
            }
            let body = serde_json::to_value(update).map_err(|_| AuthError::UnexpectedResponse)?;
            let response = self.send(HttpMethod::Put, "/api/auth/profile", Some(body)).await?;
            profile::<User>(&response, "/user")?.ok_or(AuthError::UnexpectedResponse)
        }
        .await;

        match result {
            Ok(user) => {
                self.notifier.success("Profile updated successfully");
                Ok(self.user.insert(user))
            }
            Err(err) => {
                if matches!(&err, AuthError::Http(e) if e.is_unauthorized()) {
                    self.user = None;
                }
                let message = match &err {
                    AuthError::Http(e) => e.user_message(),
                    _ => "Failed to update profile".to_string(),
                };
                self.notifier.error(&message);
                Err(err)
            }
        }
    }

    fn validate_registration(registration: &Registration) -> Result<(), AuthError> {
        if registration.name.trim().is_empty()
            || registration.email.trim().is_empty()
            || registration.password.is_empty()
        {
            return Err(AuthError::InvalidInput(
                "Please fill in all required fields".to_string(),
            ));
        }
        if !Email::is_valid(registration.email.trim()) {
            return Err(AuthError::InvalidInput(
                "Please provide a valid email address".to_string(),
            ));
        }
        if registration.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::InvalidInput(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters long"
            )));
        }
        Ok(())
    }

    fn has_token(&self) -> bool {
        matches!(self.client.token(AuthRealm::User), Ok(Some(_)))
    }

    async fn send(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<HttpResponse, AuthError> {
        let mut builder = HttpRequest::builder(method, path).realm(AuthRealm::User);
        if let Some(body) = body {
            builder = builder.body(body);
        }
        let request = builder.build().map_err(crate::clients::HttpError::from)?;
        Ok(self.client.request(request).await?)
    }
}

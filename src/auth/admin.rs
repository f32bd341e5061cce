//! The back-office administrator session.

use std::sync::Arc;

use serde_json::{json, Value};

use crate::auth::session::{credentials, forget_token, profile, restore_token};
use crate::auth::{AuthError, AuthRealm};
use crate::clients::{HttpError, HttpMethod, HttpRequest, HttpResponse};
use crate::models::{Admin, AdminProfileUpdate};
use crate::notify::Notifier;
use crate::HttpClient;

/// Holds the signed-in administrator, if any.
///
/// Independent from [`UserSession`](crate::UserSession): the admin token is
/// stored under `adminToken` and both sessions can be active at once. Every
/// request made here carries the admin token regardless of the current
/// route.
#[derive(Debug)]
pub struct AdminSession {
    client: Arc<HttpClient>,
    notifier: Arc<dyn Notifier>,
    admin: Option<Admin>,
    loading: bool,
}

impl AdminSession {
    /// Creates a signed-out admin session.
    #[must_use]
    pub fn new(client: Arc<HttpClient>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            client,
            notifier,
            admin: None,
            loading: true,
        }
    }

    /// Returns the signed-in administrator.
    ///
    /// `None` as soon as the stored token is gone, which happens when the
    /// backend answers 401 to any request in this realm.
    #[must_use]
    pub fn admin(&self) -> Option<&Admin> {
        self.admin.as_ref().filter(|_| self.has_token())
    }

    /// Returns `true` if an administrator is signed in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.admin().is_some()
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

    /// Restores the session from the stored admin token, removing the token
    /// if the backend no longer accepts it.
    pub async fn check_auth(&mut self) -> Option<&Admin> {
        self.admin = None;

        if restore_token(&self.client, AuthRealm::Admin).is_some() {
            match self.send(HttpMethod::Get, "/api/admin/verify", None).await {
                Ok(response) => match profile::<Admin>(&response, "/admin") {
                    Ok(Some(admin)) => self.admin = Some(admin),
                    Ok(None) | Err(_) => forget_token(&self.client, AuthRealm::Admin),
                },
                Err(err) => {
                    tracing::warn!(error = %err, "Admin auth check failed");
                    forget_token(&self.client, AuthRealm::Admin);
                }
            }
        }

        self.loading = false;
        self.admin.as_ref()
    }

    /// Signs in as an administrator.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Http`] if the backend rejects the credentials and
    /// [`AuthError::MissingToken`] or [`AuthError::MissingProfile`] if the
    /// response is incomplete.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<&Admin, AuthError> {
        let body = json!({ "email": email.trim(), "password": password });
        let result = async {
            let response = self
                .send(HttpMethod::Post, "/api/admin/login", Some(body))
                .await?;
            credentials::<Admin>(&response, "/admin", "admin")
        }
        .await;

        match result {
            Ok((token, admin)) => {
                self.client.set_token(AuthRealm::Admin, token.as_str())?;
                tracing::debug!(admin = %admin.id, "Administrator signed in");
                self.notifier.success("Admin login successful!");
                Ok(self.admin.insert(admin))
            }
            Err(err) => {
                self.notifier.error(&err.user_message());
                Err(err)
            }
        }
    }

    /// Signs out and removes the stored admin token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Storage`] if the token cannot be removed.
    pub fn logout(&mut self) -> Result<(), AuthError> {
        self.client.clear_token(AuthRealm::Admin)?;
        self.admin = None;
        self.notifier.success("Admin logged out successfully");
        Ok(())
    }

    /// Updates the administrator's name, email or password.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::NotAuthenticated`] when signed out,
    /// [`AuthError::UnexpectedResponse`] if the response has no `admin`, and
    /// [`AuthError::Http`] for request failures.
    pub async fn update_profile(
        &mut self,
        update: &AdminProfileUpdate,
    ) -> Result<&Admin, AuthError> {
        let result = async {
            if self.admin().is_none() {
                return Err(AuthError::NotAuthenticated);
            }
            let body = serde_json::to_value(update).map_err(|_| AuthError::UnexpectedResponse)?;
            let response = self
                .send(HttpMethod::Put, "/api/admin/profile", Some(body))
                .await?;
            profile::<Admin>(&response, "/admin")?.ok_or(AuthError::UnexpectedResponse)
        }
        .await;

        match result {
            Ok(admin) => {
                self.notifier.success("Admin profile updated successfully");
                Ok(self.admin.insert(admin))
            }
            Err(err) => {
                if matches!(&err, AuthError::Http(e) if e.is_unauthorized()) {
                    self.admin = None;
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

    fn has_token(&self) -> bool {
        matches!(self.client.token(AuthRealm::Admin), Ok(Some(_)))
    }

    async fn send(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Value>,
    ) -> Result<HttpResponse, AuthError> {
        let mut builder = HttpRequest::builder(method, path).realm(AuthRealm::Admin);
        if let Some(body) = body {
            builder = builder.body(body);
        }
        let request = builder.build().map_err(HttpError::from)?;
        Ok(self.client.request(request).await?)
    }
}

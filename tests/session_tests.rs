//! Integration tests for the customer and administrator sessions.
//!
//! These tests cover sign-in, sign-up, restoring a stored login and the
//! notices each flow emits.

use std::sync::Arc;

use serde_json::json;
use storefront_sdk::models::{AdminProfileUpdate, ProfileUpdate, Registration};
use storefront_sdk::notify::{MemoryNotifier, NoticeLevel};
use storefront_sdk::storage::{KeyValueStore, MemoryStore, ADMIN_TOKEN_KEY, USER_TOKEN_KEY};
use storefront_sdk::{
    AdminSession, ApiBaseUrl, AuthError, HttpClient, HttpError, StorefrontConfig, UserSession,
};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Harness {
    server: MockServer,
    client: Arc<HttpClient>,
    store: Arc<MemoryStore>,
    notifier: Arc<MemoryNotifier>,
}

async fn setup() -> Harness {
    let server = MockServer::start().await;
    let config = StorefrontConfig::builder()
        .api_base_url(ApiBaseUrl::new(server.uri()).unwrap())
        .build()
        .unwrap();
    let store = Arc::new(MemoryStore::new());
    let client = Arc::new(HttpClient::new(&config, store.clone()).unwrap());
    Harness {
        server,
        client,
        store,
        notifier: Arc::new(MemoryNotifier::new()),
    }
}

fn user_session(h: &Harness) -> UserSession {
    UserSession::new(h.client.clone(), h.notifier.clone())
}

// ============================================================================
// Customer Login
// ============================================================================

#[tokio::test]
async fn test_login_stores_token_and_profile() {
    let h = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({"email": "jane@example.com", "password": "hunter22"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "token": "user-token",
            "data": {"user": {"_id": "u1", "name": "Jane Doe", "email": "jane@example.com"}}
        })))
        .expect(1)
        .mount(&h.server)
        .await;

    let mut session = user_session(&h);
    let user = session.login(" jane@example.com ", "hunter22").await.unwrap();

    assert_eq!(user.id, "u1");
    assert!(session.is_authenticated());
    assert_eq!(h.store.get(USER_TOKEN_KEY).unwrap().as_deref(), Some("user-token"));
    assert_eq!(h.notifier.last().unwrap().message, "Login successful!");
}

#[tokio::test]
async fn test_rejected_login_shows_server_message() {
    let h = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "Invalid credentials"})),
        )
        .mount(&h.server)
        .await;

    let mut session = user_session(&h);
    let err = session.login("jane@example.com", "wrong").await.unwrap_err();

    assert!(matches!(err, AuthError::Http(HttpError::Unauthorized { .. })));
    assert!(!session.is_authenticated());
    assert!(h.store.get(USER_TOKEN_KEY).unwrap().is_none());

    let notice = h.notifier.last().unwrap();
    assert_eq!(notice.level, NoticeLevel::Error);
    assert_eq!(notice.message, "Invalid credentials");
}

#[tokio::test]
async fn test_login_without_token_is_an_error() {
    let h = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"user": {"_id": "u1"}}
        })))
        .mount(&h.server)
        .await;

    let mut session = user_session(&h);
    let err = session.login("jane@example.com", "hunter22").await.unwrap_err();

    assert!(matches!(err, AuthError::MissingToken));
    assert_eq!(h.notifier.last().unwrap().message, "No authentication token received");
    assert!(h.store.get(USER_TOKEN_KEY).unwrap().is_none());
}

// ============================================================================
// Registration
// ============================================================================

#[tokio::test]
async fn test_register_requires_success_status() {
    let h = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "status": "success",
            "token": "fresh-token",
            "data": {"user": {"_id": "u2", "name": "Sam", "email": "sam@example.com"}}
        })))
        .expect(1)
        .mount(&h.server)
        .await;

    let mut session = user_session(&h);
    let registration = Registration {
        name: "Sam".into(),
        email: "sam@example.com".into(),
        password: "secret1".into(),
        phone: None,
    };
    session.register(&registration).await.unwrap();

    assert_eq!(session.user().unwrap().id, "u2");
    assert_eq!(h.store.get(USER_TOKEN_KEY).unwrap().as_deref(), Some("fresh-token"));
    assert_eq!(h.notifier.last().unwrap().message, "Registration successful!");
}

#[tokio::test]
async fn test_invalid_registration_never_reaches_backend() {
    let h = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&h.server)
        .await;

    let mut session = user_session(&h);
    let registration = Registration {
        name: "Sam".into(),
        email: "sam@example.com".into(),
        password: "123".into(),
        phone: None,
    };
    let err = session.register(&registration).await.unwrap_err();

    assert!(matches!(err, AuthError::InvalidInput(_)));
    assert_eq!(
        h.notifier.last().unwrap().message,
        "Password must be at least 6 characters long"
    );
}

// ============================================================================
// Restoring a Stored Login
// ============================================================================

#[tokio::test]
async fn test_check_auth_without_token_makes_no_request() {
    let h = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/auth/verify"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&h.server)
        .await;

    let mut session = user_session(&h);
    assert!(session.is_loading());
    assert!(session.check_auth().await.is_none());
    assert!(!session.is_loading());
}

#[tokio::test]
async fn test_check_auth_restores_user() {
    let h = setup().await;
    h.store.set(USER_TOKEN_KEY, "user-token").unwrap();

    Mock::given(method("GET"))
        .and(path("/api/auth/verify"))
        .and(header("Authorization", "Bearer user-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": {"_id": "u1", "name": "Jane Doe"}
        })))
        .expect(1)
        .mount(&h.server)
        .await;

    let mut session = user_session(&h);
    let user = session.check_auth().await.unwrap();
    assert_eq!(user.name, "Jane Doe");
}

#[tokio::test]
async fn test_check_auth_without_user_clears_token() {
    let h = setup().await;
    h.store.set(USER_TOKEN_KEY, "user-token").unwrap();

    Mock::given(method("GET"))
        .and(path("/api/auth/verify"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success"})))
        .mount(&h.server)
        .await;

    let mut session = user_session(&h);
    assert!(session.check_auth().await.is_none());
    assert!(h.store.get(USER_TOKEN_KEY).unwrap().is_none());
}

#[tokio::test]
async fn test_check_auth_failure_clears_token() {
    let h = setup().await;
    h.store.set(USER_TOKEN_KEY, "user-token").unwrap();

    Mock::given(method("GET"))
        .and(path("/api/auth/verify"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&h.server)
        .await;

    let mut session = user_session(&h);
    assert!(session.check_auth().await.is_none());
    assert!(!session.is_authenticated());
    assert!(h.store.get(USER_TOKEN_KEY).unwrap().is_none());
}

// ============================================================================
// Profile and Logout
// ============================================================================

#[tokio::test]
async fn test_update_profile_replaces_user() {
    let h = setup().await;
    h.store.set(USER_TOKEN_KEY, "user-token").unwrap();

    Mock::given(method("GET"))
        .and(path("/api/auth/verify"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": {"_id": "u1", "name": "Jane Doe"}
        })))
        .mount(&h.server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/auth/profile"))
        .and(body_json(json!({"phone": "555-0100"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": {"_id": "u1", "name": "Jane Doe", "phone": "555-0100"}
        })))
        .expect(1)
        .mount(&h.server)
        .await;

    let mut session = user_session(&h);
    session.check_auth().await;

    let update = ProfileUpdate {
        phone: Some("555-0100".into()),
        ..ProfileUpdate::default()
    };
    let user = session.update_profile(&update).await.unwrap();

    assert_eq!(user.phone.as_deref(), Some("555-0100"));
    assert_eq!(h.notifier.last().unwrap().message, "Profile updated successfully");
}

#[tokio::test]
async fn test_update_profile_requires_login() {
    let h = setup().await;
    let mut session = user_session(&h);

    let err = session
        .update_profile(&ProfileUpdate::default())
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::NotAuthenticated));
    assert_eq!(h.notifier.last().unwrap().message, "Failed to update profile");
}

#[tokio::test]
async fn test_rejected_token_signs_customer_out() {
    let h = setup().await;
    h.store.set(USER_TOKEN_KEY, "user-token").unwrap();

    Mock::given(method("GET"))
        .and(path("/api/auth/verify"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": {"_id": "u1", "name": "Jane Doe"}
        })))
        .mount(&h.server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/auth/profile"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "Token expired"})))
        .mount(&h.server)
        .await;

    let mut session = user_session(&h);
    session.check_auth().await;
    assert!(session.is_authenticated());

    let update = ProfileUpdate {
        name: Some("Jane Q Doe".into()),
        ..ProfileUpdate::default()
    };
    let err = session.update_profile(&update).await.unwrap_err();

    assert!(matches!(err, AuthError::Http(HttpError::Unauthorized { .. })));
    assert!(!session.is_authenticated());
    assert!(session.user().is_none());
    assert!(h.store.get(USER_TOKEN_KEY).unwrap().is_none());
    assert_eq!(h.notifier.last().unwrap().message, "Token expired");
}

#[tokio::test]
async fn test_cleared_token_ends_session_without_request() {
    let h = setup().await;
    h.store.set(USER_TOKEN_KEY, "user-token").unwrap();

    Mock::given(method("GET"))
        .and(path("/api/auth/verify"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": {"_id": "u1", "name": "Jane Doe"}
        })))
        .mount(&h.server)
        .await;

    let mut session = user_session(&h);
    session.check_auth().await;

    // Another request in the same realm was rejected and cleared the token.
    h.store.remove(USER_TOKEN_KEY).unwrap();

    assert!(!session.is_authenticated());
    assert!(session.user().is_none());
}

#[tokio::test]
async fn test_logout_removes_only_user_token() {
    let h = setup().await;
    h.store.set(USER_TOKEN_KEY, "user-token").unwrap();
    h.store.set(ADMIN_TOKEN_KEY, "admin-token").unwrap();

    let mut session = user_session(&h);
    session.logout().unwrap();

    assert!(h.store.get(USER_TOKEN_KEY).unwrap().is_none());
    assert_eq!(h.store.get(ADMIN_TOKEN_KEY).unwrap().as_deref(), Some("admin-token"));
    assert_eq!(h.notifier.last().unwrap().message, "Logged out successfully");
}

// ============================================================================
// Administrator Session
// ============================================================================

#[tokio::test]
async fn test_admin_login_and_verify_use_admin_token() {
    let h = setup().await;
    h.store.set(USER_TOKEN_KEY, "user-token").unwrap();

    Mock::given(method("POST"))
        .and(path("/api/admin/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "admin-token",
            "admin": {"_id": "a1", "name": "Root", "email": "root@example.com", "role": "superadmin"}
        })))
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/admin/verify"))
        .and(header("Authorization", "Bearer admin-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "admin": {"_id": "a1", "name": "Root"}
        })))
        .expect(1)
        .mount(&h.server)
        .await;

    let mut admin = AdminSession::new(h.client.clone(), h.notifier.clone());
    admin.login("root@example.com", "secret").await.unwrap();
    assert_eq!(h.store.get(ADMIN_TOKEN_KEY).unwrap().as_deref(), Some("admin-token"));
    assert_eq!(h.notifier.last().unwrap().message, "Admin login successful!");

    let mut restored = AdminSession::new(h.client.clone(), h.notifier.clone());
    assert_eq!(restored.check_auth().await.unwrap().id, "a1");

    // The customer login is untouched.
    assert_eq!(h.store.get(USER_TOKEN_KEY).unwrap().as_deref(), Some("user-token"));

    restored.logout().unwrap();
    assert!(h.store.get(ADMIN_TOKEN_KEY).unwrap().is_none());
    assert_eq!(h.notifier.last().unwrap().message, "Admin logged out successfully");
}

#[tokio::test]
async fn test_admin_check_auth_rejected_clears_admin_token() {
    let h = setup().await;
    h.store.set(ADMIN_TOKEN_KEY, "stale").unwrap();

    Mock::given(method("GET"))
        .and(path("/api/admin/verify"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "Not authorized"})))
        .mount(&h.server)
        .await;

    let mut admin = AdminSession::new(h.client.clone(), h.notifier.clone());
    assert!(admin.check_auth().await.is_none());
    assert!(!admin.is_authenticated());
    assert!(h.store.get(ADMIN_TOKEN_KEY).unwrap().is_none());
}

#[tokio::test]
async fn test_admin_update_profile_sends_set_fields() {
    let h = setup().await;
    h.store.set(ADMIN_TOKEN_KEY, "admin-token").unwrap();

    Mock::given(method("GET"))
        .and(path("/api/admin/verify"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "admin": {"_id": "a1", "name": "Ops", "email": "ops@example.com"}
        })))
        .mount(&h.server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/admin/profile"))
        .and(header("Authorization", "Bearer admin-token"))
        .and(body_json(json!({"name": "Ops Lead"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "admin": {"_id": "a1", "name": "Ops Lead", "email": "ops@example.com"}
        })))
        .expect(1)
        .mount(&h.server)
        .await;

    let mut admin = AdminSession::new(h.client.clone(), h.notifier.clone());
    admin.check_auth().await;

    let update = AdminProfileUpdate {
        name: Some("Ops Lead".into()),
        ..AdminProfileUpdate::default()
    };
    let updated = admin.update_profile(&update).await.unwrap();

    assert_eq!(updated.name, "Ops Lead");
    assert_eq!(h.notifier.last().unwrap().message, "Admin profile updated successfully");
}

//! Customer and administrator sessions.
//!
//! The storefront has two independent authentication realms, each with its
//! own bearer token in the key-value store:
//!
//! - [`AuthRealm::User`]: customers, token under `token`
//! - [`AuthRealm::Admin`]: back-office staff, token under `adminToken`
//!
//! # Overview
//!
//! - [`UserSession`]: sign in, sign up, restore and update a customer session
//! - [`AdminSession`]: the same for administrators
//! - [`BearerToken`]: a stored token, with local expiry inspection
//! - [`AuthError`]: what can go wrong in either session
//!
//! # Session restore
//!
//! On startup call `check_auth` on each session. A stored token that is an
//! expired JWT is dropped without a request; any other token is sent to the
//! realm's verify endpoint, and removed if the backend rejects it.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use storefront_sdk::{AdminSession, HttpClient, UserSession};
//! use storefront_sdk::notify::TracingNotifier;
//!
//! let notifier = Arc::new(TracingNotifier);
//! let mut user = UserSession::new(client.clone(), notifier.clone());
//! let mut admin = AdminSession::new(client.clone(), notifier);
//!
//! user.check_auth().await;
//! admin.check_auth().await;
//! ```

mod admin;
mod errors;
mod realm;
mod session;
mod token;
mod user;

pub use admin::AdminSession;
pub use errors::AuthError;
pub use realm::AuthRealm;
pub use token::BearerToken;
pub use user::{UserSession, MIN_PASSWORD_LEN};

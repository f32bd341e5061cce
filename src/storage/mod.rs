//! Persistent key-value storage for client-side state.
//!
//! The storefront keeps a handful of string blobs between runs: the guest
//! cart, the two bearer tokens and the checkout hand-off. [`KeyValueStore`]
//! abstracts where they live so the state containers can be tested against
//! [`MemoryStore`] and shipped with [`JsonFileStore`].
//!
//! # Keys
//!
//! | Key | Contents |
//! |---|---|
//! | [`CART_KEY`] | guest cart, JSON object `productId -> variant -> line` |
//! | [`USER_TOKEN_KEY`] | customer bearer token |
//! | [`ADMIN_TOKEN_KEY`] | admin bearer token |
//! | [`CHECKOUT_DATA_KEY`] | checkout hand-off written by the cart view |
//!
//! # Example
//!
//! ```rust
//! use storefront_sdk::storage::{KeyValueStore, MemoryStore, USER_TOKEN_KEY};
//!
//! let store = MemoryStore::new();
//! store.set(USER_TOKEN_KEY, "abc").unwrap();
//! assert_eq!(store.get(USER_TOKEN_KEY).unwrap().as_deref(), Some("abc"));
//!
//! store.remove(USER_TOKEN_KEY).unwrap();
//! assert!(store.get(USER_TOKEN_KEY).unwrap().is_none());
//! ```

mod file_store;

pub use file_store::JsonFileStore;

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{Mutex, PoisonError};

use thiserror::Error;

/// Storage key for the guest cart.
pub const CART_KEY: &str = "cart";

/// Storage key for the customer bearer token.
pub const USER_TOKEN_KEY: &str = "token";

/// Storage key for the admin bearer token.
pub const ADMIN_TOKEN_KEY: &str = "adminToken";

/// Storage key for the checkout hand-off blob.
pub const CHECKOUT_DATA_KEY: &str = "checkoutData";

/// Errors raised by a [`KeyValueStore`].
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing data or a stored value is not valid JSON.
    #[error("Storage data is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A previous writer panicked while holding the store lock.
    #[error("Storage lock was poisoned")]
    Poisoned,
}

impl<T> From<PoisonError<T>> for StorageError {
    fn from(_: PoisonError<T>) -> Self {
        Self::Poisoned
    }
}

/// A string key-value store that survives between sessions.
///
/// Implementations must be safe to share between the API client, the session
/// holders and the cart container, hence the `Send + Sync` bound.
pub trait KeyValueStore: Send + Sync + Debug {
    /// Returns the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backing store cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backing store cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// An in-process [`KeyValueStore`].
///
/// Values are lost when the store is dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .lock()?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.lock()?.remove(key);
        Ok(())
    }
}

// Verify stores are Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<MemoryStore>();
    assert_send_sync::<JsonFileStore>();
};

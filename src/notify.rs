//! User-facing notices.
//!
//! Every state container reports the outcome of a user action as a short
//! [`Notice`]: "Item added to cart", "Login successful", the server's error
//! message. Where these go is up to the application, which supplies a
//! [`Notifier`]. The default, [`TracingNotifier`], writes them to the log.

use std::fmt::Debug;
use std::sync::{Mutex, PoisonError};

/// Severity of a [`Notice`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    /// The action succeeded.
    Success,
    /// The action failed; state was left unchanged.
    Error,
}

/// A transient message for the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    /// Severity of the notice.
    pub level: NoticeLevel,
    /// Text shown to the user.
    pub message: String,
}

impl Notice {
    /// Creates a success notice.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    /// Creates an error notice.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Receives notices from the state containers.
pub trait Notifier: Send + Sync + Debug {
    /// Delivers a notice.
    fn notify(&self, notice: Notice);

    /// Delivers a success notice.
    fn success(&self, message: &str) {
        self.notify(Notice::success(message));
    }

    /// Delivers an error notice.
    fn error(&self, message: &str) {
        self.notify(Notice::error(message));
    }
}

/// Writes notices to the `tracing` log.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Success => tracing::info!(notice = %notice.message, "storefront notice"),
            NoticeLevel::Error => tracing::warn!(notice = %notice.message, "storefront error notice"),
        }
    }
}

/// Collects notices in memory, for tests and headless callers.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl MemoryNotifier {
    /// Creates an empty notifier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every notice received so far.
    #[must_use]
    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Drains and returns every notice received so far.
    pub fn take(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.notices.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Returns the most recent notice, if any.
    #[must_use]
    pub fn last(&self) -> Option<Notice> {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, notice: Notice) {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_notifier_records_in_order() {
        let notifier = MemoryNotifier::new();
        notifier.success("Item added to cart");
        notifier.error("Failed to add item to cart");

        assert_eq!(
            notifier.notices(),
            vec![
                Notice::success("Item added to cart"),
                Notice::error("Failed to add item to cart"),
            ]
        );
        assert_eq!(notifier.last().unwrap().level, NoticeLevel::Error);
    }

    #[test]
    fn test_take_drains() {
        let notifier = MemoryNotifier::new();
        notifier.success("Cart cleared");

        assert_eq!(notifier.take().len(), 1);
        assert!(notifier.notices().is_empty());
    }

    #[test]
    fn test_tracing_notifier_does_not_panic_without_subscriber() {
        TracingNotifier.success("ok");
        TracingNotifier.error("failed");
    }
}

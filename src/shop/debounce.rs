//! Search-as-you-type debouncing.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Delays a search term until typing pauses.
///
/// Each call to [`input`](Self::input) cancels the pending term and schedules
/// the new one after the interval. Settled terms are published on a
/// [`watch`] channel; subscribers see only the latest.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use storefront_sdk::shop::SearchDebouncer;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let mut debouncer = SearchDebouncer::new(Duration::from_millis(10));
/// let mut settled = debouncer.subscribe();
///
/// debouncer.input("lin");
/// debouncer.input("linen");
///
/// settled.changed().await.unwrap();
/// assert_eq!(settled.borrow().as_deref(), Some("linen"));
/// # }
/// ```
#[derive(Debug)]
pub struct SearchDebouncer {
    interval: Duration,
    settled: Arc<watch::Sender<Option<String>>>,
    pending: Option<JoinHandle<()>>,
}

impl SearchDebouncer {
    /// Creates a debouncer that waits `interval` after the last keystroke.
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        let (settled, _) = watch::channel(None);
        Self {
            interval,
            settled: Arc::new(settled),
            pending: None,
        }
    }

    /// Returns the wait after the last keystroke.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Subscribes to settled terms.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.settled.subscribe()
    }

    /// Returns the last settled term.
    #[must_use]
    pub fn settled(&self) -> Option<String> {
        self.settled.borrow().clone()
    }

    /// Records a keystroke: cancels the pending term and schedules `term`.
    ///
    /// Outside a Tokio runtime the term settles immediately.
    pub fn input(&mut self, term: impl Into<String>) {
        self.cancel();
        let term = term.into();

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::debug!("No runtime for debounced search, settling immediately");
            self.settled.send_replace(Some(term));
            return;
        };

        let settled = Arc::clone(&self.settled);
        let interval = self.interval;
        self.pending = Some(runtime.spawn(async move {
            tokio::time::sleep(interval).await;
            settled.send_replace(Some(term));
        }));
    }

    /// Drops the pending term, if any.
    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }

    /// Returns `true` if a term is waiting to settle.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|pending| !pending.is_finished())
    }
}

impl Drop for SearchDebouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INTERVAL: Duration = Duration::from_millis(300);

    #[tokio::test(start_paused = true)]
    async fn test_only_last_term_settles() {
        let mut debouncer = SearchDebouncer::new(INTERVAL);
        let mut settled = debouncer.subscribe();

        debouncer.input("l");
        tokio::time::sleep(Duration::from_millis(100)).await;
        debouncer.input("li");
        tokio::time::sleep(Duration::from_millis(100)).await;
        debouncer.input("linen");

        settled.changed().await.unwrap();
        assert_eq!(settled.borrow_and_update().as_deref(), Some("linen"));
        assert_eq!(debouncer.settled().as_deref(), Some("linen"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_nothing_settles_before_interval() {
        let mut debouncer = SearchDebouncer::new(INTERVAL);
        let mut settled = debouncer.subscribe();
        let start = tokio::time::Instant::now();
        debouncer.input("shirt");

        tokio::time::sleep(Duration::from_millis(299)).await;
        assert!(debouncer.settled().is_none());
        assert!(debouncer.is_pending());

        settled.changed().await.unwrap();
        assert!(start.elapsed() >= INTERVAL);
        assert_eq!(debouncer.settled().as_deref(), Some("shirt"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_discards_pending_term() {
        let mut debouncer = SearchDebouncer::new(INTERVAL);
        debouncer.input("shirt");
        debouncer.cancel();

        tokio::time::sleep(INTERVAL * 2).await;
        assert!(debouncer.settled().is_none());
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_settles_immediately_without_runtime() {
        let mut debouncer = SearchDebouncer::new(INTERVAL);
        debouncer.input("shirt");
        assert_eq!(debouncer.settled().as_deref(), Some("shirt"));
    }
}

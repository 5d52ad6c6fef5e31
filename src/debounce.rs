//! Trailing-edge debouncer built on a tokio timer and a `watch` channel.
//!
//! Every [`Debounce::push`] restarts the timer. A value is published only
//! after it stayed unchanged for the configured delay, so a burst of pushes
//! publishes exactly one value: the last one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

#[derive(Debug, Clone)]
struct Slot<T> {
    revision: u64,
    value: Option<T>,
    cancelled: bool,
}

pub struct Debounce<T> {
    delay: Duration,
    revision: AtomicU64,
    slot: Arc<watch::Sender<Slot<T>>>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl<T> Debounce<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(delay: Duration) -> Self {
        let (sender, _) = watch::channel(Slot {
            revision: 0,
            value: None,
            cancelled: false,
        });
        Self {
            delay,
            revision: AtomicU64::new(0),
            slot: Arc::new(sender),
            pending: Mutex::new(None),
        }
    }

    /// Schedule `value`, replacing whatever was pending. Returns the
    /// revision to pass to [`Debounce::settled`].
    ///
    /// Must be called from within a tokio runtime.
    pub fn push(&self, value: T) -> u64 {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = pending.take() {
            previous.abort();
        }

        let revision = self.revision.fetch_add(1, Ordering::SeqCst) + 1;
        let slot = Arc::clone(&self.slot);
        let delay = self.delay;
        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            slot.send_replace(Slot {
                revision,
                value: Some(value),
                cancelled: false,
            });
        }));

        revision
    }

    /// Wait for the push that returned `revision`.
    ///
    /// Resolves to the value once it is published, or to `None` as soon as a
    /// later push is published instead or the debouncer is cancelled.
    pub async fn settled(&self, revision: u64) -> Option<T> {
        let mut receiver = self.slot.subscribe();
        let slot = receiver
            .wait_for(|slot| slot.revision >= revision)
            .await
            .ok()?;

        if slot.revision == revision && !slot.cancelled {
            slot.value.clone()
        } else {
            None
        }
    }

    /// Drop the pending timer, if any, and wake every waiter.
    pub fn cancel(&self) {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = pending.take() {
            handle.abort();
        }

        let revision = self.revision.load(Ordering::SeqCst);
        self.slot.send_replace(Slot {
            revision,
            value: None,
            cancelled: true,
        });
    }
}

impl<T> Drop for Debounce<T> {
    fn drop(&mut self) {
        let pending = self
            .pending
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = pending.take() {
            handle.abort();
        }
        self.slot.send_modify(|slot| {
            slot.value = None;
            slot.cancelled = true;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    const DELAY: Duration = Duration::from_millis(500);

    #[tokio::test(start_paused = true)]
    async fn publishes_after_delay() {
        let debounce = Debounce::new(DELAY);
        let start = Instant::now();

        let revision = debounce.push("coffee".to_string());

        assert_eq!(debounce.settled(revision).await.as_deref(), Some("coffee"));
        assert!(start.elapsed() >= DELAY);
    }

    #[tokio::test(start_paused = true)]
    async fn burst_publishes_only_last_value() {
        let debounce = Debounce::new(DELAY);
        let start = Instant::now();

        let first = debounce.push("c");
        tokio::time::sleep(Duration::from_millis(100)).await;
        let second = debounce.push("co");
        tokio::time::sleep(Duration::from_millis(100)).await;
        let last = debounce.push("cof");

        assert_eq!(debounce.settled(first).await, None);
        assert_eq!(debounce.settled(second).await, None);
        assert_eq!(debounce.settled(last).await, Some("cof"));
        assert!(start.elapsed() >= Duration::from_millis(200) + DELAY);

        tokio::time::sleep(DELAY * 4).await;
        let slot = debounce.slot.borrow();
        assert_eq!(slot.revision, last);
        assert_eq!(slot.value, Some("cof"));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_discards_pending_value() {
        let debounce = Debounce::new(DELAY);

        let revision = debounce.push(1u32);
        debounce.cancel();

        assert_eq!(debounce.settled(revision).await, None);

        let next = debounce.push(2u32);
        assert_eq!(debounce.settled(next).await, Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn drop_discards_pending_value() {
        let debounce = Debounce::new(DELAY);
        let mut receiver = debounce.slot.subscribe();

        debounce.push("tea");
        drop(debounce);
        tokio::time::sleep(DELAY * 2).await;

        assert!(receiver.changed().await.is_ok());
        {
            let slot = receiver.borrow_and_update();
            assert!(slot.cancelled);
            assert_eq!(slot.value, None);
        }
        assert!(receiver.changed().await.is_err());
    }
}

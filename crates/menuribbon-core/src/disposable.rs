//! Cancellable subscriptions and the keyed bag that owns them.
//!
//! A [`Subscription`] runs its cancel action exactly once: on an explicit
//! [`Subscription::dispose`] or when dropped, whichever comes first.
//! A [`DisposableBag`] holds at most one subscription per key and cancels the
//! previous occupant before storing a replacement.

use std::collections::HashMap;
use std::fmt;

/// Handle to a live subscription.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Create a subscription that runs `cancel` when disposed.
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Create a subscription with nothing to cancel.
    #[must_use]
    pub const fn empty() -> Self {
        Self { cancel: None }
    }

    /// Cancel the subscription. Later calls do nothing.
    pub fn dispose(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }

    /// Check if the subscription was already cancelled.
    #[must_use]
    pub const fn is_disposed(&self) -> bool {
        self.cancel.is_none()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

/// Keyed collection of subscriptions.
#[derive(Debug, Default)]
pub struct DisposableBag {
    storage: HashMap<String, Subscription>,
}

impl DisposableBag {
    /// Create an empty bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscription stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Subscription> {
        self.storage.get(key)
    }

    /// Store `subscription` under `key`, cancelling the previous occupant first.
    pub fn insert(&mut self, key: impl Into<String>, subscription: Subscription) {
        let key = key.into();
        if let Some(mut previous) = self.storage.remove(&key) {
            tracing::trace!(key = %key, "replacing subscription");
            previous.dispose();
        }
        self.storage.insert(key, subscription);
    }

    /// Cancel and forget the subscription under `key`.
    pub fn remove(&mut self, key: &str) -> bool {
        let Some(mut subscription) = self.storage.remove(key) else {
            return false;
        };
        subscription.dispose();
        true
    }

    /// Check if a subscription is stored under `key`.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.storage.contains_key(key)
    }

    /// Number of stored subscriptions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Check if the bag is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Cancel every subscription and empty the bag.
    pub fn clear(&mut self) {
        for (_, mut subscription) in self.storage.drain() {
            subscription.dispose();
        }
    }
}

impl Drop for DisposableBag {
    fn drop(&mut self) {
        self.clear();
    }
}

use tokio::sync::watch;

use super::provider::ProviderEvent;

/// Broadcast channel for identity-state changes.
///
/// One event per state change, exactly one active state at a time: the
/// channel always holds the latest emission and a new subscriber observes
/// it immediately. Subscriptions are scoped: dropping the guard is the
/// unsubscribe, so teardown is tied to the consuming view's lifetime.
#[derive(Debug)]
pub struct IdentityFeed {
    tx: watch::Sender<ProviderEvent>,
}

impl IdentityFeed {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(ProviderEvent::Initializing);
        Self { tx }
    }

    /// Publish a state change to all live subscribers.
    ///
    /// Publishing with no subscribers is fine: an in-flight sign-in that
    /// completes after the initiating view unmounted lands here and is
    /// simply not observed.
    pub fn publish(&self, event: ProviderEvent) {
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> IdentitySubscription {
        IdentitySubscription {
            rx: self.tx.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for IdentityFeed {
    fn default() -> Self {
        Self::new()
    }
}

/// Live handle onto the feed. Dropping it unsubscribes.
#[derive(Debug)]
pub struct IdentitySubscription {
    rx: watch::Receiver<ProviderEvent>,
}

impl IdentitySubscription {
    /// The most recent emission, without waiting.
    pub fn current(&self) -> ProviderEvent {
        self.rx.borrow().clone()
    }

    /// Wait for the next state change. Returns `None` once the feed itself
    /// has been dropped.
    pub async fn changed(&mut self) -> Option<ProviderEvent> {
        match self.rx.changed().await {
            Ok(()) => Some(self.rx.borrow_and_update().clone()),
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::IdentityRecord;

    #[tokio::test]
    async fn subscribe_observes_latest_state() {
        let feed = IdentityFeed::new();
        feed.publish(ProviderEvent::SignedOut);

        let sub = feed.subscribe();
        assert_eq!(sub.current(), ProviderEvent::SignedOut);
    }

    #[tokio::test]
    async fn each_mount_is_one_subscriber_and_drop_unsubscribes() {
        let feed = IdentityFeed::new();
        assert_eq!(feed.subscriber_count(), 0);

        let first = feed.subscribe();
        let second = feed.subscribe();
        assert_eq!(feed.subscriber_count(), 2);

        drop(first);
        assert_eq!(feed.subscriber_count(), 1);
        drop(second);
        assert_eq!(feed.subscriber_count(), 0);

        // Repeated mount/unmount cycles do not leak.
        for _ in 0..10 {
            let sub = feed.subscribe();
            drop(sub);
        }
        assert_eq!(feed.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn late_publish_after_teardown_does_not_panic() {
        let feed = IdentityFeed::new();
        let sub = feed.subscribe();
        drop(sub);

        // Simulates an abandoned sign-in completing after unmount.
        feed.publish(ProviderEvent::SignedIn(IdentityRecord::test_record()));
    }

    #[tokio::test]
    async fn changed_returns_none_when_feed_is_gone() {
        let feed = IdentityFeed::new();
        let mut sub = feed.subscribe();
        drop(feed);
        assert_eq!(sub.changed().await, None);
    }
}

use std::sync::{
    Arc,
    atomic::{AtomicBool, AtomicU64, Ordering},
};

use tokio::sync::watch;

use crate::models::CatalogSnapshot;

type Slot = Option<Arc<CatalogSnapshot>>;

/// Latest live catalog snapshot, pushed to every subscriber.
///
/// Only data read from the store is published here. Cached or bundled copies
/// are served by `catalog::cache` and never enter the feed. The feed is
/// online from a publish until the next failed store read.
#[derive(Clone)]
pub struct CatalogFeed {
    tx: Arc<watch::Sender<Slot>>,
    revision: Arc<AtomicU64>,
    online: Arc<AtomicBool>,
    loading: Arc<AtomicBool>,
    first_wait_spent: Arc<AtomicBool>,
}

impl Default for CatalogFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogFeed {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            tx: Arc::new(tx),
            revision: Arc::new(AtomicU64::new(0)),
            online: Arc::new(AtomicBool::new(false)),
            loading: Arc::new(AtomicBool::new(false)),
            first_wait_spent: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Replace the published snapshot wholesale and return its revision.
    pub fn publish(&self, mut snapshot: CatalogSnapshot) -> u64 {
        let revision = self.revision.fetch_add(1, Ordering::SeqCst) + 1;
        snapshot.revision = revision;
        self.tx.send_replace(Some(Arc::new(snapshot)));
        self.online.store(true, Ordering::SeqCst);
        tracing::debug!(revision, subscribers = self.tx.receiver_count(), "catalog published");
        revision
    }

    /// Last published snapshot, even if the store has since gone away.
    pub fn current(&self) -> Option<Arc<CatalogSnapshot>> {
        self.tx.borrow().clone()
    }

    /// Last published snapshot while the store is reachable.
    pub fn live(&self) -> Option<Arc<CatalogSnapshot>> {
        if self.is_online() { self.current() } else { None }
    }

    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }

    /// Record a failed store read. Returns whether the feed was online before.
    pub fn mark_offline(&self) -> bool {
        self.online.swap(false, Ordering::SeqCst)
    }

    /// Claim the loader slot. `false` when another loader is already running.
    pub fn begin_loading(&self) -> bool {
        self.loading
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    pub fn end_loading(&self) {
        self.loading.store(false, Ordering::SeqCst);
    }

    pub fn subscribe(&self) -> CatalogSubscription {
        CatalogSubscription {
            rx: self.tx.subscribe(),
            first_wait_spent: self.first_wait_spent.clone(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

/// Handle on the feed. Dropping it unsubscribes.
pub struct CatalogSubscription {
    rx: watch::Receiver<Slot>,
    first_wait_spent: Arc<AtomicBool>,
}

impl CatalogSubscription {
    pub fn current(&self) -> Option<Arc<CatalogSnapshot>> {
        self.rx.borrow().clone()
    }

    /// Whether some reader already waited out the first snapshot and gave up.
    /// Shared by every subscription of the same feed.
    pub fn first_wait_spent(&self) -> bool {
        self.first_wait_spent.load(Ordering::SeqCst)
    }

    pub fn spend_first_wait(&self) {
        self.first_wait_spent.store(true, Ordering::SeqCst);
    }

    /// Wait for the next published snapshot. Returns `None` once the feed is gone.
    /// Updates published while nobody was waiting are coalesced into the latest.
    pub async fn changed(&mut self) -> Option<Arc<CatalogSnapshot>> {
        loop {
            if self.rx.changed().await.is_err() {
                return None;
            }
            if let Some(snapshot) = self.rx.borrow_and_update().clone() {
                return Some(snapshot);
            }
        }
    }

    /// Wait until a snapshot newer than `revision` is available.
    pub async fn newer_than(&mut self, revision: u64) -> Option<Arc<CatalogSnapshot>> {
        if let Some(snapshot) = self.rx.borrow_and_update().clone() {
            if snapshot.revision > revision {
                return Some(snapshot);
            }
        }
        loop {
            let snapshot = self.changed().await?;
            if snapshot.revision > revision {
                return Some(snapshot);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn subscribers_see_the_latest_snapshot() {
        let feed = CatalogFeed::new();
        let mut sub = feed.subscribe();
        assert!(sub.current().is_none());

        feed.publish(CatalogSnapshot::default());
        feed.publish(CatalogSnapshot::default());

        let snapshot = tokio::time::timeout(Duration::from_secs(1), sub.changed())
            .await
            .expect("no timeout")
            .expect("feed alive");
        assert_eq!(snapshot.revision, 2);
    }

    #[tokio::test]
    async fn dropping_a_subscription_unsubscribes() {
        let feed = CatalogFeed::new();
        let baseline = feed.subscriber_count();
        {
            let _a = feed.subscribe();
            let _b = feed.subscribe();
            assert_eq!(feed.subscriber_count(), baseline + 2);
        }
        assert_eq!(feed.subscriber_count(), baseline);
    }

    #[tokio::test]
    async fn a_failed_read_takes_the_feed_offline_until_the_next_publish() {
        let feed = CatalogFeed::new();
        assert!(feed.live().is_none());

        feed.publish(CatalogSnapshot::default());
        assert!(feed.live().is_some());

        assert!(feed.mark_offline());
        assert!(feed.live().is_none());
        assert_eq!(feed.current().map(|s| s.revision), Some(1));
        assert!(!feed.mark_offline());

        feed.publish(CatalogSnapshot::default());
        assert_eq!(feed.live().map(|s| s.revision), Some(2));
    }

    #[tokio::test]
    async fn only_one_loader_at_a_time() {
        let feed = CatalogFeed::new();
        assert!(feed.begin_loading());
        assert!(!feed.clone().begin_loading());
        feed.end_loading();
        assert!(feed.begin_loading());
    }

    #[tokio::test]
    async fn newer_than_skips_known_revisions() {
        let feed = CatalogFeed::new();
        feed.publish(CatalogSnapshot::default());
        let mut sub = feed.subscribe();

        let waiter = tokio::spawn(async move { sub.newer_than(1).await.map(|s| s.revision) });
        tokio::task::yield_now().await;
        feed.publish(CatalogSnapshot::default());

        let revision = tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("no timeout")
            .expect("task joined");
        assert_eq!(revision, Some(2));
    }
}

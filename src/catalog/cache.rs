use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use serde::Serialize;
use tokio::sync::Mutex;
use utoipa::ToSchema;

use crate::{
    catalog::{decode::decode_snapshot, feed::CatalogSubscription},
    models::CatalogSnapshot,
};

/// Snapshot shipped inside the binary, used when neither the store nor a
/// cached copy is available.
const BUNDLED_MENU: &str = include_str!("../../data/menu-data.json");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotSource {
    Live,
    Cache,
    Bundled,
}

#[derive(Debug, Clone)]
pub struct MenuView {
    pub snapshot: Arc<CatalogSnapshot>,
    pub source: SnapshotSource,
}

/// Last live snapshot on local disk, in store tree shape.
///
/// Writes go through one lock that also remembers the newest revision on
/// disk, so the shared temp file is never written twice at once and an
/// older snapshot never replaces a newer one.
#[derive(Debug, Clone)]
pub struct SnapshotCache {
    path: PathBuf,
    written: Arc<Mutex<u64>>,
}

impl SnapshotCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            written: Arc::new(Mutex::new(0)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write unconditionally.
    pub async fn store(&self, snapshot: &CatalogSnapshot) -> anyhow::Result<()> {
        let _guard = self.written.lock().await;
        self.write(snapshot).await
    }

    /// Write only if `snapshot` is newer than what is on disk. Returns whether
    /// it was written.
    pub async fn store_latest(&self, snapshot: &CatalogSnapshot) -> anyhow::Result<bool> {
        let mut written = self.written.lock().await;
        if snapshot.revision <= *written {
            tracing::debug!(
                revision = snapshot.revision,
                on_disk = *written,
                "skipping stale cache write"
            );
            return Ok(false);
        }
        self.write(snapshot).await?;
        *written = snapshot.revision;
        Ok(true)
    }

    async fn write(&self, snapshot: &CatalogSnapshot) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut tree = snapshot.to_tree();
        if let Some(obj) = tree.as_object_mut() {
            obj.insert(
                "savedAt".into(),
                serde_json::json!(chrono::Utc::now().timestamp_millis()),
            );
        }
        let body = serde_json::to_vec(&tree)?;
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, body).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// `None` when there is no cache yet or it cannot be read.
    pub async fn load(&self) -> Option<CatalogSnapshot> {
        let body = match tokio::fs::read(&self.path).await {
            Ok(body) => body,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
            Err(err) => {
                tracing::warn!(error = %err, path = %self.path.display(), "snapshot cache unreadable");
                return None;
            }
        };
        match serde_json::from_slice(&body) {
            Ok(tree) => Some(decode_snapshot(&tree).snapshot),
            Err(err) => {
                tracing::warn!(error = %err, path = %self.path.display(), "snapshot cache corrupt");
                None
            }
        }
    }

    /// Write in the background; failures are logged only.
    pub fn store_detached(&self, snapshot: Arc<CatalogSnapshot>) {
        let cache = self.clone();
        tokio::spawn(async move {
            if let Err(err) = cache.store_latest(&snapshot).await {
                tracing::warn!(error = %err, "snapshot cache write failed");
            }
        });
    }
}

pub fn bundled_snapshot() -> CatalogSnapshot {
    match serde_json::from_str(BUNDLED_MENU) {
        Ok(tree) => decode_snapshot(&tree).snapshot,
        Err(err) => {
            tracing::error!(error = %err, "bundled menu is not valid json");
            CatalogSnapshot::default()
        }
    }
}

/// Pick the snapshot a menu read should use: live if present, otherwise wait
/// up to `wait` for the first live one, then fall back to the cache and
/// finally to the bundled document.
///
/// Only the first reader to time out pays the wait. Later reads fall back at
/// once until the loader publishes.
pub async fn resolve_menu_view(
    subscription: &mut CatalogSubscription,
    wait: Duration,
    cache: &SnapshotCache,
) -> MenuView {
    if let Some(snapshot) = subscription.current() {
        return MenuView {
            snapshot,
            source: SnapshotSource::Live,
        };
    }

    if !subscription.first_wait_spent() {
        if let Ok(Some(snapshot)) = tokio::time::timeout(wait, subscription.changed()).await {
            return MenuView {
                snapshot,
                source: SnapshotSource::Live,
            };
        }
        subscription.spend_first_wait();
        tracing::info!(wait_ms = %wait.as_millis(), "no live catalog in time, falling back until it loads");
    }

    if let Some(snapshot) = cache.load().await {
        tracing::warn!("catalog store slow or unreachable, serving cached menu");
        return MenuView {
            snapshot: Arc::new(snapshot),
            source: SnapshotSource::Cache,
        };
    }

    tracing::warn!("no cached menu, serving bundled copy");
    MenuView {
        snapshot: Arc::new(bundled_snapshot()),
        source: SnapshotSource::Bundled,
    }
}

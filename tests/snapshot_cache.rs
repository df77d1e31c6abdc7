mod common;

use std::time::Duration;

use menu_order_api::catalog::{
    cache::{SnapshotCache, SnapshotSource, bundled_snapshot, resolve_menu_view},
    feed::CatalogFeed,
};

#[tokio::test]
async fn cache_round_trips_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let cache = SnapshotCache::new(dir.path().join("nested").join("menu.json"));
    assert!(cache.load().await.is_none());

    let snapshot = common::sample_snapshot();
    cache.store(&snapshot).await.unwrap();

    let loaded = cache.load().await.unwrap();
    assert_eq!(loaded.categories, snapshot.categories);
    assert_eq!(loaded.items, snapshot.items);
    assert_eq!(loaded.settings, snapshot.settings);
}

#[tokio::test]
async fn corrupt_cache_is_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("menu.json");
    tokio::fs::write(&path, b"{not json").await.unwrap();
    assert!(SnapshotCache::new(path).load().await.is_none());
}

#[tokio::test]
async fn live_snapshot_wins() {
    let dir = tempfile::tempdir().unwrap();
    let cache = SnapshotCache::new(dir.path().join("menu.json"));
    let feed = CatalogFeed::new();
    feed.publish(common::sample_snapshot());

    let mut sub = feed.subscribe();
    let view = resolve_menu_view(&mut sub, Duration::from_millis(10), &cache).await;
    assert_eq!(view.source, SnapshotSource::Live);
    assert_eq!(view.snapshot.revision, 1);
}

#[tokio::test]
async fn a_snapshot_published_while_waiting_is_live() {
    let dir = tempfile::tempdir().unwrap();
    let cache = SnapshotCache::new(dir.path().join("menu.json"));
    let feed = CatalogFeed::new();
    let mut sub = feed.subscribe();

    let publisher = feed.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        publisher.publish(common::sample_snapshot());
    });

    let view = resolve_menu_view(&mut sub, Duration::from_secs(2), &cache).await;
    assert_eq!(view.source, SnapshotSource::Live);
}

#[tokio::test]
async fn falls_back_to_cache_then_bundled() {
    let dir = tempfile::tempdir().unwrap();
    let cache = SnapshotCache::new(dir.path().join("menu.json"));
    let feed = CatalogFeed::new();

    let mut sub = feed.subscribe();
    let view = resolve_menu_view(&mut sub, Duration::from_millis(10), &cache).await;
    assert_eq!(view.source, SnapshotSource::Bundled);
    assert_eq!(*view.snapshot, bundled_snapshot());
    assert!(!view.snapshot.categories.is_empty());

    cache.store(&common::sample_snapshot()).await.unwrap();
    let view = resolve_menu_view(&mut sub, Duration::from_millis(10), &cache).await;
    assert_eq!(view.source, SnapshotSource::Cache);
    assert_eq!(view.snapshot.items.len(), 2);
    assert!(feed.current().is_none(), "fallback copies never enter the feed");
}

#[tokio::test]
async fn only_the_first_reader_waits_for_the_store() {
    let dir = tempfile::tempdir().unwrap();
    let cache = SnapshotCache::new(dir.path().join("menu.json"));
    cache.store(&common::sample_snapshot()).await.unwrap();
    let feed = CatalogFeed::new();
    let wait = Duration::from_millis(300);

    let started = std::time::Instant::now();
    let view = resolve_menu_view(&mut feed.subscribe(), wait, &cache).await;
    assert_eq!(view.source, SnapshotSource::Cache);
    assert!(started.elapsed() >= wait);

    let started = std::time::Instant::now();
    let view = resolve_menu_view(&mut feed.subscribe(), wait, &cache).await;
    assert_eq!(view.source, SnapshotSource::Cache);
    assert!(started.elapsed() < wait, "second read waited {:?}", started.elapsed());

    feed.publish(common::sample_snapshot());
    let view = resolve_menu_view(&mut feed.subscribe(), wait, &cache).await;
    assert_eq!(view.source, SnapshotSource::Live);
}

#[tokio::test]
async fn an_older_snapshot_never_replaces_a_newer_one() {
    let dir = tempfile::tempdir().unwrap();
    let cache = SnapshotCache::new(dir.path().join("menu.json"));

    let mut newer = common::sample_snapshot();
    newer.revision = 2;
    newer.items.truncate(1);
    let mut older = common::sample_snapshot();
    older.revision = 1;

    assert!(cache.store_latest(&newer).await.unwrap());
    assert!(!cache.store_latest(&older).await.unwrap());
    assert!(!cache.store_latest(&newer).await.unwrap());
    assert_eq!(cache.load().await.unwrap().items.len(), 1);

    let writers: Vec<_> = (3..=8)
        .rev()
        .map(|revision| {
            let cache = cache.clone();
            let mut snapshot = common::sample_snapshot();
            snapshot.revision = revision;
            snapshot.categories.truncate(if revision == 8 { 1 } else { 2 });
            tokio::spawn(async move { cache.store_latest(&snapshot).await })
        })
        .collect();
    for writer in writers {
        writer.await.unwrap().unwrap();
    }
    assert_eq!(cache.load().await.unwrap().categories.len(), 1);
    assert!(!dir.path().join("menu.tmp").exists());
}

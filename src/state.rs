use std::sync::Arc;

use crate::{
    cart::CartStore,
    catalog::{cache::SnapshotCache, feed::CatalogFeed},
    config::AppConfig,
    db::{DbPool, OrmConn, orm_from_pool},
};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub config: Arc<AppConfig>,
    pub catalog: CatalogFeed,
    pub cache: SnapshotCache,
    pub carts: CartStore,
}

impl AppState {
    pub fn new(pool: DbPool, config: AppConfig) -> Self {
        let orm = orm_from_pool(pool.clone());
        let cache = SnapshotCache::new(config.snapshot_cache_path.clone());
        Self {
            pool,
            orm,
            config: Arc::new(config),
            catalog: CatalogFeed::new(),
            cache,
            carts: CartStore::new(),
        }
    }
}

use std::{env, path::PathBuf, time::Duration};

use chrono::{FixedOffset, Offset, Utc};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub upload_dir: PathBuf,
    pub image_base_url: String,
    pub placeholder_image: PathBuf,
    /// Preset item pictures offered to admins, served under `/featured`.
    pub featured_dir: PathBuf,
    pub snapshot_cache_path: PathBuf,
    /// How long a menu request waits for the first live snapshot before
    /// falling back to the cached or bundled copy.
    pub catalog_wait: Duration,
    pub cart_idle: Duration,
    pub order_utc_offset_minutes: i32,
    pub max_body_bytes: usize,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = parse_or("APP_PORT", 3000);
        Ok(Self {
            port,
            database_url,
            host,
            upload_dir: env::var("UPLOAD_DIR")
                .unwrap_or_else(|_| "uploads".to_string())
                .into(),
            image_base_url: env::var("IMAGE_BASE_URL").unwrap_or_else(|_| "/images".to_string()),
            placeholder_image: env::var("PLACEHOLDER_IMAGE")
                .unwrap_or_else(|_| "static/placeholder.png".to_string())
                .into(),
            featured_dir: env::var("FEATURED_DIR")
                .unwrap_or_else(|_| "static/featured".to_string())
                .into(),
            snapshot_cache_path: env::var("SNAPSHOT_CACHE_PATH")
                .unwrap_or_else(|_| "cache/menu-cache.json".to_string())
                .into(),
            catalog_wait: Duration::from_secs(parse_or("CATALOG_WAIT_SECS", 8)),
            cart_idle: Duration::from_secs(parse_or("CART_IDLE_SECS", 7200)),
            order_utc_offset_minutes: parse_or("ORDER_UTC_OFFSET_MINUTES", 120),
            max_body_bytes: parse_or("MAX_BODY_BYTES", 5 * 1024 * 1024),
        })
    }

    /// Defaults for everything except the database URL.
    pub fn with_database_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            host: "127.0.0.1".to_string(),
            port: 3000,
            upload_dir: "uploads".into(),
            image_base_url: "/images".to_string(),
            placeholder_image: "static/placeholder.png".into(),
            featured_dir: "static/featured".into(),
            snapshot_cache_path: "cache/menu-cache.json".into(),
            catalog_wait: Duration::from_secs(8),
            cart_idle: Duration::from_secs(7200),
            order_utc_offset_minutes: 120,
            max_body_bytes: 5 * 1024 * 1024,
        }
    }

    /// Offset used for the timestamp printed on order messages.
    pub fn order_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.order_utc_offset_minutes * 60)
            .unwrap_or_else(|| Utc.fix())
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

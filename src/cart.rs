use std::{
    collections::HashMap,
    fmt,
    sync::Arc,
    time::{Duration, Instant},
};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    dto::orders::OrderReceipt,
    models::{MenuItem, format_amount},
};

/// Identifies a cart line: the same item at two price points is two lines.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct LineKey(String);

impl LineKey {
    pub fn new(item_id: &str, price: Decimal) -> Self {
        Self(format!("{item_id}-{}", format_amount(price)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for LineKey {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl fmt::Display for LineKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CartLine {
    pub key: LineKey,
    pub item_id: String,
    pub name: String,
    #[schema(value_type = String)]
    pub unit_price: Decimal,
    pub quantity: u32,
}

impl CartLine {
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Lines in the order they were first added. A line never holds quantity 0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one unit of `item` at `price`.
    pub fn add_line(&mut self, item: &MenuItem, price: Decimal) -> &CartLine {
        let key = LineKey::new(&item.id, price);
        let idx = match self.position(&key) {
            Some(idx) => {
                self.lines[idx].quantity += 1;
                idx
            }
            None => {
                self.lines.push(CartLine {
                    key,
                    item_id: item.id.clone(),
                    name: item.name.clone(),
                    unit_price: price,
                    quantity: 1,
                });
                self.lines.len() - 1
            }
        };
        &self.lines[idx]
    }

    /// Returns false when no line has `key`.
    pub fn increase(&mut self, key: &LineKey) -> bool {
        match self.position(key) {
            Some(idx) => {
                self.lines[idx].quantity += 1;
                true
            }
            None => false,
        }
    }

    /// Drops the line when its quantity reaches 0. Returns false when no line has `key`.
    pub fn decrease(&mut self, key: &LineKey) -> bool {
        let Some(idx) = self.position(key) else {
            return false;
        };
        if self.lines[idx].quantity <= 1 {
            self.lines.remove(idx);
        } else {
            self.lines[idx].quantity -= 1;
        }
        true
    }

    pub fn remove_line(&mut self, key: &LineKey) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| &l.key != key);
        self.lines.len() != before
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn line(&self, key: &LineKey) -> Option<&CartLine> {
        self.lines.iter().find(|l| &l.key == key)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn total_items(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    pub fn total_price(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    fn position(&self, key: &LineKey) -> Option<usize> {
        self.lines.iter().position(|l| &l.key == key)
    }
}

#[derive(Debug, Clone)]
pub struct CartSession {
    pub cart: Cart,
    /// Receipt of the last order sent from this session, kept for display.
    pub last_order: Option<OrderReceipt>,
    touched: Instant,
}

impl CartSession {
    fn new() -> Self {
        Self {
            cart: Cart::new(),
            last_order: None,
            touched: Instant::now(),
        }
    }
}

/// Carts live in memory for the lifetime of a session and are not persisted.
#[derive(Clone, Default)]
pub struct CartStore {
    sessions: Arc<RwLock<HashMap<Uuid, CartSession>>>,
}

impl CartStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self) -> Uuid {
        let id = Uuid::new_v4();
        self.sessions.write().await.insert(id, CartSession::new());
        id
    }

    /// Run `f` against the session, refreshing its idle timer. `None` when unknown.
    pub async fn with_session<R>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut CartSession) -> R,
    ) -> Option<R> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&id)?;
        session.touched = Instant::now();
        Some(f(session))
    }

    pub async fn remove(&self, id: Uuid) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Drop sessions untouched for longer than `idle`. Returns how many were dropped.
    pub async fn evict_idle(&self, idle: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| s.touched.elapsed() < idle);
        before - sessions.len()
    }

    pub fn spawn_sweeper(&self, idle: Duration) -> tokio::task::JoinHandle<()> {
        let store = self.clone();
        let period = (idle / 4).max(Duration::from_secs(1));
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                let evicted = store.evict_idle(idle).await;
                if evicted > 0 {
                    tracing::debug!(evicted, "evicted idle carts");
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PriceList;

    fn item(id: &str, name: &str, prices: &str) -> MenuItem {
        MenuItem {
            id: id.into(),
            name: name.into(),
            ingredients: None,
            prices: PriceList::parse(prices).unwrap(),
            category_id: "c".into(),
            visible: true,
            image: None,
            star: false,
            created_at: 0,
        }
    }

    #[test]
    fn same_item_at_two_prices_is_two_lines() {
        let burger = item("b", "Burger", "20,25");
        let mut cart = Cart::new();
        cart.add_line(&burger, Decimal::from(20));
        cart.add_line(&burger, Decimal::from(25));
        cart.add_line(&burger, Decimal::from(20));

        assert_eq!(cart.lines().len(), 2);
        assert_eq!(cart.line(&LineKey::new("b", Decimal::from(20))).unwrap().quantity, 2);
        assert_eq!(cart.total_items(), 3);
        assert_eq!(cart.total_price(), Decimal::from(65));
    }

    #[test]
    fn key_ignores_trailing_zeros() {
        assert_eq!(
            LineKey::new("x", Decimal::new(2000, 2)),
            LineKey::new("x", Decimal::from(20))
        );
    }

    #[test]
    fn unknown_keys_are_no_ops() {
        let mut cart = Cart::new();
        let key = LineKey::from("missing-1".to_string());
        assert!(!cart.increase(&key));
        assert!(!cart.decrease(&key));
        assert!(!cart.remove_line(&key));
        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn idle_sessions_are_evicted() {
        let store = CartStore::new();
        let id = store.create().await;
        assert_eq!(store.evict_idle(Duration::from_secs(60)).await, 0);
        assert_eq!(store.evict_idle(Duration::ZERO).await, 1);
        assert!(store.with_session(id, |_| ()).await.is_none());
    }
}

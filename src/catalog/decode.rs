//! Validating decode of raw store records.
//!
//! Records in the catalog tree have no schema guarantee: fields may be
//! missing, mistyped, or written by an older client. Everything entering the
//! service from a raw tree goes through these functions, which either produce
//! a typed record or say why the record was rejected.

use serde_json::Value;
use thiserror::Error;

use crate::models::{
    Category, CatalogSnapshot, FooterInfo, MenuItem, OrderSettings, PriceList, SiteSettings,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("record is not an object")]
    NotAnObject,
    #[error("missing or empty field `{0}`")]
    MissingField(&'static str),
    #[error("field `price`: {0}")]
    Price(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejected {
    pub path: String,
    pub reason: DecodeError,
}

#[derive(Debug, Clone, Default)]
pub struct DecodedCatalog {
    pub snapshot: CatalogSnapshot,
    pub rejected: Vec<Rejected>,
}

pub fn decode_category(id: &str, raw: &Value) -> Result<Category, DecodeError> {
    let obj = raw.as_object().ok_or(DecodeError::NotAnObject)?;
    let name = non_empty_str(obj.get("name")).ok_or(DecodeError::MissingField("name"))?;
    Ok(Category {
        id: id.to_string(),
        name,
        order: obj
            .get("order")
            .and_then(Value::as_i64)
            .and_then(|o| i32::try_from(o).ok())
            .unwrap_or(0),
        available: flag_default_true(obj.get("available")),
        created_at: obj.get("createdAt").and_then(Value::as_i64).unwrap_or(0),
    })
}

pub fn decode_item(id: &str, raw: &Value) -> Result<MenuItem, DecodeError> {
    let obj = raw.as_object().ok_or(DecodeError::NotAnObject)?;
    let name = non_empty_str(obj.get("name")).ok_or(DecodeError::MissingField("name"))?;
    let category_id =
        non_empty_str(obj.get("categoryId")).ok_or(DecodeError::MissingField("categoryId"))?;

    let raw_price = match obj.get("price") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => return Err(DecodeError::MissingField("price")),
    };
    let prices =
        PriceList::parse_lenient(&raw_price).map_err(|e| DecodeError::Price(e.to_string()))?;

    Ok(MenuItem {
        id: id.to_string(),
        name,
        ingredients: non_empty_str(obj.get("ingredients")),
        prices,
        category_id,
        visible: flag_default_true(obj.get("visible")),
        image: non_empty_str(obj.get("image")),
        star: obj.get("star").and_then(Value::as_bool).unwrap_or(false),
        created_at: obj.get("createdAt").and_then(Value::as_i64).unwrap_or(0),
    })
}

pub fn decode_order_settings(raw: Option<&Value>) -> OrderSettings {
    let Some(obj) = raw.and_then(Value::as_object) else {
        return OrderSettings::default();
    };
    OrderSettings {
        in_restaurant: truthy(obj.get("inRestaurant")),
        takeaway: truthy(obj.get("takeaway")),
        in_phone: digits(obj.get("inPhone")),
        out_phone: digits(obj.get("outPhone")),
    }
}

pub fn decode_footer(raw: Option<&Value>) -> FooterInfo {
    let Some(obj) = raw.and_then(Value::as_object) else {
        return FooterInfo::default();
    };
    let text = |key: &str| non_empty_str(obj.get(key)).unwrap_or_default();
    FooterInfo {
        address: text("address"),
        phone: text("phone"),
        whatsapp: digits(obj.get("whatsapp")),
        facebook: text("facebook"),
        instagram: text("instagram"),
        tiktok: text("tiktok"),
        telegram: text("telegram"),
    }
}

/// Decode the `settings` subtree. A missing `orderSystem` means ordering is on.
pub fn decode_settings(raw: Option<&Value>) -> SiteSettings {
    let obj = raw.and_then(Value::as_object);
    let get = |key: &str| obj.and_then(|o| o.get(key));
    SiteSettings {
        order_system: get("orderSystem").and_then(Value::as_bool).unwrap_or(true),
        order_settings: decode_order_settings(get("orderSettings")),
        complaints_whatsapp: digits(get("complaintsWhatsapp")),
        footer: decode_footer(get("footerInfo")),
    }
}

/// Decode a whole catalog tree. Bad records are collected, not fatal.
pub fn decode_snapshot(tree: &Value) -> DecodedCatalog {
    let mut rejected = Vec::new();

    let mut categories = Vec::new();
    if let Some(map) = tree.get("categories").and_then(Value::as_object) {
        for (id, raw) in map {
            match decode_category(id, raw) {
                Ok(c) => categories.push(c),
                Err(reason) => rejected.push(Rejected {
                    path: format!("categories/{id}"),
                    reason,
                }),
            }
        }
    }
    categories.sort_by(|a, b| {
        a.order
            .cmp(&b.order)
            .then(a.created_at.cmp(&b.created_at))
            .then_with(|| a.id.cmp(&b.id))
    });

    let mut items = Vec::new();
    if let Some(map) = tree.get("items").and_then(Value::as_object) {
        for (id, raw) in map {
            match decode_item(id, raw) {
                Ok(i) => items.push(i),
                Err(reason) => rejected.push(Rejected {
                    path: format!("items/{id}"),
                    reason,
                }),
            }
        }
    }
    items.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));

    let mut settings = decode_settings(tree.get("settings"));
    // Older exports kept the flag at the top level.
    if let Some(flag) = tree.get("orderSystem").and_then(Value::as_bool) {
        settings.order_system = flag;
    }

    for r in &rejected {
        tracing::warn!(path = %r.path, reason = %r.reason, "rejected catalog record");
    }

    DecodedCatalog {
        snapshot: CatalogSnapshot {
            revision: 0,
            categories,
            items,
            settings,
        },
        rejected,
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn flag_default_true(value: Option<&Value>) -> bool {
    !matches!(value, Some(Value::Bool(false)))
}

fn truthy(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        _ => false,
    }
}

/// Phone-like fields keep their digits only.
pub fn digits(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => only_digits(s),
        Some(Value::Number(n)) => only_digits(&n.to_string()),
        _ => String::new(),
    }
}

pub fn only_digits(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

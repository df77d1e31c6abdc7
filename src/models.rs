use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceError {
    #[error("at least one price is required")]
    Empty,
    #[error("invalid price `{0}`")]
    Invalid(String),
    #[error("price `{0}` must not be negative")]
    Negative(String),
}

/// One or more price points of a menu item, stored as `"20,25"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceList(Vec<Decimal>);

impl PriceList {
    /// Every comma-separated entry must be a non-negative number.
    pub fn parse(raw: &str) -> Result<Self, PriceError> {
        let mut points = Vec::new();
        for part in raw.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            points.push(parse_point(part)?);
        }
        if points.is_empty() {
            return Err(PriceError::Empty);
        }
        Ok(Self(points))
    }

    /// Keeps the entries that parse and drops the rest. Used on records read
    /// back from the store, where one bad entry should not hide the item.
    pub fn parse_lenient(raw: &str) -> Result<Self, PriceError> {
        let points: Vec<Decimal> = raw
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .filter_map(|p| parse_point(p).ok())
            .collect();
        if points.is_empty() {
            return Err(PriceError::Empty);
        }
        Ok(Self(points))
    }

    pub fn single(price: Decimal) -> Self {
        Self(vec![price])
    }

    pub fn points(&self) -> &[Decimal] {
        &self.0
    }

    pub fn contains(&self, price: Decimal) -> bool {
        self.0.iter().any(|p| *p == price)
    }

    /// True when any price, as printed, contains `needle`.
    pub fn mentions(&self, needle: &str) -> bool {
        self.0.iter().any(|p| format_amount(*p).contains(needle))
    }
}

impl fmt::Display for PriceList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .0
            .iter()
            .map(|p| format_amount(*p))
            .collect::<Vec<_>>()
            .join(",");
        f.write_str(&joined)
    }
}

fn parse_point(raw: &str) -> Result<Decimal, PriceError> {
    let value = Decimal::from_str(raw).map_err(|_| PriceError::Invalid(raw.to_string()))?;
    if value.is_sign_negative() && !value.is_zero() {
        return Err(PriceError::Negative(raw.to_string()));
    }
    Ok(value)
}

/// Store timestamps are milliseconds since the Unix epoch.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// `20.00` prints as `20`, `12.50` as `12.5`.
pub fn format_amount(value: Decimal) -> String {
    value.normalize().to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub order: i32,
    pub available: bool,
    /// Milliseconds since the Unix epoch.
    pub created_at: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    pub ingredients: Option<String>,
    #[schema(value_type = Vec<String>)]
    pub prices: PriceList,
    pub category_id: String,
    pub visible: bool,
    pub image: Option<String>,
    pub star: bool,
    pub created_at: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct OrderSettings {
    pub in_restaurant: bool,
    pub takeaway: bool,
    pub in_phone: String,
    pub out_phone: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct FooterInfo {
    pub address: String,
    pub phone: String,
    pub whatsapp: String,
    pub facebook: String,
    pub instagram: String,
    pub tiktok: String,
    pub telegram: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SiteSettings {
    pub order_system: bool,
    pub order_settings: OrderSettings,
    pub complaints_whatsapp: String,
    pub footer: FooterInfo,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            order_system: true,
            order_settings: OrderSettings::default(),
            complaints_whatsapp: String::new(),
            footer: FooterInfo::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct CatalogSnapshot {
    pub revision: u64,
    pub categories: Vec<Category>,
    pub items: Vec<MenuItem>,
    pub settings: SiteSettings,
}

impl CatalogSnapshot {
    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn item(&self, id: &str) -> Option<&MenuItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Store-shaped tree, readable by `catalog::decode::decode_snapshot`.
    pub fn to_tree(&self) -> Value {
        let categories: Map<String, Value> = self
            .categories
            .iter()
            .map(|c| {
                (
                    c.id.clone(),
                    json!({
                        "name": c.name,
                        "order": c.order,
                        "available": c.available,
                        "createdAt": c.created_at,
                    }),
                )
            })
            .collect();

        let items: Map<String, Value> = self
            .items
            .iter()
            .map(|i| {
                let mut record = json!({
                    "name": i.name,
                    "price": i.prices.to_string(),
                    "categoryId": i.category_id,
                    "visible": i.visible,
                    "star": i.star,
                    "createdAt": i.created_at,
                });
                if let Some(obj) = record.as_object_mut() {
                    if let Some(ingredients) = &i.ingredients {
                        obj.insert("ingredients".into(), json!(ingredients));
                    }
                    if let Some(image) = &i.image {
                        obj.insert("image".into(), json!(image));
                    }
                }
                (i.id.clone(), record)
            })
            .collect();

        json!({
            "categories": categories,
            "items": items,
            "settings": self.settings.to_tree(),
        })
    }
}

impl SiteSettings {
    pub fn to_tree(&self) -> Value {
        let o = &self.order_settings;
        let f = &self.footer;
        json!({
            "orderSystem": self.order_system,
            "orderSettings": {
                "inRestaurant": o.in_restaurant,
                "takeaway": o.takeaway,
                "inPhone": o.in_phone,
                "outPhone": o.out_phone,
            },
            "complaintsWhatsapp": self.complaints_whatsapp,
            "footerInfo": {
                "address": f.address,
                "phone": f.phone,
                "whatsapp": f.whatsapp,
                "facebook": f.facebook,
                "instagram": f.instagram,
                "tiktok": f.tiktok,
                "telegram": f.telegram,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_comma_separated_prices() {
        let prices = PriceList::parse(" 20, 25.5 ,").unwrap();
        assert_eq!(prices.to_string(), "20,25.5");
        assert!(prices.contains(Decimal::new(255, 1)));
    }

    #[test]
    fn strict_parse_rejects_garbage_but_lenient_keeps_the_rest() {
        assert_eq!(
            PriceList::parse("20,abc"),
            Err(PriceError::Invalid("abc".into()))
        );
        assert_eq!(PriceList::parse(" , "), Err(PriceError::Empty));
        let lenient = PriceList::parse_lenient("20,abc").unwrap();
        assert_eq!(lenient.points(), &[Decimal::from(20)]);
    }

    #[test]
    fn negative_prices_are_rejected() {
        assert!(matches!(
            PriceList::parse("-5"),
            Err(PriceError::Negative(_))
        ));
    }
}

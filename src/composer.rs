//! Turns a cart and a contact form into the text of a WhatsApp order, and
//! a feedback form into the text of a complaint/review message.

use std::fmt;

use chrono::{DateTime, FixedOffset};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::{
    cart::CartLine,
    models::{SiteSettings, format_amount},
};

const RULE: &str = "========================";
const CURRENCY: &str = "₪";

/// Characters left alone by JavaScript's `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    DineIn,
    Takeaway,
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderType::DineIn => f.write_str("dine-in"),
            OrderType::Takeaway => f.write_str("takeaway"),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct OrderForm {
    #[serde(default)]
    pub name: String,
    pub table: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderValidationError {
    #[error("customer name is required")]
    MissingName,
    #[error("table number is required and must be numeric")]
    InvalidTable,
    #[error("phone number must have 6 to 15 digits")]
    InvalidPhone,
    #[error("delivery address is required")]
    MissingAddress,
}

/// Contact details that passed validation for one order type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Contact {
    DineIn {
        name: String,
        table: String,
    },
    Takeaway {
        name: String,
        phone: String,
        address: String,
    },
}

impl Contact {
    pub fn order_type(&self) -> OrderType {
        match self {
            Contact::DineIn { .. } => OrderType::DineIn,
            Contact::Takeaway { .. } => OrderType::Takeaway,
        }
    }
}

pub fn validate(order_type: OrderType, form: &OrderForm) -> Result<Contact, OrderValidationError> {
    let name = form.name.trim();
    if name.is_empty() {
        return Err(OrderValidationError::MissingName);
    }

    match order_type {
        OrderType::DineIn => {
            let table = trimmed(form.table.as_deref());
            if table.is_empty() || !table.chars().all(|c| c.is_ascii_digit()) {
                return Err(OrderValidationError::InvalidTable);
            }
            Ok(Contact::DineIn {
                name: name.to_string(),
                table: table.to_string(),
            })
        }
        OrderType::Takeaway => {
            let phone = trimmed(form.phone.as_deref());
            if !is_valid_phone(phone) {
                return Err(OrderValidationError::InvalidPhone);
            }
            let address = trimmed(form.address.as_deref());
            if address.is_empty() {
                return Err(OrderValidationError::MissingAddress);
            }
            Ok(Contact::Takeaway {
                name: name.to_string(),
                phone: phone.to_string(),
                address: address.to_string(),
            })
        }
    }
}

/// Optional leading `+`, then 6 to 15 digits.
pub fn is_valid_phone(raw: &str) -> bool {
    let digits = raw.strip_prefix('+').unwrap_or(raw);
    (6..=15).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit())
}

fn trimmed(value: Option<&str>) -> &str {
    value.map(str::trim).unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComposedOrder {
    pub order_type: OrderType,
    pub message: String,
    pub total: Decimal,
    pub total_items: u32,
}

pub fn compose(
    lines: &[CartLine],
    contact: &Contact,
    notes: Option<&str>,
    now: DateTime<FixedOffset>,
) -> ComposedOrder {
    let total: Decimal = lines.iter().map(CartLine::line_total).sum();
    let total_items = lines.iter().map(|l| l.quantity).sum();

    let list = lines
        .iter()
        .map(|l| {
            format!(
                "🔹 {} × {} → {}{CURRENCY}",
                l.quantity,
                l.name,
                format_amount(l.line_total())
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let notes = notes.map(str::trim).filter(|n| !n.is_empty()).unwrap_or("—");
    let time = now.format("%H:%M");
    let date = now.format("%d/%m/%Y");
    let total_text = format_amount(total);

    let message = match contact {
        Contact::DineIn { name, table } => format!(
            "✨ *طلب داخل المطعم* ✨\n\
             {RULE}\n\
             {list}\n\
             {RULE}\n\
             \n\
             💰 *الإجمالي:* {total_text}{CURRENCY}\n\
             {RULE}\n\
             \n\
             👤 *الاسم:* {name}\n\
             🍽️ *رقم الطاولة:* {table}\n\
             📝 *ملاحظات:* {notes}\n\
             \n\
             ⏰ *وقت الطلب:* {time}\n\
             📅 *تاريخ الطلب:* {date}\n\
             \n\
             💵 الدفع عند الكاشير\n\
             {RULE}"
        ),
        Contact::Takeaway {
            name,
            phone,
            address,
        } => format!(
            "✨ *طلب تيك أواي* ✨\n\
             {RULE}\n\
             {list}\n\
             {RULE}\n\
             \n\
             💰 *الإجمالي:* {total_text}{CURRENCY}\n\
             👤 *الاسم:* {name}\n\
             📱 *الجوال:* {phone}\n\
             🏠 *العنوان:* {address}\n\
             📝 *ملاحظات:* {notes}\n\
             \n\
             ⏰ *وقت الطلب:* {time}\n\
             📅 *تاريخ الطلب:* {date}\n\
             \n\
             💵 الدفع عند الاستلام\n\
             {RULE}"
        ),
    };

    ComposedOrder {
        order_type: contact.order_type(),
        message,
        total,
        total_items,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DestinationError {
    #[error("ordering is currently disabled")]
    OrderingDisabled,
    #[error("{0} orders are not accepted right now")]
    ChannelDisabled(OrderType),
    #[error("no WhatsApp number configured for {0} orders")]
    MissingPhone(OrderType),
}

/// The WhatsApp number that receives orders of `order_type`.
pub fn resolve_destination(
    settings: &SiteSettings,
    order_type: OrderType,
) -> Result<String, DestinationError> {
    if !settings.order_system {
        return Err(DestinationError::OrderingDisabled);
    }
    let channel = &settings.order_settings;
    let (enabled, phone) = match order_type {
        OrderType::DineIn => (channel.in_restaurant, &channel.in_phone),
        OrderType::Takeaway => (channel.takeaway, &channel.out_phone),
    };
    if !enabled {
        return Err(DestinationError::ChannelDisabled(order_type));
    }
    let phone: String = phone.chars().filter(char::is_ascii_digit).collect();
    if phone.is_empty() {
        return Err(DestinationError::MissingPhone(order_type));
    }
    Ok(phone)
}

/// `https://wa.me/<digits>?text=<encoded>`.
pub fn whatsapp_link(phone: &str, text: &str) -> String {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    format!(
        "https://wa.me/{digits}?text={}",
        utf8_percent_encode(text, URI_COMPONENT)
    )
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct FeedbackForm {
    pub name: Option<String>,
    pub phone: Option<String>,
    #[serde(default)]
    pub rating: u8,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedbackError {
    #[error("feedback message is required")]
    MissingMessage,
    #[error("rating must be between 0 and 5")]
    InvalidRating,
}

pub fn compose_feedback(form: &FeedbackForm) -> Result<String, FeedbackError> {
    let message = form.message.trim();
    if message.is_empty() {
        return Err(FeedbackError::MissingMessage);
    }
    if form.rating > 5 {
        return Err(FeedbackError::InvalidRating);
    }
    let name = Some(trimmed(form.name.as_deref())).filter(|s| !s.is_empty()).unwrap_or("-");
    let phone = Some(trimmed(form.phone.as_deref())).filter(|s| !s.is_empty()).unwrap_or("-");
    Ok(format!(
        "🔹 الاسم: {name}\n🔹 الجوال: {phone}\n🔹 التقييم: {}/5\n🔹 الملاحظة: {message}",
        form.rating
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_digit_count_bounds() {
        assert!(!is_valid_phone("12345"));
        assert!(is_valid_phone("123456"));
        assert!(is_valid_phone("0591234567"));
        assert!(is_valid_phone("+972591234567"));
        assert!(!is_valid_phone("1234567890123456"));
        assert!(!is_valid_phone("059-123-4567"));
    }

    #[test]
    fn link_encodes_like_encode_uri_component() {
        let link = whatsapp_link("+972 59", "a b&c\n(ok)*");
        assert_eq!(link, "https://wa.me/97259?text=a%20b%26c%0A(ok)*");
    }

    #[test]
    fn feedback_requires_a_message() {
        let form = FeedbackForm {
            message: "   ".into(),
            ..Default::default()
        };
        assert_eq!(compose_feedback(&form), Err(FeedbackError::MissingMessage));
    }

    #[test]
    fn feedback_fills_missing_contact_with_dashes() {
        let form = FeedbackForm {
            rating: 4,
            message: "great".into(),
            ..Default::default()
        };
        let text = compose_feedback(&form).unwrap();
        assert!(text.contains("الاسم: -"));
        assert!(text.contains("4/5"));
    }
}

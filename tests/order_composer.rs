mod common;

use chrono::{FixedOffset, TimeZone};
use menu_order_api::{
    cart::Cart,
    composer::{
        DestinationError, OrderForm, OrderType, OrderValidationError, compose,
        resolve_destination, validate, whatsapp_link,
    },
};
use rust_decimal::Decimal;

fn at_noon() -> chrono::DateTime<FixedOffset> {
    FixedOffset::east_opt(2 * 3600)
        .unwrap()
        .with_ymd_and_hms(2026, 3, 7, 12, 5, 0)
        .unwrap()
}

fn dine_in_form(name: &str, table: &str) -> OrderForm {
    OrderForm {
        name: name.into(),
        table: Some(table.into()),
        ..OrderForm::default()
    }
}

#[test]
fn dine_in_message_lists_lines_and_total() {
    let burger = common::item("burger", "Burger", "20,25", "grill");
    let fries = common::item("fries", "Fries", "10", "sides");
    let mut cart = Cart::new();
    cart.add_line(&burger, Decimal::from(20));
    cart.add_line(&burger, Decimal::from(20));
    cart.add_line(&fries, Decimal::from(10));

    let contact = validate(OrderType::DineIn, &dine_in_form("Ali", "5")).unwrap();
    let order = compose(cart.lines(), &contact, None, at_noon());

    assert_eq!(order.total, Decimal::from(50));
    assert_eq!(order.total_items, 3);
    assert!(order.message.contains("🔹 2 × Burger → 40₪"));
    assert!(order.message.contains("🔹 1 × Fries → 10₪"));
    assert!(order.message.contains("💰 *الإجمالي:* 50₪"));
    assert!(order.message.contains("Ali"));
    assert!(order.message.contains("*رقم الطاولة:* 5"));
    assert!(order.message.contains("*ملاحظات:* —"));
    assert!(order.message.contains("12:05"));
    assert!(order.message.contains("07/03/2026"));
}

#[test]
fn one_burger_and_one_fries_total_thirty() {
    let burger = common::item("burger", "Burger", "20", "grill");
    let fries = common::item("fries", "Fries", "10", "sides");
    let mut cart = Cart::new();
    cart.add_line(&burger, Decimal::from(20));
    cart.add_line(&fries, Decimal::from(10));

    let contact = validate(OrderType::DineIn, &dine_in_form("Ali", "5")).unwrap();
    let order = compose(cart.lines(), &contact, Some("no onions"), at_noon());

    assert!(order.message.contains("🔹 1 × Burger → 20₪"));
    assert!(order.message.contains("30₪"));
    assert!(order.message.contains("no onions"));
}

#[test]
fn line_total_uses_the_chosen_price() {
    let burger = common::item("burger", "Burger", "20,25", "grill");
    let mut cart = Cart::new();
    cart.add_line(&burger, Decimal::from(25));
    cart.add_line(&burger, Decimal::from(25));

    let contact = validate(OrderType::DineIn, &dine_in_form("Ali", "5")).unwrap();
    let order = compose(cart.lines(), &contact, None, at_noon());
    assert!(order.message.contains("🔹 2 × Burger → 50₪"));
}

#[test]
fn takeaway_requires_phone_and_address() {
    let mut form = OrderForm {
        name: "Sara".into(),
        phone: Some("12345".into()),
        address: Some("Main st".into()),
        ..OrderForm::default()
    };
    assert_eq!(
        validate(OrderType::Takeaway, &form),
        Err(OrderValidationError::InvalidPhone)
    );

    form.phone = Some("+970599123456".into());
    form.address = Some("   ".into());
    assert_eq!(
        validate(OrderType::Takeaway, &form),
        Err(OrderValidationError::MissingAddress)
    );

    form.address = Some("Main st".into());
    let contact = validate(OrderType::Takeaway, &form).unwrap();
    let order = compose(&[], &contact, None, at_noon());
    assert_eq!(order.order_type, OrderType::Takeaway);
    assert!(order.message.contains("+970599123456"));
    assert!(order.message.contains("Main st"));
}

#[test]
fn dine_in_rejects_missing_name_and_bad_table() {
    assert_eq!(
        validate(OrderType::DineIn, &dine_in_form("  ", "5")),
        Err(OrderValidationError::MissingName)
    );
    assert_eq!(
        validate(OrderType::DineIn, &dine_in_form("Ali", "5a")),
        Err(OrderValidationError::InvalidTable)
    );
    assert_eq!(
        validate(OrderType::DineIn, &dine_in_form("Ali", "")),
        Err(OrderValidationError::InvalidTable)
    );
}

#[test]
fn destination_follows_settings() {
    let mut settings = common::sample_snapshot().settings;
    assert_eq!(
        resolve_destination(&settings, OrderType::DineIn).as_deref(),
        Ok("970590000001")
    );

    settings.order_settings.takeaway = false;
    assert_eq!(
        resolve_destination(&settings, OrderType::Takeaway),
        Err(DestinationError::ChannelDisabled(OrderType::Takeaway))
    );

    settings.order_settings.in_phone.clear();
    assert_eq!(
        resolve_destination(&settings, OrderType::DineIn),
        Err(DestinationError::MissingPhone(OrderType::DineIn))
    );

    settings.order_system = false;
    assert_eq!(
        resolve_destination(&settings, OrderType::DineIn),
        Err(DestinationError::OrderingDisabled)
    );
}

#[test]
fn whatsapp_link_encodes_arabic_and_newlines() {
    let link = whatsapp_link("+970 59", "طلب\n1 × 2");
    assert!(link.starts_with("https://wa.me/97059?text="));
    assert!(link.contains("%0A"));
    assert!(link.contains("%20%C3%97%202"));
    assert!(!link.contains(' '));
}

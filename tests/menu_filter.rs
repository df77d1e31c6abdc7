mod common;

use menu_order_api::{
    menu::{MenuQuery, admin_listing, build_menu, category_tabs, featured_items},
    models::CatalogSnapshot,
};

fn snapshot() -> CatalogSnapshot {
    let mut hidden_cat = common::category("secret", "Secret", 0);
    hidden_cat.available = false;
    let mut hidden_item = common::item("cola", "Cola", "5", "drinks");
    hidden_item.visible = false;
    let mut starred = common::item("shawarma", "Shawarma", "18,22", "grill");
    starred.star = true;

    CatalogSnapshot {
        revision: 3,
        categories: vec![
            common::category("drinks", "Drinks", 2),
            common::category("grill", "Grill", 1),
            hidden_cat,
            common::category("empty", "Empty", 0),
            common::category("sides", "Sides", 1),
        ],
        items: vec![
            common::item("burger", "Burger", "20,25", "grill"),
            starred,
            common::item("fries", "Fries", "10", "sides"),
            hidden_item,
            common::item("juice", "Orange juice", "12", "drinks"),
            common::item("hidden-in-secret", "Ghost", "1", "secret"),
        ],
        ..CatalogSnapshot::default()
    }
}

#[test]
fn only_available_categories_with_visible_items_in_order() {
    let sections = build_menu(&snapshot(), &MenuQuery::default());
    let ids: Vec<&str> = sections.iter().map(|s| s.category.id.as_str()).collect();
    // Grill and Sides tie on order 1 and keep snapshot order.
    assert_eq!(ids, ["grill", "sides", "drinks"]);

    for section in &sections {
        assert!(section.category.available);
        assert!(!section.items.is_empty());
        assert!(section.items.iter().all(|i| i.visible));
        assert!(section.items.iter().all(|i| i.category_id == section.category.id));
    }
    let drinks = &sections[2];
    assert_eq!(drinks.items.len(), 1);
}

#[test]
fn search_matches_item_category_or_price() {
    let snap = snapshot();
    let by_name = build_menu(
        &snap,
        &MenuQuery {
            q: Some("BURG".into()),
            ..MenuQuery::default()
        },
    );
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].items[0].id, "burger");

    let by_category = build_menu(
        &snap,
        &MenuQuery {
            q: Some("sides".into()),
            ..MenuQuery::default()
        },
    );
    assert_eq!(by_category[0].items[0].id, "fries");

    let by_price = build_menu(
        &snap,
        &MenuQuery {
            q: Some("22".into()),
            ..MenuQuery::default()
        },
    );
    assert_eq!(by_price.len(), 1);
    assert_eq!(by_price[0].items[0].id, "shawarma");

    let nothing = build_menu(
        &snap,
        &MenuQuery {
            q: Some("pizza".into()),
            ..MenuQuery::default()
        },
    );
    assert!(nothing.is_empty());
}

#[test]
fn category_filter_and_tabs() {
    let snap = snapshot();
    let grill = build_menu(
        &snap,
        &MenuQuery {
            category_id: Some("grill".into()),
            ..MenuQuery::default()
        },
    );
    assert_eq!(grill.len(), 1);
    assert_eq!(grill[0].items.len(), 2);

    let tabs: Vec<String> = category_tabs(&snap).into_iter().map(|c| c.id).collect();
    assert_eq!(tabs, ["grill", "sides", "drinks"]);
}

#[test]
fn featured_and_admin_views() {
    let snap = snapshot();
    let featured: Vec<String> = featured_items(&snap).into_iter().map(|i| i.id).collect();
    assert_eq!(featured, ["shawarma"]);

    let admin = admin_listing(&snap, None);
    assert_eq!(admin.len(), snap.categories.len());
    let drinks = admin.iter().find(|s| s.category.id == "drinks").unwrap();
    assert_eq!(drinks.items.len(), 2, "hidden items are listed for admins");
    let empty = admin.iter().find(|s| s.category.id == "empty").unwrap();
    assert!(empty.items.is_empty());
}

#[test]
fn search_never_surfaces_hidden_items_or_unavailable_categories() {
    let snap = snapshot();
    for q in ["cola", "COLA", "ghost", "secret"] {
        let sections = build_menu(
            &snap,
            &MenuQuery {
                q: Some(q.into()),
                ..MenuQuery::default()
            },
        );
        assert!(sections.is_empty(), "{q} matched {sections:?}");
    }

    let secret_tab = build_menu(
        &snap,
        &MenuQuery {
            q: Some("ghost".into()),
            category_id: Some("secret".into()),
        },
    );
    assert!(secret_tab.is_empty());
}

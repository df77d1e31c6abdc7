mod common;

use menu_order_api::{
    db::{create_pool, run_migrations},
    dto::{
        catalog::{
            AdminCatalogQuery, CategoryNameRequest, CreateItemRequest, ReorderRequest,
            UpdateItemRequest,
        },
        settings::UpdateSettingsRequest,
    },
    error::AppError,
    middleware::auth::AuthUser,
    models::OrderSettings,
    services::{category_service, item_service, settings_service},
    state::AppState,
};
use uuid::Uuid;

// Integration flow against a real database: categories, reorder, items, settings.
#[tokio::test]
async fn admin_catalog_flow() -> anyhow::Result<()> {
    // Allow skipping when no DB is configured in the environment.
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!("Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run admin flow tests.");
            return Ok(());
        }
    };

    let dir = tempfile::tempdir()?;
    let pool = create_pool(&database_url).await?;
    run_migrations(&pool).await?;
    sqlx::query("TRUNCATE items, categories, settings").execute(&pool).await?;

    let mut config = menu_order_api::config::AppConfig::with_database_url(&database_url);
    config.snapshot_cache_path = dir.path().join("menu-cache.json");
    let state = AppState::new(pool, config);

    let admin = AuthUser {
        user_id: Uuid::new_v4(),
        role: "admin".into(),
    };
    let guest = AuthUser {
        user_id: Uuid::new_v4(),
        role: "viewer".into(),
    };

    // Non-admins are turned away.
    let denied = category_service::list_categories(&state, &guest).await;
    assert!(matches!(denied, Err(AppError::Forbidden)));

    let mut ids = Vec::new();
    for name in ["A", "B", "C"] {
        let created = category_service::create_category(
            &state,
            &admin,
            CategoryNameRequest { name: name.into() },
        )
        .await?;
        ids.push(created.data.expect("category").id);
    }

    let result = category_service::reorder_categories(
        &state,
        &admin,
        ReorderRequest {
            from: Some(0),
            to: Some(2),
        },
    )
    .await?
    .data
    .expect("reorder result");
    assert!(result.changed);
    let names: Vec<&str> = result.categories.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["B", "C", "A"]);
    let orders: Vec<i32> = result.categories.iter().map(|c| c.order).collect();
    assert_eq!(orders, [0, 1, 2]);

    // Dropped outside the list: nothing written.
    let noop = category_service::reorder_categories(
        &state,
        &admin,
        ReorderRequest {
            from: Some(1),
            to: None,
        },
    )
    .await?
    .data
    .expect("reorder result");
    assert!(!noop.changed);

    let bad_price = item_service::create_item(
        &state,
        &admin,
        CreateItemRequest {
            name: "Burger".into(),
            ingredients: None,
            price: "20,abc".into(),
            category_id: ids[0].clone(),
            image: None,
            star: false,
        },
    )
    .await;
    assert!(matches!(bad_price, Err(AppError::BadRequest(_))));

    let item = item_service::create_item(
        &state,
        &admin,
        CreateItemRequest {
            name: " Burger ".into(),
            ingredients: Some("beef".into()),
            price: "20, 25".into(),
            category_id: ids[0].clone(),
            image: None,
            star: true,
        },
    )
    .await?
    .data
    .expect("item");
    assert_eq!(item.name, "Burger");
    assert_eq!(item.prices.to_string(), "20,25");

    let updated = item_service::update_item(
        &state,
        &admin,
        &item.id,
        UpdateItemRequest {
            ingredients: Some(String::new()),
            price: Some("22".into()),
            ..UpdateItemRequest::default()
        },
    )
    .await?
    .data
    .expect("item");
    assert_eq!(updated.ingredients, None);
    assert_eq!(updated.prices.to_string(), "22");

    let hidden = item_service::toggle_visibility(&state, &admin, &item.id)
        .await?
        .data
        .expect("item");
    assert!(!hidden.visible);

    let listing = item_service::admin_catalog(&state, &admin, AdminCatalogQuery { q: None })
        .await?
        .data
        .expect("catalog");
    let total: usize = listing.sections.iter().map(|s| s.items.len()).sum();
    assert_eq!(total, 1, "hidden items stay visible to admins");

    settings_service::update_settings(
        &state,
        &admin,
        UpdateSettingsRequest {
            order_settings: Some(OrderSettings {
                in_restaurant: true,
                in_phone: "+970 59 111".into(),
                ..OrderSettings::default()
            }),
            ..UpdateSettingsRequest::default()
        },
    )
    .await?;

    // Every write re-published the catalog.
    let live = state.catalog.current().expect("published snapshot");
    assert_eq!(live.settings.order_settings.in_phone, "97059111");
    assert_eq!(live.categories.len(), 3);
    assert!(live.item(&item.id).is_some_and(|i| !i.visible));

    category_service::delete_category(&state, &admin, &ids[0]).await?;
    let live = state.catalog.current().expect("published snapshot");
    assert!(live.item(&item.id).is_none(), "items go with their category");

    Ok(())
}

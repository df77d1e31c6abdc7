//! Creates the dashboard admin and optionally imports a menu tree.
//!
//! `seed [path/to/menu-data.json]`. Without a path the bundled menu is used
//! when the catalog is still empty.

use chrono::Utc;
use sea_orm::{
    ActiveValue::Set, DatabaseTransaction, EntityTrait, PaginatorTrait, TransactionTrait,
    sea_query::OnConflict,
};
use serde_json::Value;

use menu_order_api::{
    catalog::{cache::bundled_snapshot, decode::decode_snapshot},
    config::AppConfig,
    db::{create_pool, orm_from_pool, run_migrations},
    entity::{categories, items, settings},
    middleware::auth::ADMIN_ROLE,
    models::CatalogSnapshot,
    services::auth_service::upsert_user,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    run_migrations(&pool).await?;

    let email = std::env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@example.com".to_string());
    let password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin12345".to_string());
    let admin = upsert_user(&pool, &email, &password, ADMIN_ROLE).await?;
    println!("Admin ready: {} ({})", admin.email, admin.id);

    let orm = orm_from_pool(pool);
    let snapshot = match std::env::args().nth(1) {
        Some(path) => {
            let body = tokio::fs::read(&path).await?;
            let tree: Value = serde_json::from_slice(&body)?;
            let decoded = decode_snapshot(&tree);
            for rejected in &decoded.rejected {
                println!("skipped {}: {}", rejected.path, rejected.reason);
            }
            decoded.snapshot
        }
        None => {
            if categories::Entity::find().count(&orm).await? > 0 {
                println!("Catalog already populated, nothing imported");
                return Ok(());
            }
            bundled_snapshot()
        }
    };

    let txn = orm.begin().await?;
    import(&txn, &snapshot).await?;
    txn.commit().await?;

    println!(
        "Imported {} categories and {} items",
        snapshot.categories.len(),
        snapshot.items.len()
    );
    Ok(())
}

async fn import(txn: &DatabaseTransaction, snapshot: &CatalogSnapshot) -> anyhow::Result<()> {
    for c in &snapshot.categories {
        let row = categories::ActiveModel {
            id: Set(c.id.clone()),
            name: Set(c.name.clone()),
            sort_order: Set(c.order),
            available: Set(c.available),
            created_at: Set(c.created_at),
        };
        categories::Entity::insert(row)
            .on_conflict(
                OnConflict::column(categories::Column::Id)
                    .update_columns([
                        categories::Column::Name,
                        categories::Column::SortOrder,
                        categories::Column::Available,
                    ])
                    .to_owned(),
            )
            .exec(txn)
            .await?;
    }

    for i in &snapshot.items {
        if snapshot.category(&i.category_id).is_none() {
            println!("skipped item {}: unknown category {}", i.id, i.category_id);
            continue;
        }
        let row = items::ActiveModel {
            id: Set(i.id.clone()),
            name: Set(i.name.clone()),
            price: Set(i.prices.to_string()),
            ingredients: Set(i.ingredients.clone()),
            category_id: Set(i.category_id.clone()),
            visible: Set(i.visible),
            image: Set(i.image.clone()),
            star: Set(i.star),
            created_at: Set(i.created_at),
        };
        items::Entity::insert(row)
            .on_conflict(
                OnConflict::column(items::Column::Id)
                    .update_columns([
                        items::Column::Name,
                        items::Column::Price,
                        items::Column::Ingredients,
                        items::Column::CategoryId,
                        items::Column::Visible,
                        items::Column::Image,
                        items::Column::Star,
                    ])
                    .to_owned(),
            )
            .exec(txn)
            .await?;
    }

    if let Value::Object(entries) = snapshot.settings.to_tree() {
        for (key, value) in entries {
            let row = settings::ActiveModel {
                key: Set(key),
                value: Set(value),
                updated_at: Set(Utc::now().fixed_offset()),
            };
            settings::Entity::insert(row)
                .on_conflict(
                    OnConflict::column(settings::Column::Key)
                        .update_columns([settings::Column::Value, settings::Column::UpdatedAt])
                        .to_owned(),
                )
                .exec(txn)
                .await?;
        }
    }
    Ok(())
}

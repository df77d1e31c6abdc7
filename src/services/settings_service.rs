use chrono::Utc;
use sea_orm::{EntityTrait, Set, TransactionTrait, sea_query::OnConflict};
use serde_json::{Value, json};

use crate::{
    audit,
    catalog::{self, cache::resolve_menu_view, decode::only_digits},
    dto::settings::{PublicSettings, UpdateSettingsRequest},
    entity::settings::{ActiveModel, Column, Entity as Settings},
    error::AppResult,
    middleware::auth::{AuthUser, ensure_admin},
    models::{FooterInfo, OrderSettings, SiteSettings},
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Customer-facing flags, taken from whatever menu copy is being served.
pub async fn public_settings(state: &AppState) -> AppResult<ApiResponse<PublicSettings>> {
    let mut subscription = state.catalog.subscribe();
    let view = resolve_menu_view(&mut subscription, state.config.catalog_wait, &state.cache).await;
    let settings = &view.snapshot.settings;
    let o = &settings.order_settings;

    let data = PublicSettings {
        order_system: settings.order_system,
        dine_in: settings.order_system && o.in_restaurant && !o.in_phone.is_empty(),
        takeaway: settings.order_system && o.takeaway && !o.out_phone.is_empty(),
        feedback_enabled: !settings.complaints_whatsapp.is_empty(),
        footer: settings.footer.clone(),
    };
    Ok(ApiResponse::success(
        "Settings",
        data,
        Some(Meta {
            total: None,
            revision: Some(view.snapshot.revision),
        }),
    ))
}

pub async fn admin_settings(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<SiteSettings>> {
    ensure_admin(user)?;
    let snapshot = catalog::load_snapshot(&state.orm).await?;
    Ok(ApiResponse::success(
        "Settings",
        snapshot.settings,
        Some(Meta::empty()),
    ))
}

/// Write the given sections; sections left out keep their stored value.
pub async fn update_settings(
    state: &AppState,
    user: &AuthUser,
    payload: UpdateSettingsRequest,
) -> AppResult<ApiResponse<SiteSettings>> {
    ensure_admin(user)?;

    let mut rows: Vec<(&str, Value)> = Vec::new();
    if let Some(enabled) = payload.order_system {
        rows.push(("orderSystem", json!(enabled)));
    }
    if let Some(order_settings) = payload.order_settings {
        rows.push(("orderSettings", order_settings_tree(order_settings)));
    }
    if let Some(phone) = payload.complaints_whatsapp {
        rows.push(("complaintsWhatsapp", json!(only_digits(&phone))));
    }
    if let Some(footer) = payload.footer {
        rows.push(("footerInfo", footer_tree(footer)));
    }

    if !rows.is_empty() {
        let txn = state.orm.begin().await?;
        for (key, value) in &rows {
            let row = ActiveModel {
                key: Set((*key).to_string()),
                value: Set(value.clone()),
                updated_at: Set(Utc::now().fixed_offset()),
            };
            Settings::insert(row)
                .on_conflict(
                    OnConflict::column(Column::Key)
                        .update_columns([Column::Value, Column::UpdatedAt])
                        .to_owned(),
                )
                .exec(&txn)
                .await?;
        }
        txn.commit().await?;

        let keys: Vec<&str> = rows.iter().map(|(k, _)| *k).collect();
        audit::record(
            &state.pool,
            Some(user.user_id),
            "settings_update",
            "settings",
            json!({ "keys": keys }),
        )
        .await;
        catalog::refresh_after_write(state).await;
    }

    let snapshot = catalog::load_snapshot(&state.orm).await?;
    Ok(ApiResponse::success(
        "Settings updated",
        snapshot.settings,
        Some(Meta::empty()),
    ))
}

fn order_settings_tree(o: OrderSettings) -> Value {
    json!({
        "inRestaurant": o.in_restaurant,
        "takeaway": o.takeaway,
        "inPhone": only_digits(&o.in_phone),
        "outPhone": only_digits(&o.out_phone),
    })
}

fn footer_tree(f: FooterInfo) -> Value {
    json!({
        "address": f.address.trim(),
        "phone": only_digits(&f.phone),
        "whatsapp": only_digits(&f.whatsapp),
        "facebook": f.facebook.trim(),
        "instagram": f.instagram.trim(),
        "tiktok": f.tiktok.trim(),
        "telegram": f.telegram.trim(),
    })
}

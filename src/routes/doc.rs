use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    cart::{CartLine, LineKey},
    catalog::cache::SnapshotSource,
    composer::{FeedbackForm, OrderForm, OrderType},
    dto::{
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        cart::{AddLineRequest, CartView},
        catalog::{
            AdminCatalog, AdminCatalogQuery, CategoryList, CategoryNameRequest,
            CreateItemRequest, ReorderRequest, ReorderResult, UpdateItemRequest,
        },
        feedback::FeedbackLink,
        menu::{ChangesQuery, FeaturedList, MenuResponse},
        orders::{CheckoutRequest, OrderReceipt},
        settings::{PublicSettings, UpdateSettingsRequest},
        uploads::{ImageUploadForm, UploadedImage},
    },
    menu::{MenuQuery, MenuSection},
    models::{Category, FooterInfo, MenuItem, OrderSettings, SiteSettings, User},
    reorder::OrderUpdate,
    response::{ApiResponse, Meta},
    routes::{admin, auth, carts, feedback, health, menu, settings},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        auth::register,
        menu::get_menu,
        menu::featured,
        menu::changes,
        settings::public_settings,
        carts::create_cart,
        carts::get_cart,
        carts::add_line,
        carts::increase_line,
        carts::decrease_line,
        carts::remove_line,
        carts::clear_cart,
        carts::checkout,
        feedback::feedback,
        admin::admin_catalog,
        admin::list_categories,
        admin::create_category,
        admin::rename_category,
        admin::toggle_availability,
        admin::delete_category,
        admin::reorder_categories,
        admin::create_item,
        admin::update_item,
        admin::toggle_visibility,
        admin::toggle_star,
        admin::delete_item,
        admin::get_settings,
        admin::update_settings,
        admin::upload_image,
        admin::featured_images
    ),
    components(
        schemas(
            User,
            Category,
            MenuItem,
            OrderSettings,
            FooterInfo,
            SiteSettings,
            SnapshotSource,
            MenuQuery,
            MenuSection,
            MenuResponse,
            FeaturedList,
            ChangesQuery,
            PublicSettings,
            UpdateSettingsRequest,
            LineKey,
            CartLine,
            CartView,
            AddLineRequest,
            OrderType,
            OrderForm,
            CheckoutRequest,
            OrderReceipt,
            FeedbackForm,
            FeedbackLink,
            LoginRequest,
            LoginResponse,
            RegisterRequest,
            CategoryNameRequest,
            CategoryList,
            ReorderRequest,
            ReorderResult,
            OrderUpdate,
            CreateItemRequest,
            UpdateItemRequest,
            AdminCatalogQuery,
            AdminCatalog,
            ImageUploadForm,
            UploadedImage,
            health::HealthData,
            Meta,
            ApiResponse<MenuResponse>,
            ApiResponse<CartView>,
            ApiResponse<OrderReceipt>,
            ApiResponse<SiteSettings>,
            ApiResponse<AdminCatalog>
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Menu", description = "Customer menu endpoints"),
        (name = "Settings", description = "Public site settings"),
        (name = "Cart", description = "Session cart endpoints"),
        (name = "Orders", description = "WhatsApp order composition"),
        (name = "Feedback", description = "WhatsApp feedback composition"),
        (name = "Auth", description = "Authentication endpoints"),
        (name = "Admin", description = "Dashboard endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}

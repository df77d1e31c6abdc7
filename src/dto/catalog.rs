use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    menu::MenuSection,
    models::Category,
    reorder::OrderUpdate,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CategoryNameRequest {
    pub name: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ReorderRequest {
    /// Position the category was dragged from.
    pub from: Option<usize>,
    /// Position it was dropped on; absent when dropped outside the list.
    pub to: Option<usize>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReorderResult {
    pub changed: bool,
    pub updates: Vec<OrderUpdate>,
    pub categories: Vec<Category>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryList {
    pub items: Vec<Category>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateItemRequest {
    pub name: String,
    pub ingredients: Option<String>,
    /// Comma-separated price points, e.g. `"20,25"`.
    pub price: String,
    pub category_id: String,
    pub image: Option<String>,
    #[serde(default)]
    pub star: bool,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateItemRequest {
    pub name: Option<String>,
    /// Empty string clears the description.
    pub ingredients: Option<String>,
    pub price: Option<String>,
    pub category_id: Option<String>,
    /// Empty string clears the image.
    pub image: Option<String>,
    pub star: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AdminCatalogQuery {
    pub q: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminCatalog {
    pub sections: Vec<MenuSection>,
}

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    catalog::cache::SnapshotSource,
    menu::MenuSection,
    models::{Category, FooterInfo, MenuItem},
};

#[derive(Debug, Serialize, ToSchema)]
pub struct MenuResponse {
    /// Where the data came from; anything but `live` is a stale copy.
    pub source: SnapshotSource,
    pub revision: u64,
    pub order_system: bool,
    pub tabs: Vec<Category>,
    pub sections: Vec<MenuSection>,
    pub footer: FooterInfo,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FeaturedList {
    pub items: Vec<MenuItem>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChangesQuery {
    /// Last revision the client has seen.
    pub since: Option<u64>,
}

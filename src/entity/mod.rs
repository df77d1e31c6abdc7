pub mod categories;
pub mod items;
pub mod settings;

pub use categories::Entity as Categories;
pub use items::Entity as Items;
pub use settings::Entity as Settings;

pub mod auth_service;
pub mod cart_service;
pub mod category_service;
pub mod feedback_service;
pub mod item_service;
pub mod menu_service;
pub mod order_service;
pub mod settings_service;
pub mod upload_service;

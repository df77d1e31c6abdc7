pub mod auth;
pub mod cart;
pub mod catalog;
pub mod feedback;
pub mod menu;
pub mod orders;
pub mod settings;
pub mod uploads;

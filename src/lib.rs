pub mod app;
pub mod audit;
pub mod cart;
pub mod catalog;
pub mod composer;
pub mod config;
pub mod db;
pub mod dto;
pub mod entity;
pub mod error;
pub mod menu;
pub mod middleware;
pub mod models;
pub mod reorder;
pub mod response;
pub mod routes;
pub mod services;
pub mod state;

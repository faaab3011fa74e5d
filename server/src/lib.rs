//! ShopDesk server: e-commerce administration backend with period-comparison analytics

pub mod api;
pub mod app;
pub mod core;
pub mod data;
pub mod domain;
pub mod utils;

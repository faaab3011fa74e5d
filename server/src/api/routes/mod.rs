//! API route handlers

pub mod analytics;
pub mod health;
pub mod orders;
pub mod products;
pub mod users;

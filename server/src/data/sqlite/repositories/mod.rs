//! SQLite repositories
//!
//! Types (UserRow, ProductRow, etc.) should be imported from `crate::data::types`.

pub mod aggregate;
pub mod order;
pub mod product;
pub mod user;

pub use order::{create_order, delete_order, get_order, list_orders, update_status};
pub use product::{create_product, delete_product, get_product, list_products, update_product};
pub use user::{create_user, delete_user, get_by_email, get_user, list_users, update_user};

//! Data storage layer
//!
//! - `sqlite` - Embedded store for users, products and orders
//! - `types` - Row types and enums shared by repositories and routes
//! - `traits` - `AggregateSource`, the seam used by the analytics core
//! - `error` - Unified error type

pub mod error;
pub mod sqlite;
pub mod traits;
pub mod types;

pub use error::DataError;
pub use sqlite::{SqliteAggregates, SqliteService};
pub use traits::{AggregateSource, Metric, RoleCount, StatusCount, UserTotals};

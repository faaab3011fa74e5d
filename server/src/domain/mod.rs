//! Domain logic
//!
//! - `analytics` - Period windowing, trend filling and period-over-period comparison

pub mod analytics;

pub use analytics::AnalyticsService;

//! # safespace-analytics
//!
//! Read-only rollups over the report store for the dashboard: headline
//! stats, category and severity distributions, and per-day trend buckets.
//! Everything here goes through the store's read pool and never mutates.

pub mod aggregator;

pub use aggregator::{
    Aggregator, CategoryCount, DailyCount, DashboardStats, SeverityCount,
};

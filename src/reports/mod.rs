//! Reports module for retainer-cli
//!
//! Provides the dashboard summary and the collections worklist.

pub mod collections;
pub mod dashboard;

pub use collections::{CollectionsReport, CollectionsRow};
pub use dashboard::{DashboardReport, RecentActivity};

//! Aggregated overview for the landing page.

mod config;
mod service;

pub use config::DashboardConfig;
pub use service::{
    DashboardService, DashboardSummary, RecentInteraction, RiskCount, StatusCount,
    WatchlistSummary,
};

//! Seller dashboard

mod model;
mod service;

pub use model::{AdPerformance, DailyStat, DashboardAnalytics, DashboardSummary};
pub use service::DashboardService;

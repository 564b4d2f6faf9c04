//! Dashboard response shapes

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use crate::entitlement::PostAdDecision;
use crate::models::PackageKind;

/// Headline figures across all of a seller's ads, expired ones included.
#[derive(Debug, Serialize)]
pub struct DashboardSummary {
    pub total_ads: usize,
    pub active_ads: usize,
    pub total_views: i64,
    pub total_clicks: i64,
    pub total_whatsapp_clicks: i64,
    pub package_type: PackageKind,
    pub post_ad_decision: PostAdDecision,
}

/// Per-ad counter breakdown
#[derive(Debug, Serialize)]
pub struct AdPerformance {
    pub ad_id: Uuid,
    pub title: String,
    pub active: bool,
    pub views: i64,
    pub clicks: i64,
    pub whatsapp_clicks: i64,
}

/// One day on the analytics chart
#[derive(Debug, Serialize)]
pub struct DailyStat {
    pub date: NaiveDate,
    pub views: i64,
    pub clicks: i64,
    pub whatsapp_clicks: i64,
}

#[derive(Debug, Serialize)]
pub struct DashboardAnalytics {
    pub per_ad: Vec<AdPerformance>,
    pub daily: Vec<DailyStat>,
}

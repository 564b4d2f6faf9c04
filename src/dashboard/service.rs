//! Dashboard aggregation over a seller's ads
//!
//! Counters are lifetime totals; there is no per-day event log in the store.
//! The daily series attributes each ad's totals to its creation date, which
//! matches what the seller-facing chart has always shown.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use crate::entitlement::{can_post_ad, SellerEntitlement};
use crate::error::ApiResult;
use crate::listing::ListingService;
use crate::models::{Ad, SellerProfile};

use super::model::{AdPerformance, DailyStat, DashboardAnalytics, DashboardSummary};

pub struct DashboardService {
    listing: Arc<ListingService>,
}

impl DashboardService {
    pub fn new(listing: Arc<ListingService>) -> Self {
        Self { listing }
    }

    pub async fn summary(&self, seller: &SellerProfile) -> ApiResult<DashboardSummary> {
        let now = Utc::now();
        let ads = self.listing.seller_ads(seller.id).await?;

        Ok(DashboardSummary {
            total_ads: ads.len(),
            active_ads: ads.iter().filter(|ad| ad.is_active(now)).count(),
            total_views: ads.iter().map(|ad| ad.views).sum(),
            total_clicks: ads.iter().map(|ad| ad.clicks).sum(),
            total_whatsapp_clicks: ads.iter().map(|ad| ad.whatsapp_clicks).sum(),
            package_type: seller.package_type,
            post_ad_decision: can_post_ad(&SellerEntitlement::from(seller), now),
        })
    }

    pub async fn analytics(&self, seller: &SellerProfile) -> ApiResult<DashboardAnalytics> {
        let now = Utc::now();
        let ads = self.listing.seller_ads(seller.id).await?;

        let per_ad = ads
            .iter()
            .map(|ad| AdPerformance {
                ad_id: ad.id,
                title: ad.title.clone(),
                active: ad.is_active(now),
                views: ad.views,
                clicks: ad.clicks,
                whatsapp_clicks: ad.whatsapp_clicks,
            })
            .collect();

        Ok(DashboardAnalytics {
            per_ad,
            daily: Self::daily_series(&ads),
        })
    }

    fn daily_series(ads: &[Ad]) -> Vec<DailyStat> {
        let mut by_day: BTreeMap<NaiveDate, (i64, i64, i64)> = BTreeMap::new();
        for ad in ads {
            let day = ad.created_at.date_naive();
            let entry = by_day.entry(day).or_default();
            entry.0 += ad.views;
            entry.1 += ad.clicks;
            entry.2 += ad.whatsapp_clicks;
        }
        by_day
            .into_iter()
            .map(|(date, (views, clicks, whatsapp_clicks))| DailyStat {
                date,
                views,
                clicks,
                whatsapp_clicks,
            })
            .collect()
    }
}

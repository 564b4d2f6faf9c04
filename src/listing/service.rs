//! Listing service - feeds the filter/sort engine from the record store

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::Ad;
use crate::store::{select_as, select_one_as, RecordStore};

use super::engine::compute_visible;
use super::model::ListingQuery;

const ADS_TABLE: &str = "ads";

/// Read side of the ad catalog: visible lists, single-ad detail, and the
/// interaction counters owned by the store.
pub struct ListingService {
    store: Arc<dyn RecordStore>,
}

impl ListingService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Fetch all ads, drop expired ones, then run the pure pipeline.
    pub async fn visible_ads(&self, query: &ListingQuery) -> ApiResult<Vec<Ad>> {
        let now = Utc::now();
        let ads: Vec<Ad> = select_as(self.store.as_ref(), ADS_TABLE, &[]).await?;
        let active: Vec<Ad> = ads.into_iter().filter(|ad| ad.is_active(now)).collect();
        Ok(compute_visible(&active, query))
    }

    /// Ads belonging to one seller, expired ones included (the dashboard
    /// shows the full history).
    pub async fn seller_ads(&self, seller_id: Uuid) -> ApiResult<Vec<Ad>> {
        let id = seller_id.to_string();
        let ads = select_as(self.store.as_ref(), ADS_TABLE, &[("seller_id", &id)]).await?;
        Ok(ads)
    }

    pub async fn get_ad(&self, id: Uuid) -> ApiResult<Ad> {
        let id_str = id.to_string();
        select_one_as(self.store.as_ref(), ADS_TABLE, &[("id", &id_str)])
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Ad {} not found", id)))
    }

    /// Record a detail-page view.
    pub async fn record_view(&self, id: Uuid) -> ApiResult<Ad> {
        self.bump_counter(id, Counter::Views).await
    }

    pub async fn record_click(&self, id: Uuid) -> ApiResult<Ad> {
        self.bump_counter(id, Counter::Clicks).await
    }

    pub async fn record_whatsapp_click(&self, id: Uuid) -> ApiResult<Ad> {
        self.bump_counter(id, Counter::WhatsappClicks).await
    }

    /// Select-then-patch increment. The hosted store offers no atomic
    /// increment, so concurrent bumps of the same counter can lose an update;
    /// the counters are advisory engagement figures, not ledger entries.
    async fn bump_counter(&self, id: Uuid, counter: Counter) -> ApiResult<Ad> {
        let ad = self.get_ad(id).await?;
        let next = match counter {
            Counter::Views => ad.views + 1,
            Counter::Clicks => ad.clicks + 1,
            Counter::WhatsappClicks => ad.whatsapp_clicks + 1,
        };
        let id_str = id.to_string();
        self.store
            .update(
                ADS_TABLE,
                &[("id", &id_str)],
                serde_json::json!({ (counter.column()): next }),
            )
            .await?;
        self.get_ad(id).await
    }
}

/// The three engagement counters an ad row carries.
#[derive(Clone, Copy)]
enum Counter {
    Views,
    Clicks,
    WhatsappClicks,
}

impl Counter {
    fn column(&self) -> &'static str {
        match self {
            Counter::Views => "views",
            Counter::Clicks => "clicks",
            Counter::WhatsappClicks => "whatsapp_clicks",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::model::ListingQuery;
    use crate::store::testing::MemoryStore;
    use chrono::Duration;
    use serde_json::json;

    fn ad_row(id: Uuid, title: &str, expired: bool) -> serde_json::Value {
        let created = Utc::now() - Duration::days(40);
        let expiry = if expired {
            Utc::now() - Duration::days(10)
        } else {
            Utc::now() + Duration::days(20)
        };
        json!({
            "id": id,
            "seller_id": Uuid::new_v4(),
            "title": title,
            "description": "desc",
            "category": "Electronics",
            "price": 100.0,
            "condition": "used",
            "location": "Galle",
            "images": ["https://img.example.com/a.jpg"],
            "whatsapp_contact": "+94771234567",
            "created_at": created,
            "expiry_date": expiry,
            "views": 3,
            "clicks": 0,
            "whatsapp_clicks": 0
        })
    }

    #[tokio::test]
    async fn test_expired_ads_are_invisible_but_not_deleted() {
        let live = Uuid::new_v4();
        let dead = Uuid::new_v4();
        let store = Arc::new(MemoryStore::with_rows(
            ADS_TABLE,
            vec![ad_row(live, "live", false), ad_row(dead, "dead", true)],
        ));
        let service = ListingService::new(store.clone());

        let visible = service.visible_ads(&ListingQuery::default()).await.unwrap();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, live);

        // The expired row still exists in the store.
        assert_eq!(store.rows(ADS_TABLE).len(), 2);
    }

    #[tokio::test]
    async fn test_record_view_bumps_counter() {
        let id = Uuid::new_v4();
        let store = Arc::new(MemoryStore::with_rows(ADS_TABLE, vec![ad_row(id, "x", false)]));
        let service = ListingService::new(store);

        let ad = service.record_view(id).await.unwrap();
        assert_eq!(ad.views, 4);
    }

    #[tokio::test]
    async fn test_each_recorder_bumps_only_its_own_column() {
        let id = Uuid::new_v4();
        let store = Arc::new(MemoryStore::with_rows(ADS_TABLE, vec![ad_row(id, "x", false)]));
        let service = ListingService::new(store);

        service.record_click(id).await.unwrap();
        let ad = service.record_whatsapp_click(id).await.unwrap();

        assert_eq!(ad.views, 3);
        assert_eq!(ad.clicks, 1);
        assert_eq!(ad.whatsapp_clicks, 1);
    }

    #[tokio::test]
    async fn test_missing_ad_is_not_found() {
        let service = ListingService::new(Arc::new(MemoryStore::new()));
        let err = service.get_ad(Uuid::new_v4()).await.unwrap_err();
        assert_eq!(err.error_code(), "NOT_FOUND");
    }
}

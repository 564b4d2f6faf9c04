//! Ad publishing service

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::entitlement::{can_post_ad, SellerEntitlement};
use crate::error::{ApiError, ApiResult};
use crate::models::{Ad, SellerProfile};
use crate::store::RecordStore;

use super::model::CreateAdRequest;

const ADS_TABLE: &str = "ads";

/// Days an ad stays visible after publication
const AD_TERM_DAYS: i64 = 30;

pub struct AdService {
    store: Arc<dyn RecordStore>,
}

impl AdService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Publish a new ad for a seller.
    ///
    /// The package gate is re-evaluated here at submit time; a package that
    /// lapsed after the form was opened still blocks the write.
    pub async fn publish(&self, seller: &SellerProfile, req: CreateAdRequest) -> ApiResult<Ad> {
        req.validate()?;

        let decision = can_post_ad(&SellerEntitlement::from(seller), Utc::now());
        if !decision.is_allowed() {
            return Err(ApiError::EntitlementDenied(decision));
        }

        let whatsapp_contact = req
            .whatsapp_contact
            .or_else(|| seller.whatsapp_number.clone())
            .or_else(|| seller.contact_number.clone())
            .ok_or_else(|| {
                ApiError::Validation(
                    "A WhatsApp contact number is required to publish an ad".to_string(),
                )
            })?;

        let now = Utc::now();
        let ad = Ad {
            id: Uuid::new_v4(),
            seller_id: seller.id,
            title: req.title,
            description: req.description,
            category: req.category,
            sub_category: req.sub_category,
            price: req.price,
            condition: req.condition,
            location: req.location,
            images: req.images,
            whatsapp_contact,
            created_at: now,
            expiry_date: now + chrono::Duration::days(AD_TERM_DAYS),
            views: 0,
            clicks: 0,
            whatsapp_clicks: 0,
        };

        let row = serde_json::to_value(&ad)?;
        let stored = self.store.insert(ADS_TABLE, row).await?;
        tracing::info!(ad_id = %ad.id, seller_id = %seller.id, "Ad published");

        Ok(serde_json::from_value(stored)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PackageKind;
    use crate::store::testing::MemoryStore;
    use serde_json::json;

    fn seller(kind: PackageKind, expiry_days: i64) -> SellerProfile {
        SellerProfile {
            id: Uuid::new_v4(),
            email: "vendor@example.com".to_string(),
            full_name: None,
            avatar_url: None,
            created_at: Utc::now(),
            country: None,
            address: None,
            contact_number: None,
            whatsapp_number: Some("+94771234567".to_string()),
            username: None,
            package_type: kind,
            package_expiry: Some(Utc::now() + chrono::Duration::days(expiry_days)),
        }
    }

    fn request() -> CreateAdRequest {
        serde_json::from_value(json!({
            "title": "Mountain bike, barely used",
            "description": "26-inch frame, serviced last month, includes lights.",
            "category": "Sports",
            "price": 45000.0,
            "condition": "used",
            "location": "Colombo",
            "images": ["https://img.example.com/bike.jpg"]
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_publish_writes_row_and_sets_term() {
        let store = Arc::new(MemoryStore::new());
        let svc = AdService::new(store.clone());
        let seller = seller(PackageKind::Silver, 10);

        let ad = svc.publish(&seller, request()).await.unwrap();
        assert_eq!(ad.seller_id, seller.id);
        assert_eq!(ad.whatsapp_contact, "+94771234567");
        assert!(ad.expiry_date > ad.created_at);
        assert_eq!(store.rows(ADS_TABLE).len(), 1);
    }

    #[tokio::test]
    async fn test_publish_blocked_without_package() {
        let store = Arc::new(MemoryStore::new());
        let svc = AdService::new(store.clone());
        let mut seller = seller(PackageKind::None, 0);
        seller.package_expiry = None;

        let err = svc.publish(&seller, request()).await.unwrap_err();
        assert!(matches!(
            err,
            ApiError::EntitlementDenied(crate::entitlement::PostAdDecision::NoPackage)
        ));
        assert!(store.rows(ADS_TABLE).is_empty());
    }

    #[tokio::test]
    async fn test_publish_blocked_after_package_lapse() {
        let store = Arc::new(MemoryStore::new());
        let svc = AdService::new(store);
        let seller = seller(PackageKind::Gold, -1);

        let err = svc.publish(&seller, request()).await.unwrap_err();
        assert!(matches!(
            err,
            ApiError::EntitlementDenied(crate::entitlement::PostAdDecision::ExpiredPackage)
        ));
    }

    #[tokio::test]
    async fn test_publish_requires_contact_number() {
        let store = Arc::new(MemoryStore::new());
        let svc = AdService::new(store);
        let mut seller = seller(PackageKind::Silver, 10);
        seller.whatsapp_number = None;

        let err = svc.publish(&seller, request()).await.unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }
}

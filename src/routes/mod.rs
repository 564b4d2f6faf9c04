//! Route definitions for the MarketMaster API

mod ads;
mod dashboard;
mod profile;
mod upgrade;

pub use ads::ads_routes;
pub use dashboard::dashboard_routes;
pub use profile::profile_routes;
pub use upgrade::upgrade_routes;

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::Router;
    use async_trait::async_trait;
    use chrono::Utc;
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::ads::AdService;
    use crate::auth::{AuthService, Claims};
    use crate::dashboard::DashboardService;
    use crate::images::{ImageHost, ImageHostError};
    use crate::listing::ListingService;
    use crate::payments::{CapturedPayment, GatewayError, OrderRequest, PaymentGateway};
    use crate::profile::ProfileService;
    use crate::state::AppState;
    use crate::store::testing::MemoryStore;
    use crate::store::{ObjectStore, StoreError};
    use crate::upgrade::{PollConfig, UpgradeOrchestrator, UpgradeService};

    const JWT_SECRET: &str = "router-test-secret";

    struct StubImageHost;

    #[async_trait]
    impl ImageHost for StubImageHost {
        async fn upload(&self, _filename: &str, _bytes: Vec<u8>) -> Result<String, ImageHostError> {
            Ok("https://i.ibb.co/test/photo.jpg".to_string())
        }
    }

    struct StubObjects;

    #[async_trait]
    impl ObjectStore for StubObjects {
        async fn upload(
            &self,
            _path: &str,
            _bytes: Vec<u8>,
            _content_type: &str,
        ) -> Result<(), StoreError> {
            Ok(())
        }

        fn public_url(&self, path: &str) -> String {
            format!("https://cdn.example.com/{}", path)
        }
    }

    struct StubGateway;

    #[async_trait]
    impl PaymentGateway for StubGateway {
        async fn is_ready(&self) -> bool {
            true
        }
        async fn create_order(&self, _request: &OrderRequest) -> Result<String, GatewayError> {
            Ok("ORD-ROUTER-1".to_string())
        }
        async fn capture_order(&self, order_id: &str) -> Result<CapturedPayment, GatewayError> {
            Ok(CapturedPayment {
                order_id: order_id.to_string(),
                amount: 1500,
            })
        }
    }

    fn app(store: Arc<MemoryStore>) -> Router {
        let listing = Arc::new(ListingService::new(store.clone()));
        let state = AppState::new(
            listing.clone(),
            Arc::new(AdService::new(store.clone())),
            Arc::new(UpgradeService::new(UpgradeOrchestrator::new(
                Arc::new(StubGateway),
                store.clone(),
                Some("https://market.example.com".to_string()),
                "LKR".to_string(),
                PollConfig {
                    interval: Duration::from_millis(2),
                    max_attempts: 3,
                },
            ))),
            Arc::new(DashboardService::new(listing)),
            Arc::new(ProfileService::new(store.clone(), Arc::new(StubObjects))),
            Arc::new(AuthService::new(store, JWT_SECRET.to_string())),
            Arc::new(StubImageHost),
        );

        Router::new()
            .merge(super::ads_routes())
            .merge(super::profile_routes())
            .merge(super::dashboard_routes())
            .merge(super::upgrade_routes())
            .with_state(state)
    }

    fn bearer_for(user_id: Uuid) -> String {
        let claims = Claims {
            sub: user_id.to_string(),
            email: "vendor@example.com".to_string(),
            exp: Utc::now().timestamp() + 3600,
        };
        let token = jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            &claims,
            &jsonwebtoken::EncodingKey::from_secret(JWT_SECRET.as_bytes()),
        )
        .unwrap();
        format!("Bearer {}", token)
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_list_ads_empty_catalog() {
        let app = app(Arc::new(MemoryStore::new()));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/ads")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["data"], json!([]));
    }

    #[tokio::test]
    async fn test_packages_catalog_is_public() {
        let app = app(Arc::new(MemoryStore::new()));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/packages")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_dashboard_requires_token() {
        let app = app(Arc::new(MemoryStore::new()));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/dashboard")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_unknown_ad_is_not_found() {
        let app = app(Arc::new(MemoryStore::new()));

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/api/ads/{}", Uuid::new_v4()))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], json!("NOT_FOUND"));
    }

    #[tokio::test]
    async fn test_session_resolves_seller_profile() {
        let user_id = Uuid::new_v4();
        let store = Arc::new(MemoryStore::with_rows(
            "users",
            vec![json!({
                "role": "seller",
                "id": user_id,
                "email": "vendor@example.com",
                "created_at": "2024-03-01T10:00:00Z",
                "package_type": "silver"
            })],
        ));
        let app = app(store);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/session")
                    .header(header::AUTHORIZATION, bearer_for(user_id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"]["role"], json!("seller"));
        assert_eq!(body["data"]["package_type"], json!("silver"));
    }

    #[tokio::test]
    async fn test_posting_blocked_for_buyer_account() {
        let user_id = Uuid::new_v4();
        let store = Arc::new(MemoryStore::with_rows(
            "users",
            vec![json!({
                "role": "buyer",
                "id": user_id,
                "email": "shopper@example.com",
                "created_at": "2024-03-01T10:00:00Z"
            })],
        ));
        let app = app(store);

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/ads")
                    .header(header::AUTHORIZATION, bearer_for(user_id))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_upgrade_session_and_capture_roundtrip() {
        let user_id = Uuid::new_v4();
        let store = Arc::new(MemoryStore::with_rows(
            "users",
            vec![json!({
                "role": "seller",
                "id": user_id,
                "email": "vendor@example.com",
                "created_at": "2024-03-01T10:00:00Z"
            })],
        ));
        let app = app(store.clone());

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/upgrade/session")
                    .header(header::AUTHORIZATION, bearer_for(user_id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/upgrade/orders")
                    .header(header::AUTHORIZATION, bearer_for(user_id))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"package":"silver"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let order_id = body_json(response).await["data"]["order_id"]
            .as_str()
            .unwrap()
            .to_string();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(format!("/api/upgrade/orders/{}/capture", order_id))
                    .header(header::AUTHORIZATION, bearer_for(user_id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"]["kind"], json!("silver"));

        // Entitlement write landed in the store.
        assert_eq!(store.rows("users")[0]["package_type"], json!("silver"));
    }
}

//! Ad route definitions

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::*;
use crate::state::AppState;

pub fn ads_routes() -> Router<AppState> {
    Router::new()
        .route("/api/ads", get(list_ads).post(create_ad))
        .route("/api/ads/images", post(upload_ad_image))
        .route("/api/ads/:id", get(get_ad))
        .route("/api/ads/:id/clicks", post(record_ad_click))
        .route("/api/ads/:id/whatsapp-clicks", post(record_whatsapp_click))
}

//! Public listing handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::error::ApiResult;
use crate::listing::{ListingParams, ListingQuery};
use crate::models::{Ad, ApiResponse};
use crate::state::AppState;

/// List visible ads with filters and sort applied
pub async fn list_ads(
    State(app_state): State<AppState>,
    Query(params): Query<ListingParams>,
) -> ApiResult<Json<ApiResponse<Vec<Ad>>>> {
    let query = ListingQuery::from(params);
    let ads = app_state.listing_service.visible_ads(&query).await?;
    Ok(Json(ApiResponse::ok(ads)))
}

/// Ad detail. Viewing the detail page is what counts as a view, so the
/// counter bump happens here.
pub async fn get_ad(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<Ad>>> {
    let ad = app_state.listing_service.record_view(id).await?;
    Ok(Json(ApiResponse::ok(ad)))
}

pub async fn record_ad_click(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<Ad>>> {
    let ad = app_state.listing_service.record_click(id).await?;
    Ok(Json(ApiResponse::ok(ad)))
}

pub async fn record_whatsapp_click(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<Ad>>> {
    let ad = app_state.listing_service.record_whatsapp_click(id).await?;
    Ok(Json(ApiResponse::ok(ad)))
}

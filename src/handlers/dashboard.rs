//! Seller dashboard handlers

use axum::{extract::State, Json};

use crate::dashboard::{DashboardAnalytics, DashboardSummary};
use crate::error::ApiResult;
use crate::middleware::SellerUser;
use crate::models::ApiResponse;
use crate::state::AppState;

pub async fn get_dashboard(
    State(app_state): State<AppState>,
    SellerUser(seller): SellerUser,
) -> ApiResult<Json<ApiResponse<DashboardSummary>>> {
    let summary = app_state.dashboard_service.summary(&seller).await?;
    Ok(Json(ApiResponse::ok(summary)))
}

pub async fn get_dashboard_analytics(
    State(app_state): State<AppState>,
    SellerUser(seller): SellerUser,
) -> ApiResult<Json<ApiResponse<DashboardAnalytics>>> {
    let analytics = app_state.dashboard_service.analytics(&seller).await?;
    Ok(Json(ApiResponse::ok(analytics)))
}

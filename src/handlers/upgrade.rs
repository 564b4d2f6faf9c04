//! Package upgrade handlers
//!
//! The purchase flow is stateful per seller: opening the purchase screen
//! creates a session, activating a package creates a processor order, and
//! approval captures + persists. Leaving the screen deletes the session.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::ApiResult;
use crate::middleware::SellerUser;
use crate::models::{ApiResponse, PackageKind};
use crate::state::AppState;
use crate::upgrade::{CompletedUpgrade, FlowState, Package, PACKAGES};

/// Public package catalog
pub async fn list_packages() -> Json<ApiResponse<Vec<Package>>> {
    Json(ApiResponse::ok(PACKAGES.to_vec()))
}

#[derive(Serialize)]
pub struct SessionResponse {
    pub state: FlowState,
}

/// Open the purchase screen: verify the hosting context and poll the payment
/// widget until it is ready (or the poll times out).
pub async fn start_upgrade_session(
    State(app_state): State<AppState>,
    SellerUser(seller): SellerUser,
) -> ApiResult<Json<ApiResponse<SessionResponse>>> {
    match app_state.upgrade_service.start_session(seller.id).await {
        FlowState::Failed(reason) => Err(reason.into()),
        state => Ok(Json(ApiResponse::ok(SessionResponse { state }))),
    }
}

/// Leave the purchase screen; stops a still-running readiness poll.
pub async fn cancel_upgrade_session(
    State(app_state): State<AppState>,
    SellerUser(seller): SellerUser,
) -> ApiResult<Json<ApiResponse<()>>> {
    app_state.upgrade_service.cancel_session(seller.id).await;
    Ok(Json(ApiResponse::ok(())))
}

#[derive(Deserialize)]
pub struct CreateOrderRequest {
    pub package: PackageKind,
}

#[derive(Serialize)]
pub struct CreateOrderResponse {
    pub order_id: String,
}

/// The seller activated a package's purchase control.
pub async fn create_upgrade_order(
    State(app_state): State<AppState>,
    SellerUser(seller): SellerUser,
    Json(request): Json<CreateOrderRequest>,
) -> ApiResult<Json<ApiResponse<CreateOrderResponse>>> {
    // Rendering is idempotent; the first activation of a package renders its
    // control implicitly.
    app_state
        .upgrade_service
        .render_control(seller.id, request.package)
        .await?;
    let order_id = app_state
        .upgrade_service
        .create_order(seller.id, request.package)
        .await?;
    Ok(Json(ApiResponse::ok(CreateOrderResponse { order_id })))
}

/// The seller approved the order in the processor's window; capture and
/// persist the upgrade.
pub async fn capture_upgrade_order(
    State(app_state): State<AppState>,
    SellerUser(seller): SellerUser,
    Path(order_id): Path<String>,
) -> ApiResult<Json<ApiResponse<CompletedUpgrade>>> {
    let completed = app_state
        .upgrade_service
        .approve(seller.id, &order_id)
        .await?;
    Ok(Json(ApiResponse::ok(completed)))
}

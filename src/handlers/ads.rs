//! Ad publishing handlers

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;

use crate::ads::CreateAdRequest;
use crate::error::{ApiError, ApiResult};
use crate::middleware::SellerUser;
use crate::models::{Ad, ApiResponse};
use crate::state::AppState;

/// Publish a new ad (seller-only; package gate re-evaluated at submit).
pub async fn create_ad(
    State(app_state): State<AppState>,
    SellerUser(seller): SellerUser,
    Json(request): Json<CreateAdRequest>,
) -> ApiResult<Json<ApiResponse<Ad>>> {
    let ad = app_state.ad_service.publish(&seller, request).await?;
    Ok(Json(ApiResponse::ok(ad)))
}

#[derive(Serialize)]
pub struct UploadedImage {
    pub url: String,
}

/// Upload one ad photo to the external image host and return its public URL.
/// The client collects URLs and submits them with the ad form.
pub async fn upload_ad_image(
    State(app_state): State<AppState>,
    SellerUser(_seller): SellerUser,
    mut multipart: Multipart,
) -> ApiResult<Json<ApiResponse<UploadedImage>>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some("image") {
            continue;
        }
        let filename = field
            .file_name()
            .unwrap_or("upload.jpg")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::Validation(format!("Unreadable image field: {}", e)))?;
        if bytes.is_empty() {
            return Err(ApiError::Validation("Image field is empty".to_string()));
        }

        let url = app_state
            .image_host
            .upload(&filename, bytes.to_vec())
            .await?;
        return Ok(Json(ApiResponse::ok(UploadedImage { url })));
    }

    Err(ApiError::Validation(
        "Multipart field 'image' is required".to_string(),
    ))
}

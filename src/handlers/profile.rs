//! Profile handlers

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;

use crate::error::{ApiError, ApiResult};
use crate::middleware::CurrentUser;
use crate::models::{ApiResponse, Profile};
use crate::profile::UpdateProfileRequest;
use crate::state::AppState;

pub async fn update_profile(
    State(app_state): State<AppState>,
    CurrentUser(profile): CurrentUser,
    Json(request): Json<UpdateProfileRequest>,
) -> ApiResult<Json<ApiResponse<Profile>>> {
    let updated = app_state
        .profile_service
        .update_profile(profile.id(), request)
        .await?;
    Ok(Json(ApiResponse::ok(updated)))
}

#[derive(Serialize)]
pub struct AvatarResponse {
    pub avatar_url: String,
}

pub async fn upload_avatar(
    State(app_state): State<AppState>,
    CurrentUser(profile): CurrentUser,
    mut multipart: Multipart,
) -> ApiResult<Json<ApiResponse<AvatarResponse>>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some("avatar") {
            continue;
        }
        let filename = field.file_name().unwrap_or("avatar.png").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::Validation(format!("Unreadable avatar field: {}", e)))?;

        let avatar_url = app_state
            .profile_service
            .upload_avatar(profile.id(), &filename, &content_type, bytes.to_vec())
            .await?;
        return Ok(Json(ApiResponse::ok(AvatarResponse { avatar_url })));
    }

    Err(ApiError::Validation(
        "Multipart field 'avatar' is required".to_string(),
    ))
}

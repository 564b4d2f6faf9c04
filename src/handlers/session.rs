//! Session handlers

use axum::Json;

use crate::error::ApiResult;
use crate::middleware::CurrentUser;
use crate::models::{ApiResponse, Profile};

/// Current caller's profile. Accounts without a profile row resolve as
/// buyers, so this never 404s for a valid token.
pub async fn get_session(CurrentUser(profile): CurrentUser) -> ApiResult<Json<ApiResponse<Profile>>> {
    Ok(Json(ApiResponse::ok(profile)))
}

//! Authentication middleware
//!
//! Extractors that verify provider-issued bearer tokens and resolve the
//! caller's profile row before a handler runs.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use serde::Serialize;
use std::sync::Arc;

use crate::auth::{verify_token, AuthService, AuthTokenError};
use crate::models::{Profile, SellerProfile};

/// Error response for authentication failures
#[derive(Debug, Serialize)]
struct AuthError {
    error: AuthErrorDetails,
}

#[derive(Debug, Serialize)]
struct AuthErrorDetails {
    code: String,
    message: String,
}

impl AuthError {
    fn new(code: &str, message: &str) -> Self {
        Self {
            error: AuthErrorDetails {
                code: code.to_string(),
                message: message.to_string(),
            },
        }
    }

    fn unauthorized(self) -> Response {
        (StatusCode::UNAUTHORIZED, Json(self)).into_response()
    }

    fn forbidden(self) -> Response {
        (StatusCode::FORBIDDEN, Json(self)).into_response()
    }
}

/// Extractor for authenticated callers
///
/// Verifies the bearer token and resolves the stored profile. Accounts with
/// no profile row come through as buyers.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Profile);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    Arc<AuthService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| {
                    AuthError::new(
                        "MISSING_TOKEN",
                        "Authorization header with Bearer token required",
                    )
                    .unauthorized()
                })?;

        let auth_service = Arc::<AuthService>::from_ref(state);

        let claims = verify_token(bearer.token(), auth_service.jwt_secret()).map_err(|e| {
            let (code, message) = match e {
                AuthTokenError::TokenExpired => ("TOKEN_EXPIRED", "Token has expired"),
                AuthTokenError::InvalidToken(_) => ("INVALID_TOKEN", "Invalid token"),
            };
            AuthError::new(code, message).unauthorized()
        })?;

        let profile = auth_service
            .profile_for(&claims)
            .await
            .map_err(|e| e.into_response())?;

        Ok(CurrentUser(profile))
    }
}

/// Extractor that narrows the caller to a seller profile
///
/// Posting, dashboards, and package purchases are seller-only; buyers get a
/// 403 before the handler runs.
pub struct SellerUser(pub SellerProfile);

#[async_trait]
impl<S> FromRequestParts<S> for SellerUser
where
    Arc<AuthService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let CurrentUser(profile) = CurrentUser::from_request_parts(parts, state).await?;

        match profile.into_seller() {
            Some(seller) => Ok(SellerUser(seller)),
            None => Err(AuthError::new("FORBIDDEN", "Seller account required").forbidden()),
        }
    }
}

//! Session verification
//!
//! Identity is delegated to the hosted auth provider; this module only
//! verifies the HS256 tokens it issues and resolves the caller's profile
//! row. No tokens are minted here.

use std::sync::Arc;

use chrono::Utc;
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::{BuyerProfile, Profile};
use crate::store::{select_one_as, RecordStore};

const USERS_TABLE: &str = "users";

#[derive(Error, Debug)]
pub enum AuthTokenError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),
}

/// Claims carried by provider-issued access tokens
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Account email address
    pub email: String,
    /// Expiration (Unix timestamp)
    pub exp: i64,
}

/// Verify a provider-issued access token and return its claims
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, AuthTokenError> {
    let mut validation = Validation::default();
    // The provider stamps its own audience; we only care about the signature
    // and expiry.
    validation.validate_aud = false;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthTokenError::TokenExpired,
        _ => AuthTokenError::InvalidToken(e.to_string()),
    })
}

/// Resolves verified claims to a stored profile
pub struct AuthService {
    store: Arc<dyn RecordStore>,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(store: Arc<dyn RecordStore>, jwt_secret: String) -> Self {
        Self { store, jwt_secret }
    }

    pub fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }

    /// Look up the caller's profile row. An authenticated account with no
    /// profile row yet is treated as a plain buyer built from the claims.
    pub async fn profile_for(&self, claims: &Claims) -> ApiResult<Profile> {
        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| ApiError::Unauthorized("Invalid user ID in token".to_string()))?;

        let id = user_id.to_string();
        let profile: Option<Profile> =
            select_one_as(self.store.as_ref(), USERS_TABLE, &[("id", &id)]).await?;

        Ok(profile.unwrap_or_else(|| {
            tracing::debug!(%user_id, "No profile row; treating account as buyer");
            Profile::Buyer(BuyerProfile {
                id: user_id,
                email: claims.email.clone(),
                full_name: None,
                avatar_url: None,
                created_at: Utc::now(),
            })
        }))
    }
}

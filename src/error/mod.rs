//! Centralized API error handling for the MarketMaster backend
//!
//! Provides a unified error type for API responses with proper HTTP status
//! code mapping and JSON error responses. The taxonomy follows the error
//! handling design of the service: validation problems are caught at the form
//! boundary, collaborator failures are converted at the call site, entitlement
//! denials redirect to the upgrade path, and payment flow failures carry their
//! own sub-taxonomy.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::entitlement::PostAdDecision;
use crate::images::ImageHostError;
use crate::store::StoreError;
use crate::upgrade::PaymentFlowError;

/// API error type with HTTP status code mapping
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("An active package is required to post ads: {0}")]
    EntitlementDenied(PostAdDecision),

    #[error("External service error: {0}")]
    Collaborator(String),

    #[error(transparent)]
    PaymentFlow(#[from] PaymentFlowError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// JSON error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetails,
}

/// Error details in the response
#[derive(Serialize)]
pub struct ErrorDetails {
    pub code: String,
    pub message: String,
}

impl ApiError {
    /// Get the error code string
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::EntitlementDenied(_) => "ENTITLEMENT_DENIED",
            ApiError::Collaborator(_) => "EXTERNAL_SERVICE_ERROR",
            ApiError::PaymentFlow(e) => match e {
                PaymentFlowError::HostRestricted => "PAYMENT_HOST_RESTRICTED",
                PaymentFlowError::SdkTimeout => "PAYMENT_SDK_TIMEOUT",
                PaymentFlowError::OrderRejected(_) => "PAYMENT_ORDER_REJECTED",
                PaymentFlowError::CaptureError(_) => "PAYMENT_CAPTURE_ERROR",
                PaymentFlowError::CrossOriginBlocked => "PAYMENT_CROSS_ORIGIN_BLOCKED",
                PaymentFlowError::PartialPersistence { .. } => "PAYMENT_PARTIAL_PERSISTENCE",
            },
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get the HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::EntitlementDenied(_) => StatusCode::PAYMENT_REQUIRED,
            ApiError::Collaborator(_) => StatusCode::BAD_GATEWAY,
            ApiError::PaymentFlow(e) => match e {
                PaymentFlowError::HostRestricted => StatusCode::FORBIDDEN,
                PaymentFlowError::SdkTimeout => StatusCode::GATEWAY_TIMEOUT,
                PaymentFlowError::OrderRejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
                PaymentFlowError::CaptureError(_) => StatusCode::BAD_GATEWAY,
                PaymentFlowError::CrossOriginBlocked => StatusCode::FORBIDDEN,
                PaymentFlowError::PartialPersistence { .. } => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();
        let message = self.to_string();

        // Log server errors. Partial persistence is the one condition where
        // real money has moved without a matching local record, so it always
        // logs at error level with the order id in the message.
        match &self {
            ApiError::Internal(_)
            | ApiError::Collaborator(_)
            | ApiError::PaymentFlow(PaymentFlowError::PartialPersistence { .. }) => {
                tracing::error!(error = %message, code = %error_code, "Server error occurred");
            }
            _ => {
                tracing::debug!(error = %message, code = %error_code, "Client error occurred");
            }
        }

        let body = ErrorResponse {
            error: ErrorDetails {
                code: error_code.to_string(),
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}

// Convenience conversions from collaborator error types

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Collaborator(err.to_string())
    }
}

impl From<ImageHostError> for ApiError {
    fn from(err: ImageHostError) -> Self {
        ApiError::Collaborator(err.to_string())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Internal(format!("Invalid JSON: {}", err))
    }
}

/// Result type alias using ApiError
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            ApiError::Validation("test".to_string()).error_code(),
            "VALIDATION_ERROR"
        );
        assert_eq!(
            ApiError::NotFound("test".to_string()).error_code(),
            "NOT_FOUND"
        );
        assert_eq!(
            ApiError::EntitlementDenied(PostAdDecision::NoPackage).error_code(),
            "ENTITLEMENT_DENIED"
        );
        assert_eq!(
            ApiError::PaymentFlow(PaymentFlowError::SdkTimeout).error_code(),
            "PAYMENT_SDK_TIMEOUT"
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::Validation("test".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::EntitlementDenied(PostAdDecision::ExpiredPackage).status_code(),
            StatusCode::PAYMENT_REQUIRED
        );
        assert_eq!(
            ApiError::Collaborator("store down".to_string()).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError::PaymentFlow(PaymentFlowError::SdkTimeout).status_code(),
            StatusCode::GATEWAY_TIMEOUT
        );
    }

    #[test]
    fn test_partial_persistence_message_carries_order_id() {
        let err = ApiError::PaymentFlow(PaymentFlowError::PartialPersistence {
            order_id: "ORD-8842".to_string(),
        });
        assert!(err.to_string().contains("ORD-8842"));
    }
}

//! Payment processor collaborator
//!
//! The processor is an external widget/SDK whose availability cannot be
//! observed through an event, only probed. The gateway trait therefore
//! exposes a readiness probe next to the two order operations the upgrade
//! flow needs.

mod gateway;

pub use gateway::CheckoutGateway;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// Gateway errors, separated so the orchestrator can map them onto the
/// payment flow failure taxonomy. A blocked hosting context is distinguished
/// from ordinary rejections because no retry in the same context can help.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Order rejected by processor: {0}")]
    Rejected(String),

    #[error("Capture failed: {0}")]
    Capture(String),

    #[error("Processor communication blocked by hosting context: {0}")]
    Blocked(String),

    #[error("Processor unreachable: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        GatewayError::Transport(err.to_string())
    }
}

/// Order construction request carrying package kind, price and currency
#[derive(Debug, Clone, Serialize)]
pub struct OrderRequest {
    pub amount: i64,
    pub currency: String,
    pub description: String,
}

/// Confirmed payment after a successful capture
#[derive(Debug, Clone)]
pub struct CapturedPayment {
    pub order_id: String,
    pub amount: i64,
}

/// Payment gateway contract consumed by the upgrade orchestrator.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Availability probe; the widget loads asynchronously and unpredictably,
    /// so readiness is detected by polling this.
    async fn is_ready(&self) -> bool;

    /// Submit an order, returning the processor-issued order id.
    async fn create_order(&self, request: &OrderRequest) -> Result<String, GatewayError>;

    /// Finalize an authorized payment; funds move here.
    async fn capture_order(&self, order_id: &str) -> Result<CapturedPayment, GatewayError>;
}

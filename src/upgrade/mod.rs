//! Paid package upgrade domain
//!
//! Contains the package catalog, the upgrade flow state machine, the
//! orchestrator that drives it against the payment gateway and record store,
//! and the per-seller flow registry exposed to the HTTP layer.

mod model;
mod orchestrator;
mod service;

pub use model::{
    CompletedUpgrade, FlowState, OrderStatus, Package, PaymentFlowError, UpgradeFlow,
    UpgradeOrder, PACKAGES,
};
pub use orchestrator::{PollConfig, UpgradeOrchestrator};
pub use service::UpgradeService;

//! Upgrade flow models and failure taxonomy

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::models::PackageKind;

/// Purchasable listing package
#[derive(Debug, Clone, Serialize)]
pub struct Package {
    pub kind: PackageKind,
    pub name: &'static str,
    /// Whole-LKR monthly price
    pub price: i64,
    /// `None` means unlimited listings
    pub max_ads: Option<u32>,
    pub description: &'static str,
}

/// The fixed package catalog (30-day terms).
pub const PACKAGES: [Package; 2] = [
    Package {
        kind: PackageKind::Silver,
        name: "Silver",
        price: 1500,
        max_ads: Some(25),
        description: "Standard visibility with room for a growing catalog.",
    },
    Package {
        kind: PackageKind::Gold,
        name: "Gold",
        price: 3500,
        max_ads: None,
        description: "Unlimited listings with featured placement and priority support.",
    },
];

impl Package {
    pub fn for_kind(kind: PackageKind) -> Option<&'static Package> {
        PACKAGES.iter().find(|p| p.kind == kind)
    }

    /// Description attached to processor orders
    pub fn order_description(&self) -> String {
        format!("MarketMaster {} Package - 30 Days", self.name)
    }
}

/// Failure reasons for the upgrade flow.
///
/// `HostRestricted` and `CrossOriginBlocked` mean the hosting context itself
/// cannot run the widget; no retry helps without a different context.
/// `PartialPersistence` means the processor has already captured funds, so it
/// carries the order id as a support reference for manual reconciliation.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentFlowError {
    #[error("Payment interface is restricted by the hosting environment")]
    HostRestricted,

    #[error("Payment SDK timed out; check your connection or ad-blocker")]
    SdkTimeout,

    #[error("Order was rejected by the payment processor: {0}")]
    OrderRejected(String),

    #[error("Payment capture failed: {0}")]
    CaptureError(String),

    #[error("The payment window cannot communicate with the site due to cross-origin restrictions")]
    CrossOriginBlocked,

    #[error("Account update failed after payment was captured. Support ID: {order_id}")]
    PartialPersistence { order_id: String },
}

/// Status of a single purchase attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Initiating,
    AwaitingCapture,
    Captured,
    Failed,
}

/// One purchase attempt against the processor
#[derive(Debug, Clone, Serialize)]
pub struct UpgradeOrder {
    pub kind: PackageKind,
    /// Assigned once the processor accepts order creation
    pub order_id: Option<String>,
    pub status: OrderStatus,
}

impl UpgradeOrder {
    pub fn new(kind: PackageKind) -> Self {
        Self {
            kind,
            order_id: None,
            status: OrderStatus::Initiating,
        }
    }
}

/// Upgrade flow states. `Failed` is absorbing and reachable from every
/// non-terminal state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowState {
    Idle,
    WidgetLoading,
    WidgetReady,
    OrderCreating,
    AwaitingCapture,
    Capturing,
    Persisting,
    Completed,
    Failed(PaymentFlowError),
}

impl FlowState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, FlowState::Completed | FlowState::Failed(_))
    }
}

/// A single seller's in-progress upgrade flow
#[derive(Debug)]
pub struct UpgradeFlow {
    pub state: FlowState,
    pub order: Option<UpgradeOrder>,
    /// Packages whose purchase control has been rendered; re-rendering is a
    /// no-op to prevent duplicate widget instances.
    pub rendered: HashSet<PackageKind>,
}

impl UpgradeFlow {
    pub fn new() -> Self {
        Self {
            state: FlowState::Idle,
            order: None,
            rendered: HashSet::new(),
        }
    }

    /// Move to the absorbing failure state, returning the reason.
    pub fn fail(&mut self, reason: PaymentFlowError) -> PaymentFlowError {
        tracing::warn!(from = ?self.state, reason = %reason, "Upgrade flow failed");
        if let Some(order) = self.order.as_mut() {
            order.status = OrderStatus::Failed;
        }
        self.state = FlowState::Failed(reason.clone());
        reason
    }
}

impl Default for UpgradeFlow {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of a fully persisted upgrade
#[derive(Debug, Clone, Serialize)]
pub struct CompletedUpgrade {
    pub kind: PackageKind,
    pub order_id: String,
    pub amount: i64,
    pub expires_at: DateTime<Utc>,
}

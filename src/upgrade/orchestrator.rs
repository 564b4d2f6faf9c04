//! Upgrade flow orchestration
//!
//! Drives a seller's package purchase across the payment gateway and the
//! record store: widget readiness polling, order creation, capture, and the
//! two sequential persistence writes. Every failure is mapped onto the
//! `PaymentFlowError` taxonomy and absorbed into the flow state.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde_json::json;
use tokio::sync::watch;
use uuid::Uuid;

use crate::models::PackageKind;
use crate::payments::{GatewayError, OrderRequest, PaymentGateway};
use crate::store::RecordStore;

use super::model::{
    CompletedUpgrade, FlowState, OrderStatus, Package, PaymentFlowError, UpgradeFlow,
    UpgradeOrder,
};

const PAYMENTS_TABLE: &str = "payments";
const USERS_TABLE: &str = "users";
const PACKAGE_TERM_DAYS: i64 = 30;

/// Widget readiness poll parameters: fixed interval, bounded attempts.
#[derive(Debug, Clone, Copy)]
pub struct PollConfig {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            max_attempts: 15,
        }
    }
}

enum PollOutcome {
    Ready,
    Cancelled,
    TimedOut,
}

/// Coordinates the multi-step upgrade flow against the external processor
/// and the record store.
pub struct UpgradeOrchestrator {
    gateway: Arc<dyn PaymentGateway>,
    store: Arc<dyn RecordStore>,
    /// Page-identity of the hosting context; the widget cannot run without it
    public_origin: Option<String>,
    currency: String,
    poll: PollConfig,
}

impl UpgradeOrchestrator {
    pub fn new(
        gateway: Arc<dyn PaymentGateway>,
        store: Arc<dyn RecordStore>,
        public_origin: Option<String>,
        currency: String,
        poll: PollConfig,
    ) -> Self {
        Self {
            gateway,
            store,
            public_origin,
            currency,
            poll,
        }
    }

    /// Enter the purchase screen: verify the hosting context, then poll until
    /// the payment widget reports itself available.
    ///
    /// Cancellation (the screen being torn down) stops the poll and leaves
    /// the flow in `Idle` with no error surfaced and no order created.
    pub async fn prepare(&self, cancel: &mut watch::Receiver<bool>) -> UpgradeFlow {
        let mut flow = UpgradeFlow::new();

        // Host-identity check happens once, before any polling.
        if !self.host_accessible() {
            flow.fail(PaymentFlowError::HostRestricted);
            return flow;
        }

        flow.state = FlowState::WidgetLoading;
        match self.wait_for_widget(cancel).await {
            PollOutcome::Ready => {
                tracing::info!("Payment widget ready");
                flow.state = FlowState::WidgetReady;
            }
            PollOutcome::Cancelled => {
                tracing::debug!("Widget readiness poll cancelled");
                flow.state = FlowState::Idle;
            }
            PollOutcome::TimedOut => {
                flow.fail(PaymentFlowError::SdkTimeout);
            }
        }
        flow
    }

    fn host_accessible(&self) -> bool {
        self.public_origin
            .as_deref()
            .map(|origin| !origin.trim().is_empty())
            .unwrap_or(false)
    }

    async fn wait_for_widget(&self, cancel: &mut watch::Receiver<bool>) -> PollOutcome {
        for attempt in 1..=self.poll.max_attempts {
            if self.gateway.is_ready().await {
                return PollOutcome::Ready;
            }
            tracing::debug!(
                attempt,
                max = self.poll.max_attempts,
                "Payment widget not yet available"
            );
            tokio::select! {
                _ = tokio::time::sleep(self.poll.interval) => {}
                changed = cancel.changed() => {
                    // A dropped sender also means the screen is gone.
                    if changed.is_err() || *cancel.borrow() {
                        return PollOutcome::Cancelled;
                    }
                }
            }
        }
        PollOutcome::TimedOut
    }

    /// Render the purchase control for a package. Idempotent: returns false
    /// (and does nothing) if the control for that package already exists in
    /// this flow.
    pub fn render_control(&self, flow: &mut UpgradeFlow, kind: PackageKind) -> bool {
        if flow.rendered.contains(&kind) {
            return false;
        }
        flow.rendered.insert(kind);
        true
    }

    /// The user activated a package's purchase control: construct and submit
    /// the order.
    pub async fn create_order(
        &self,
        flow: &mut UpgradeFlow,
        kind: PackageKind,
    ) -> Result<String, PaymentFlowError> {
        if flow.state != FlowState::WidgetReady {
            return Err(flow.fail(PaymentFlowError::OrderRejected(format!(
                "purchase control activated in state {:?}",
                flow.state
            ))));
        }
        let package = match Package::for_kind(kind) {
            Some(p) => p,
            None => {
                return Err(flow.fail(PaymentFlowError::OrderRejected(
                    "unknown package".to_string(),
                )))
            }
        };

        flow.state = FlowState::OrderCreating;
        flow.order = Some(UpgradeOrder::new(kind));

        let request = OrderRequest {
            amount: package.price,
            currency: self.currency.clone(),
            description: package.order_description(),
        };

        match self.gateway.create_order(&request).await {
            Ok(order_id) => {
                tracing::info!(%order_id, package = package.name, "Order created");
                if let Some(order) = flow.order.as_mut() {
                    order.order_id = Some(order_id.clone());
                    order.status = OrderStatus::AwaitingCapture;
                }
                flow.state = FlowState::AwaitingCapture;
                Ok(order_id)
            }
            Err(e) => Err(flow.fail(Self::order_failure(e))),
        }
    }

    /// The user completed the external approval interaction: capture the
    /// payment, then persist the payment record and the entitlement update,
    /// in that order.
    pub async fn approve(
        &self,
        flow: &mut UpgradeFlow,
        seller_id: Uuid,
    ) -> Result<CompletedUpgrade, PaymentFlowError> {
        let (kind, order_id) = match (&flow.state, &flow.order) {
            (
                FlowState::AwaitingCapture,
                Some(UpgradeOrder {
                    kind,
                    order_id: Some(id),
                    ..
                }),
            ) => (*kind, id.clone()),
            _ => {
                return Err(flow.fail(PaymentFlowError::CaptureError(
                    "no order awaiting capture".to_string(),
                )))
            }
        };

        flow.state = FlowState::Capturing;
        let captured = match self.gateway.capture_order(&order_id).await {
            Ok(c) => c,
            Err(e) => return Err(flow.fail(Self::capture_failure(e))),
        };
        if let Some(order) = flow.order.as_mut() {
            order.status = OrderStatus::Captured;
        }

        // Two dependent writes, strictly sequential: the payment record must
        // exist before the entitlement changes, so a partial failure is
        // always attributable to an inspectable record. The capture is never
        // rolled back; the order id is the support reference.
        flow.state = FlowState::Persisting;
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(PACKAGE_TERM_DAYS);

        // Orders exist only for catalog packages, but fail closed regardless.
        let package = match Package::for_kind(kind) {
            Some(p) => p,
            None => {
                return Err(flow.fail(PaymentFlowError::PartialPersistence {
                    order_id: captured.order_id,
                }))
            }
        };
        let payment_row = json!({
            "user_id": seller_id,
            "package_type": kind.as_str(),
            "amount": package.price,
            "order_id": captured.order_id,
            "status": "completed",
        });
        if let Err(e) = self.store.insert(PAYMENTS_TABLE, payment_row).await {
            tracing::error!(order_id = %captured.order_id, error = %e,
                "Payment captured but payment record write failed");
            return Err(flow.fail(PaymentFlowError::PartialPersistence {
                order_id: captured.order_id,
            }));
        }

        let seller = seller_id.to_string();
        let entitlement_patch = json!({
            "package_type": kind.as_str(),
            "package_expiry": expires_at,
        });
        if let Err(e) = self
            .store
            .update(USERS_TABLE, &[("id", &seller)], entitlement_patch)
            .await
        {
            tracing::error!(order_id = %captured.order_id, error = %e,
                "Payment recorded but entitlement update failed");
            return Err(flow.fail(PaymentFlowError::PartialPersistence {
                order_id: captured.order_id,
            }));
        }

        flow.state = FlowState::Completed;
        tracing::info!(order_id = %captured.order_id, package = package.name,
            "Upgrade completed");
        Ok(CompletedUpgrade {
            kind,
            order_id: captured.order_id,
            amount: package.price,
            expires_at,
        })
    }

    fn order_failure(err: GatewayError) -> PaymentFlowError {
        match err {
            GatewayError::Blocked(_) => PaymentFlowError::CrossOriginBlocked,
            other => PaymentFlowError::OrderRejected(other.to_string()),
        }
    }

    fn capture_failure(err: GatewayError) -> PaymentFlowError {
        match err {
            GatewayError::Blocked(_) => PaymentFlowError::CrossOriginBlocked,
            other => PaymentFlowError::CaptureError(other.to_string()),
        }
    }
}

//! Per-seller upgrade flow registry
//!
//! The HTTP layer is stateless, so in-progress flows live here keyed by
//! seller. Cancelling a session fires the watch channel, which tears down a
//! readiness poll that is still running.
//!
//! Locking is two-level: the registry map is locked only for lookups and
//! insert/remove, while each seller's flow sits behind its own mutex. Gateway
//! round trips are awaited while holding only the per-seller lock, so a slow
//! processor call never blocks other sellers' sessions or teardowns. The
//! cancel sender lives outside the flow lock for the same reason.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::PackageKind;

use super::model::{CompletedUpgrade, FlowState, UpgradeFlow};
use super::orchestrator::UpgradeOrchestrator;

struct Session {
    flow: Arc<Mutex<UpgradeFlow>>,
    cancel: watch::Sender<bool>,
}

pub struct UpgradeService {
    orchestrator: UpgradeOrchestrator,
    flows: Mutex<HashMap<Uuid, Session>>,
}

impl UpgradeService {
    pub fn new(orchestrator: UpgradeOrchestrator) -> Self {
        Self {
            orchestrator,
            flows: Mutex::new(HashMap::new()),
        }
    }

    /// Enter the purchase screen: register a cancellable session and run the
    /// widget readiness poll. Returns the resulting flow state.
    pub async fn start_session(&self, seller_id: Uuid) -> FlowState {
        let (tx, mut rx) = watch::channel(false);
        let flow_arc = Arc::new(Mutex::new({
            let mut flow = UpgradeFlow::new();
            flow.state = FlowState::WidgetLoading;
            flow
        }));
        {
            let mut flows = self.flows.lock().await;
            flows.insert(
                seller_id,
                Session {
                    flow: flow_arc.clone(),
                    cancel: tx,
                },
            );
        }

        let flow = self.orchestrator.prepare(&mut rx).await;
        let state = flow.state.clone();
        *flow_arc.lock().await = flow;

        let mut flows = self.flows.lock().await;
        let still_ours = flows
            .get(&seller_id)
            .map(|s| Arc::ptr_eq(&s.flow, &flow_arc))
            .unwrap_or(false);
        // A cancelled poll leaves the flow in Idle; nothing to keep. If the
        // session was removed or replaced while polling, leave the map alone.
        if still_ours && state == FlowState::Idle {
            flows.remove(&seller_id);
        }
        state
    }

    /// Tear down the purchase screen. Clears a still-running readiness poll
    /// so no dangling timer fires afterwards. Only touches the registry lock,
    /// so it completes even while another seller's gateway call is in flight.
    pub async fn cancel_session(&self, seller_id: Uuid) {
        let mut flows = self.flows.lock().await;
        if let Some(session) = flows.remove(&seller_id) {
            let _ = session.cancel.send(true);
            tracing::debug!(%seller_id, "Upgrade session cancelled");
        }
    }

    /// Render the purchase control for a package; no-op on re-render.
    pub async fn render_control(&self, seller_id: Uuid, kind: PackageKind) -> ApiResult<bool> {
        let flow_arc = self.flow_for(seller_id).await?;
        let mut flow = flow_arc.lock().await;
        Ok(self.orchestrator.render_control(&mut flow, kind))
    }

    /// Activate a package's purchase control.
    pub async fn create_order(&self, seller_id: Uuid, kind: PackageKind) -> ApiResult<String> {
        let flow_arc = self.flow_for(seller_id).await?;
        let mut flow = flow_arc.lock().await;
        let order_id = self.orchestrator.create_order(&mut flow, kind).await?;
        Ok(order_id)
    }

    /// Complete an approved order: capture and persist. The session is
    /// discarded on any terminal outcome.
    pub async fn approve(&self, seller_id: Uuid, order_id: &str) -> ApiResult<CompletedUpgrade> {
        let flow_arc = self.flow_for(seller_id).await?;

        let (result, terminal) = {
            let mut flow = flow_arc.lock().await;

            let known = flow.order.as_ref().and_then(|o| o.order_id.as_deref());
            if known != Some(order_id) {
                return Err(ApiError::NotFound(format!(
                    "Order {} does not belong to this session",
                    order_id
                )));
            }

            let result = self.orchestrator.approve(&mut flow, seller_id).await;
            (result, flow.state.is_terminal())
        };

        if terminal {
            let mut flows = self.flows.lock().await;
            let still_ours = flows
                .get(&seller_id)
                .map(|s| Arc::ptr_eq(&s.flow, &flow_arc))
                .unwrap_or(false);
            if still_ours {
                flows.remove(&seller_id);
            }
        }
        Ok(result?)
    }

    /// Current flow state for a seller, if a session exists.
    pub async fn flow_state(&self, seller_id: Uuid) -> Option<FlowState> {
        let flow_arc = {
            let flows = self.flows.lock().await;
            flows.get(&seller_id).map(|s| s.flow.clone())
        };
        match flow_arc {
            Some(flow) => Some(flow.lock().await.state.clone()),
            None => None,
        }
    }

    /// Look up a seller's flow handle without holding the registry lock any
    /// longer than the map access itself.
    async fn flow_for(&self, seller_id: Uuid) -> ApiResult<Arc<Mutex<UpgradeFlow>>> {
        let flows = self.flows.lock().await;
        flows
            .get(&seller_id)
            .map(|s| s.flow.clone())
            .ok_or_else(|| ApiError::NotFound("No upgrade session".to_string()))
    }
}

//! Upgrade route definitions

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::*;
use crate::state::AppState;

pub fn upgrade_routes() -> Router<AppState> {
    Router::new()
        .route("/api/packages", get(list_packages))
        .route(
            "/api/upgrade/session",
            post(start_upgrade_session).delete(cancel_upgrade_session),
        )
        .route("/api/upgrade/orders", post(create_upgrade_order))
        .route(
            "/api/upgrade/orders/:order_id/capture",
            post(capture_upgrade_order),
        )
}

//! Session and profile route definitions

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::handlers::*;
use crate::state::AppState;

pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/api/session", get(get_session))
        .route("/api/profile", patch(update_profile))
        .route("/api/profile/avatar", post(upload_avatar))
}

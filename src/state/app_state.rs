//! Application state shared across handlers

use std::sync::Arc;

use axum::extract::FromRef;

use crate::ads::AdService;
use crate::auth::AuthService;
use crate::dashboard::DashboardService;
use crate::images::ImageHost;
use crate::listing::ListingService;
use crate::profile::ProfileService;
use crate::upgrade::UpgradeService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub listing_service: Arc<ListingService>,
    pub ad_service: Arc<AdService>,
    pub upgrade_service: Arc<UpgradeService>,
    pub dashboard_service: Arc<DashboardService>,
    pub profile_service: Arc<ProfileService>,
    pub auth_service: Arc<AuthService>,
    pub image_host: Arc<dyn ImageHost>,
}

impl AppState {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        listing_service: Arc<ListingService>,
        ad_service: Arc<AdService>,
        upgrade_service: Arc<UpgradeService>,
        dashboard_service: Arc<DashboardService>,
        profile_service: Arc<ProfileService>,
        auth_service: Arc<AuthService>,
        image_host: Arc<dyn ImageHost>,
    ) -> Self {
        Self {
            listing_service,
            ad_service,
            upgrade_service,
            dashboard_service,
            profile_service,
            auth_service,
            image_host,
        }
    }
}

impl FromRef<AppState> for Arc<ListingService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.listing_service.clone()
    }
}

impl FromRef<AppState> for Arc<AdService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.ad_service.clone()
    }
}

impl FromRef<AppState> for Arc<UpgradeService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.upgrade_service.clone()
    }
}

impl FromRef<AppState> for Arc<DashboardService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.dashboard_service.clone()
    }
}

impl FromRef<AppState> for Arc<ProfileService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.profile_service.clone()
    }
}

impl FromRef<AppState> for Arc<AuthService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.auth_service.clone()
    }
}

impl FromRef<AppState> for Arc<dyn ImageHost> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.image_host.clone()
    }
}

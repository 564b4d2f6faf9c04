//! MarketMaster Backend Server
//!
//! Classifieds marketplace API: listings, seller onboarding, ad posting,
//! dashboards, and paid package upgrades. Persistence, auth, image hosting
//! and payment processing are delegated to hosted collaborators.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::http::{HeaderValue, Method};
use axum::{routing::get, Router};
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use marketmaster_backend::ads::AdService;
use marketmaster_backend::auth::AuthService;
use marketmaster_backend::config::Config;
use marketmaster_backend::dashboard::DashboardService;
use marketmaster_backend::images::ImgbbClient;
use marketmaster_backend::listing::ListingService;
use marketmaster_backend::payments::CheckoutGateway;
use marketmaster_backend::profile::ProfileService;
use marketmaster_backend::routes;
use marketmaster_backend::state::AppState;
use marketmaster_backend::store::{RestObjectStore, RestStore};
use marketmaster_backend::upgrade::{PollConfig, UpgradeOrchestrator, UpgradeService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .with_target(true)
        .init();

    tracing::info!(
        environment = config.environment.as_str(),
        store_key = %config.store_api_key_masked(),
        "Starting MarketMaster backend"
    );

    // One HTTP client shared by every collaborator adapter.
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .context("Failed to build HTTP client")?;

    let store = Arc::new(RestStore::new(
        http.clone(),
        config.store_url.clone(),
        config.store_api_key.clone(),
    ));
    let objects = Arc::new(RestObjectStore::new(
        http.clone(),
        config.store_url.clone(),
        config.store_api_key.clone(),
        config.storage_bucket.clone(),
    ));
    let image_host = Arc::new(ImgbbClient::new(
        http.clone(),
        config.image_host_url.clone(),
        config.image_host_api_key.clone(),
    ));
    let gateway = Arc::new(CheckoutGateway::new(
        http,
        config.payment_api_url.clone(),
        config.payment_client_id.clone(),
        config.payment_client_secret.clone(),
    ));

    let listing_service = Arc::new(ListingService::new(store.clone()));
    let ad_service = Arc::new(AdService::new(store.clone()));
    let dashboard_service = Arc::new(DashboardService::new(listing_service.clone()));
    let profile_service = Arc::new(ProfileService::new(store.clone(), objects));
    let auth_service = Arc::new(AuthService::new(
        store.clone(),
        config.auth_jwt_secret.clone(),
    ));
    let upgrade_service = Arc::new(UpgradeService::new(UpgradeOrchestrator::new(
        gateway,
        store,
        config.public_origin.clone(),
        config.payment_currency.clone(),
        PollConfig {
            interval: config.widget_poll_interval,
            max_attempts: config.widget_poll_max_attempts,
        },
    )));

    let app_state = AppState::new(
        listing_service,
        ad_service,
        upgrade_service,
        dashboard_service,
        profile_service,
        auth_service,
        image_host,
    );

    let app = Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .merge(routes::ads_routes())
        .merge(routes::profile_routes())
        .merge(routes::dashboard_routes())
        .merge(routes::upgrade_routes())
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(configure_cors(config.cors_allowed_origins.as_deref()));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn root() -> &'static str {
    "MarketMaster API Server"
}

/// Health check response
#[derive(serde::Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_check() -> axum::Json<HealthResponse> {
    axum::Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

fn configure_cors(allowed_origins: Option<&str>) -> CorsLayer {
    let allowed_origins = allowed_origins.unwrap_or_default();

    if allowed_origins.is_empty() {
        tracing::warn!("CORS_ALLOWED_ORIGINS not set, allowing all origins (permissive)");
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .split(',')
        .filter_map(|s| s.trim().parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers(Any)
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => tracing::error!("Failed to install SIGTERM handler: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}

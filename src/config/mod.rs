//! Configuration management for the MarketMaster backend
//!
//! Loads and validates configuration from environment variables, with support
//! for different environments (development, staging, production).

use std::env;
use std::time::Duration;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid environment value: {0}")]
    InvalidValue(String),

    #[error("Invalid port number: {0}")]
    InvalidPort(String),
}

/// Application environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

impl Environment {
    /// Parse environment from string
    pub fn from_str(s: &str) -> Result<Self, ConfigError> {
        match s.to_lowercase().as_str() {
            "dev" | "development" => Ok(Environment::Development),
            "staging" => Ok(Environment::Staging),
            "prod" | "production" => Ok(Environment::Production),
            _ => Err(ConfigError::InvalidValue(format!(
                "Invalid environment: '{}'. Expected: dev, staging, or prod",
                s
            ))),
        }
    }

    /// Check if this is a production environment
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }

    /// Get the environment name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Environment::Development
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Hosted record store base URL (PostgREST-style API)
    pub store_url: String,

    /// API key for the hosted record store and object store
    pub store_api_key: String,

    /// Bucket name for avatar uploads
    pub storage_bucket: String,

    /// Image host upload endpoint
    pub image_host_url: String,

    /// Image host API key
    pub image_host_api_key: String,

    /// Payment processor base URL
    pub payment_api_url: String,

    /// Payment processor client id
    pub payment_client_id: String,

    /// Payment processor client secret
    pub payment_client_secret: String,

    /// Currency code for package purchases
    pub payment_currency: String,

    /// Public origin of the hosting context; the payment widget cannot run
    /// without one
    pub public_origin: Option<String>,

    /// Interval between payment widget readiness probes
    pub widget_poll_interval: Duration,

    /// Maximum number of readiness probes before giving up
    pub widget_poll_max_attempts: u32,

    /// Secret the hosted identity provider signs access tokens with
    pub auth_jwt_secret: String,

    /// Current environment
    pub environment: Environment,

    /// Server port
    pub port: u16,

    /// CORS allowed origins
    pub cors_allowed_origins: Option<String>,

    /// Log level (RUST_LOG)
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors)
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .map(|s| Environment::from_str(&s))
            .unwrap_or(Ok(Environment::Development))?;

        let store_url = env::var("STORE_URL")
            .map_err(|_| ConfigError::MissingEnvVar("STORE_URL".to_string()))?;

        let store_api_key = env::var("STORE_API_KEY")
            .map_err(|_| ConfigError::MissingEnvVar("STORE_API_KEY".to_string()))?;

        let storage_bucket =
            env::var("STORAGE_BUCKET").unwrap_or_else(|_| "avatars".to_string());

        let image_host_url = env::var("IMAGE_HOST_URL")
            .unwrap_or_else(|_| "https://api.imgbb.com/1/upload".to_string());

        let image_host_api_key = env::var("IMAGE_HOST_API_KEY")
            .map_err(|_| ConfigError::MissingEnvVar("IMAGE_HOST_API_KEY".to_string()))?;

        let payment_api_url = env::var("PAYMENT_API_URL")
            .unwrap_or_else(|_| "https://api-m.sandbox.paypal.com".to_string());

        let payment_client_id = env::var("PAYMENT_CLIENT_ID")
            .map_err(|_| ConfigError::MissingEnvVar("PAYMENT_CLIENT_ID".to_string()))?;

        let payment_client_secret = env::var("PAYMENT_CLIENT_SECRET")
            .map_err(|_| ConfigError::MissingEnvVar("PAYMENT_CLIENT_SECRET".to_string()))?;

        let payment_currency =
            env::var("PAYMENT_CURRENCY").unwrap_or_else(|_| "LKR".to_string());

        let public_origin = env::var("PUBLIC_ORIGIN").ok().filter(|s| !s.is_empty());

        let widget_poll_interval_ms = env::var("WIDGET_POLL_INTERVAL_MS")
            .unwrap_or_else(|_| "1000".to_string())
            .parse::<u64>()
            .unwrap_or(1000);

        let widget_poll_max_attempts = env::var("WIDGET_POLL_MAX_ATTEMPTS")
            .unwrap_or_else(|_| "15".to_string())
            .parse::<u32>()
            .unwrap_or(15);

        let auth_jwt_secret = env::var("AUTH_JWT_SECRET")
            .map_err(|_| ConfigError::MissingEnvVar("AUTH_JWT_SECRET".to_string()))?;

        let port = env::var("PORT")
            .unwrap_or_else(|_| "3001".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort("PORT must be a valid number".to_string()))?;

        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS").ok();

        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Ok(Config {
            store_url,
            store_api_key,
            storage_bucket,
            image_host_url,
            image_host_api_key,
            payment_api_url,
            payment_client_id,
            payment_client_secret,
            payment_currency,
            public_origin,
            widget_poll_interval: Duration::from_millis(widget_poll_interval_ms),
            widget_poll_max_attempts,
            auth_jwt_secret,
            environment,
            port,
            cors_allowed_origins,
            log_level,
        })
    }

    /// Store API key with the middle masked, safe for logging
    pub fn store_api_key_masked(&self) -> String {
        mask_secret(&self.store_api_key)
    }
}

fn mask_secret(secret: &str) -> String {
    if secret.len() <= 8 {
        return "****".to_string();
    }
    format!("{}****{}", &secret[..4], &secret[secret.len() - 4..])
}

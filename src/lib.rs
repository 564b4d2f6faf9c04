//! MarketMaster Backend Library
//!
//! Classifieds marketplace backend: ad listings with filtering and sorting,
//! package-gated posting, seller dashboards, and paid package upgrades
//! through an external payment processor.

pub mod ads;
pub mod auth;
pub mod config;
pub mod dashboard;
pub mod entitlement;
pub mod error;
pub mod handlers;
pub mod images;
pub mod listing;
pub mod middleware;
pub mod models;
pub mod payments;
pub mod profile;
pub mod routes;
pub mod state;
pub mod store;
pub mod upgrade;

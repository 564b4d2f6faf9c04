//! Ad listing domain
//!
//! Contains the pure filter/sort engine, the listing query model, and the
//! service that feeds the engine from the hosted record store.

mod engine;
mod model;
mod service;

pub use engine::compute_visible;
pub use model::{CategoryFilter, ListingParams, ListingQuery, SortKey, DEFAULT_MAX_PRICE};
pub use service::ListingService;

//! Ad publishing

mod model;
mod service;

pub use model::CreateAdRequest;
pub use service::AdService;

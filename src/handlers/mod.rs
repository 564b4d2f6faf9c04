//! API handlers for the MarketMaster backend

mod ads;
mod dashboard;
mod listing;
mod profile;
mod session;
mod upgrade;

pub use ads::*;
pub use dashboard::*;
pub use listing::*;
pub use profile::*;
pub use session::*;
pub use upgrade::*;

// Re-export the auth extractors for handler use
pub use crate::middleware::auth::{CurrentUser, SellerUser};

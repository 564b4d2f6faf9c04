//! Pure filter/sort pipeline for the visible ad list
//!
//! Safe to recompute on every query change: no side effects, no I/O.

use crate::models::Ad;

use super::model::{ListingQuery, SortKey};

/// Compute the visible ad list for a query.
///
/// Filtering is conjunctive: category, case-insensitive title substring
/// search, and price within the (normalized) bounds. Sorting is applied after
/// filtering and is stable, so ties keep their input order.
pub fn compute_visible(ads: &[Ad], query: &ListingQuery) -> Vec<Ad> {
    let (min_price, max_price) = query.normalized_bounds();
    let term = query.search.to_lowercase();

    let mut visible: Vec<Ad> = ads
        .iter()
        .filter(|ad| query.category.matches(&ad.category))
        .filter(|ad| term.is_empty() || ad.title.to_lowercase().contains(&term))
        .filter(|ad| ad.price >= min_price && ad.price <= max_price)
        .cloned()
        .collect();

    match query.sort {
        SortKey::Newest => visible.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortKey::PriceAsc => visible.sort_by(|a, b| a.price.total_cmp(&b.price)),
        SortKey::PriceDesc => visible.sort_by(|a, b| b.price.total_cmp(&a.price)),
        SortKey::MostViewed => visible.sort_by(|a, b| b.views.cmp(&a.views)),
    }

    visible
}

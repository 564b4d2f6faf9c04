//! Listing query model

use serde::Deserialize;

/// Default price ceiling applied when the caller supplies none (or an
/// unparseable value).
pub const DEFAULT_MAX_PRICE: f64 = 1_000_000.0;

/// Category filter: everything, or one named category
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryFilter {
    All,
    Named(String),
}

impl CategoryFilter {
    pub fn matches(&self, category: &str) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Named(name) => name == category,
        }
    }
}

/// Sort order applied after filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Newest,
    PriceAsc,
    PriceDesc,
    MostViewed,
}

impl Default for SortKey {
    fn default() -> Self {
        SortKey::Newest
    }
}

/// Filter and sort criteria for the visible ad list. Transient; rebuilt from
/// request parameters on every interaction.
#[derive(Debug, Clone)]
pub struct ListingQuery {
    pub category: CategoryFilter,
    pub search: String,
    pub min_price: f64,
    pub max_price: f64,
    pub sort: SortKey,
}

impl Default for ListingQuery {
    fn default() -> Self {
        Self {
            category: CategoryFilter::All,
            search: String::new(),
            min_price: 0.0,
            max_price: DEFAULT_MAX_PRICE,
            sort: SortKey::Newest,
        }
    }
}

impl ListingQuery {
    /// Price bounds with an inverted range repaired by swapping.
    ///
    /// The caller never validates `min <= max` (it only resets an unparseable
    /// max to the default), so an inverted range is clamped rather than
    /// rejected: every query stays answerable.
    pub fn normalized_bounds(&self) -> (f64, f64) {
        if self.min_price > self.max_price {
            (self.max_price, self.min_price)
        } else {
            (self.min_price, self.max_price)
        }
    }
}

/// Raw listing query parameters as they arrive on the request
#[derive(Debug, Default, Deserialize)]
pub struct ListingParams {
    pub category: Option<String>,
    pub q: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub sort: Option<SortKey>,
}

impl From<ListingParams> for ListingQuery {
    fn from(params: ListingParams) -> Self {
        let category = match params.category.as_deref() {
            None | Some("") | Some("All") | Some("all") => CategoryFilter::All,
            Some(name) => CategoryFilter::Named(name.to_string()),
        };
        Self {
            category,
            search: params.q.unwrap_or_default(),
            min_price: params.min_price.unwrap_or(0.0).max(0.0),
            max_price: params.max_price.unwrap_or(DEFAULT_MAX_PRICE),
            sort: params.sort.unwrap_or_default(),
        }
    }
}

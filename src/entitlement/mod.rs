//! Package-gated ad-posting eligibility
//!
//! Sellers may publish ads only while they hold a paid package that has not
//! expired. The gate is a pure function of the entitlement and the evaluation
//! instant; callers re-evaluate it at submission time, not only at screen
//! render, because a package can lapse between the two.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{PackageKind, SellerProfile};

/// A seller's paid-package standing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SellerEntitlement {
    pub kind: PackageKind,
    /// Present only when `kind != None`
    pub expiry: Option<DateTime<Utc>>,
}

impl From<&SellerProfile> for SellerEntitlement {
    fn from(profile: &SellerProfile) -> Self {
        Self {
            kind: profile.package_type,
            expiry: profile.package_expiry,
        }
    }
}

/// Outcome of the posting eligibility check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PostAdDecision {
    Allowed,
    NoPackage,
    ExpiredPackage,
}

impl PostAdDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, PostAdDecision::Allowed)
    }
}

impl std::fmt::Display for PostAdDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PostAdDecision::Allowed => write!(f, "posting allowed"),
            PostAdDecision::NoPackage => write!(f, "no active package"),
            PostAdDecision::ExpiredPackage => write!(f, "package has expired"),
        }
    }
}

/// Decide whether a seller may publish an ad right now.
///
/// A paid kind with a missing expiry is treated as expired rather than
/// allowed: the entitlement invariant says an expiry accompanies every paid
/// kind, so its absence means the row cannot grant publishing.
pub fn can_post_ad(entitlement: &SellerEntitlement, now: DateTime<Utc>) -> PostAdDecision {
    if entitlement.kind == PackageKind::None {
        return PostAdDecision::NoPackage;
    }
    match entitlement.expiry {
        Some(expiry) if expiry > now => PostAdDecision::Allowed,
        _ => PostAdDecision::ExpiredPackage,
    }
}

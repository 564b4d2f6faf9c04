//! Data models for the MarketMaster backend

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User roles
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Buyer,
    Seller,
}

/// Paid package kinds. `None` means the seller has never purchased (or has
/// been reset to) no package at all.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PackageKind {
    None,
    Silver,
    Gold,
}

impl PackageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PackageKind::None => "none",
            PackageKind::Silver => "silver",
            PackageKind::Gold => "gold",
        }
    }
}

impl Default for PackageKind {
    fn default() -> Self {
        PackageKind::None
    }
}

/// Ad condition
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    New,
    Used,
    Refurbished,
}

/// Published classified ad
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Ad {
    pub id: Uuid,
    pub seller_id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub sub_category: Option<String>,
    pub price: f64, // Minor-unit-free LKR amount
    pub condition: Condition,
    pub location: String,
    pub images: Vec<String>, // 1-5 public URLs once published
    pub whatsapp_contact: String,
    pub created_at: DateTime<Utc>,
    pub expiry_date: DateTime<Utc>,
    #[serde(default)]
    pub views: i64,
    #[serde(default)]
    pub clicks: i64,
    #[serde(default)]
    pub whatsapp_clicks: i64,
}

impl Ad {
    /// An ad is active until its expiry timestamp; it is filtered out of
    /// listings afterwards, never deleted.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        now < self.expiry_date
    }
}

/// Fields shared by every profile
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BuyerProfile {
    pub id: Uuid,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Seller profile with package state and contact details
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SellerProfile {
    pub id: Uuid,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub contact_number: Option<String>,
    #[serde(default)]
    pub whatsapp_number: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub package_type: PackageKind,
    #[serde(default)]
    pub package_expiry: Option<DateTime<Utc>>,
}

/// User profile, discriminated by role.
///
/// Seller-only attributes are only reachable after narrowing on the tag,
/// which keeps them off the shared shape instead of making them nullable
/// everywhere.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Profile {
    Buyer(BuyerProfile),
    Seller(SellerProfile),
}

impl Profile {
    pub fn id(&self) -> Uuid {
        match self {
            Profile::Buyer(p) => p.id,
            Profile::Seller(p) => p.id,
        }
    }

    pub fn email(&self) -> &str {
        match self {
            Profile::Buyer(p) => &p.email,
            Profile::Seller(p) => &p.email,
        }
    }

    pub fn role(&self) -> UserRole {
        match self {
            Profile::Buyer(_) => UserRole::Buyer,
            Profile::Seller(_) => UserRole::Seller,
        }
    }

    pub fn as_seller(&self) -> Option<&SellerProfile> {
        match self {
            Profile::Seller(p) => Some(p),
            Profile::Buyer(_) => None,
        }
    }

    pub fn into_seller(self) -> Option<SellerProfile> {
        match self {
            Profile::Seller(p) => Some(p),
            Profile::Buyer(_) => None,
        }
    }
}

/// API response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_profile_narrows_on_role_tag() {
        let row = json!({
            "role": "seller",
            "id": "7f0e1f8e-2c4b-4d8f-9a3e-111122223333",
            "email": "vendor@example.com",
            "created_at": "2024-03-01T10:00:00Z",
            "whatsapp_number": "+94771234567",
            "package_type": "silver",
            "package_expiry": "2024-04-01T10:00:00Z"
        });

        let profile: Profile = serde_json::from_value(row).unwrap();
        assert_eq!(profile.role(), UserRole::Seller);
        let seller = profile.as_seller().unwrap();
        assert_eq!(seller.package_type, PackageKind::Silver);
        assert!(seller.package_expiry.is_some());
    }

    #[test]
    fn test_buyer_profile_has_no_seller_fields() {
        let row = json!({
            "role": "buyer",
            "id": "7f0e1f8e-2c4b-4d8f-9a3e-444455556666",
            "email": "shopper@example.com",
            "created_at": "2024-03-01T10:00:00Z"
        });

        let profile: Profile = serde_json::from_value(row).unwrap();
        assert_eq!(profile.role(), UserRole::Buyer);
        assert!(profile.as_seller().is_none());
    }

    #[test]
    fn test_seller_package_defaults_to_none() {
        let row = json!({
            "role": "seller",
            "id": "7f0e1f8e-2c4b-4d8f-9a3e-777788889999",
            "email": "new-vendor@example.com",
            "created_at": "2024-03-01T10:00:00Z"
        });

        let profile: Profile = serde_json::from_value(row).unwrap();
        let seller = profile.as_seller().unwrap();
        assert_eq!(seller.package_type, PackageKind::None);
        assert!(seller.package_expiry.is_none());
    }

    #[test]
    fn test_package_kind_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(PackageKind::Gold).unwrap(),
            json!("gold")
        );
        assert_eq!(PackageKind::Silver.as_str(), "silver");
    }
}

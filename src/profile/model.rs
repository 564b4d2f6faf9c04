//! Profile update payloads

use serde::Deserialize;
use validator::Validate;

/// Partial profile update. Absent fields are left untouched; package fields
/// are deliberately not patchable here, only the upgrade flow writes them.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub full_name: Option<String>,

    #[validate(length(min = 3, max = 30, message = "Username must be 3-30 characters"))]
    pub username: Option<String>,

    #[validate(length(max = 100))]
    pub country: Option<String>,

    #[validate(length(max = 200))]
    pub address: Option<String>,

    #[validate(length(min = 7, max = 20, message = "Contact number looks wrong"))]
    pub contact_number: Option<String>,

    #[validate(length(min = 7, max = 20, message = "WhatsApp number looks wrong"))]
    pub whatsapp_number: Option<String>,
}

impl UpdateProfileRequest {
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.username.is_none()
            && self.country.is_none()
            && self.address.is_none()
            && self.contact_number.is_none()
            && self.whatsapp_number.is_none()
    }
}

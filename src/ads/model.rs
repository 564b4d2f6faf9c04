//! Ad publishing request payloads

use serde::Deserialize;
use validator::Validate;

use crate::models::Condition;

/// Payload for publishing a new ad. Image URLs must already be hosted,
/// uploaded through the image endpoint beforehand.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateAdRequest {
    #[validate(length(min = 3, max = 100, message = "Title must be 3-100 characters"))]
    pub title: String,

    #[validate(length(min = 10, max = 5000, message = "Description must be 10-5000 characters"))]
    pub description: String,

    #[validate(length(min = 1, message = "Category is required"))]
    pub category: String,

    #[serde(default)]
    pub sub_category: Option<String>,

    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: f64,

    pub condition: Condition,

    #[validate(length(min = 1, max = 100, message = "Location is required"))]
    pub location: String,

    #[validate(length(min = 1, max = 5, message = "Between 1 and 5 images are required"))]
    pub images: Vec<String>,

    /// Contact number override; the seller's stored WhatsApp number is used
    /// when absent.
    #[serde(default)]
    pub whatsapp_contact: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_request() -> CreateAdRequest {
        serde_json::from_value(json!({
            "title": "Mountain bike, barely used",
            "description": "26-inch frame, serviced last month, includes lights.",
            "category": "Sports",
            "price": 45000.0,
            "condition": "used",
            "location": "Colombo",
            "images": ["https://img.example.com/bike.jpg"]
        }))
        .unwrap()
    }

    #[test]
    fn test_valid_request_passes_validation() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn test_negative_price_is_rejected() {
        let mut req = valid_request();
        req.price = -1.0;
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_image_count_is_bounded() {
        let mut req = valid_request();
        req.images = vec!["https://img.example.com/a.jpg".to_string(); 6];
        assert!(req.validate().is_err());

        req.images.clear();
        assert!(req.validate().is_err());
    }
}

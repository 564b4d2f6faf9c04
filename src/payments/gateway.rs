//! REST adapter for the external checkout processor

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;

use super::{CapturedPayment, GatewayError, OrderRequest, PaymentGateway};

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct OrderResponse {
    id: String,
}

#[derive(Deserialize)]
struct CaptureResponse {
    id: String,
    status: String,
    #[serde(default)]
    purchase_units: Vec<CapturedUnit>,
}

#[derive(Deserialize, Default)]
struct CapturedUnit {
    #[serde(default)]
    payments: Option<CapturedPayments>,
}

#[derive(Deserialize)]
struct CapturedPayments {
    #[serde(default)]
    captures: Vec<CaptureDetail>,
}

#[derive(Deserialize)]
struct CaptureDetail {
    amount: CaptureAmount,
}

#[derive(Deserialize)]
struct CaptureAmount {
    value: String,
}

impl CaptureResponse {
    fn captured_amount(&self) -> i64 {
        self.purchase_units
            .iter()
            .filter_map(|u| u.payments.as_ref())
            .flat_map(|p| p.captures.iter())
            .filter_map(|c| c.amount.value.parse::<f64>().ok())
            .map(|v| v.round() as i64)
            .sum()
    }
}

/// Checkout gateway speaking the processor's REST API: client-credentials
/// token, then order create / capture calls.
pub struct CheckoutGateway {
    http: reqwest::Client,
    base_url: String,
    client_id: String,
    client_secret: String,
}

impl CheckoutGateway {
    pub fn new(
        http: reqwest::Client,
        base_url: String,
        client_id: String,
        client_secret: String,
    ) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            client_id,
            client_secret,
        }
    }

    async fn access_token(&self) -> Result<String, GatewayError> {
        let response = self
            .http
            .post(format!("{}/v1/oauth2/token", self.base_url))
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GatewayError::Transport(format!(
                "token request failed: {}",
                response.status()
            )));
        }
        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        Ok(token.access_token)
    }

    /// A 403 from the processor means this hosting context is not allowed to
    /// talk to it at all; retrying from the same context cannot succeed.
    async fn classify_failure(response: reqwest::Response, capture: bool) -> GatewayError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if status == StatusCode::FORBIDDEN {
            return GatewayError::Blocked(body);
        }
        if capture {
            GatewayError::Capture(format!("{}: {}", status, body))
        } else {
            GatewayError::Rejected(format!("{}: {}", status, body))
        }
    }
}

#[async_trait]
impl PaymentGateway for CheckoutGateway {
    async fn is_ready(&self) -> bool {
        self.access_token().await.is_ok()
    }

    async fn create_order(&self, request: &OrderRequest) -> Result<String, GatewayError> {
        let token = self.access_token().await?;
        let body = json!({
            "intent": "CAPTURE",
            "purchase_units": [{
                "amount": {
                    "value": request.amount.to_string(),
                    "currency_code": request.currency,
                },
                "description": request.description,
            }]
        });

        let response = self
            .http
            .post(format!("{}/v2/checkout/orders", self.base_url))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::classify_failure(response, false).await);
        }
        let order: OrderResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Rejected(e.to_string()))?;
        Ok(order.id)
    }

    async fn capture_order(&self, order_id: &str) -> Result<CapturedPayment, GatewayError> {
        let token = self.access_token().await?;
        let response = self
            .http
            .post(format!(
                "{}/v2/checkout/orders/{}/capture",
                self.base_url, order_id
            ))
            .bearer_auth(token)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::classify_failure(response, true).await);
        }
        let capture: CaptureResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Capture(e.to_string()))?;

        if capture.status != "COMPLETED" {
            return Err(GatewayError::Capture(format!(
                "capture for order {} ended in status {}",
                capture.id, capture.status
            )));
        }

        let amount = capture.captured_amount();
        Ok(CapturedPayment {
            order_id: capture.id,
            amount,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_captured_amount_sums_capture_values() {
        let body = r#"{
            "id": "ORD-1",
            "status": "COMPLETED",
            "purchase_units": [{
                "payments": { "captures": [{ "amount": { "value": "3500.00", "currency_code": "LKR" } }] }
            }]
        }"#;
        let parsed: CaptureResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.captured_amount(), 3500);
        assert_eq!(parsed.status, "COMPLETED");
    }

    #[test]
    fn test_captured_amount_defaults_to_zero() {
        let parsed: CaptureResponse =
            serde_json::from_str(r#"{ "id": "ORD-2", "status": "COMPLETED" }"#).unwrap();
        assert_eq!(parsed.captured_amount(), 0);
    }
}

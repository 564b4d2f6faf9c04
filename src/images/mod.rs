//! Third-party image host collaborator
//!
//! Ad photos are uploaded to an external image host before the ad record is
//! written. The host takes a multipart form with an `image` field and answers
//! with `{"data":{"url": ...}}`; any non-2xx response is a hard failure with
//! no retry built in.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImageHostError {
    #[error("Image upload failed: {0}")]
    Upload(String),

    #[error("Image host request failed: {0}")]
    Request(String),
}

impl From<reqwest::Error> for ImageHostError {
    fn from(err: reqwest::Error) -> Self {
        ImageHostError::Request(err.to_string())
    }
}

/// Image host contract: bytes in, public URL out.
#[async_trait]
pub trait ImageHost: Send + Sync {
    async fn upload(&self, filename: &str, bytes: Vec<u8>) -> Result<String, ImageHostError>;
}

#[derive(Deserialize)]
struct UploadResponse {
    data: UploadData,
}

#[derive(Deserialize)]
struct UploadData {
    url: String,
}

/// Adapter for the hosted image service (imgbb-style API).
pub struct ImgbbClient {
    http: reqwest::Client,
    upload_url: String,
    api_key: String,
}

impl ImgbbClient {
    pub fn new(http: reqwest::Client, upload_url: String, api_key: String) -> Self {
        Self {
            http,
            upload_url,
            api_key,
        }
    }
}

#[async_trait]
impl ImageHost for ImgbbClient {
    async fn upload(&self, filename: &str, bytes: Vec<u8>) -> Result<String, ImageHostError> {
        let part = reqwest::multipart::Part::bytes(bytes).file_name(filename.to_string());
        let form = reqwest::multipart::Form::new().part("image", part);

        let response = self
            .http
            .post(&self.upload_url)
            .query(&[("key", &self.api_key)])
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ImageHostError::Upload(format!("{}: {}", status, body)));
        }

        let parsed: UploadResponse = response
            .json()
            .await
            .map_err(|e| ImageHostError::Upload(e.to_string()))?;
        Ok(parsed.data.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_response_shape() {
        let body = r#"{"data":{"url":"https://i.ibb.co/abc/photo.jpg","id":"abc"},"success":true}"#;
        let parsed: UploadResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.data.url, "https://i.ibb.co/abc/photo.jpg");
    }
}

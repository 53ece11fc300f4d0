use super::{MediaStorage, StorageDiagnostics};
use crate::models::{Config, UploadResponse};
use crate::{Error, Result};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use sha1::{Digest, Sha1};
use std::path::Path;

/// Client for Cloudinary's signed upload endpoint.
pub struct CloudinaryClient {
    client: Client,
    config: Config,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorMessage,
}

#[derive(Debug, Deserialize)]
struct ApiErrorMessage {
    message: String,
}

impl CloudinaryClient {
    pub fn new(config: Config) -> Self {
        Self::new_with_client(config, Client::new())
    }

    pub fn new_with_client(config: Config, client: Client) -> Self {
        Self { client, config }
    }

    /// `auto` lets Cloudinary detect the resource type from the payload.
    fn upload_url(&self) -> String {
        format!(
            "{}/v1_1/{}/auto/upload",
            self.config.api_base, self.config.cloud_name
        )
    }

    /// Signature per Cloudinary's signing rule: SHA-1 hex digest of the
    /// signed params (here only `timestamp`) with the secret appended.
    fn signature(&self, timestamp: i64) -> String {
        sha1_hex(&format!("timestamp={}{}", timestamp, self.config.api_secret))
    }
}

fn sha1_hex(input: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

#[async_trait]
impl MediaStorage for CloudinaryClient {
    async fn upload(&self, local_path: &Path) -> Result<UploadResponse> {
        // A missing or unreadable file surfaces here as an upload failure.
        let file_bytes = tokio::fs::read(local_path).await?;

        let file_name = local_path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("upload")
            .to_string();

        let timestamp = Utc::now().timestamp();
        let form = Form::new()
            .part("file", Part::bytes(file_bytes).file_name(file_name))
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp.to_string())
            .text("signature", self.signature(timestamp));

        let response = self
            .client
            .post(self.upload_url())
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send upload request to Cloudinary: {}", e);
                e
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await?;
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|parsed| parsed.error.message)
                .unwrap_or(body);
            tracing::error!("Cloudinary API error (status {}): {}", status, message);
            return Err(Error::Provider(format!(
                "Cloudinary API error (status {}): {}",
                status, message
            )));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse Cloudinary response: {}\nBody: {}", e, body);
            Error::Provider(format!("Failed to parse Cloudinary response: {}", e))
        })
    }

    fn diagnostics(&self) -> StorageDiagnostics {
        StorageDiagnostics {
            account: self.config.cloud_name.clone(),
            secret: self.config.secret_marker(),
        }
    }
}

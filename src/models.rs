//! Data models and structures
//!
//! Defines the Cloudinary account configuration and the provider response
//! returned for a completed upload.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed marker used wherever the API secret would otherwise appear.
pub const SECRET_MARKER: &str = "****";

const DEFAULT_API_BASE: &str = "https://api.cloudinary.com";

/// Response returned by Cloudinary for a stored resource.
///
/// Only `public_id` and `url` are relied upon; every other field the provider
/// sends is carried through untouched in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub public_id: String,
    pub url: String,
    pub secure_url: Option<String>,
    pub resource_type: Option<String>,
    pub format: Option<String>,
    pub bytes: Option<u64>,
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Cloudinary account configuration, built once at startup and passed into
/// whichever component performs uploads.
#[derive(Clone)]
pub struct Config {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub api_base: String,
}

impl Config {
    pub fn from_env() -> crate::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            cloud_name: std::env::var("CLOUDINARY_CLOUD_NAME").map_err(|_| {
                crate::Error::Config("CLOUDINARY_CLOUD_NAME not set".to_string())
            })?,
            api_key: std::env::var("CLOUDINARY_API_KEY")
                .map_err(|_| crate::Error::Config("CLOUDINARY_API_KEY not set".to_string()))?,
            // An empty secret is a valid (mis)configuration: the upload is
            // still attempted and the provider rejects it.
            api_secret: std::env::var("CLOUDINARY_API_SECRET").unwrap_or_default(),
            api_base: std::env::var("CLOUDINARY_API_BASE")
                .unwrap_or_else(|_| DEFAULT_API_BASE.to_string()),
        })
    }

    /// `Some("****")` when a secret is configured, `None` otherwise.
    /// The raw secret never leaves the config.
    pub fn secret_marker(&self) -> Option<&'static str> {
        if self.api_secret.is_empty() {
            None
        } else {
            Some(SECRET_MARKER)
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &self.secret_marker())
            .field("api_base", &self.api_base)
            .finish()
    }
}

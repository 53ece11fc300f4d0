//! Cloudinary integration for storing local files remotely
//!
//! Defines the storage seam plus the real signed-upload client and an
//! in-memory mock for tests.

pub mod client;
pub mod mock;

pub use client::CloudinaryClient;
pub use mock::MockMediaStorage;

use crate::models::UploadResponse;
use crate::Result;
use async_trait::async_trait;
use std::path::Path;

/// Non-sensitive account details, safe to log on failure.
#[derive(Debug, Clone)]
pub struct StorageDiagnostics {
    pub account: String,
    /// `Some("****")` when a secret is configured; never the raw value.
    pub secret: Option<&'static str>,
}

#[async_trait]
pub trait MediaStorage: Send + Sync {
    /// Upload the file at `local_path`, letting the provider detect the
    /// resource type. Does not touch the local file beyond reading it.
    async fn upload(&self, local_path: &Path) -> Result<UploadResponse>;

    fn diagnostics(&self) -> StorageDiagnostics;
}

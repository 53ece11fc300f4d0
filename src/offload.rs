//! Upload-and-cleanup operation.
//!
//! Uploads a local file through the storage seam and removes the local copy
//! afterwards, best-effort, on both the success and failure paths. The caller
//! gets a typed result; cleanup failures are recorded but never decide whether
//! the operation itself counted as a success.

use crate::cloudinary::MediaStorage;
use crate::models::UploadResponse;
use crate::{Error, Result};
use std::path::Path;
use thiserror::Error;
use tracing::{error, info, warn};

/// Outcome of the best-effort local delete.
#[derive(Debug, Clone, PartialEq)]
pub enum CleanupOutcome {
    Removed,
    Failed(String),
}

/// Successful offload: the provider response plus what happened to the local
/// file.
#[derive(Debug)]
pub struct OffloadReceipt {
    pub response: UploadResponse,
    pub cleanup: CleanupOutcome,
}

#[derive(Debug, Error)]
pub enum OffloadError {
    #[error("no local file path provided")]
    InvalidInput,

    #[error("upload failed: {source}")]
    UploadFailed {
        #[source]
        source: Error,
        /// The delete is still attempted after a failed upload; this records
        /// how it went.
        cleanup: CleanupOutcome,
    },
}

pub struct Offloader {
    storage: Box<dyn MediaStorage>,
}

impl Offloader {
    pub fn new(storage: Box<dyn MediaStorage>) -> Self {
        Self { storage }
    }

    /// Upload the file at `local_path` and remove the local copy afterwards.
    ///
    /// A single upload attempt, no timeout of its own. Never panics; every
    /// failure comes back as [`OffloadError`]. Calling twice with the same
    /// path is allowed: the second result reflects the second upload attempt
    /// alone, with cleanup reporting the already-deleted file.
    pub async fn offload(
        &self,
        local_path: &Path,
    ) -> std::result::Result<OffloadReceipt, OffloadError> {
        if local_path.as_os_str().is_empty() {
            error!("No file path provided for upload");
            return Err(OffloadError::InvalidInput);
        }

        info!("Starting Cloudinary upload for file: {}", local_path.display());

        match self.storage.upload(local_path).await {
            Ok(response) => {
                info!("File successfully uploaded to Cloudinary: {}", response.url);

                let cleanup = remove_local(local_path).await;
                match &cleanup {
                    CleanupOutcome::Removed => {
                        info!("Local file deleted after successful upload");
                    }
                    CleanupOutcome::Failed(reason) => {
                        warn!("Failed to delete local file after successful upload: {}", reason);
                    }
                }

                Ok(OffloadReceipt { response, cleanup })
            }
            Err(source) => {
                error!("Cloudinary upload failed: {}", source);

                let cleanup = remove_local(local_path).await;
                match &cleanup {
                    CleanupOutcome::Removed => {
                        info!("Local file deleted after upload failure");
                    }
                    CleanupOutcome::Failed(reason) => {
                        error!("Failed to delete local file: {}", reason);
                    }
                }

                let diag = self.storage.diagnostics();
                info!(
                    "Upload diagnostics: account={}, secret={:?}, path={}",
                    diag.account,
                    diag.secret,
                    local_path.display()
                );
                info!("Error chain: {}", error_chain(&source));

                Err(OffloadError::UploadFailed { source, cleanup })
            }
        }
    }
}

async fn remove_local(local_path: &Path) -> CleanupOutcome {
    match tokio::fs::remove_file(local_path).await {
        Ok(()) => CleanupOutcome::Removed,
        Err(e) => CleanupOutcome::Failed(e.to_string()),
    }
}

/// Remove every regular file left behind in a staging directory.
///
/// Startup companion to [`Offloader::offload`]: when both an upload and its
/// cleanup fail, the file stays on disk; sweeping the staging directory on the
/// next start reclaims it. Per-file failures are logged and skipped.
/// Returns the number of files removed.
pub async fn sweep_orphans(dir: &Path) -> Result<usize> {
    let mut removed = 0;
    let mut entries = tokio::fs::read_dir(dir).await?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if !entry.file_type().await?.is_file() {
            continue;
        }
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                info!("Removed orphaned file: {}", path.display());
                removed += 1;
            }
            Err(e) => {
                warn!("Could not remove orphaned file {}: {}", path.display(), e);
            }
        }
    }

    Ok(removed)
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut chain = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        chain.push_str(&format!(": {}", cause));
        source = cause.source();
    }
    chain
}

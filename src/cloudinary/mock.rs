use super::{MediaStorage, StorageDiagnostics};
use crate::models::UploadResponse;
use crate::{Error, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

enum MockResult {
    Success(UploadResponse),
    Failure(String),
}

#[derive(Clone)]
pub struct MockMediaStorage {
    results: Arc<Mutex<VecDeque<MockResult>>>,
    uploads: Arc<Mutex<Vec<PathBuf>>>,
    account: String,
    secret_configured: bool,
}

impl MockMediaStorage {
    pub fn new() -> Self {
        Self {
            results: Arc::new(Mutex::new(VecDeque::new())),
            uploads: Arc::new(Mutex::new(Vec::new())),
            account: "mock-account".to_string(),
            secret_configured: true,
        }
    }

    pub fn with_account(mut self, account: String) -> Self {
        self.account = account;
        self
    }

    pub fn without_secret(mut self) -> Self {
        self.secret_configured = false;
        self
    }

    /// Queue a canned provider response for the next upload.
    pub fn with_response(self, response: UploadResponse) -> Self {
        self.results
            .lock()
            .unwrap()
            .push_back(MockResult::Success(response));
        self
    }

    /// Queue a provider failure for the next upload.
    pub fn with_failure(self, message: &str) -> Self {
        self.results
            .lock()
            .unwrap()
            .push_back(MockResult::Failure(message.to_string()));
        self
    }

    pub fn get_call_count(&self) -> usize {
        self.uploads.lock().unwrap().len()
    }

    pub fn get_uploads(&self) -> Vec<PathBuf> {
        self.uploads.lock().unwrap().clone()
    }

    fn default_response(&self, local_path: &Path) -> UploadResponse {
        let name = local_path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("upload");
        UploadResponse {
            public_id: name.to_string(),
            url: format!("https://res.cloudinary.test/{}/{}", self.account, name),
            secure_url: Some(format!(
                "https://res.cloudinary.test/{}/{}",
                self.account, name
            )),
            resource_type: Some("auto".to_string()),
            format: None,
            bytes: None,
            created_at: None,
            extra: serde_json::Map::new(),
        }
    }
}

impl Default for MockMediaStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaStorage for MockMediaStorage {
    async fn upload(&self, local_path: &Path) -> Result<UploadResponse> {
        self.uploads.lock().unwrap().push(local_path.to_path_buf());

        match self.results.lock().unwrap().pop_front() {
            Some(MockResult::Success(response)) => Ok(response),
            Some(MockResult::Failure(message)) => Err(Error::Provider(message)),
            None => Ok(self.default_response(local_path)),
        }
    }

    fn diagnostics(&self) -> StorageDiagnostics {
        StorageDiagnostics {
            account: self.account.clone(),
            secret: if self.secret_configured {
                Some(crate::models::SECRET_MARKER)
            } else {
                None
            },
        }
    }
}

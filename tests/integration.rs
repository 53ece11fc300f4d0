use cloudinary_offload::cloudinary::{CloudinaryClient, MediaStorage};
use cloudinary_offload::models::Config;
use cloudinary_offload::offload::{CleanupOutcome, OffloadError, Offloader};
use std::fs;
use std::path::{Path, PathBuf};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(server: &MockServer) -> Config {
    Config {
        cloud_name: "demo".to_string(),
        api_key: "key123".to_string(),
        api_secret: "s3cret".to_string(),
        api_base: server.uri(),
    }
}

fn write_test_file(dir: &tempfile::TempDir, name: &str) -> PathBuf {
    let file_path = dir.path().join(name);
    fs::write(&file_path, b"fake image bytes").unwrap();
    file_path
}

#[tokio::test]
async fn test_offload_uploads_and_removes_local_file() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1_1/demo/auto/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "public_id": "photo",
            "url": "http://res.cloudinary.com/demo/image/upload/v1/photo.png",
            "secure_url": "https://res.cloudinary.com/demo/image/upload/v1/photo.png",
            "resource_type": "image",
            "format": "png",
            "bytes": 16,
            "created_at": "2024-01-01T00:00:00Z",
            "asset_id": "abc123"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file_path = write_test_file(&dir, "photo.png");

    let offloader = Offloader::new(Box::new(CloudinaryClient::new(test_config(&server))));
    let receipt = offloader.offload(&file_path).await.unwrap();

    assert_eq!(receipt.response.public_id, "photo");
    assert!(receipt.response.url.ends_with("photo.png"));
    assert_eq!(receipt.response.extra["asset_id"], "abc123");
    assert_eq!(receipt.cleanup, CleanupOutcome::Removed);
    assert!(!file_path.exists());
}

#[tokio::test]
async fn test_provider_rejection_is_reported_and_file_still_removed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1_1/demo/auto/upload"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": { "message": "Invalid Signature" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file_path = write_test_file(&dir, "photo.png");

    let offloader = Offloader::new(Box::new(CloudinaryClient::new(test_config(&server))));
    let err = offloader.offload(&file_path).await.unwrap_err();

    match err {
        OffloadError::UploadFailed { source, cleanup } => {
            let message = source.to_string();
            assert!(message.contains("401"), "unexpected error: {}", message);
            assert!(message.contains("Invalid Signature"));
            assert_eq!(cleanup, CleanupOutcome::Removed);
        }
        other => panic!("expected UploadFailed, got {:?}", other),
    }
    assert!(!file_path.exists());
}

#[tokio::test]
async fn test_missing_file_fails_before_any_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let offloader = Offloader::new(Box::new(CloudinaryClient::new(test_config(&server))));
    let err = offloader
        .offload(Path::new("/tmp/missing-4c1b9.png"))
        .await
        .unwrap_err();

    match err {
        OffloadError::UploadFailed { cleanup, .. } => {
            // The delete on the nonexistent path fails independently.
            assert!(matches!(cleanup, CleanupOutcome::Failed(_)));
        }
        other => panic!("expected UploadFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_empty_path_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let offloader = Offloader::new(Box::new(CloudinaryClient::new(test_config(&server))));
    let err = offloader.offload(Path::new("")).await.unwrap_err();
    assert!(matches!(err, OffloadError::InvalidInput));
}

#[tokio::test]
async fn test_second_offload_reflects_its_own_upload_attempt() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1_1/demo/auto/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "public_id": "photo",
            "url": "http://res.cloudinary.com/demo/image/upload/v1/photo.png"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file_path = write_test_file(&dir, "photo.png");

    let offloader = Offloader::new(Box::new(CloudinaryClient::new(test_config(&server))));

    let first = offloader.offload(&file_path).await.unwrap();
    assert_eq!(first.cleanup, CleanupOutcome::Removed);

    // The file is gone, so the second attempt fails while reading it and
    // never reaches the provider.
    let err = offloader.offload(&file_path).await.unwrap_err();
    assert!(matches!(err, OffloadError::UploadFailed { .. }));
}

#[tokio::test]
async fn test_client_diagnostics_expose_account_without_secret_value() {
    let server = MockServer::start().await;
    let client = CloudinaryClient::new(test_config(&server));

    let diag = client.diagnostics();
    assert_eq!(diag.account, "demo");
    assert_eq!(diag.secret, Some("****"));
}

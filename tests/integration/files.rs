//! File upload/download integration tests.

use super::common::{fixture, logged_in_client};
use sflite::rest::UploadOptions;
use std::io::Write;

#[tokio::test]
async fn test_upload_to_invalid_parent_fails() {
    let Some(client) = logged_in_client().await else {
        return;
    };

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"sflite").unwrap();

    let err = client
        .upload_file_to_content_version(file.path(), "001INVALIDID", &UploadOptions::new())
        .await
        .unwrap_err();
    assert!(!err.to_string().is_empty());
}

#[tokio::test]
async fn test_download_invalid_legacy_file_fails() {
    let Some(client) = logged_in_client().await else {
        return;
    };

    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("legacy.bin");
    let result = client.download_legacy_file("00PINVALIDID", &dest).await;

    assert!(result.is_err());
    assert!(!dest.exists());
}

#[tokio::test]
async fn test_upload_and_download() {
    let Some(client) = logged_in_client().await else {
        return;
    };
    let Some(parent_id) = fixture("SF_TEST_PARENT_ID") else {
        return;
    };

    let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
    file.write_all(b"uploaded by the sflite integration tests").unwrap();

    let uploaded = client
        .upload_file_to_content_version(
            file.path(),
            &parent_id,
            &UploadOptions::new()
                .with_title("sflite integration")
                .with_description("safe to delete"),
        )
        .await
        .unwrap();
    assert!(!uploaded.content_version_id.is_empty());
    assert!(!uploaded.content_document_id.is_empty());

    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("roundtrip.txt");
    client
        .download_file(&uploaded.content_version_id, &dest)
        .await
        .unwrap();
    assert_eq!(
        std::fs::read(&dest).unwrap(),
        b"uploaded by the sflite integration tests"
    );

    let mut document = client.sobject("ContentDocument");
    document.set("Id", uploaded.content_document_id.as_str());
    document.delete().await.unwrap();
}

#[tokio::test]
async fn test_download_attachment() {
    let Some(client) = logged_in_client().await else {
        return;
    };
    let Some(attachment_id) = fixture("SF_TEST_ATTACHMENT_ID") else {
        return;
    };

    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("attachment.bin");
    let written = client
        .download_attachment(&attachment_id, &dest)
        .await
        .unwrap();
    assert_eq!(std::fs::metadata(&dest).unwrap().len(), written);
}

use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use sflite_client::{RequestMethod, Response};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{info, instrument, warn};

use crate::error::{Error, ErrorKind, Result};
use crate::files::{UploadOptions, UploadResult};
use crate::query::escape_soql_string;

impl super::ForceClient {
    /// Upload a local file as a `ContentVersion` published to `parent_id`.
    ///
    /// After the version is created its `ContentDocumentId` is looked up. If
    /// that lookup fails the error is [`ErrorKind::DocumentLookup`], which
    /// still carries the created version id.
    #[instrument(skip(self, path, options))]
    pub async fn upload_file_to_content_version(
        &self,
        path: impl AsRef<Path>,
        parent_id: &str,
        options: &UploadOptions,
    ) -> Result<UploadResult> {
        let path = path.as_ref();
        let data = tokio::fs::read(path).await.map_err(|e| {
            warn!(path = %path.display(), error = %e, "Failed to read upload source");
            Error::with_source(
                ErrorKind::Io(format!("failed to read {}: {}", path.display(), e)),
                e,
            )
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut version = self.sobject("ContentVersion");
        version
            .set("PathOnClient", file_name)
            .set("VersionData", STANDARD.encode(&data))
            .set("FirstPublishLocationId", parent_id);
        options.apply(&mut version);

        version.create().await?;
        let content_version_id = version.id().to_string();

        let soql = format!(
            "SELECT ContentDocumentId FROM ContentVersion WHERE Id = '{}'",
            escape_soql_string(&content_version_id)
        );
        let page = self.query(&soql).await.map_err(|e| {
            warn!(%content_version_id, error = %e, "ContentDocumentId lookup failed");
            Error::with_source(
                ErrorKind::DocumentLookup {
                    content_version_id: content_version_id.clone(),
                    message: e.to_string(),
                },
                e,
            )
        })?;

        let content_document_id = page
            .records
            .first()
            .map(|r| r.string_field("ContentDocumentId"))
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                Error::new(ErrorKind::DocumentLookup {
                    content_version_id: content_version_id.clone(),
                    message: "no ContentDocumentId returned".to_string(),
                })
            })?;

        info!(%content_version_id, %content_document_id, bytes = data.len(), "File uploaded");
        Ok(UploadResult {
            content_version_id,
            content_document_id,
        })
    }

    /// Save the body of a `ContentVersion` to `path`. Returns the bytes written.
    pub async fn download_file(
        &self,
        content_version_id: &str,
        path: impl AsRef<Path>,
    ) -> Result<u64> {
        self.download("ContentVersion", content_version_id, "VersionData", path.as_ref())
            .await
    }

    /// Save the body of an `Attachment` to `path`. Returns the bytes written.
    pub async fn download_attachment(
        &self,
        attachment_id: &str,
        path: impl AsRef<Path>,
    ) -> Result<u64> {
        self.download("Attachment", attachment_id, "Body", path.as_ref())
            .await
    }

    /// Save a legacy (pre-Files) attachment to `path`.
    pub async fn download_legacy_file(
        &self,
        attachment_id: &str,
        path: impl AsRef<Path>,
    ) -> Result<u64> {
        self.download_attachment(attachment_id, path).await
    }

    /// The destination is created only once a 2xx status is seen, and removed
    /// again if the body cannot be written out completely.
    #[instrument(skip(self, dest), fields(dest = %dest.display()))]
    async fn download(&self, sobject: &str, id: &str, field: &str, dest: &Path) -> Result<u64> {
        let url = self.inner.http.rest_url(&format!(
            "sobjects/{}/{}/{}",
            sobject,
            urlencoding::encode(id),
            field
        ))?;
        let request = self
            .inner
            .http
            .authorized(RequestMethod::Get, &url)?
            .header("Accept", "*/*");
        let mut response = self.inner.http.execute(request).await?;

        let mut file = File::create(dest).await?;
        match write_body(&mut response, &mut file).await {
            Ok(written) => {
                info!(bytes = written, "Download complete");
                Ok(written)
            }
            Err(e) => {
                drop(file);
                warn!(error = %e, "Download interrupted, removing partial file");
                if let Err(remove_err) = tokio::fs::remove_file(dest).await {
                    warn!(error = %remove_err, "Failed to remove partial file");
                }
                Err(e)
            }
        }
    }
}

async fn write_body(response: &mut Response, file: &mut File) -> Result<u64> {
    let mut written = 0u64;
    while let Some(chunk) = response.chunk().await? {
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    file.flush().await?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::super::tests::logged_in;
    use crate::error::ErrorKind;
    use crate::{ForceClient, UploadOptions};
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde_json::json;
    use std::io::Write;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn temp_file(contents: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .prefix("report")
            .suffix(".txt")
            .tempfile()
            .unwrap();
        file.write_all(contents).unwrap();
        file
    }

    #[tokio::test]
    async fn test_upload_creates_version_and_resolves_document() {
        let mock_server = MockServer::start().await;
        let source = temp_file(b"hello world");
        let file_name = source
            .path()
            .file_name()
            .unwrap()
            .to_string_lossy()
            .into_owned();

        Mock::given(method("POST"))
            .and(path("/services/data/v54.0/sobjects/ContentVersion"))
            .and(body_partial_json(json!({
                "PathOnClient": file_name,
                "VersionData": STANDARD.encode(b"hello world"),
                "FirstPublishLocationId": "001xx000003DGb2AAG",
                "Title": "Greeting"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": "068xx0000000001AAA", "success": true, "errors": []
            })))
            .expect(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/services/data/v54.0/query"))
            .and(query_param(
                "q",
                "SELECT ContentDocumentId FROM ContentVersion WHERE Id = '068xx0000000001AAA'",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "totalSize": 1,
                "done": true,
                "records": [{
                    "attributes": {"type": "ContentVersion"},
                    "ContentDocumentId": "069xx0000000001AAA"
                }]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = logged_in(&mock_server.uri());
        let result = client
            .upload_file_to_content_version(
                source.path(),
                "001xx000003DGb2AAG",
                &UploadOptions::new().with_title("Greeting"),
            )
            .await
            .unwrap();

        assert_eq!(result.content_version_id, "068xx0000000001AAA");
        assert_eq!(result.content_document_id, "069xx0000000001AAA");
    }

    #[tokio::test]
    async fn test_upload_to_invalid_parent_fails_without_lookup() {
        let mock_server = MockServer::start().await;
        let source = temp_file(b"data");

        Mock::given(method("POST"))
            .and(path("/services/data/v54.0/sobjects/ContentVersion"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!([{
                "message": "First Publish Location ID: id value of incorrect type: 001INVALIDID",
                "errorCode": "FIELD_INTEGRITY_EXCEPTION",
                "fields": ["FirstPublishLocationId"]
            }])))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let client = logged_in(&mock_server.uri());
        let err = client
            .upload_file_to_content_version(source.path(), "001INVALIDID", &UploadOptions::new())
            .await
            .unwrap_err();

        assert_eq!(err.error_code(), Some("FIELD_INTEGRITY_EXCEPTION"));
        assert!(!err.to_string().is_empty());
    }

    #[tokio::test]
    async fn test_failed_lookup_keeps_version_id() {
        let mock_server = MockServer::start().await;
        let source = temp_file(b"data");

        Mock::given(method("POST"))
            .and(path("/services/data/v54.0/sobjects/ContentVersion"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": "068xx0000000002AAA", "success": true, "errors": []
            })))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/services/data/v54.0/query"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream broke"))
            .mount(&mock_server)
            .await;

        let client = logged_in(&mock_server.uri());
        let err = client
            .upload_file_to_content_version(source.path(), "001xx000003DGb2AAG", &UploadOptions::new())
            .await
            .unwrap_err();

        match err.kind {
            ErrorKind::DocumentLookup {
                content_version_id,
                message,
            } => {
                assert_eq!(content_version_id, "068xx0000000002AAA");
                assert!(message.contains("500"));
            }
            other => panic!("unexpected kind: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_upload_missing_file_sends_nothing() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&mock_server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let client = logged_in(&mock_server.uri());
        let err = client
            .upload_file_to_content_version(
                dir.path().join("missing.pdf"),
                "001xx000003DGb2AAG",
                &UploadOptions::new(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err.kind, ErrorKind::Io(_)));
    }

    #[tokio::test]
    async fn test_download_file_streams_body() {
        let mock_server = MockServer::start().await;
        let body = vec![7u8; 64 * 1024];

        Mock::given(method("GET"))
            .and(path(
                "/services/data/v54.0/sobjects/ContentVersion/068xx0000000001AAA/VersionData",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(body.clone()))
            .mount(&mock_server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.bin");
        let client = logged_in(&mock_server.uri());
        let written = client
            .download_file("068xx0000000001AAA", &dest)
            .await
            .unwrap();

        assert_eq!(written, body.len() as u64);
        assert_eq!(std::fs::read(&dest).unwrap(), body);
    }

    #[tokio::test]
    async fn test_download_attachment_and_legacy_file() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/services/data/v54.0/sobjects/Attachment/00Pxx0000001AAA/Body"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"legacy".to_vec()))
            .expect(2)
            .mount(&mock_server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let client = logged_in(&mock_server.uri());

        client
            .download_attachment("00Pxx0000001AAA", dir.path().join("a.bin"))
            .await
            .unwrap();
        client
            .download_legacy_file("00Pxx0000001AAA", dir.path().join("b.bin"))
            .await
            .unwrap();

        assert_eq!(std::fs::read(dir.path().join("b.bin")).unwrap(), b"legacy");
    }

    #[tokio::test]
    async fn test_failed_download_does_not_create_file() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/services/data/v54.0/sobjects/Attachment/00PINVALIDID/Body"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!([{
                "errorCode": "NOT_FOUND",
                "message": "The requested resource does not exist"
            }])))
            .mount(&mock_server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("never.bin");
        let client = logged_in(&mock_server.uri());
        let err = client
            .download_legacy_file("00PINVALIDID", &dest)
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(404));
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn test_download_requires_session() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("never.bin");
        let client = ForceClient::new("", "", "").unwrap();

        let err = client.download_file("068xx", &dest).await.unwrap_err();
        assert!(err.is_not_authenticated());
        assert!(!dest.exists());
    }
}

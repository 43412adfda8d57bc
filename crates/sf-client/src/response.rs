//! HTTP response handling and the mapping of failed responses to typed errors.

use bytes::Bytes;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::{Error, ErrorKind, Result};

/// Wrapper around HTTP response with additional functionality.
#[derive(Debug)]
pub struct Response {
    inner: reqwest::Response,
}

impl Response {
    pub(crate) fn new(inner: reqwest::Response) -> Self {
        Self { inner }
    }

    /// Get the HTTP status code.
    pub fn status(&self) -> u16 {
        self.inner.status().as_u16()
    }

    /// Returns true if the response status is successful (2xx).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status())
    }

    /// Get the response body as bytes.
    pub async fn bytes(self) -> Result<Bytes> {
        self.inner.bytes().await.map_err(Into::into)
    }

    /// Read the next chunk of the body, `None` once the body is exhausted.
    pub async fn chunk(&mut self) -> Result<Option<Bytes>> {
        self.inner.chunk().await.map_err(Into::into)
    }

    /// Deserialize the response body as JSON.
    pub async fn json<T: DeserializeOwned>(self) -> Result<T> {
        let body = self.bytes().await?;
        serde_json::from_slice(&body).map_err(Into::into)
    }
}

/// Extension trait for processing Salesforce API responses.
pub trait ResponseExt {
    /// Pass 2xx responses through; read the body of anything else and map it
    /// to a typed error.
    fn check_salesforce_error(self) -> impl std::future::Future<Output = Result<Response>> + Send;
}

impl ResponseExt for Response {
    async fn check_salesforce_error(self) -> Result<Response> {
        if self.is_success() {
            return Ok(self);
        }

        let status = self.status();
        let body = match self.bytes().await {
            Ok(body) => body,
            Err(err) => {
                warn!(status, error = %err, "Request failed; error body unreadable");
                return Err(Error::with_source(
                    ErrorKind::Http {
                        status,
                        message: format!("failed to read error body: {err}"),
                    },
                    err,
                ));
            }
        };
        warn!(status, "Request failed");
        Err(parse_error_response(status, &body))
    }
}

/// Map a non-2xx status and its body to a typed error.
///
/// The platform reports failures as a JSON array of
/// `{"message": ..., "errorCode": ..., "fields": [...]}` objects; the first
/// entry becomes the error. A lone object in the same shape is accepted too.
/// Any other body yields a generic error holding the status and raw text.
pub fn parse_error_response(status: u16, body: &[u8]) -> Error {
    if let Ok(errors) = serde_json::from_slice::<Vec<SalesforceErrorResponse>>(body) {
        if let Some(err) = errors.into_iter().next() {
            return err.into_error(status);
        }
    }

    if let Ok(err) = serde_json::from_slice::<SalesforceErrorResponse>(body) {
        return err.into_error(status);
    }

    Error::new(ErrorKind::Http {
        status,
        message: String::from_utf8_lossy(body).into_owned(),
    })
}

/// Salesforce API error response format.
#[derive(Debug, serde::Deserialize)]
struct SalesforceErrorResponse {
    #[serde(alias = "errorCode")]
    error_code: String,
    message: String,
    fields: Option<Vec<String>>,
}

impl SalesforceErrorResponse {
    fn into_error(self, status: u16) -> Error {
        Error::new(ErrorKind::SalesforceApi {
            status,
            error_code: self.error_code,
            message: self.message,
            fields: self.fields.unwrap_or_default(),
        })
    }
}

//! Session-gated Salesforce client with typed HTTP methods.
//!
//! `SalesforceClient` pairs the HTTP transport with the current [`Session`].
//! Every authenticated call checks for a session first and fails with
//! [`ErrorKind::NotAuthenticated`] without touching the network when there is
//! none.
//!
//! ## Security
//!
//! - Access tokens are redacted in Debug output
//! - Request bodies are skipped in tracing spans

use std::sync::{Arc, PoisonError, RwLock};

use bytes::Bytes;
use serde::{de::DeserializeOwned, Serialize};
use tracing::instrument;

use crate::client::SfHttpClient;
use crate::config::ClientConfig;
use crate::error::{Error, ErrorKind, Result};
use crate::request::{RequestBuilder, RequestMethod};
use crate::response::Response;
use crate::session::Session;
use crate::DEFAULT_API_VERSION;

/// Session-gated Salesforce API client.
///
/// Clones share the same session slot, so a login performed through one handle
/// is visible through every other.
#[derive(Clone)]
pub struct SalesforceClient {
    http: SfHttpClient,
    api_version: String,
    session: Arc<RwLock<Option<Session>>>,
}

impl std::fmt::Debug for SalesforceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SalesforceClient")
            .field("api_version", &self.api_version)
            .field("session", &self.session())
            .finish_non_exhaustive()
    }
}

impl SalesforceClient {
    /// Create an unauthenticated client with default HTTP configuration.
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create an unauthenticated client with custom HTTP configuration.
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        Ok(Self {
            http: SfHttpClient::new(config)?,
            api_version: DEFAULT_API_VERSION.to_string(),
            session: Arc::new(RwLock::new(None)),
        })
    }

    /// Set the API version (e.g., "54.0"). A leading `v` is dropped.
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into().trim_start_matches(['v', 'V']).to_string();
        self
    }

    /// Get the API version.
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// The raw transport, for calls that carry no bearer token (login).
    pub fn http(&self) -> &SfHttpClient {
        &self.http
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Install a session; subsequent calls use its token and instance.
    pub fn set_session(&self, session: Session) {
        let mut slot = self.session.write().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(session);
    }

    /// Drop the current session.
    pub fn clear_session(&self) {
        let mut slot = self.session.write().unwrap_or_else(PoisonError::into_inner);
        *slot = None;
    }

    /// A copy of the current session, if any.
    pub fn session(&self) -> Option<Session> {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns true if a session with a non-empty token is installed.
    pub fn is_authenticated(&self) -> bool {
        self.session().is_some_and(|s| s.is_valid())
    }

    fn require_session(&self) -> Result<Session> {
        self.session()
            .filter(Session::is_valid)
            .ok_or_else(Error::not_authenticated)
    }

    // =========================================================================
    // URL building
    // =========================================================================

    /// Build the full URL for a path on the session's instance.
    ///
    /// Only paths are accepted. An absolute URL is rejected with
    /// [`ErrorKind::InvalidUrl`] so the bearer token never leaves the instance.
    pub fn url(&self, path: &str) -> Result<String> {
        let session = self.require_session()?;
        if url::Url::parse(path).is_ok() {
            return Err(Error::new(ErrorKind::InvalidUrl(format!(
                "expected a path on the instance, got {path}"
            ))));
        }
        Ok(join_url(session.instance_url(), path))
    }

    /// Build the REST API URL for a path.
    ///
    /// Example: `rest_url("sobjects/Account")` -> `{instance}/services/data/v54.0/sobjects/Account`
    pub fn rest_url(&self, path: &str) -> Result<String> {
        let session = self.require_session()?;
        Ok(format!(
            "{}/services/data/v{}/{}",
            session.instance_url(),
            self.api_version,
            path.trim_start_matches('/')
        ))
    }

    /// Build the Tooling API URL for a path.
    ///
    /// Example: `tooling_url("query")` -> `{instance}/services/data/v54.0/tooling/query`
    pub fn tooling_url(&self, path: &str) -> Result<String> {
        let session = self.require_session()?;
        Ok(format!(
            "{}/services/data/v{}/tooling/{}",
            session.instance_url(),
            self.api_version,
            path.trim_start_matches('/')
        ))
    }

    // =========================================================================
    // Authenticated requests
    // =========================================================================

    /// Create an authenticated request builder with the JSON content type.
    pub fn authorized(&self, method: RequestMethod, url: &str) -> Result<RequestBuilder> {
        let session = self.require_session()?;
        Ok(RequestBuilder::new(method, url)
            .bearer_auth(session.access_token())
            .header("Content-Type", "application/json"))
    }

    /// Execute a request and return the checked response.
    pub async fn execute(&self, request: RequestBuilder) -> Result<Response> {
        self.http.execute(request).await
    }

    /// Send `body` (if any) with `method` to `url` and return the raw bytes
    /// of a 2xx response.
    #[instrument(skip(self, body), fields(method = ?method, url = %url))]
    pub async fn request(
        &self,
        method: RequestMethod,
        url: &str,
        body: Option<Bytes>,
    ) -> Result<Bytes> {
        let mut request = self.authorized(method, url)?;
        if let Some(body) = body {
            request = request.bytes(body);
        }
        self.http.execute(request).await?.bytes().await
    }

    /// GET request with JSON response deserialization. `url` is a full URL
    /// built by [`rest_url`](Self::rest_url) or [`url`](Self::url).
    #[instrument(skip(self), fields(url = %url))]
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let request = self.authorized(RequestMethod::Get, url)?;
        self.http.send_json(request).await
    }

    /// POST request with JSON body and response.
    #[instrument(skip(self, body), fields(url = %url))]
    pub async fn post_json<T: DeserializeOwned, B: Serialize>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<T> {
        let request = self.authorized(RequestMethod::Post, url)?.json(body)?;
        self.http.send_json(request).await
    }

    /// PATCH request with JSON body. Returns the response body, which is empty
    /// for the usual 204 No Content.
    #[instrument(skip(self, body), fields(url = %url))]
    pub async fn patch_json<B: Serialize>(&self, url: &str, body: &B) -> Result<Bytes> {
        let request = self.authorized(RequestMethod::Patch, url)?.json(body)?;
        self.http.execute(request).await?.bytes().await
    }

    /// DELETE request.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn delete_request(&self, url: &str) -> Result<()> {
        let request = self.authorized(RequestMethod::Delete, url)?;
        self.http.execute(request).await?;
        Ok(())
    }
}

fn join_url(base: &str, path: &str) -> String {
    if path.starts_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    }
}

/// One page of a SOQL query.
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
pub struct QueryResult<T> {
    /// Total number of records matching the query.
    #[serde(rename = "totalSize")]
    pub total_size: u64,

    /// Whether all records are returned (no more pages).
    pub done: bool,

    /// URL to fetch next batch of results.
    #[serde(rename = "nextRecordsUrl", default)]
    pub next_records_url: Option<String>,

    /// The records.
    #[serde(default = "Vec::new")]
    pub records: Vec<T>,
}

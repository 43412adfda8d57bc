//! The client façade.
//!
//! [`ForceClient`] owns the login endpoint, the API version, the client
//! identifier and the session, and hands out [`SObject`] records that keep a
//! weak handle back to it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use sflite_auth::{PasswordCredentials, SoapLogin, PRODUCTION_LOGIN_URL};
use sflite_client::{ClientConfig, SalesforceClient, Session, UserInfo, DEFAULT_API_VERSION};
use tracing::instrument;

use crate::error::Result;
use crate::sobject::SObject;

mod apex;
mod crud;
mod describe;
mod files;
mod query;

/// Client identifier sent in the SOAP `CallOptions` header.
pub const DEFAULT_CLIENT_ID: &str = "sflite";

/// Login endpoint used when none is given.
pub const DEFAULT_LOGIN_URL: &str = PRODUCTION_LOGIN_URL;

pub(crate) struct ClientInner {
    http: SalesforceClient,
    base_url: String,
    client_id: String,
    use_tooling_api: AtomicBool,
}

/// Salesforce REST/SOAP client.
///
/// Cheap to clone; clones share the session. Every operation other than
/// login requires a session and fails with
/// [`ErrorKind::NotAuthenticated`](crate::ErrorKind::NotAuthenticated)
/// without a network call otherwise.
///
/// # Example
///
/// ```rust,ignore
/// use sflite_rest::ForceClient;
///
/// let client = ForceClient::new("https://login.salesforce.com", "sflite", "54.0")?;
/// client.login_password("user@example.com", "password", "token").await?;
///
/// let page = client.query("SELECT Id, Name FROM Account LIMIT 10").await?;
/// for record in &page.records {
///     println!("{} {}", record.id(), record.string_field("Name"));
/// }
///
/// let mut case = client.sobject("Case");
/// case.set("Subject", "Printer on fire");
/// case.create().await?;
/// ```
#[derive(Clone)]
pub struct ForceClient {
    inner: Arc<ClientInner>,
}

impl std::fmt::Debug for ForceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForceClient")
            .field("base_url", &self.inner.base_url)
            .field("client_id", &self.inner.client_id)
            .field("api_version", &self.api_version())
            .field("use_tooling_api", &self.use_tooling_api())
            .field("session", &self.inner.http.session())
            .finish()
    }
}

impl ForceClient {
    /// Create a client for a login endpoint, client identifier and API
    /// version. Empty values fall back to the defaults; a trailing `/` on the
    /// endpoint and a leading `v` on the version are dropped.
    pub fn new(
        base_url: impl Into<String>,
        client_id: impl Into<String>,
        api_version: impl Into<String>,
    ) -> Result<Self> {
        Self::builder()
            .base_url(base_url)
            .client_id(client_id)
            .api_version(api_version)
            .build()
    }

    pub fn builder() -> ForceClientBuilder {
        ForceClientBuilder::default()
    }

    pub(crate) fn downgrade(&self) -> Weak<ClientInner> {
        Arc::downgrade(&self.inner)
    }

    pub(crate) fn upgrade(inner: &Weak<ClientInner>) -> Option<Self> {
        inner.upgrade().map(|inner| Self { inner })
    }

    /// The underlying session-gated HTTP client.
    pub fn inner(&self) -> &SalesforceClient {
        &self.inner.http
    }

    /// Login endpoint; also used for the describe call.
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    pub fn client_id(&self) -> &str {
        &self.inner.client_id
    }

    pub fn api_version(&self) -> &str {
        self.inner.http.api_version()
    }

    /// Send SOQL to the Tooling API query endpoint instead of the data one.
    pub fn set_use_tooling_api(&self, enabled: bool) {
        self.inner.use_tooling_api.store(enabled, Ordering::Relaxed);
    }

    pub fn use_tooling_api(&self) -> bool {
        self.inner.use_tooling_api.load(Ordering::Relaxed)
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Log in against the client's login endpoint.
    ///
    /// The security token may be empty for trusted IP ranges. On failure the
    /// current session, if any, is left untouched.
    #[instrument(skip(self, password, security_token))]
    pub async fn login_password(
        &self,
        username: &str,
        password: &str,
        security_token: &str,
    ) -> Result<()> {
        let credentials = PasswordCredentials::new(username, password, security_token)
            .with_login_url(self.base_url());
        self.login(&credentials).await
    }

    /// Log in with prepared credentials, against their own login URL.
    pub async fn login(&self, credentials: &PasswordCredentials) -> Result<()> {
        let result = SoapLogin::new(self.client_id(), self.api_version())
            .login(self.inner.http.http(), credentials)
            .await?;
        self.inner.http.set_session(result.into_session());
        Ok(())
    }

    /// Use a session obtained elsewhere (e.g. a stored token).
    pub fn set_session(&self, session_id: impl Into<String>, instance_url: impl Into<String>) {
        self.inner
            .http
            .set_session(Session::new(session_id, instance_url));
    }

    /// Current session id, for saving to a token store.
    pub fn session_id(&self) -> Option<String> {
        self.inner
            .http
            .session()
            .map(|s| s.access_token().to_string())
    }

    /// Current instance URL.
    pub fn instance_url(&self) -> Option<String> {
        self.inner
            .http
            .session()
            .map(|s| s.instance_url().to_string())
    }

    /// Identity reported by the last password login.
    pub fn user(&self) -> Option<UserInfo> {
        self.inner.http.session().map(|s| s.user().clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.http.is_authenticated()
    }

    // =========================================================================
    // Records
    // =========================================================================

    /// A new empty record of the given type, bound to this client.
    pub fn sobject(&self, type_name: &str) -> SObject {
        let mut obj = SObject::new(type_name);
        obj.attach(self);
        obj
    }

    /// Bind an existing record to this client.
    pub fn attach(&self, record: &mut SObject) {
        record.attach(self);
    }
}

/// Builder for [`ForceClient`].
#[derive(Debug, Clone, Default)]
pub struct ForceClientBuilder {
    base_url: Option<String>,
    client_id: Option<String>,
    api_version: Option<String>,
    use_tooling_api: bool,
    config: Option<ClientConfig>,
}

impl ForceClientBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }

    pub fn use_tooling_api(mut self, enabled: bool) -> Self {
        self.use_tooling_api = enabled;
        self
    }

    /// HTTP transport configuration.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn build(self) -> Result<ForceClient> {
        let base_url = non_empty(self.base_url)
            .unwrap_or_else(|| DEFAULT_LOGIN_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let client_id =
            non_empty(self.client_id).unwrap_or_else(|| DEFAULT_CLIENT_ID.to_string());
        let api_version =
            non_empty(self.api_version).unwrap_or_else(|| DEFAULT_API_VERSION.to_string());

        let http = SalesforceClient::with_config(self.config.unwrap_or_default())?
            .with_api_version(api_version);

        Ok(ForceClient {
            inner: Arc::new(ClientInner {
                http,
                base_url,
                client_id,
                use_tooling_api: AtomicBool::new(self.use_tooling_api),
            }),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

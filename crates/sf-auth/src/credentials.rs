//! Username/password credentials for the SOAP login.
//!
//! The password and security token are redacted in Debug output.

use crate::error::{Error, ErrorKind, Result};
use crate::PRODUCTION_LOGIN_URL;

/// Username, password and optional security token for a password login.
#[derive(Clone)]
pub struct PasswordCredentials {
    username: String,
    password: String,
    security_token: String,
    login_url: String,
}

impl std::fmt::Debug for PasswordCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordCredentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field(
                "security_token",
                &(!self.security_token.is_empty()).then_some("[REDACTED]"),
            )
            .field("login_url", &self.login_url)
            .finish()
    }
}

impl PasswordCredentials {
    /// Create credentials against the production login endpoint.
    ///
    /// The security token may be empty when the org trusts the caller's IP.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        security_token: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            security_token: security_token.into(),
            login_url: PRODUCTION_LOGIN_URL.to_string(),
        }
    }

    /// Use a different login endpoint (sandbox, My Domain).
    pub fn with_login_url(mut self, login_url: impl Into<String>) -> Self {
        self.login_url = login_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Load credentials from environment variables.
    ///
    /// Required environment variables:
    /// - `SF_USER`
    /// - `SF_PASS`
    ///
    /// Optional:
    /// - `SF_TOKEN` (default: empty)
    /// - `SF_URL` (default: <https://login.salesforce.com>)
    pub fn from_env() -> Result<Self> {
        let username = std::env::var("SF_USER")
            .map_err(|_| Error::new(ErrorKind::EnvVar("SF_USER".to_string())))?;
        let password = std::env::var("SF_PASS")
            .map_err(|_| Error::new(ErrorKind::EnvVar("SF_PASS".to_string())))?;
        let security_token = std::env::var("SF_TOKEN").unwrap_or_default();

        let mut creds = Self::new(username, password, security_token);
        if let Ok(url) = std::env::var("SF_URL") {
            if !url.is_empty() {
                creds = creds.with_login_url(url);
            }
        }
        Ok(creds)
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub(crate) fn password(&self) -> &str {
        &self.password
    }

    pub(crate) fn security_token(&self) -> &str {
        &self.security_token
    }

    /// The login endpoint these credentials authenticate against.
    pub fn login_url(&self) -> &str {
        &self.login_url
    }

    /// Check that a login can be attempted at all.
    pub fn validate(&self) -> Result<()> {
        if self.username.is_empty() {
            return Err(Error::new(ErrorKind::InvalidCredentials(
                "username is empty".to_string(),
            )));
        }
        if self.password.is_empty() {
            return Err(Error::new(ErrorKind::InvalidCredentials(
                "password is empty".to_string(),
            )));
        }
        Ok(())
    }
}

//! # sflite-auth
//!
//! Username/password login against the Salesforce SOAP partner endpoint.
//!
//! ## Security
//!
//! - Passwords, security tokens and session ids are redacted in Debug output
//! - Tracing skips credential parameters
//! - Error messages never carry the password
//!
//! ## Example
//!
//! ```rust,ignore
//! use sflite_auth::{PasswordCredentials, SoapLogin};
//! use sflite_client::SfHttpClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), sflite_auth::Error> {
//!     // SF_USER, SF_PASS, SF_TOKEN, SF_URL
//!     let creds = PasswordCredentials::from_env()?;
//!     let http = SfHttpClient::default_client()?;
//!
//!     let login = SoapLogin::new("sflite", "54.0").login(&http, &creds).await?;
//!     let session = login.into_session();
//!
//!     Ok(())
//! }
//! ```

mod credentials;
mod error;
mod soap;

pub use credentials::PasswordCredentials;
pub use error::{Error, ErrorKind, Result};
pub use soap::{parse_login_response, LoginResult, SoapLogin};

/// Default Salesforce login URL for production.
pub const PRODUCTION_LOGIN_URL: &str = "https://login.salesforce.com";

/// Default Salesforce login URL for sandbox.
pub const SANDBOX_LOGIN_URL: &str = "https://test.salesforce.com";

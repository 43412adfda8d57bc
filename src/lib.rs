//! # sflite
//!
//! A lightweight Salesforce client for Rust: SOAP username/password login,
//! SOQL queries, dynamically typed records, file transfer and describe.
//!
//! ## Security
//!
//! - Passwords and session ids are redacted in Debug output
//! - Tracing skips credential parameters
//!
//! ## Crates
//!
//! - **sflite-client** - HTTP pipeline, session state, error mapping
//! - **sflite-auth** - SOAP login and credential loading
//! - **sflite-rest** - The [`ForceClient`] façade, records, queries, files
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sflite::{ForceClient, PasswordCredentials};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // SF_USER, SF_PASS, SF_TOKEN, SF_URL
//!     let creds = PasswordCredentials::from_env()?;
//!
//!     let client = ForceClient::new(creds.login_url(), "sflite", "54.0")?;
//!     client.login(&creds).await?;
//!
//!     let page = client.query("SELECT Id, Name FROM Account LIMIT 10").await?;
//!     for account in &page.records {
//!         println!("{}", account.string_field("Name"));
//!     }
//!
//!     Ok(())
//! }
//! ```

// Re-export all crates for convenient access
#[cfg(feature = "auth")]
pub use sflite_auth as auth;
#[cfg(feature = "client")]
pub use sflite_client as client;
#[cfg(feature = "rest")]
pub use sflite_rest as rest;

// Re-export commonly used types at the top level
#[cfg(feature = "auth")]
pub use sflite_auth::PasswordCredentials;
#[cfg(feature = "client")]
pub use sflite_client::{ClientConfig, SalesforceClient};
#[cfg(feature = "rest")]
pub use sflite_rest::{ForceClient, QueryResult, SObject};

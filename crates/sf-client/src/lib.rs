//! # sflite-client
//!
//! HTTP pipeline and session state shared by the Salesforce crates.
//!
//! This crate provides:
//! - A pooled HTTP client with compression support
//! - Session state (token + instance URL) behind a shared handle
//! - Mapping of failed responses into typed errors
//! - Request/response tracing
//!
//! Requests are sent exactly once; there is no retry layer.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Application Layer                        │
//! │  (sflite-auth, sflite-rest)                                 │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   SalesforceClient                          │
//! │  - Holds the session + HTTP client                          │
//! │  - Refuses to send without a session                        │
//! │  - Provides typed JSON methods (get_json, post_json, etc.)  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    SfHttpClient                             │
//! │  - Raw HTTP with compression and pooling                    │
//! │  - Error body mapping                                       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use sflite_client::{SalesforceClient, Session};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), sflite_client::Error> {
//!     let client = SalesforceClient::new()?;
//!     client.set_session(Session::new(token, "https://na1.salesforce.com"));
//!
//!     let limits: serde_json::Value = client
//!         .get_json(&client.rest_url("limits")?)
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod error;
mod request;
mod response;
mod salesforce_client;
mod session;

pub use client::SfHttpClient;
pub use config::{ClientConfig, ClientConfigBuilder};
pub use error::{Error, ErrorKind, Result};
pub use request::{RequestBuilder, RequestMethod};
pub use response::{parse_error_response, Response, ResponseExt};
pub use salesforce_client::{QueryResult, SalesforceClient};
pub use session::{Session, UserInfo};

/// Default Salesforce API version
pub const DEFAULT_API_VERSION: &str = "54.0";

/// User-Agent string for the client
pub const USER_AGENT: &str = concat!("sflite/", env!("CARGO_PKG_VERSION"));

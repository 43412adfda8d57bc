//! # sflite-rest
//!
//! Salesforce client built on the REST Data API and the SOAP login call.
//!
//! ## Features
//!
//! - **Login** - SOAP username/password login, or an injected session
//! - **SOQL Query** - Page-by-page queries, optional Tooling API endpoint
//! - **Records** - Dynamically typed [`SObject`] with create/get/update/upsert/delete
//! - **Files** - ContentVersion upload, ContentVersion/Attachment download
//! - **Describe** - Global and per-object metadata
//! - **Custom REST** - Pass-through calls to Apex REST endpoints
//!
//! ## Example
//!
//! ```rust,ignore
//! use sflite_rest::ForceClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), sflite_rest::Error> {
//!     let client = ForceClient::new("https://login.salesforce.com", "sflite", "54.0")?;
//!     client.login_password("user@example.com", "password", "token").await?;
//!
//!     let mut page = client.query("SELECT Id, Subject FROM Case").await?;
//!     loop {
//!         for case in &page.records {
//!             println!("{} {}", case.id(), case.string_field("Subject"));
//!         }
//!         match page.next_records_url.take() {
//!             Some(next) if !page.done => page = client.query_more(&next).await?,
//!             _ => break,
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```

mod client;
mod describe;
mod error;
mod files;
mod query;
mod sobject;

// Main client
pub use client::{ForceClient, ForceClientBuilder, DEFAULT_CLIENT_ID, DEFAULT_LOGIN_URL};

// Describe types
pub use describe::{
    ChildRelationship, DescribeGlobalResult, DescribeSObjectResult, FieldDescribe,
    PicklistValue, RecordTypeInfo, SObjectBasicInfo,
};

// Error types
pub use error::{Error, ErrorKind, Result};

// File transfer
pub use files::{UploadOptions, UploadResult};

// Query types
pub use query::{escape_soql_string, QueryResult, RecordPage};

// Records
pub use sobject::{
    CreateResult, SObject, SObjectAttributes, SalesforceError, UpsertResult, ATTRIBUTES_FIELD,
    ID_FIELD,
};

// Re-export lower-level types that users might need
pub use sflite_auth::PasswordCredentials;
pub use sflite_client::{
    ClientConfig, ClientConfigBuilder, RequestMethod, UserInfo, DEFAULT_API_VERSION,
};

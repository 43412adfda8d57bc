//! File upload options and results.

use serde_json::Value;

use crate::sobject::SObject;

/// Extra `ContentVersion` fields for an upload, applied in the order given.
///
/// ```rust,ignore
/// let opts = UploadOptions::new()
///     .with_title("Quarterly report")
///     .with_description("Q3 numbers");
/// ```
#[derive(Debug, Clone, Default)]
pub struct UploadOptions {
    fields: Vec<(String, Value)>,
}

impl UploadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `Title`.
    pub fn with_title(self, title: impl Into<String>) -> Self {
        self.with_field("Title", title.into())
    }

    /// Set `Description`.
    pub fn with_description(self, description: impl Into<String>) -> Self {
        self.with_field("Description", description.into())
    }

    /// Set any other field. Later entries overwrite earlier ones.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.push((key.into(), value.into()));
        self
    }

    pub(crate) fn apply(&self, record: &mut SObject) {
        for (key, value) in &self.fields {
            record.set(key.clone(), value.clone());
        }
    }
}

/// Identifiers of an uploaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResult {
    pub content_version_id: String,
    pub content_document_id: String,
}

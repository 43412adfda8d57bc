//! Generic, dynamically typed records.
//!
//! An [`SObject`] is an open map of field name to JSON value plus a weak
//! handle to the [`ForceClient`] that produced it. Field accessors follow a
//! best-effort contract: an absent field, or one holding another JSON type,
//! reads as the zero value of the requested type.

use std::sync::Weak;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{instrument, warn};

use crate::client::{ClientInner, ForceClient};
use crate::describe::DescribeSObjectResult;
use crate::error::{Error, ErrorKind, Result};

/// Field holding the record identifier.
pub const ID_FIELD: &str = "Id";

/// Field holding the `{type, url}` metadata object.
pub const ATTRIBUTES_FIELD: &str = "attributes";

/// Top-level type key, accepted in place of `attributes.type`.
const TYPE_FIELD: &str = "type";

/// One remote record.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct SObject {
    #[serde(flatten)]
    fields: Map<String, Value>,

    #[serde(skip)]
    external_id_field: Option<String>,

    #[serde(skip)]
    client: Weak<ClientInner>,
}

impl std::fmt::Debug for SObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SObject")
            .field("fields", &self.fields)
            .field("external_id_field", &self.external_id_field)
            .field("attached", &(self.client.strong_count() > 0))
            .finish()
    }
}

impl PartialEq for SObject {
    fn eq(&self, other: &Self) -> bool {
        self.fields == other.fields && self.external_id_field == other.external_id_field
    }
}

/// The `attributes` metadata the platform puts on every returned record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SObjectAttributes {
    #[serde(rename = "type", default)]
    pub type_name: String,
    #[serde(default)]
    pub url: String,
}

/// Response body of a create call.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreateResult {
    pub id: String,
    pub success: bool,
    #[serde(default)]
    pub errors: Vec<SalesforceError>,
}

/// Response body of an upsert that created a record.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpsertResult {
    pub id: String,
    pub success: bool,
    #[serde(default)]
    pub created: bool,
    #[serde(default)]
    pub errors: Vec<SalesforceError>,
}

/// Error entry inside a create/upsert result.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SalesforceError {
    #[serde(rename = "statusCode")]
    pub status_code: String,
    pub message: String,
    #[serde(default)]
    pub fields: Vec<String>,
}

fn describe_errors(errors: &[SalesforceError]) -> String {
    if errors.is_empty() {
        return "no error details returned".to_string();
    }
    errors
        .iter()
        .map(|e| format!("{}: {}", e.status_code, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl SObject {
    /// Create a detached record of the given type. An empty name leaves the
    /// record untyped.
    pub fn new(type_name: &str) -> Self {
        let mut obj = Self::default();
        if !type_name.is_empty() {
            obj.set_type(type_name);
        }
        obj
    }

    /// Build a record from an existing field map.
    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self {
            fields,
            ..Self::default()
        }
    }

    pub(crate) fn attach(&mut self, client: &ForceClient) {
        self.client = client.downgrade();
    }

    /// Returns true while the client that produced this record is alive.
    pub fn is_attached(&self) -> bool {
        self.client.strong_count() > 0
    }

    fn client(&self) -> Result<ForceClient> {
        ForceClient::upgrade(&self.client).ok_or_else(|| Error::new(ErrorKind::ClientUnavailable))
    }

    // =========================================================================
    // Identity
    // =========================================================================

    /// The remote type name: `attributes.type`, or a top-level `type` string.
    pub fn type_name(&self) -> &str {
        self.fields
            .get(ATTRIBUTES_FIELD)
            .and_then(|a| a.get("type"))
            .and_then(Value::as_str)
            .or_else(|| self.fields.get(TYPE_FIELD).and_then(Value::as_str))
            .unwrap_or_default()
    }

    /// Set the remote type name (stored under `attributes.type`).
    pub fn set_type(&mut self, type_name: &str) -> &mut Self {
        let attributes = self
            .fields
            .entry(ATTRIBUTES_FIELD)
            .or_insert_with(|| Value::Object(Map::new()));
        if !attributes.is_object() {
            *attributes = Value::Object(Map::new());
        }
        if let Value::Object(map) = attributes {
            map.insert("type".to_string(), Value::String(type_name.to_string()));
        }
        self
    }

    /// The record identifier, or `""` if it has none yet.
    pub fn id(&self) -> &str {
        self.string_field(ID_FIELD)
    }

    /// The `attributes` metadata, empty when absent.
    pub fn attributes(&self) -> SObjectAttributes {
        let mut attributes: SObjectAttributes = self
            .fields
            .get(ATTRIBUTES_FIELD)
            .and_then(|a| serde_json::from_value(a.clone()).ok())
            .unwrap_or_default();
        if attributes.type_name.is_empty() {
            attributes.type_name = self.type_name().to_string();
        }
        attributes
    }

    /// Name of the external id field used by [`SObject::upsert`].
    pub fn external_id_field_name(&self) -> Option<&str> {
        self.external_id_field.as_deref()
    }

    /// Choose the external id field used by [`SObject::upsert`].
    pub fn set_external_id_field_name(&mut self, field: impl Into<String>) -> &mut Self {
        self.external_id_field = Some(field.into());
        self
    }

    /// Value of the external id field, or `""`.
    pub fn external_id(&self) -> &str {
        self.external_id_field
            .as_deref()
            .map(|f| self.string_field(f))
            .unwrap_or_default()
    }

    /// Set the external id field and its value in one go.
    pub fn set_external_id(&mut self, field: impl Into<String>, value: &str) -> &mut Self {
        let field = field.into();
        self.fields
            .insert(field.clone(), Value::String(value.to_string()));
        self.external_id_field = Some(field);
        self
    }

    // =========================================================================
    // Field access
    // =========================================================================

    /// Raw value of a field.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn string_field(&self, key: &str) -> &str {
        self.fields
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    pub fn bool_field(&self, key: &str) -> bool {
        self.fields
            .get(key)
            .and_then(Value::as_bool)
            .unwrap_or_default()
    }

    /// Integer value; whole floats (`3.0`) are accepted, fractions truncate.
    pub fn int_field(&self, key: &str) -> i64 {
        match self.fields.get(key) {
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f as i64))
                .unwrap_or_default(),
            _ => 0,
        }
    }

    pub fn float_field(&self, key: &str) -> f64 {
        self.fields
            .get(key)
            .and_then(Value::as_f64)
            .unwrap_or_default()
    }

    /// Set a field. Any key is accepted; there is no local schema.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Remove a field, returning its previous value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.fields.remove(key)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }

    /// Wrap an embedded relationship object as a record of `type_name`.
    ///
    /// No request is made: the data must already be present, as it is for
    /// relationship fields selected in a query. The child shares this
    /// record's client handle.
    pub fn sobject_field(&self, type_name: &str, key: &str) -> Option<SObject> {
        let Some(Value::Object(map)) = self.fields.get(key) else {
            return None;
        };
        let mut child = SObject {
            fields: map.clone(),
            external_id_field: None,
            client: self.client.clone(),
        };
        if !type_name.is_empty() {
            child.set_type(type_name);
        }
        Some(child)
    }

    /// Field map without the `Id`, `attributes` and top-level `type` keys, as
    /// sent on writes.
    fn writable_fields(&self) -> Map<String, Value> {
        self.fields
            .iter()
            .filter(|(k, _)| ![ID_FIELD, ATTRIBUTES_FIELD, TYPE_FIELD].contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    fn require_type(&self) -> Result<&str> {
        match self.type_name() {
            "" => Err(Error::new(ErrorKind::InvalidRecord(
                "record has no type".to_string(),
            ))),
            t => Ok(t),
        }
    }

    fn require_id(&self) -> Result<&str> {
        match self.id() {
            "" => Err(Error::new(ErrorKind::InvalidRecord(
                "record has no Id".to_string(),
            ))),
            id => Ok(id),
        }
    }

    // =========================================================================
    // Remote operations
    // =========================================================================

    /// Create the record remotely and store the assigned id in `Id`.
    #[instrument(skip(self), fields(sobject = %self.type_name()))]
    pub async fn create(&mut self) -> Result<&mut Self> {
        let client = self.client()?;
        let type_name = self.require_type()?.to_string();

        let result = client
            .create_record(&type_name, &self.writable_fields())
            .await?;
        if !result.success || result.id.is_empty() {
            let message = describe_errors(&result.errors);
            warn!(sobject = %type_name, %message, "Create reported failure");
            return Err(Error::new(ErrorKind::OperationFailed(format!(
                "create {type_name}: {message}"
            ))));
        }

        self.fields
            .insert(ID_FIELD.to_string(), Value::String(result.id));
        Ok(self)
    }

    /// Fetch the record by its `Id`, replacing the local fields.
    pub async fn get(&mut self) -> Result<&mut Self> {
        let id = self.require_id()?.to_string();
        self.get_by_id(&id).await
    }

    /// Fetch the record with the given id, replacing the local fields.
    #[instrument(skip(self), fields(sobject = %self.type_name()))]
    pub async fn get_by_id(&mut self, id: &str) -> Result<&mut Self> {
        let client = self.client()?;
        let type_name = self.require_type()?.to_string();

        let fetched = client.get_record(&type_name, id).await?;
        self.fields = fetched;
        if self.type_name().is_empty() {
            self.set_type(&type_name);
        }
        Ok(self)
    }

    /// Send the writable fields as an update to the record with this `Id`.
    #[instrument(skip(self), fields(sobject = %self.type_name()))]
    pub async fn update(&self) -> Result<()> {
        let client = self.client()?;
        let type_name = self.require_type()?;
        let id = self.require_id()?;

        client
            .update_record(type_name, id, &self.writable_fields())
            .await
    }

    /// Insert or update by external id. The external id field itself is not
    /// sent in the body. A created record gets its new `Id` stored.
    #[instrument(skip(self), fields(sobject = %self.type_name()))]
    pub async fn upsert(&mut self) -> Result<&mut Self> {
        let client = self.client()?;
        let type_name = self.require_type()?.to_string();
        let Some(field) = self.external_id_field.clone() else {
            return Err(Error::new(ErrorKind::InvalidRecord(
                "no external id field set".to_string(),
            )));
        };
        let value = self.string_field(&field).to_string();
        if value.is_empty() {
            return Err(Error::new(ErrorKind::InvalidRecord(format!(
                "external id field {field} is empty"
            ))));
        }

        let mut body = self.writable_fields();
        body.remove(&field);

        if let Some(result) = client
            .upsert_record(&type_name, &field, &value, &body)
            .await?
        {
            if !result.success {
                return Err(Error::new(ErrorKind::OperationFailed(format!(
                    "upsert {type_name}: {}",
                    describe_errors(&result.errors)
                ))));
            }
            if !result.id.is_empty() {
                self.fields
                    .insert(ID_FIELD.to_string(), Value::String(result.id));
            }
        }
        Ok(self)
    }

    /// Delete the record with this `Id`.
    #[instrument(skip(self), fields(sobject = %self.type_name()))]
    pub async fn delete(&self) -> Result<()> {
        let client = self.client()?;
        let type_name = self.require_type()?;
        let id = self.require_id()?;

        client.delete_record(type_name, id).await
    }

    /// Describe this record's type.
    pub async fn describe(&self) -> Result<DescribeSObjectResult> {
        let client = self.client()?;
        let type_name = self.require_type()?;
        client.describe_sobject(type_name).await
    }
}

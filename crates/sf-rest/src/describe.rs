//! Describe types.
//!
//! Only the parts of the describe payloads callers commonly use are typed;
//! unknown keys are ignored.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Result of the describeGlobal call: every object visible to the user.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DescribeGlobalResult {
    /// Character encoding (e.g., "UTF-8").
    pub encoding: String,

    /// Maximum batch size for composite operations.
    #[serde(rename = "maxBatchSize")]
    pub max_batch_size: u32,

    #[serde(default)]
    pub sobjects: Vec<SObjectBasicInfo>,
}

impl DescribeGlobalResult {
    /// Look up an object by API name, ignoring case.
    pub fn find(&self, name: &str) -> Option<&SObjectBasicInfo> {
        self.sobjects
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
    }
}

/// One entry of [`DescribeGlobalResult::sobjects`].
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SObjectBasicInfo {
    pub name: String,
    pub label: String,
    #[serde(rename = "labelPlural", default)]
    pub label_plural: String,
    #[serde(rename = "keyPrefix")]
    pub key_prefix: Option<String>,
    #[serde(default)]
    pub custom: bool,
    #[serde(default)]
    pub queryable: bool,
    #[serde(default)]
    pub createable: bool,
    #[serde(default)]
    pub updateable: bool,
    #[serde(default)]
    pub deletable: bool,
    #[serde(default)]
    pub searchable: bool,
    #[serde(default)]
    pub retrieveable: bool,
    pub urls: Option<HashMap<String, String>>,
}

/// Result of `sobjects/{type}/describe`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DescribeSObjectResult {
    pub name: String,
    pub label: String,
    #[serde(rename = "labelPlural")]
    pub label_plural: Option<String>,
    #[serde(rename = "keyPrefix")]
    pub key_prefix: Option<String>,
    #[serde(default)]
    pub custom: bool,

    #[serde(default)]
    pub createable: bool,
    #[serde(default)]
    pub deletable: bool,
    #[serde(default)]
    pub queryable: bool,
    #[serde(default)]
    pub updateable: bool,

    #[serde(default)]
    pub fields: Vec<FieldDescribe>,
    #[serde(rename = "childRelationships", default)]
    pub child_relationships: Vec<ChildRelationship>,
    #[serde(rename = "recordTypeInfos", default)]
    pub record_type_infos: Vec<RecordTypeInfo>,
    #[serde(default)]
    pub urls: HashMap<String, String>,
}

impl DescribeSObjectResult {
    /// Look up a field by API name, ignoring case.
    pub fn field(&self, name: &str) -> Option<&FieldDescribe> {
        self.fields
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(name))
    }

    /// Fields that can serve as an upsert key.
    pub fn external_id_fields(&self) -> impl Iterator<Item = &FieldDescribe> {
        self.fields.iter().filter(|f| f.external_id)
    }
}

/// One field of a described object.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FieldDescribe {
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: String,
    pub length: Option<i32>,
    #[serde(default)]
    pub nillable: bool,
    #[serde(default)]
    pub createable: bool,
    #[serde(default)]
    pub updateable: bool,
    #[serde(rename = "externalId", default)]
    pub external_id: bool,
    #[serde(rename = "referenceTo", default)]
    pub reference_to: Vec<String>,
    #[serde(rename = "relationshipName")]
    pub relationship_name: Option<String>,
    #[serde(rename = "picklistValues", default)]
    pub picklist_values: Vec<PicklistValue>,
}

/// Child relationship of a described object.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChildRelationship {
    #[serde(rename = "childSObject")]
    pub child_sobject: String,
    pub field: String,
    #[serde(rename = "relationshipName")]
    pub relationship_name: Option<String>,
}

/// Record type of a described object.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RecordTypeInfo {
    pub name: String,
    #[serde(rename = "recordTypeId")]
    pub record_type_id: String,
    #[serde(rename = "developerName")]
    pub developer_name: Option<String>,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub available: bool,
    #[serde(rename = "defaultRecordTypeMapping", default)]
    pub default_record_type_mapping: bool,
}

/// Picklist entry.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PicklistValue {
    pub value: String,
    pub label: Option<String>,
    #[serde(default)]
    pub active: bool,
    #[serde(rename = "defaultValue", default)]
    pub default_value: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_global_result_deser() {
        let json = r#"{
            "encoding": "UTF-8",
            "maxBatchSize": 200,
            "sobjects": [{
                "name": "Account",
                "label": "Account",
                "labelPlural": "Accounts",
                "keyPrefix": "001",
                "custom": false,
                "queryable": true,
                "createable": true,
                "updateable": true,
                "deletable": true,
                "searchable": true,
                "retrieveable": true,
                "activateable": false
            }]
        }"#;

        let result: DescribeGlobalResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.encoding, "UTF-8");
        assert_eq!(result.max_batch_size, 200);
        assert_eq!(result.find("account").unwrap().key_prefix.as_deref(), Some("001"));
        assert!(result.find("Contact").is_none());
    }

    #[test]
    fn test_describe_sobject_deser() {
        let json = r#"{
            "name": "Account",
            "label": "Account",
            "createable": true,
            "fields": [
                {"name": "Id", "label": "Account ID", "type": "id", "length": 18, "nillable": false},
                {"name": "Ext_Id__c", "label": "External", "type": "string", "externalId": true},
                {"name": "Rating", "label": "Rating", "type": "picklist",
                 "picklistValues": [{"value": "Hot", "label": "Hot", "active": true, "defaultValue": false}]},
                {"name": "OwnerId", "label": "Owner", "type": "reference",
                 "referenceTo": ["User"], "relationshipName": "Owner"}
            ],
            "childRelationships": [
                {"childSObject": "Contact", "field": "AccountId", "relationshipName": "Contacts"}
            ]
        }"#;

        let result: DescribeSObjectResult = serde_json::from_str(json).unwrap();
        assert!(result.createable);
        assert_eq!(result.field("id").unwrap().length, Some(18));
        assert_eq!(result.field("Rating").unwrap().picklist_values[0].value, "Hot");
        assert_eq!(result.field("OwnerId").unwrap().reference_to, vec!["User"]);
        assert_eq!(
            result.external_id_fields().map(|f| f.name.as_str()).collect::<Vec<_>>(),
            vec!["Ext_Id__c"]
        );
        assert_eq!(result.child_relationships[0].child_sobject, "Contact");
    }
}

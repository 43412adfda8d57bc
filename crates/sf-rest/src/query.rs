//! SOQL query types.

use crate::sobject::SObject;

pub use sflite_client::QueryResult;

/// One page of records returned by a query.
pub type RecordPage = QueryResult<SObject>;

/// Quote a value for use inside a single-quoted SOQL string literal.
pub fn escape_soql_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}

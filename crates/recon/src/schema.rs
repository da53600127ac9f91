//! Form schema JSON: the list of form fields reviewers filled in.
//!
//! Only `columnName` matters for comparison; it restricts which shared
//! columns are compared in generic mode.

use serde::Deserialize;
use serde_json::Value;

use crate::error::ConcordError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FormField {
    #[serde(rename = "columnName", default)]
    pub column_name: Option<String>,
    #[serde(rename = "type", default)]
    pub field_type: Option<String>,
    #[serde(rename = "inputLabel", default)]
    pub input_label: Option<String>,
    #[serde(default)]
    pub choices: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormSchema {
    pub fields: Vec<FormField>,
}

impl FormSchema {
    /// Parse a schema document: an array of field objects, or one field object.
    ///
    /// Entries that are not objects, or whose known keys have the wrong type,
    /// are skipped with a warning.
    pub fn from_json(input: &str) -> Result<Self, ConcordError> {
        let doc: Value =
            serde_json::from_str(input).map_err(|e| ConcordError::SchemaParse(e.to_string()))?;

        let entries = match doc {
            Value::Array(items) => items,
            obj @ Value::Object(_) => vec![obj],
            other => {
                return Err(ConcordError::SchemaParse(format!(
                    "expected a JSON array or object, found {}",
                    json_kind(&other)
                )))
            }
        };

        let mut fields = Vec::with_capacity(entries.len());
        for (i, entry) in entries.into_iter().enumerate() {
            if !entry.is_object() {
                tracing::warn!(entry = i, "ignoring form schema entry that is not an object");
                continue;
            }
            match serde_json::from_value::<FormField>(entry) {
                Ok(field) => fields.push(field),
                Err(e) => tracing::warn!(entry = i, error = %e, "ignoring malformed form schema entry"),
            }
        }

        Ok(Self { fields })
    }

    /// Distinct non-empty column names, in schema order.
    pub fn column_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for field in &self.fields {
            if let Some(name) = field.column_name.as_deref() {
                if !name.is_empty() && !names.iter().any(|n| n == name) {
                    names.push(name.to_string());
                }
            }
        }
        names
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

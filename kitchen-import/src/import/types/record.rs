//! Row representations on either side of the field mapper

use std::collections::HashMap;

use serde_json::Map;

use super::value::Value;

/// One spreadsheet row below the header, keyed by source column header
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    /// 1-based row number in the source sheet (header is row 1)
    pub row_number: usize,
    pub cells: HashMap<String, String>,
}

impl RawRow {
    pub fn new(row_number: usize) -> Self {
        RawRow {
            row_number,
            cells: HashMap::new(),
        }
    }

    /// Builder-style insert, mostly for fixtures
    pub fn with(mut self, column: &str, text: &str) -> Self {
        self.cells.insert(column.to_string(), text.to_string());
        self
    }

    /// Cell text for a column, empty when the column is absent
    pub fn get(&self, column: &str) -> &str {
        self.cells.get(column).map(|s| s.as_str()).unwrap_or("")
    }

    /// True when every cell is blank
    pub fn is_blank(&self) -> bool {
        self.cells.values().all(|v| v.trim().is_empty())
    }
}

/// A typed record ready for the data store
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRecord {
    pub organization_id: String,
    /// Trimmed natural key (item code, email, ...)
    pub natural_key: String,
    /// Source row, absent for records fetched back from the store
    pub source_row: Option<usize>,
    pub fields: HashMap<String, Value>,
}

impl ValidatedRecord {
    pub fn new(organization_id: impl Into<String>, natural_key: impl Into<String>) -> Self {
        ValidatedRecord {
            organization_id: organization_id.into(),
            natural_key: natural_key.into(),
            source_row: None,
            fields: HashMap::new(),
        }
    }

    /// Get a field value, `Value::Null` when missing
    pub fn get(&self, field: &str) -> &Value {
        static NULL: Value = Value::Null;
        self.fields.get(field).unwrap_or(&NULL)
    }

    pub fn set(&mut self, field: &str, value: Value) {
        self.fields.insert(field.to_string(), value);
    }

    /// Field map as a JSON object for storage
    pub fn to_json(&self) -> serde_json::Value {
        let mut obj = Map::new();
        for (name, value) in &self.fields {
            obj.insert(name.clone(), value.to_json());
        }
        serde_json::Value::Object(obj)
    }

    /// Rebuild a record from stored JSON
    pub fn from_json(
        organization_id: impl Into<String>,
        natural_key: impl Into<String>,
        json: &serde_json::Value,
    ) -> Self {
        let mut record = ValidatedRecord::new(organization_id, natural_key);
        if let Some(obj) = json.as_object() {
            for (name, value) in obj {
                record.fields.insert(name.clone(), Value::from_json(value));
            }
        }
        record
    }
}

//! Entity schemas: which columns a target expects and how each is typed
//!
//! A [`TargetSchema`] is a static value. Column order is the positional
//! binding used for workbook sheets, so reordering `fields` changes which
//! spreadsheet column feeds which internal field.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::import::targets;

/// Declared type of a source column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Text,
    Currency,
    Percent,
    Number,
    Boolean,
}

impl ValueType {
    /// Label used on the template instructions sheet
    pub fn label(&self) -> &'static str {
        match self {
            ValueType::Text => "Text",
            ValueType::Currency => "Currency",
            ValueType::Percent => "Percent",
            ValueType::Number => "Number",
            ValueType::Boolean => "Yes/No",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            ValueType::Currency | ValueType::Percent | ValueType::Number
        )
    }
}

/// One column of a target schema
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    /// Internal field name (key in the validated record)
    pub name: &'static str,
    /// Spreadsheet header, verbatim
    pub column: &'static str,
    pub value_type: ValueType,
    /// Required text stays `""` instead of becoming null
    pub required: bool,
    /// Fallback for empty or unparseable numeric cells
    pub default: f64,
    /// Lookup table this display name resolves against
    pub lookup: Option<&'static str>,
    /// Cell text written on the template example row
    pub example: &'static str,
    /// One-line format hint for the template instructions sheet
    pub description: &'static str,
}

impl FieldSpec {
    pub const fn new(name: &'static str, column: &'static str, value_type: ValueType) -> Self {
        FieldSpec {
            name,
            column,
            value_type,
            required: false,
            default: 0.0,
            lookup: None,
            example: "",
            description: "",
        }
    }

    pub const fn text(name: &'static str, column: &'static str) -> Self {
        Self::new(name, column, ValueType::Text)
    }

    pub const fn currency(name: &'static str, column: &'static str) -> Self {
        Self::new(name, column, ValueType::Currency)
    }

    pub const fn percent(name: &'static str, column: &'static str) -> Self {
        Self::new(name, column, ValueType::Percent)
    }

    pub const fn number(name: &'static str, column: &'static str) -> Self {
        Self::new(name, column, ValueType::Number)
    }

    pub const fn boolean(name: &'static str, column: &'static str) -> Self {
        Self::new(name, column, ValueType::Boolean)
    }

    pub const fn required(self) -> Self {
        FieldSpec {
            required: true,
            ..self
        }
    }

    pub const fn default_to(self, default: f64) -> Self {
        FieldSpec { default, ..self }
    }

    pub const fn lookup(self, table: &'static str) -> Self {
        FieldSpec {
            lookup: Some(table),
            ..self
        }
    }

    pub const fn example(self, example: &'static str) -> Self {
        FieldSpec { example, ..self }
    }

    pub const fn describe(self, description: &'static str) -> Self {
        FieldSpec {
            description,
            ..self
        }
    }
}

/// How the source file for a target is laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// Sheet-oriented workbook, columns bound by position
    Workbook,
    /// Delimited text, columns bound by literal header name
    Delimited,
}

/// Which entity an import run writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImportTarget {
    MasterIngredient,
    PreparedItem,
    InventoryItem,
    TeamMember,
    FoodRelationship,
}

impl ImportTarget {
    pub const ALL: [ImportTarget; 5] = [
        ImportTarget::MasterIngredient,
        ImportTarget::PreparedItem,
        ImportTarget::InventoryItem,
        ImportTarget::TeamMember,
        ImportTarget::FoodRelationship,
    ];

    /// Static schema for this target
    pub fn schema(&self) -> &'static TargetSchema {
        match self {
            ImportTarget::MasterIngredient => &targets::master_ingredients::SCHEMA,
            ImportTarget::PreparedItem => &targets::prepared_items::SCHEMA,
            ImportTarget::InventoryItem => &targets::inventory::SCHEMA,
            ImportTarget::TeamMember => &targets::team_members::SCHEMA,
            ImportTarget::FoodRelationship => &targets::food_relationships::SCHEMA,
        }
    }

    /// Kebab-case name used on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportTarget::MasterIngredient => "master-ingredients",
            ImportTarget::PreparedItem => "prepared-items",
            ImportTarget::InventoryItem => "inventory",
            ImportTarget::TeamMember => "team",
            ImportTarget::FoodRelationship => "food-relationships",
        }
    }
}

impl std::fmt::Display for ImportTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ImportTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        ImportTarget::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| {
                let names: Vec<_> = ImportTarget::ALL.iter().map(|t| t.as_str()).collect();
                format!("unknown import target '{}' (expected one of: {})", s, names.join(", "))
            })
    }
}

/// Full description of one import target
#[derive(Debug)]
pub struct TargetSchema {
    pub target: ImportTarget,
    /// Data-store table the batch is upserted into
    pub table: &'static str,
    /// Human name, also used as the template's data sheet name
    pub label: &'static str,
    pub format: InputFormat,
    /// Ordered columns
    pub fields: &'static [FieldSpec],
    /// (identifier, name) fields checked by the row filter
    pub identity: (&'static str, &'static str),
    /// Fields whose trimmed values make up the natural key
    pub natural_key: &'static [&'static str],
}

/// Separator between parts of a composite natural key
pub const KEY_SEPARATOR: &str = "/";

impl TargetSchema {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Source header for an internal field name
    pub fn column_for(&self, name: &str) -> Option<&'static str> {
        self.field(name).map(|f| f.column)
    }

    /// Header row, in column order
    pub fn headers(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.column).collect()
    }

    /// Name of the natural-key column handed to the data store
    pub fn natural_key_column(&self) -> String {
        self.natural_key.join("+")
    }

    /// Fields that resolve against a lookup table
    pub fn reference_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|f| f.lookup.is_some())
    }

    /// Distinct lookup tables referenced by this schema, in column order
    pub fn lookup_tables(&self) -> Vec<&'static str> {
        let mut tables: Vec<&'static str> = Vec::new();
        for table in self.reference_fields().filter_map(|f| f.lookup) {
            if !tables.contains(&table) {
                tables.push(table);
            }
        }
        tables
    }
}

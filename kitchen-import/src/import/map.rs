//! Field mapper and type coercer
//!
//! Renames source headers to internal field names and turns cell text into
//! typed values. Numeric cells that do not parse fall back to the field's
//! declared default; strict mode rejects the row instead.

use crate::import::{
    FieldSpec, KEY_SEPARATOR, RawRow, RejectReason, RejectedRow, TargetSchema, ValidatedRecord,
    Value, ValueType,
};

/// Parse a currency cell: optional sign, leading "$", thousands separators
pub fn parse_currency(text: &str) -> Option<f64> {
    let text = text.trim();
    let (negative, rest) = match text.strip_prefix('-') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, text),
    };
    let rest = rest.strip_prefix('$').unwrap_or(rest).trim();
    let cleaned: String = rest.chars().filter(|c| *c != ',').collect();
    let value = parse_finite(&cleaned)?;
    Some(if negative { -value } else { value })
}

/// Parse a percent cell; the trailing "%" is optional
pub fn parse_percent(text: &str) -> Option<f64> {
    let text = text.trim();
    let text = text.strip_suffix('%').unwrap_or(text).trim_end();
    parse_finite(text)
}

/// Parse a plain decimal
pub fn parse_number(text: &str) -> Option<f64> {
    parse_finite(text.trim())
}

/// Flag columns: exactly "1" or "true" are true, anything else is false
pub fn parse_flag(text: &str) -> bool {
    matches!(text.trim(), "1" | "true")
}

fn parse_finite(text: &str) -> Option<f64> {
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Result of coercing one cell
#[derive(Debug, Clone, PartialEq)]
pub struct Coerced {
    pub value: Value,
    /// Set when a non-empty numeric cell did not parse and the default was used
    pub invalid: bool,
}

/// Coerce one cell's text according to its field spec
pub fn coerce_cell(spec: &FieldSpec, text: &str) -> Coerced {
    let trimmed = text.trim();
    let numeric = |parsed: Option<f64>| match parsed {
        Some(v) => Coerced {
            value: Value::Number(v),
            invalid: false,
        },
        None => Coerced {
            value: Value::Number(spec.default),
            invalid: !trimmed.is_empty(),
        },
    };

    match spec.value_type {
        ValueType::Text => {
            let value = if !trimmed.is_empty() || spec.required {
                Value::String(trimmed.to_string())
            } else {
                Value::Null
            };
            Coerced {
                value,
                invalid: false,
            }
        }
        ValueType::Currency => numeric(parse_currency(trimmed)),
        ValueType::Percent => numeric(parse_percent(trimmed)),
        ValueType::Number => numeric(parse_number(trimmed)),
        ValueType::Boolean => Coerced {
            value: Value::Bool(parse_flag(trimmed)),
            invalid: false,
        },
    }
}

/// Natural key for a row
///
/// A single key field is used as-is. Composite keys join the trimmed parts
/// with `/`, escaping `\` and `/` inside each part so distinct rows never
/// share a key.
pub fn natural_key(row: &RawRow, schema: &TargetSchema) -> String {
    let parts: Vec<&str> = schema
        .natural_key
        .iter()
        .map(|name| row.get(schema.column_for(name).unwrap_or(name)).trim())
        .collect();

    match parts.as_slice() {
        [single] => single.to_string(),
        _ => parts
            .iter()
            .map(|part| escape_key_part(part))
            .collect::<Vec<_>>()
            .join(KEY_SEPARATOR),
    }
}

fn escape_key_part(part: &str) -> String {
    let mut escaped = String::with_capacity(part.len());
    for c in part.chars() {
        if c == '\\' || KEY_SEPARATOR.starts_with(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Map one filtered row into a typed record
///
/// Only fails in strict mode, on the first numeric cell that does not parse.
pub fn map_row(
    row: &RawRow,
    schema: &TargetSchema,
    organization_id: &str,
    strict: bool,
) -> Result<ValidatedRecord, RejectedRow> {
    let mut record = ValidatedRecord::new(organization_id, natural_key(row, schema));
    record.source_row = Some(row.row_number);

    for spec in schema.fields {
        let raw = row.get(spec.column);
        let coerced = coerce_cell(spec, raw);
        if coerced.invalid {
            if strict {
                return Err(RejectedRow {
                    row_number: row.row_number,
                    reason: RejectReason::InvalidNumber {
                        field: spec.column.to_string(),
                        raw: raw.trim().to_string(),
                    },
                });
            }
            log::debug!(
                "Row {}: '{}' in {} is not a number, using {}",
                row.row_number,
                raw.trim(),
                spec.column,
                spec.default
            );
        }
        record.set(spec.name, coerced.value);
    }

    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::ImportTarget;

    #[test]
    fn test_parse_currency() {
        assert_eq!(parse_currency("$1,234.56"), Some(1234.56));
        assert_eq!(parse_currency("125.99"), Some(125.99));
        assert_eq!(parse_currency(" $ 12 "), Some(12.0));
        assert_eq!(parse_currency("-$5.25"), Some(-5.25));
        assert_eq!(parse_currency(""), None);
        assert_eq!(parse_currency("abc"), None);
        assert_eq!(parse_currency("$"), None);
        assert_eq!(parse_currency("NaN"), None);
    }

    #[test]
    fn test_parse_percent() {
        assert_eq!(parse_percent("85%"), Some(85.0));
        assert_eq!(parse_percent("85"), Some(85.0));
        assert_eq!(parse_percent(" 92.5 % "), Some(92.5));
        assert_eq!(parse_percent("%"), None);
    }

    #[test]
    fn test_parse_flag_is_case_sensitive() {
        assert!(parse_flag("1"));
        assert!(parse_flag("true"));
        assert!(!parse_flag("TRUE"));
        assert!(!parse_flag("True"));
        assert!(!parse_flag("yes"));
        assert!(!parse_flag(""));
        assert!(!parse_flag("0"));
    }

    #[test]
    fn test_coerce_defaults() {
        let price = FieldSpec::currency("case_price", "Case Price");
        assert_eq!(coerce_cell(&price, "").value, Value::Number(0.0));
        assert!(!coerce_cell(&price, "").invalid);
        let bad = coerce_cell(&price, "abc");
        assert_eq!(bad.value, Value::Number(0.0));
        assert!(bad.invalid);

        let yield_pct = FieldSpec::percent("yield_percent", "Yield %").default_to(100.0);
        assert_eq!(coerce_cell(&yield_pct, "").value, Value::Number(100.0));
        assert_eq!(coerce_cell(&yield_pct, "85%").value, Value::Number(85.0));

        let other_pct = FieldSpec::percent("markup", "Markup %");
        assert_eq!(coerce_cell(&other_pct, "").value, Value::Number(0.0));
    }

    #[test]
    fn test_coerce_text_null_only_when_optional() {
        let optional = FieldSpec::text("vendor", "Vendor");
        let required = FieldSpec::text("product_name", "Product Name").required();
        assert_eq!(coerce_cell(&optional, "  ").value, Value::Null);
        assert_eq!(coerce_cell(&required, "  ").value, Value::String(String::new()));
        assert_eq!(
            coerce_cell(&optional, "  Sysco ").value,
            Value::String("Sysco".into())
        );
    }

    fn brisket_row() -> RawRow {
        RawRow::new(2)
            .with("Item Code", " BEEF-001 ")
            .with("Product Name", "Beef Brisket")
            .with("Case Price", "$125.99")
            .with("Yield %", "85%")
            .with("Units/Case", "n/a")
            .with("Allergen: Gluten", "1")
    }

    #[test]
    fn test_map_row_lenient() {
        let schema = ImportTarget::MasterIngredient.schema();
        let record = map_row(&brisket_row(), schema, "org-1", false).unwrap();

        assert_eq!(record.natural_key, "BEEF-001");
        assert_eq!(record.organization_id, "org-1");
        assert_eq!(record.source_row, Some(2));
        assert_eq!(record.get("case_price"), &Value::Number(125.99));
        assert_eq!(record.get("yield_percent"), &Value::Number(85.0));
        assert_eq!(record.get("units_per_case"), &Value::Number(0.0));
        assert_eq!(record.get("allergen_gluten"), &Value::Bool(true));
        assert_eq!(record.get("allergen_peanut"), &Value::Bool(false));
        assert_eq!(record.get("vendor"), &Value::Null);
        assert_eq!(record.fields.len(), schema.fields.len());
    }

    #[test]
    fn test_map_row_strict_rejects_bad_number() {
        let schema = ImportTarget::MasterIngredient.schema();
        let rejected = map_row(&brisket_row(), schema, "org-1", true).unwrap_err();
        assert_eq!(rejected.row_number, 2);
        assert_eq!(
            rejected.reason,
            RejectReason::InvalidNumber {
                field: "Units/Case".into(),
                raw: "n/a".into()
            }
        );
    }

    #[test]
    fn test_composite_natural_key() {
        let schema = ImportTarget::FoodRelationship.schema();
        let row = RawRow::new(2)
            .with("Major Group", "Proteins ")
            .with("Category", "Beef")
            .with("Sub Category", "");
        assert_eq!(natural_key(&row, schema), "Proteins/Beef/");
    }

    #[test]
    fn test_composite_key_escapes_separator() {
        let schema = ImportTarget::FoodRelationship.schema();
        let taxonomy = |major: &str, category: &str| {
            RawRow::new(2)
                .with("Major Group", major)
                .with("Category", category)
                .with("Sub Category", "")
        };

        let left = natural_key(&taxonomy("Dairy", "Milk/Cream"), schema);
        let right = natural_key(&taxonomy("Dairy/Milk", "Cream"), schema);
        assert_ne!(left, right);
        assert_eq!(left, "Dairy/Milk\\/Cream/");

        let backslash = natural_key(&taxonomy("A\\", "B"), schema);
        assert_ne!(backslash, natural_key(&taxonomy("A", "\\B"), schema));
    }

    #[test]
    fn test_single_key_is_not_escaped() {
        let schema = ImportTarget::MasterIngredient.schema();
        let row = RawRow::new(2).with("Item Code", " 2/12-LB ");
        assert_eq!(natural_key(&row, schema), "2/12-LB");
    }
}

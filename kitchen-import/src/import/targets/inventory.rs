//! Inventory count sheet

use super::{CATEGORIES, VENDORS};
use crate::import::types::{FieldSpec, ImportTarget, InputFormat, TargetSchema};

const FIELDS: &[FieldSpec] = &[
    FieldSpec::text("item_id", "Item ID")
        .required()
        .example("BEEF-001")
        .describe("Item identifier, unique per organization"),
    FieldSpec::text("product_name", "Product Name")
        .required()
        .example("Beef Brisket")
        .describe("Product name"),
    FieldSpec::text("category", "Category")
        .lookup(CATEGORIES)
        .example("Beef")
        .describe("Category name, must match an existing category"),
    FieldSpec::text("vendor", "Vendor")
        .lookup(VENDORS)
        .example("Sysco")
        .describe("Vendor name, must match an existing vendor"),
    FieldSpec::text("unit_of_measure", "Unit of Measure")
        .example("CS")
        .describe("Counting unit"),
    FieldSpec::currency("price", "Price")
        .example("$125.99")
        .describe("Unit price, e.g. $125.99"),
    FieldSpec::currency("adjusted_price", "Adjusted Price")
        .example("$148.22")
        .describe("Price adjusted for yield"),
];

pub static SCHEMA: TargetSchema = TargetSchema {
    target: ImportTarget::InventoryItem,
    table: "inventory_items",
    label: "Inventory",
    format: InputFormat::Workbook,
    fields: FIELDS,
    identity: ("item_id", "product_name"),
    natural_key: &["item_id"],
};

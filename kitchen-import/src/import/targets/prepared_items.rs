//! Prepared items (in-house preps and batch recipes)

use super::{CATEGORIES, STORAGE_AREAS, SUB_CATEGORIES};
use crate::import::types::{FieldSpec, ImportTarget, InputFormat, TargetSchema};

const FIELDS: &[FieldSpec] = &[
    FieldSpec::text("item_id", "Item ID")
        .required()
        .example("PREP-100")
        .describe("Prepared item identifier, unique per organization"),
    FieldSpec::text("category", "Category")
        .lookup(CATEGORIES)
        .example("Sauces")
        .describe("Category name, must match an existing category"),
    FieldSpec::text("product", "Product")
        .required()
        .example("House BBQ Sauce")
        .describe("Prepared item name"),
    FieldSpec::text("station", "Station")
        .example("Grill")
        .describe("Kitchen station that produces the item"),
    FieldSpec::text("sub_category", "Sub Category")
        .lookup(SUB_CATEGORIES)
        .example("Hot Sauces")
        .describe("Sub-category name, must match an existing sub-category"),
    FieldSpec::text("storage_area", "Storage Area")
        .lookup(STORAGE_AREAS)
        .example("Walk-in Cooler")
        .describe("Storage area name, must match an existing area"),
    FieldSpec::text("container", "Container")
        .example("Cambro 4qt")
        .describe("Container the item is stored in"),
    FieldSpec::text("container_type", "Container Type")
        .example("Plastic")
        .describe("Container material or type"),
    FieldSpec::number("shelf_life_days", "Shelf Life")
        .example("7")
        .describe("Shelf life in days"),
    FieldSpec::text("recipe_unit", "Recipe Unit")
        .example("QT")
        .describe("Unit the recipe yields"),
    FieldSpec::currency("cost_per_unit", "Cost per Unit")
        .example("$4.25")
        .describe("Cost per recipe unit, e.g. $4.25"),
    FieldSpec::percent("yield_percent", "Yield %")
        .default_to(100.0)
        .example("90%")
        .describe("Usable yield, e.g. 90%; blank means 100%"),
    FieldSpec::currency("final_cost", "Final Cost")
        .example("$4.72")
        .describe("Cost after yield"),
];

pub static SCHEMA: TargetSchema = TargetSchema {
    target: ImportTarget::PreparedItem,
    table: "prepared_items",
    label: "Prepared Items",
    format: InputFormat::Workbook,
    fields: FIELDS,
    identity: ("item_id", "product"),
    natural_key: &["item_id"],
};

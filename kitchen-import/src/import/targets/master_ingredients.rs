//! Master ingredient list (vendor price sheet)

use super::{CATEGORIES, CATEGORY_GROUPS, SUB_CATEGORIES, VENDORS};
use crate::import::types::{FieldSpec, ImportTarget, InputFormat, TargetSchema};

const FIELDS: &[FieldSpec] = &[
    FieldSpec::text("item_id", "Item ID")
        .example("10045")
        .describe("Internal item identifier"),
    FieldSpec::text("major_group", "Major Group")
        .lookup(CATEGORY_GROUPS)
        .example("Proteins")
        .describe("Major group name, must match an existing group"),
    FieldSpec::text("category", "Category")
        .lookup(CATEGORIES)
        .example("Beef")
        .describe("Category name, must match an existing category"),
    FieldSpec::text("product_name", "Product Name")
        .required()
        .example("Beef Brisket")
        .describe("Product name as it appears on the invoice"),
    FieldSpec::text("vendor", "Vendor")
        .lookup(VENDORS)
        .example("Sysco")
        .describe("Vendor name, must match an existing vendor"),
    FieldSpec::text("sub_category", "Sub-Category")
        .lookup(SUB_CATEGORIES)
        .example("Whole Muscle")
        .describe("Sub-category name, must match an existing sub-category"),
    FieldSpec::text("item_code", "Item Code")
        .required()
        .example("BEEF-001")
        .describe("Vendor item code, unique per organization"),
    FieldSpec::text("case_size", "Case Size")
        .example("2/12 lb")
        .describe("Pack description"),
    FieldSpec::number("units_per_case", "Units/Case")
        .example("24")
        .describe("Number of units in a case"),
    FieldSpec::currency("case_price", "Case Price")
        .example("$125.99")
        .describe("Current case price, e.g. $125.99"),
    FieldSpec::text("unit_of_measure", "Unit of Measure")
        .example("LB")
        .describe("Purchasing unit"),
    FieldSpec::number("recipe_units_per_case", "Recipe Units/Case")
        .example("384")
        .describe("Recipe units contained in one case"),
    FieldSpec::percent("yield_percent", "Yield %")
        .default_to(100.0)
        .example("85%")
        .describe("Usable yield, e.g. 85%; blank means 100%"),
    FieldSpec::currency("cost_per_recipe_unit", "Cost per Recipe Unit")
        .example("$0.33")
        .describe("Price per recipe unit"),
    FieldSpec::boolean("allergen_peanut", "Allergen: Peanut")
        .example("false")
        .describe("1 or true when the item contains peanuts"),
    FieldSpec::boolean("allergen_shellfish", "Allergen: Shellfish")
        .example("false")
        .describe("1 or true when the item contains shellfish"),
    FieldSpec::boolean("allergen_gluten", "Allergen: Gluten")
        .example("true")
        .describe("1 or true when the item contains gluten"),
];

pub static SCHEMA: TargetSchema = TargetSchema {
    target: ImportTarget::MasterIngredient,
    table: "master_ingredients",
    label: "Master Ingredients",
    format: InputFormat::Workbook,
    fields: FIELDS,
    identity: ("item_code", "product_name"),
    natural_key: &["item_code"],
};

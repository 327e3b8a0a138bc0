//! Food relationship taxonomy rows (major group > category > sub category)

use crate::import::types::{FieldSpec, ImportTarget, InputFormat, TargetSchema};

const FIELDS: &[FieldSpec] = &[
    FieldSpec::text("major_group", "Major Group")
        .required()
        .example("Proteins")
        .describe("Top-level group name"),
    FieldSpec::text("category", "Category")
        .required()
        .example("Beef")
        .describe("Category within the major group"),
    FieldSpec::text("sub_category", "Sub Category")
        .example("Whole Muscle")
        .describe("Sub-category within the category"),
    FieldSpec::text("description", "Description")
        .example("Primal and sub-primal cuts")
        .describe("Free-text description"),
];

pub static SCHEMA: TargetSchema = TargetSchema {
    target: ImportTarget::FoodRelationship,
    table: "food_relationships",
    label: "Food Relationships",
    format: InputFormat::Workbook,
    fields: FIELDS,
    identity: ("major_group", "category"),
    natural_key: &["major_group", "category", "sub_category"],
};

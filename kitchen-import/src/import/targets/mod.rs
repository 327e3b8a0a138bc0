//! Column layouts for each import target
//!
//! Lookup table names shared between targets live here so the resolver and
//! the data store agree on them.

pub mod food_relationships;
pub mod inventory;
pub mod master_ingredients;
pub mod prepared_items;
pub mod team_members;

pub const CATEGORY_GROUPS: &str = "food_category_groups";
pub const CATEGORIES: &str = "food_categories";
pub const SUB_CATEGORIES: &str = "food_sub_categories";
pub const VENDORS: &str = "vendors";
pub const STORAGE_AREAS: &str = "storage_areas";

/// Every lookup table any target resolves against
pub const LOOKUP_TABLES: [&str; 5] = [
    CATEGORY_GROUPS,
    CATEGORIES,
    SUB_CATEGORIES,
    VENDORS,
    STORAGE_AREAS,
];

//! Team roster, imported from a CSV export of the scheduling system
//!
//! Header names are matched literally, so they must stay byte-for-byte
//! identical to the export.

use crate::import::types::{FieldSpec, ImportTarget, InputFormat, TargetSchema};

const FIELDS: &[FieldSpec] = &[
    FieldSpec::text("first_name", "First Name")
        .required()
        .example("Maria")
        .describe("Given name"),
    FieldSpec::text("last_name", "Last Name")
        .example("Lopez")
        .describe("Family name"),
    FieldSpec::text("email", "Email")
        .required()
        .example("maria.lopez@example.com")
        .describe("Email address, unique per organization"),
    FieldSpec::text("mobile_phone", "Mobile Phone")
        .example("555-0134")
        .describe("Mobile number"),
    FieldSpec::currency("wage", "Wage")
        .example("$18.50")
        .describe("Hourly wage, e.g. $18.50"),
    FieldSpec::text("punch_id", "Punch ID")
        .example("4471")
        .describe("Time clock punch identifier"),
    FieldSpec::text("locations", "Locations")
        .example("Downtown")
        .describe("Comma-separated location names"),
    FieldSpec::text("departments", "Departments")
        .example("Kitchen")
        .describe("Comma-separated department names"),
    FieldSpec::text("roles", "Roles")
        .example("Line Cook")
        .describe("Comma-separated role names"),
];

pub static SCHEMA: TargetSchema = TargetSchema {
    target: ImportTarget::TeamMember,
    table: "team_members",
    label: "Team",
    format: InputFormat::Delimited,
    fields: FIELDS,
    identity: ("email", "first_name"),
    natural_key: &["email"],
};

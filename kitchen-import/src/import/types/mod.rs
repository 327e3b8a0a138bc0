//! Core types for spreadsheet imports

mod value;
mod schema;
mod record;
mod lookup;
mod result;

pub use value::*;
pub use schema::*;
pub use record::*;
pub use lookup::*;
pub use result::*;

//! Kitchen back-office spreadsheet import
//!
//! Turns vendor price sheets, prepared-item lists, inventory counts, team
//! rosters and food category trees into validated records and writes them
//! to a [`store::DataStore`] in a single upsert per import.

pub mod cli;
pub mod config;
pub mod import;
pub mod store;

pub use config::Config;
pub use import::{ImportError, ImportOptions, ImportPipeline, ImportResult, ImportTarget};
pub use store::{DataStore, MemoryStore, SqliteStore};

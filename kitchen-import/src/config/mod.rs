//! Configuration
//!
//! Read from `<config dir>/kitchen-import/config.toml` when present, then
//! overridden by environment variables (a `.env` file is honoured by the
//! binary). Every key is optional.
//!
//! ```toml
//! database_path = "/var/lib/kitchen/kitchen.db"
//! organization_id = "org-1"
//!
//! [import]
//! strict_numbers = false
//! csv_delimiter = ","
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::import::ImportOptions;

pub const APP_DIR: &str = "kitchen-import";
pub const ENV_DATABASE: &str = "KITCHEN_IMPORT_DATABASE";
pub const ENV_ORGANIZATION: &str = "KITCHEN_IMPORT_ORG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database_path: PathBuf,
    pub organization_id: Option<String>,
    pub import: ImportSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportSettings {
    /// Reject rows with unparseable numbers instead of using defaults
    pub strict_numbers: bool,
    pub csv_delimiter: char,
}

impl Default for ImportSettings {
    fn default() -> Self {
        ImportSettings {
            strict_numbers: false,
            csv_delimiter: ',',
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database_path: default_database_path(),
            organization_id: None,
            import: ImportSettings::default(),
        }
    }
}

/// `<data dir>/kitchen-import/kitchen.db`, or the working directory
fn default_database_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("kitchen.db")
}

pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("config.toml")
}

impl Config {
    /// Load from the default location and apply environment overrides
    pub fn load() -> Result<Self> {
        let path = config_file_path();
        let config = if path.exists() {
            log::debug!("Loading config from {}", path.display());
            Self::from_file(&path)?
        } else {
            log::debug!("No config file at {}, using defaults", path.display());
            Self::default()
        };
        Ok(config.apply_overrides(|key| std::env::var(key).ok()))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.delimiter_byte()?;
        Ok(config)
    }

    /// Apply overrides from a key lookup (the process environment in practice)
    pub fn apply_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(path) = lookup(ENV_DATABASE).filter(|v| !v.trim().is_empty()) {
            self.database_path = PathBuf::from(path);
        }
        if let Some(org) = lookup(ENV_ORGANIZATION).filter(|v| !v.trim().is_empty()) {
            self.organization_id = Some(org.trim().to_string());
        }
        self
    }

    /// The configured delimiter as a single byte
    pub fn delimiter_byte(&self) -> Result<u8> {
        let c = self.import.csv_delimiter;
        if !c.is_ascii() {
            bail!("csv_delimiter must be a single ASCII character, got '{}'", c);
        }
        Ok(c as u8)
    }

    pub fn import_options(&self) -> Result<ImportOptions> {
        Ok(ImportOptions::default()
            .strict(self.import.strict_numbers)
            .delimiter(self.delimiter_byte()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_is_default() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
        assert!(config.database_path.ends_with("kitchen-import/kitchen.db"));
    }

    #[test]
    fn test_parse_partial_config() {
        let config = Config::parse(
            r#"
organization_id = "org-7"

[import]
csv_delimiter = ";"
"#,
        )
        .unwrap();
        assert_eq!(config.organization_id.as_deref(), Some("org-7"));
        assert!(!config.import.strict_numbers);
        assert_eq!(config.delimiter_byte().unwrap(), b';');

        let options = config.import_options().unwrap();
        assert_eq!(options.delimiter, b';');
        assert!(!options.dry_run);
    }

    #[test]
    fn test_non_ascii_delimiter_rejected() {
        assert!(Config::parse("[import]\ncsv_delimiter = \"§\"\n").is_err());
    }

    #[test]
    fn test_env_overrides() {
        let config = Config::default().apply_overrides(|key| match key {
            ENV_DATABASE => Some("/tmp/other.db".to_string()),
            ENV_ORGANIZATION => Some(" org-2 ".to_string()),
            _ => None,
        });
        assert_eq!(config.database_path, PathBuf::from("/tmp/other.db"));
        assert_eq!(config.organization_id.as_deref(), Some("org-2"));

        let untouched = Config::default().apply_overrides(|_| Some("  ".to_string()));
        assert_eq!(untouched, Config::default());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "database_path = \"/srv/k.db\"\n[import]\nstrict_numbers = true\n")
            .unwrap();
        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.database_path, PathBuf::from("/srv/k.db"));
        assert!(config.import.strict_numbers);
    }
}

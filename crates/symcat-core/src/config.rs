//! Disabled-entry configuration loaded from the environment or a JSON file.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::source::ConfigProvider;

pub const DISABLED_SYMBOLS_ENV: &str = "SYMCAT_DISABLED_SYMBOLS";
pub const DISABLED_SUBMARKETS_ENV: &str = "SYMCAT_DISABLED_SUBMARKETS";
pub const BOT_DISABLED_SYMBOLS_ENV: &str = "SYMCAT_BOT_DISABLED_SYMBOLS";
pub const BOT_DISABLED_SUBMARKETS_ENV: &str = "SYMCAT_BOT_DISABLED_SUBMARKETS";

/// Symbols and submarkets hidden from the catalog and from automation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub disabled_symbols: BTreeSet<String>,
    pub disabled_submarkets: BTreeSet<String>,
    pub disabled_automation_symbols: BTreeSet<String>,
    pub disabled_automation_submarkets: BTreeSet<String>,
}

impl CatalogConfig {
    /// Reads comma-separated lists from the `SYMCAT_*` variables. Unset
    /// variables leave the corresponding list empty.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let list = |key: &str| lookup(key).map(|raw| parse_list(&raw)).unwrap_or_default();

        Self {
            disabled_symbols: list(DISABLED_SYMBOLS_ENV),
            disabled_submarkets: list(DISABLED_SUBMARKETS_ENV),
            disabled_automation_symbols: list(BOT_DISABLED_SYMBOLS_ENV),
            disabled_automation_submarkets: list(BOT_DISABLED_SUBMARKETS_ENV),
        }
    }

    pub fn from_json_str(input: &str) -> Result<Self, CatalogError> {
        let config = serde_json::from_str::<Self>(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let input = std::fs::read_to_string(path)?;
        Self::from_json_str(&input)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        let lists = [
            ("disabled_symbols", &self.disabled_symbols),
            ("disabled_submarkets", &self.disabled_submarkets),
            ("disabled_automation_symbols", &self.disabled_automation_symbols),
            ("disabled_automation_submarkets", &self.disabled_automation_submarkets),
        ];

        for (key, values) in lists {
            if values.iter().any(|value| value.trim().is_empty()) {
                return Err(CatalogError::InvalidConfig {
                    key,
                    reason: String::from("entries must not be blank"),
                });
            }
        }

        Ok(())
    }
}

fn parse_list(raw: &str) -> BTreeSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
        .collect()
}

impl ConfigProvider for CatalogConfig {
    fn disabled_symbols(&self) -> BTreeSet<String> {
        self.disabled_symbols.clone()
    }

    fn disabled_submarkets(&self) -> BTreeSet<String> {
        self.disabled_submarkets.clone()
    }

    fn disabled_automation_submarkets(&self) -> BTreeSet<String> {
        self.disabled_automation_submarkets.clone()
    }

    fn disabled_automation_symbols(&self) -> BTreeSet<String> {
        self.disabled_automation_symbols.clone()
    }
}

mod automation;
mod catalog;
mod list;
mod options;

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use symcat_core::{
    CatalogConfig, CatalogSnapshot, StaticSymbolSource, StaticTradingHours, StatusChanges,
    SymbolCatalogService,
};
use tracing::debug;

use crate::cli::{Cli, Command};
use crate::error::CliError;

/// Catalog counts reported alongside every command's data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CatalogSummary {
    pub markets: usize,
    pub submarkets: usize,
    pub symbols: usize,
}

impl CatalogSummary {
    fn of(snapshot: &CatalogSnapshot) -> Self {
        let catalog = snapshot.catalog();
        Self {
            markets: catalog.market_count(),
            submarkets: catalog.submarket_count(),
            symbols: catalog.symbol_count(),
        }
    }
}

pub struct CommandResult {
    pub data: Value,
    pub warnings: Vec<String>,
    pub summary: CatalogSummary,
}

impl CommandResult {
    pub fn ok(data: Value) -> Self {
        Self {
            data,
            warnings: Vec::new(),
            summary: CatalogSummary::default(),
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    fn with_summary(mut self, summary: CatalogSummary) -> Self {
        self.summary = summary;
        self
    }
}

pub async fn run(cli: &Cli) -> Result<CommandResult, CliError> {
    let service = load_service(cli)?;
    let snapshot = service.retrieve(false).await;

    if !cli.closed.is_empty() {
        let changes = cli
            .closed
            .iter()
            .map(|code| (code.clone(), false))
            .collect::<StatusChanges>();
        let patched = service.apply_changes(&changes);
        debug!(patched, "applied --close overrides");
    }

    let result = match &cli.command {
        Command::Markets => options::markets(&service)?,
        Command::Submarkets(args) => options::submarkets(args, &service)?,
        Command::Symbols(args) => options::symbols(args, &service)?,
        Command::Automation => automation::run(&service)?,
        Command::List(args) => list::run(args, &service)?,
        Command::Catalog => catalog::run(&service)?,
    };

    let result = if snapshot.catalog().is_empty() {
        result.with_warning("catalog is empty; option lists come from fallback tables")
    } else {
        result
    };

    Ok(result.with_summary(CatalogSummary::of(&snapshot)))
}

fn load_service(cli: &Cli) -> Result<SymbolCatalogService, CliError> {
    let input = cli
        .input
        .as_ref()
        .ok_or_else(|| CliError::Command(String::from("--input is required")))?;
    let symbols = StaticSymbolSource::from_path(input)?;

    let config = match &cli.config {
        Some(path) => CatalogConfig::from_path(path)?,
        None => CatalogConfig::from_env(),
    };

    let service =
        SymbolCatalogService::builder(Arc::new(StaticTradingHours::new()), Arc::new(symbols))
            .with_config(Arc::new(config))
            .build();
    Ok(service)
}

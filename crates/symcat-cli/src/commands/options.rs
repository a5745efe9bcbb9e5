use serde::Serialize;

use symcat_core::{DropdownOption, SymbolCatalogService};

use crate::cli::{SubmarketsArgs, SymbolsArgs};
use crate::error::CliError;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct OptionsResponseData<'a> {
    level: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parent: Option<&'a str>,
    options: Vec<DropdownOption>,
}

pub fn markets(service: &SymbolCatalogService) -> Result<CommandResult, CliError> {
    respond("market", None, service.market_options())
}

pub fn submarkets(
    args: &SubmarketsArgs,
    service: &SymbolCatalogService,
) -> Result<CommandResult, CliError> {
    let market = required(&args.market, "market")?;
    respond("submarket", Some(market), service.submarket_options(market))
}

pub fn symbols(
    args: &SymbolsArgs,
    service: &SymbolCatalogService,
) -> Result<CommandResult, CliError> {
    let submarket = required(&args.submarket, "submarket")?;
    respond("symbol", Some(submarket), service.symbol_options(submarket))
}

fn required<'a>(value: &'a str, name: &str) -> Result<&'a str, CliError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(CliError::Command(format!("{name} must not be empty")));
    }
    Ok(value)
}

fn respond(
    level: &'static str,
    parent: Option<&str>,
    options: Vec<DropdownOption>,
) -> Result<CommandResult, CliError> {
    let data = serde_json::to_value(OptionsResponseData {
        level,
        parent,
        options,
    })?;
    Ok(CommandResult::ok(data))
}

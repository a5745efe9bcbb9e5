use serde::Serialize;

use symcat_core::{SymbolCatalogService, SymbolListing};

use crate::cli::ListArgs;
use crate::error::CliError;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct ListResponseData {
    open_only: bool,
    symbols: Vec<SymbolListing>,
}

pub fn run(args: &ListArgs, service: &SymbolCatalogService) -> Result<CommandResult, CliError> {
    let data = serde_json::to_value(ListResponseData {
        open_only: args.open_only,
        symbols: service.all_symbols(args.open_only),
    })?;

    Ok(CommandResult::ok(data))
}

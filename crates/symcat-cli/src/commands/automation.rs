use serde::Serialize;

use symcat_core::{AutomationSymbol, SymbolCatalogService};

use crate::error::CliError;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct AutomationResponseData {
    symbols: Vec<AutomationSymbol>,
}

pub fn run(service: &SymbolCatalogService) -> Result<CommandResult, CliError> {
    let symbols = service.symbols_for_automation();
    let empty = symbols.is_empty();

    let result = CommandResult::ok(serde_json::to_value(AutomationResponseData { symbols })?);
    if empty {
        return Ok(result.with_warning("no open symbols are available for automation"));
    }

    Ok(result)
}

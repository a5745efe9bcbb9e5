use serde::Serialize;

use symcat_core::{Catalog, SymbolCatalogService};

use crate::error::CliError;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct CatalogResponseData<'a> {
    closed_markets: Vec<&'a str>,
    markets: &'a Catalog,
}

pub fn run(service: &SymbolCatalogService) -> Result<CommandResult, CliError> {
    let snapshot = service.snapshot();
    let catalog = snapshot.catalog();
    let closed_markets = catalog
        .markets()
        .filter(|market| snapshot.market_closed(&market.id))
        .map(|market| market.id.as_str())
        .collect();

    let data = serde_json::to_value(CatalogResponseData {
        closed_markets,
        markets: catalog,
    })?;

    Ok(CommandResult::ok(data))
}

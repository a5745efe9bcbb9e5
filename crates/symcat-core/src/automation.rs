//! Flat symbol list offered to automated strategies.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::catalog::{CatalogSnapshot, CatalogSymbol};
use crate::ordering::{is_volatility_submarket, sort_volatility};

/// One selectable entry, grouped under its submarket label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AutomationSymbol {
    pub group: String,
    pub label: String,
    pub value: String,
}

impl CatalogSnapshot {
    /// Symbols tradable by a strategy, in catalog order.
    ///
    /// Fully closed markets are left out entirely, as are disabled submarkets
    /// and symbols. Volatility submarkets are ordered numerically first.
    pub fn symbols_for_automation(
        &self,
        disabled_submarkets: &BTreeSet<String>,
        disabled_symbols: &BTreeSet<String>,
    ) -> Vec<AutomationSymbol> {
        let mut output = Vec::new();

        for market in self.catalog().markets() {
            if self.market_closed(&market.id) {
                continue;
            }

            for submarket in market.submarkets.values() {
                if disabled_submarkets.contains(&submarket.id) {
                    continue;
                }

                let mut symbols = submarket.symbols.values().collect::<Vec<&CatalogSymbol>>();
                if is_volatility_submarket(&submarket.id, &submarket.display_name) {
                    sort_volatility(
                        &mut symbols,
                        |symbol| symbol.code.as_str(),
                        |symbol| symbol.code.as_str(),
                    );
                }

                output.extend(
                    symbols
                        .into_iter()
                        .filter(|symbol| !disabled_symbols.contains(&symbol.code))
                        .map(|symbol| AutomationSymbol {
                            group: submarket.display_name.clone(),
                            label: symbol.display_name.clone(),
                            value: symbol.code.clone(),
                        }),
                );
            }
        }

        output
    }
}

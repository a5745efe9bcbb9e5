//! Static option tables served before live data is available.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::options::DropdownOption;

/// Curated fallback options per projection level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackOptions {
    #[serde(default)]
    pub markets: Vec<DropdownOption>,
    /// Keyed by market id.
    #[serde(default)]
    pub submarkets: BTreeMap<String, Vec<DropdownOption>>,
    /// Keyed by submarket id.
    #[serde(default)]
    pub symbols: BTreeMap<String, Vec<DropdownOption>>,
}

impl FallbackOptions {
    pub fn market_options(&self) -> Vec<DropdownOption> {
        self.markets.clone()
    }

    pub fn submarket_options(&self, market: &str) -> Vec<DropdownOption> {
        self.submarkets
            .get(market)
            .cloned()
            .unwrap_or_else(|| vec![DropdownOption::new("Default", "default")])
    }

    pub fn symbol_options(&self, submarket: &str) -> Vec<DropdownOption> {
        self.symbols
            .get(submarket)
            .cloned()
            .unwrap_or_else(|| vec![DropdownOption::new("Default Symbol", "DEFAULT")])
    }
}

impl Default for FallbackOptions {
    fn default() -> Self {
        Self {
            markets: table(&[
                ("Synthetic Indices", "synthetic_index"),
                ("Forex", "forex"),
                ("Stock Indices", "indices"),
                ("Commodities", "commodities"),
                ("Cryptocurrencies", "cryptocurrency"),
            ]),
            submarkets: BTreeMap::from([
                (
                    String::from("synthetic_index"),
                    table(&[
                        ("Continuous Indices", "random_index"),
                        ("Crash/Boom Indices", "crash_index"),
                        ("Jump Indices", "jump_index"),
                        ("Step Indices", "step_index"),
                    ]),
                ),
                (
                    String::from("forex"),
                    table(&[("Major Pairs", "major_pairs"), ("Minor Pairs", "minor_pairs")]),
                ),
                (
                    String::from("cryptocurrency"),
                    table(&[("Cryptocurrencies", "non_stable_coin")]),
                ),
            ]),
            symbols: BTreeMap::from([
                (
                    String::from("random_index"),
                    table(&[
                        ("Volatility 10 (1s) Index", "1HZ10V"),
                        ("Volatility 10 Index", "R_10"),
                        ("Volatility 25 (1s) Index", "1HZ25V"),
                        ("Volatility 25 Index", "R_25"),
                        ("Volatility 50 (1s) Index", "1HZ50V"),
                        ("Volatility 50 Index", "R_50"),
                        ("Volatility 75 (1s) Index", "1HZ75V"),
                        ("Volatility 75 Index", "R_75"),
                        ("Volatility 100 (1s) Index", "1HZ100V"),
                        ("Volatility 100 Index", "R_100"),
                    ]),
                ),
                (
                    String::from("major_pairs"),
                    table(&[
                        ("AUD/USD", "frxAUDUSD"),
                        ("EUR/USD", "frxEURUSD"),
                        ("GBP/USD", "frxGBPUSD"),
                        ("USD/JPY", "frxUSDJPY"),
                    ]),
                ),
            ]),
        }
    }
}

fn table(entries: &[(&str, &str)]) -> Vec<DropdownOption> {
    entries
        .iter()
        .map(|(label, value)| DropdownOption::new(*label, *value))
        .collect()
}

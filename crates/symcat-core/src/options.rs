//! Sorted, display-ready option lists for selection widgets.
//!
//! | Level | Pin | Volatility order | Closed last |
//! |-------|-----|------------------|-------------|
//! | market | `synthetic_index` first | - | yes |
//! | submarket | `random_index` first under `synthetic_index` | - | yes |
//! | symbol | - | inside volatility submarkets | yes |
//!
//! Closed-last is always the outermost pass. Any level that yields no options
//! is answered from [`FallbackOptions`].

use serde::{Deserialize, Serialize};

use crate::catalog::CatalogSnapshot;
use crate::fallback::FallbackOptions;
use crate::ordering::{closed_last, is_volatility_submarket, pin_first, sort_volatility};
use crate::source::Localizer;

pub const SYNTHETIC_INDEX: &str = "synthetic_index";
pub const RANDOM_INDEX: &str = "random_index";
pub const CLOSED_SUFFIX: &str = "(Closed)";

/// A `(label, value)` pair rendered by a selection widget.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DropdownOption {
    pub label: String,
    pub value: String,
}

impl DropdownOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

impl From<(&str, &str)> for DropdownOption {
    fn from((label, value): (&str, &str)) -> Self {
        Self::new(label, value)
    }
}

/// Flat row of the all-symbols listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymbolListing {
    pub market: String,
    pub market_display: String,
    pub submarket: String,
    pub submarket_display: String,
    pub symbol: String,
    pub symbol_display: String,
}

struct Ranked {
    option: DropdownOption,
    display_name: String,
    closed: bool,
}

/// Read-only projector over one catalog snapshot.
pub struct OptionProjector<'a> {
    snapshot: &'a CatalogSnapshot,
    localizer: &'a dyn Localizer,
    fallback: &'a FallbackOptions,
}

impl<'a> OptionProjector<'a> {
    pub fn new(
        snapshot: &'a CatalogSnapshot,
        localizer: &'a dyn Localizer,
        fallback: &'a FallbackOptions,
    ) -> Self {
        Self {
            snapshot,
            localizer,
            fallback,
        }
    }

    pub fn market_options(&self) -> Vec<DropdownOption> {
        let mut ranked = self
            .snapshot
            .catalog()
            .markets()
            .map(|market| {
                self.rank(
                    &market.display_name,
                    &market.id,
                    self.snapshot.market_closed(&market.id),
                )
            })
            .collect::<Vec<_>>();

        if ranked.is_empty() {
            return self.fallback.market_options();
        }

        pin_first(&mut ranked, |entry| entry.option.value == SYNTHETIC_INDEX);
        finish(ranked)
    }

    pub fn submarket_options(&self, market: &str) -> Vec<DropdownOption> {
        let mut ranked = self
            .snapshot
            .catalog()
            .market(market)
            .map(|market| {
                market
                    .submarkets
                    .values()
                    .map(|submarket| {
                        self.rank(
                            &submarket.display_name,
                            &submarket.id,
                            self.snapshot.submarket_closed(&submarket.id),
                        )
                    })
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();

        if ranked.is_empty() {
            return self.fallback.submarket_options(market);
        }

        if market == SYNTHETIC_INDEX {
            pin_first(&mut ranked, |entry| entry.option.value == RANDOM_INDEX);
        }
        finish(ranked)
    }

    /// Symbols of every submarket named `submarket`, across all markets.
    pub fn symbol_options(&self, submarket: &str) -> Vec<DropdownOption> {
        let mut ranked = Vec::new();
        let mut volatility = false;

        for market in self.snapshot.catalog().markets() {
            let Some(node) = market.submarkets.get(submarket) else {
                continue;
            };
            volatility |= is_volatility_submarket(&node.id, &node.display_name);

            ranked.extend(node.symbols.values().map(|symbol| {
                self.rank(
                    &symbol.display_name,
                    &symbol.code,
                    self.snapshot.symbol_closed(&symbol.code),
                )
            }));
        }

        if ranked.is_empty() {
            return self.fallback.symbol_options(submarket);
        }

        if volatility {
            sort_volatility(
                &mut ranked,
                |entry| entry.option.value.as_str(),
                |entry| entry.display_name.as_str(),
            );
        }
        finish(ranked)
    }

    /// Every catalog symbol with its parents, in catalog order. With
    /// `open_only`, fully closed markets are skipped.
    pub fn all_symbols(&self, open_only: bool) -> Vec<SymbolListing> {
        let mut listing = Vec::new();

        for market in self.snapshot.catalog().markets() {
            if open_only && self.snapshot.market_closed(&market.id) {
                continue;
            }

            for submarket in market.submarkets.values() {
                listing.extend(submarket.symbols.values().map(|symbol| SymbolListing {
                    market: market.id.clone(),
                    market_display: market.display_name.clone(),
                    submarket: submarket.id.clone(),
                    submarket_display: submarket.display_name.clone(),
                    symbol: symbol.code.clone(),
                    symbol_display: symbol.display_name.clone(),
                }));
            }
        }

        listing
    }

    fn rank(&self, display_name: &str, value: &str, closed: bool) -> Ranked {
        let label = if closed {
            format!("{display_name} {}", self.localizer.decorate(CLOSED_SUFFIX))
        } else {
            display_name.to_owned()
        };

        Ranked {
            option: DropdownOption::new(label, value),
            display_name: display_name.to_owned(),
            closed,
        }
    }
}

fn finish(mut ranked: Vec<Ranked>) -> Vec<DropdownOption> {
    closed_last(&mut ranked, |entry| entry.closed);
    ranked.into_iter().map(|entry| entry.option).collect()
}

//! Three-level instrument hierarchy (market -> submarket -> symbol) and its
//! builder.

use std::collections::{BTreeSet, HashSet};

use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use crate::instrument::Instrument;

/// Tradable symbol leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogSymbol {
    pub code: String,
    pub display_name: String,
    pub pip_size: i32,
    pub is_active: bool,
}

/// Submarket node; symbols keep first-seen order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogSubmarket {
    pub id: String,
    pub display_name: String,
    pub symbols: IndexMap<String, CatalogSymbol>,
}

/// Market node; submarkets keep first-seen order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogMarket {
    pub id: String,
    pub display_name: String,
    pub submarkets: IndexMap<String, CatalogSubmarket>,
}

/// Market id -> market, in first-seen order.
///
/// Open/closed state above the symbol level is never stored here; see
/// [`crate::status`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Catalog {
    markets: IndexMap<String, CatalogMarket>,
}

impl Catalog {
    /// Builds the hierarchy from a flat instrument list.
    ///
    /// Instruments whose code is in `disabled_symbols` or whose submarket is in
    /// `disabled_submarkets` are skipped. The first occurrence of a code wins;
    /// later duplicates are dropped, even under a different submarket.
    pub fn build(
        instruments: &[Instrument],
        disabled_symbols: &BTreeSet<String>,
        disabled_submarkets: &BTreeSet<String>,
    ) -> Self {
        let mut markets: IndexMap<String, CatalogMarket> = IndexMap::new();
        let mut seen: HashSet<&str> = HashSet::new();

        for instrument in instruments {
            if disabled_symbols.contains(&instrument.code)
                || disabled_submarkets.contains(&instrument.submarket)
            {
                debug!(
                    code = %instrument.code,
                    submarket = %instrument.submarket,
                    "skipping disabled instrument"
                );
                continue;
            }

            if !seen.insert(instrument.code.as_str()) {
                debug!(code = %instrument.code, "dropping duplicate instrument");
                continue;
            }

            let market = markets
                .entry(instrument.market.clone())
                .or_insert_with(|| CatalogMarket {
                    id: instrument.market.clone(),
                    display_name: instrument
                        .market_display_name
                        .clone()
                        .unwrap_or_else(|| instrument.market.clone()),
                    submarkets: IndexMap::new(),
                });

            let submarket = market
                .submarkets
                .entry(instrument.submarket.clone())
                .or_insert_with(|| CatalogSubmarket {
                    id: instrument.submarket.clone(),
                    display_name: submarket_display_name(instrument),
                    symbols: IndexMap::new(),
                });

            submarket.symbols.insert(
                instrument.code.clone(),
                CatalogSymbol {
                    code: instrument.code.clone(),
                    display_name: instrument
                        .display_name
                        .clone()
                        .unwrap_or_else(|| instrument.code.clone()),
                    pip_size: instrument.pip.digits(),
                    is_active: !instrument.is_closed(),
                },
            );
        }

        Self { markets }
    }

    pub fn is_empty(&self) -> bool {
        self.markets.is_empty()
    }

    pub fn market(&self, id: &str) -> Option<&CatalogMarket> {
        self.markets.get(id)
    }

    pub fn markets(&self) -> impl Iterator<Item = &CatalogMarket> {
        self.markets.values()
    }

    pub(crate) fn markets_mut(&mut self) -> impl Iterator<Item = &mut CatalogMarket> {
        self.markets.values_mut()
    }

    /// First market (in catalog order) that owns the given submarket.
    pub fn submarket(&self, id: &str) -> Option<(&CatalogMarket, &CatalogSubmarket)> {
        self.markets
            .values()
            .find_map(|market| market.submarkets.get(id).map(|submarket| (market, submarket)))
    }

    pub fn symbol(&self, code: &str) -> Option<&CatalogSymbol> {
        self.markets
            .values()
            .flat_map(|market| market.submarkets.values())
            .find_map(|submarket| submarket.symbols.get(code))
    }

    pub fn market_count(&self) -> usize {
        self.markets.len()
    }

    pub fn submarket_count(&self) -> usize {
        self.markets.values().map(|market| market.submarkets.len()).sum()
    }

    pub fn symbol_count(&self) -> usize {
        self.markets
            .values()
            .flat_map(|market| market.submarkets.values())
            .map(|submarket| submarket.symbols.len())
            .sum()
    }
}

/// Immutable view handed to readers: the raw list the catalog was built from
/// (kept current by status patches) together with the hierarchy.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CatalogSnapshot {
    instruments: Vec<Instrument>,
    catalog: Catalog,
}

impl CatalogSnapshot {
    pub fn new(
        instruments: Vec<Instrument>,
        disabled_symbols: &BTreeSet<String>,
        disabled_submarkets: &BTreeSet<String>,
    ) -> Self {
        let catalog = Catalog::build(&instruments, disabled_symbols, disabled_submarkets);
        Self {
            instruments,
            catalog,
        }
    }

    pub fn instruments(&self) -> &[Instrument] {
        &self.instruments
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub(crate) fn parts_mut(&mut self) -> (&mut [Instrument], &mut Catalog) {
        (&mut self.instruments, &mut self.catalog)
    }
}

/// Submarket label resolution: curated table, then upstream name, then id.
fn submarket_display_name(instrument: &Instrument) -> String {
    custom_submarket_display_name(&instrument.submarket)
        .map(String::from)
        .or_else(|| instrument.submarket_display_name.clone())
        .unwrap_or_else(|| instrument.submarket.clone())
}

/// Curated submarket display names that override upstream labels.
pub fn custom_submarket_display_name(submarket: &str) -> Option<&'static str> {
    match submarket {
        "random_index" => Some("Continuous Indices"),
        "random_daily" => Some("Daily Reset Indices"),
        "crash_index" => Some("Crash/Boom Indices"),
        "jump_index" => Some("Jump Indices"),
        "step_index" => Some("Step Indices"),
        "range_break" => Some("Range Break Indices"),
        "major_pairs" => Some("Major Pairs"),
        "minor_pairs" => Some("Minor Pairs"),
        "smart_fx" => Some("Smart FX"),
        "forex_basket" => Some("Forex Basket"),
        "commodity_basket" => Some("Commodities Basket"),
        "metals" => Some("Metals"),
        "energy" => Some("Energy"),
        "americas_OTC" => Some("American Indices"),
        "europe_OTC" => Some("European Indices"),
        "asia_oceania_OTC" => Some("Asian Indices"),
        "otc_index" => Some("OTC Indices"),
        "non_stable_coin" => Some("Cryptocurrencies"),
        _ => None,
    }
}

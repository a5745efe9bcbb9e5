//! Open/closed status at symbol, submarket and market granularity.
//!
//! Only symbols carry state. Submarket and market status is derived on every
//! read from the symbols beneath, and unknown ids read as closed.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::catalog::{CatalogSnapshot, CatalogSubmarket};

/// Trading-hours notification payload: symbol code -> exchange open now.
pub type StatusChanges = BTreeMap<String, bool>;

impl CatalogSnapshot {
    /// True when any raw instrument carrying `code` is suspended or sits on a
    /// closed exchange.
    pub fn symbol_closed(&self, code: &str) -> bool {
        self.instruments()
            .iter()
            .any(|instrument| instrument.code == code && instrument.is_closed())
    }

    /// True when the submarket is unknown, empty, or every symbol in it is
    /// closed.
    pub fn submarket_closed(&self, id: &str) -> bool {
        match self.catalog().submarket(id) {
            Some((_, submarket)) => self.submarket_node_closed(submarket),
            None => true,
        }
    }

    /// True when the market is unknown or every submarket in it is closed.
    pub fn market_closed(&self, id: &str) -> bool {
        match self.catalog().market(id) {
            Some(market) => market
                .submarkets
                .values()
                .all(|submarket| self.submarket_node_closed(submarket)),
            None => true,
        }
    }

    fn submarket_node_closed(&self, submarket: &CatalogSubmarket) -> bool {
        submarket
            .symbols
            .keys()
            .all(|code| self.symbol_closed(code))
    }

    /// Patches exchange-open flags in place from a trading-hours notification.
    ///
    /// Every raw instrument with a matching code and the matching catalog node
    /// are updated. Returns the number of catalog symbols touched.
    pub fn apply_changes(&mut self, changes: &StatusChanges) -> usize {
        let (instruments, catalog) = self.parts_mut();
        let mut patched = 0;

        for (code, &is_open) in changes {
            let mut suspended = None;
            for instrument in instruments.iter_mut().filter(|i| &i.code == code) {
                instrument.exchange_is_open = is_open;
                if suspended.is_none() {
                    suspended = Some(instrument.is_trading_suspended);
                }
            }

            let node = catalog
                .markets_mut()
                .flat_map(|market| market.submarkets.values_mut())
                .find_map(|submarket| submarket.symbols.get_mut(code));

            match node {
                Some(symbol) => {
                    symbol.is_active = is_open && !suspended.unwrap_or(false);
                    patched += 1;
                    debug!(code = %code, is_open, "patched symbol status");
                }
                None if suspended.is_none() => {
                    warn!(code = %code, "status change for unknown symbol");
                }
                // Known upstream but filtered out of the catalog.
                None => {}
            }
        }

        patched
    }
}

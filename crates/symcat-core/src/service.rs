//! Catalog service: single-flight refresh cycles and the read API.
//!
//! A cycle waits for trading hours, fetches the raw symbol list, builds a
//! [`CatalogSnapshot`] and installs the open/closed change handler. At most
//! one non-forced cycle runs at a time; concurrent callers join it. Forced
//! calls always start a new cycle, and the last cycle to complete publishes
//! its snapshot unless [`SymbolCatalogService::clear_cache`] ran after it
//! started.

use std::collections::BTreeSet;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};

use tracing::{debug, error, info, warn};

use crate::automation::AutomationSymbol;
use crate::catalog::CatalogSnapshot;
use crate::config::CatalogConfig;
use crate::error::CatalogError;
use crate::fallback::FallbackOptions;
use crate::options::{DropdownOption, OptionProjector, SymbolListing};
use crate::pending::PendingResult;
use crate::source::{
    ConfigProvider, IdentityLocalizer, Localizer, RawSymbolSource, TradingHoursSource,
};
use crate::status::StatusChanges;

/// Lifecycle of the cached catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitPhase {
    Uninitialized,
    Initializing,
    Ready,
}

#[derive(Debug, Clone, Default)]
struct DisabledLists {
    symbols: BTreeSet<String>,
    submarkets: BTreeSet<String>,
    automation_symbols: BTreeSet<String>,
    automation_submarkets: BTreeSet<String>,
}

impl DisabledLists {
    fn load(config: &dyn ConfigProvider) -> Self {
        Self {
            symbols: config.disabled_symbols(),
            submarkets: config.disabled_submarkets(),
            automation_symbols: config.disabled_automation_symbols(),
            automation_submarkets: config.disabled_automation_submarkets(),
        }
    }
}

struct CatalogState {
    phase: InitPhase,
    /// Bumped by every cache clear; cycles started under an older epoch do
    /// not publish.
    epoch: u64,
    snapshot: Arc<CatalogSnapshot>,
    pending: PendingResult<Arc<CatalogSnapshot>>,
    pending_claimed: bool,
    disabled: Option<Arc<DisabledLists>>,
}

impl Default for CatalogState {
    fn default() -> Self {
        Self {
            phase: InitPhase::Uninitialized,
            epoch: 0,
            snapshot: Arc::new(CatalogSnapshot::default()),
            pending: PendingResult::new(),
            pending_claimed: false,
            disabled: None,
        }
    }
}

struct Cycle {
    pending: PendingResult<Arc<CatalogSnapshot>>,
    epoch: u64,
    forced: bool,
}

enum Ticket {
    Join {
        pending: PendingResult<Arc<CatalogSnapshot>>,
        epoch: u64,
    },
    Start(Cycle),
}

struct ServiceInner {
    trading_hours: Arc<dyn TradingHoursSource>,
    symbols: Arc<dyn RawSymbolSource>,
    config: Arc<dyn ConfigProvider>,
    localizer: Arc<dyn Localizer>,
    fallback: FallbackOptions,
    state: RwLock<CatalogState>,
}

/// Cached, refreshable symbol catalog. Cloning shares the cache.
#[derive(Clone)]
pub struct SymbolCatalogService {
    inner: Arc<ServiceInner>,
}

impl SymbolCatalogService {
    pub fn builder(
        trading_hours: Arc<dyn TradingHoursSource>,
        symbols: Arc<dyn RawSymbolSource>,
    ) -> SymbolCatalogServiceBuilder {
        SymbolCatalogServiceBuilder::new(trading_hours, symbols)
    }

    /// Returns the catalog, building it first when needed.
    ///
    /// Without `force_update`, a call made while a cycle is in flight or
    /// after one completed joins that cycle instead of fetching again.
    /// Upstream failures never surface here; they degrade to an empty
    /// catalog.
    pub async fn retrieve(&self, force_update: bool) -> Arc<CatalogSnapshot> {
        let ticket = {
            let mut state = self.inner.write_state();
            if !force_update && state.phase != InitPhase::Uninitialized {
                Ticket::Join {
                    pending: state.pending.clone(),
                    epoch: state.epoch,
                }
            } else {
                if state.pending_claimed {
                    state.pending = PendingResult::new();
                }
                state.pending_claimed = true;
                state.phase = InitPhase::Initializing;
                Ticket::Start(Cycle {
                    pending: state.pending.clone(),
                    epoch: state.epoch,
                    forced: force_update,
                })
            }
        };

        match ticket {
            Ticket::Join { pending, epoch } => {
                debug!("joining in-flight catalog refresh");
                let settled = pending.wait().await;
                self.inner.resolve(epoch, settled)
            }
            Ticket::Start(cycle) => self.run_cycle(cycle).await,
        }
    }

    async fn run_cycle(&self, cycle: Cycle) -> Arc<CatalogSnapshot> {
        let pending = cycle.pending.clone();
        let epoch = cycle.epoch;
        let inner = Arc::clone(&self.inner);

        // Spawned so that a dropped caller cannot strand the other waiters.
        match tokio::spawn(inner.refresh(cycle)).await {
            Ok(snapshot) => self.inner.resolve(epoch, Some(snapshot)),
            Err(join_error) => {
                let error = CatalogError::CycleAborted(join_error.to_string());
                error!(%error, "catalog refresh failed; serving empty catalog");
                self.inner.abandon(&pending);
                let empty = Arc::new(CatalogSnapshot::default());
                pending.settle(Arc::clone(&empty));
                empty
            }
        }
    }

    /// Drops the cached catalog and disabled lists. The next non-forced
    /// `retrieve` starts a fresh cycle; cycles already in flight complete
    /// for their own waiters only.
    pub fn clear_cache(&self) {
        let mut state = self.inner.write_state();
        state.epoch += 1;
        state.phase = InitPhase::Uninitialized;
        state.snapshot = Arc::new(CatalogSnapshot::default());
        state.pending = PendingResult::new();
        state.pending_claimed = false;
        state.disabled = None;
        info!(epoch = state.epoch, "symbol catalog cache cleared");
    }

    /// Applies an open/closed change batch to the cached catalog. Returns the
    /// number of raw instruments patched.
    pub fn apply_changes(&self, changes: &StatusChanges) -> usize {
        self.inner.apply_changes(changes)
    }

    pub fn phase(&self) -> InitPhase {
        self.inner.read_state().phase
    }

    /// Current snapshot without triggering a refresh.
    pub fn snapshot(&self) -> Arc<CatalogSnapshot> {
        Arc::clone(&self.inner.read_state().snapshot)
    }

    pub fn market_options(&self) -> Vec<DropdownOption> {
        let snapshot = self.snapshot();
        self.inner.projector(&snapshot).market_options()
    }

    pub fn submarket_options(&self, market: &str) -> Vec<DropdownOption> {
        let snapshot = self.snapshot();
        self.inner.projector(&snapshot).submarket_options(market)
    }

    pub fn symbol_options(&self, submarket: &str) -> Vec<DropdownOption> {
        let snapshot = self.snapshot();
        self.inner.projector(&snapshot).symbol_options(submarket)
    }

    pub fn all_symbols(&self, open_only: bool) -> Vec<SymbolListing> {
        let snapshot = self.snapshot();
        self.inner.projector(&snapshot).all_symbols(open_only)
    }

    /// Automation symbols filtered by the configured automation lists.
    pub fn symbols_for_automation(&self) -> Vec<AutomationSymbol> {
        let snapshot = self.snapshot();
        let disabled = self.inner.disabled_lists();
        snapshot.symbols_for_automation(
            &disabled.automation_submarkets,
            &disabled.automation_symbols,
        )
    }
}

impl ServiceInner {
    fn read_state(&self) -> RwLockReadGuard<'_, CatalogState> {
        self.state.read().expect("catalog state lock is not poisoned")
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, CatalogState> {
        self.state.write().expect("catalog state lock is not poisoned")
    }

    fn projector<'a>(&'a self, snapshot: &'a CatalogSnapshot) -> OptionProjector<'a> {
        OptionProjector::new(snapshot, self.localizer.as_ref(), &self.fallback)
    }

    fn disabled_lists(&self) -> Arc<DisabledLists> {
        if let Some(disabled) = self.read_state().disabled.clone() {
            return disabled;
        }

        let loaded = Arc::new(DisabledLists::load(self.config.as_ref()));
        let mut state = self.write_state();
        Arc::clone(state.disabled.get_or_insert(loaded))
    }

    async fn refresh(self: Arc<Self>, cycle: Cycle) -> Arc<CatalogSnapshot> {
        info!(forced = cycle.forced, epoch = cycle.epoch, "refreshing symbol catalog");

        if let Err(error) = self.trading_hours.initialise().await {
            warn!(%error, code = error.code(), "trading hours unavailable; continuing");
        }

        let instruments = if self.symbols.has_data() {
            debug!("reusing active symbols cached upstream");
            self.symbols.cached()
        } else {
            match self.symbols.fetch().await {
                Ok(instruments) => instruments,
                Err(error) => {
                    warn!(
                        %error,
                        code = error.code(),
                        "active symbols unavailable; building empty catalog"
                    );
                    Vec::new()
                }
            }
        };

        let disabled = self.disabled_lists();
        let snapshot = Arc::new(CatalogSnapshot::new(
            instruments,
            &disabled.symbols,
            &disabled.submarkets,
        ));

        self.register_status_handler();

        let published = {
            let mut state = self.write_state();
            let published = state.epoch == cycle.epoch;
            if published {
                state.snapshot = Arc::clone(&snapshot);
                if state.pending.same_slot(&cycle.pending) {
                    state.phase = InitPhase::Ready;
                }
            }
            published
        };
        cycle.pending.settle(Arc::clone(&snapshot));

        let catalog = snapshot.catalog();
        info!(
            markets = catalog.market_count(),
            submarkets = catalog.submarket_count(),
            symbols = catalog.symbol_count(),
            published,
            "symbol catalog built"
        );

        snapshot
    }

    fn register_status_handler(self: &Arc<Self>) {
        let service: Weak<Self> = Arc::downgrade(self);
        self.trading_hours.on_change(Arc::new(move |changes: &StatusChanges| {
            if let Some(service) = service.upgrade() {
                service.apply_changes(changes);
            }
        }));
    }

    fn apply_changes(&self, changes: &StatusChanges) -> usize {
        let mut state = self.write_state();
        let patched = Arc::make_mut(&mut state.snapshot).apply_changes(changes);
        debug!(changes = changes.len(), patched, "applied market status changes");
        patched
    }

    /// Current snapshot while the caller's epoch is still live, otherwise
    /// the cycle's own result.
    fn resolve(&self, epoch: u64, settled: Option<Arc<CatalogSnapshot>>) -> Arc<CatalogSnapshot> {
        let state = self.read_state();
        if state.epoch == epoch {
            return Arc::clone(&state.snapshot);
        }
        settled.unwrap_or_default()
    }

    fn abandon(&self, pending: &PendingResult<Arc<CatalogSnapshot>>) {
        let mut state = self.write_state();
        if state.pending.same_slot(pending) && state.phase == InitPhase::Initializing {
            state.phase = InitPhase::Uninitialized;
            state.pending_claimed = false;
            state.pending = PendingResult::new();
        }
    }
}

/// Wires collaborators into a [`SymbolCatalogService`].
pub struct SymbolCatalogServiceBuilder {
    trading_hours: Arc<dyn TradingHoursSource>,
    symbols: Arc<dyn RawSymbolSource>,
    config: Arc<dyn ConfigProvider>,
    localizer: Arc<dyn Localizer>,
    fallback: FallbackOptions,
}

impl SymbolCatalogServiceBuilder {
    pub fn new(
        trading_hours: Arc<dyn TradingHoursSource>,
        symbols: Arc<dyn RawSymbolSource>,
    ) -> Self {
        Self {
            trading_hours,
            symbols,
            config: Arc::new(CatalogConfig::default()),
            localizer: Arc::new(IdentityLocalizer),
            fallback: FallbackOptions::default(),
        }
    }

    pub fn with_config(mut self, config: Arc<dyn ConfigProvider>) -> Self {
        self.config = config;
        self
    }

    pub fn with_localizer(mut self, localizer: Arc<dyn Localizer>) -> Self {
        self.localizer = localizer;
        self
    }

    pub fn with_fallback(mut self, fallback: FallbackOptions) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn build(self) -> SymbolCatalogService {
        SymbolCatalogService {
            inner: Arc::new(ServiceInner {
                trading_hours: self.trading_hours,
                symbols: self.symbols,
                config: self.config,
                localizer: self.localizer,
                fallback: self.fallback,
                state: RwLock::new(CatalogState::default()),
            }),
        }
    }
}

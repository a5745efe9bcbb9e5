//! Collaborator contracts consumed by the catalog engine, with in-memory
//! implementations.
//!
//! | Trait | Role |
//! |-------|------|
//! | [`TradingHoursSource`] | Readiness signal and open/closed change notifications |
//! | [`RawSymbolSource`] | Flat active-symbol list |
//! | [`ConfigProvider`] | Disabled symbol/submarket lists |
//! | [`Localizer`] | Display-string decoration |

use std::collections::BTreeSet;
use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde::Deserialize;

use crate::error::{CatalogError, SourceError};
use crate::instrument::Instrument;
use crate::status::StatusChanges;

pub type SourceFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, SourceError>> + Send + 'a>>;

/// Callback invoked with every batch of open/closed changes.
pub type StatusChangeHandler = Arc<dyn Fn(&StatusChanges) + Send + Sync>;

/// Upstream trading-hours feed.
pub trait TradingHoursSource: Send + Sync {
    /// Resolves once trading hours are loaded.
    fn initialise<'a>(&'a self) -> SourceFuture<'a, ()>;

    /// Installs the change handler, replacing any previous one.
    fn on_change(&self, handler: StatusChangeHandler);
}

/// Upstream active-symbol feed.
pub trait RawSymbolSource: Send + Sync {
    /// True when a completed fetch is already cached upstream.
    fn has_data(&self) -> bool;

    /// The upstream's cached list. Only read while `has_data` is true.
    fn cached(&self) -> Vec<Instrument>;

    /// Returns the flat instrument list, joining an in-flight upstream fetch
    /// when one is active.
    fn fetch<'a>(&'a self) -> SourceFuture<'a, Vec<Instrument>>;
}

/// Disabled-entry configuration.
pub trait ConfigProvider: Send + Sync {
    fn disabled_symbols(&self) -> BTreeSet<String>;
    fn disabled_submarkets(&self) -> BTreeSet<String>;
    fn disabled_automation_submarkets(&self) -> BTreeSet<String>;
    fn disabled_automation_symbols(&self) -> BTreeSet<String>;
}

/// Display-string translation hook.
pub trait Localizer: Send + Sync {
    fn decorate(&self, text: &str) -> String;
}

/// Returns text unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityLocalizer;

impl Localizer for IdentityLocalizer {
    fn decorate(&self, text: &str) -> String {
        text.to_owned()
    }
}

/// Trading hours that are always ready; changes are pushed with
/// [`StaticTradingHours::notify`].
#[derive(Default)]
pub struct StaticTradingHours {
    handler: Mutex<Option<StatusChangeHandler>>,
}

impl StaticTradingHours {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivers a change batch to the installed handler. Returns false when no
    /// handler is installed yet.
    pub fn notify(&self, changes: &StatusChanges) -> bool {
        let handler = self
            .handler
            .lock()
            .expect("trading hours handler lock is not poisoned")
            .clone();

        match handler {
            Some(handler) => {
                handler(changes);
                true
            }
            None => false,
        }
    }

    pub fn has_handler(&self) -> bool {
        self.handler
            .lock()
            .expect("trading hours handler lock is not poisoned")
            .is_some()
    }
}

impl TradingHoursSource for StaticTradingHours {
    fn initialise<'a>(&'a self) -> SourceFuture<'a, ()> {
        Box::pin(async { Ok(()) })
    }

    fn on_change(&self, handler: StatusChangeHandler) {
        *self
            .handler
            .lock()
            .expect("trading hours handler lock is not poisoned") = Some(handler);
    }
}

/// Active symbols held in memory, typically loaded from a JSON document.
///
/// Behaves like an upstream that caches its first fetch: `has_data` turns
/// true once `fetch` has run, and later reads go through `cached`.
#[derive(Debug, Default)]
pub struct StaticSymbolSource {
    instruments: Vec<Instrument>,
    fetches: AtomicUsize,
    cached_reads: AtomicUsize,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SymbolDocument {
    List(Vec<Instrument>),
    Response { active_symbols: Vec<Instrument> },
}

impl StaticSymbolSource {
    pub fn new(instruments: Vec<Instrument>) -> Self {
        Self {
            instruments,
            fetches: AtomicUsize::new(0),
            cached_reads: AtomicUsize::new(0),
        }
    }

    /// Parses either a bare instrument array or an object carrying an
    /// `active_symbols` array.
    pub fn from_json_str(input: &str) -> Result<Self, CatalogError> {
        let instruments = match serde_json::from_str::<SymbolDocument>(input)? {
            SymbolDocument::List(instruments) => instruments,
            SymbolDocument::Response { active_symbols } => active_symbols,
        };
        Ok(Self::new(instruments))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let input = std::fs::read_to_string(path)?;
        Self::from_json_str(&input)
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn cached_read_count(&self) -> usize {
        self.cached_reads.load(Ordering::SeqCst)
    }
}

impl RawSymbolSource for StaticSymbolSource {
    fn has_data(&self) -> bool {
        self.fetch_count() > 0
    }

    fn cached(&self) -> Vec<Instrument> {
        self.cached_reads.fetch_add(1, Ordering::SeqCst);
        self.instruments.clone()
    }

    fn fetch<'a>(&'a self) -> SourceFuture<'a, Vec<Instrument>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let instruments = self.instruments.clone();
        Box::pin(async move { Ok(instruments) })
    }
}

//! # Symcat Core
//!
//! Symbol catalog engine for a trading front end.
//!
//! ## Overview
//!
//! This crate turns a flat list of tradable instruments into a
//! market -> submarket -> symbol hierarchy and keeps it current:
//!
//! - **Catalog building** with de-duplication, disabled-entry filtering and
//!   display-name resolution
//! - **Status tracking** where only symbols hold state and submarket/market
//!   status is derived on read
//! - **Option projections** for selection widgets and for automated
//!   strategies, with deterministic ordering
//! - **Single-flight refresh** so concurrent callers share one upstream fetch
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`automation`] | Flat symbol list for automated strategies |
//! | [`catalog`] | Hierarchy types, snapshot and builder |
//! | [`config`] | Disabled-entry configuration |
//! | [`error`] | Core error types |
//! | [`fallback`] | Static option tables served before data arrives |
//! | [`instrument`] | Raw instrument wire type |
//! | [`options`] | Sorted dropdown projections |
//! | [`ordering`] | Volatility, pin and closed-last sort rules |
//! | [`pending`] | Settle-once result shared by waiters |
//! | [`service`] | Cached catalog service |
//! | [`source`] | Collaborator traits and in-memory implementations |
//! | [`status`] | Open/closed status queries and change patching |
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use symcat_core::{StaticSymbolSource, StaticTradingHours, SymbolCatalogService};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let symbols = StaticSymbolSource::from_path("active_symbols.json")?;
//!     let service = SymbolCatalogService::builder(
//!         Arc::new(StaticTradingHours::new()),
//!         Arc::new(symbols),
//!     )
//!     .build();
//!
//!     service.retrieve(false).await;
//!     for option in service.market_options() {
//!         println!("{} -> {}", option.label, option.value);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Catalog reads never fail. Upstream failures are logged through `tracing`
//! and degrade to an empty catalog, so callers see fallback options:
//!
//! ```rust
//! use symcat_core::{SourceError, SourceErrorKind};
//!
//! fn describe(error: &SourceError) -> &'static str {
//!     match error.kind() {
//!         SourceErrorKind::Unavailable => "upstream down",
//!         SourceErrorKind::NotReady => "upstream warming up",
//!     }
//! }
//! ```

pub mod automation;
pub mod catalog;
pub mod config;
pub mod error;
pub mod fallback;
pub mod instrument;
pub mod options;
pub mod ordering;
pub mod pending;
pub mod service;
pub mod source;
pub mod status;

// Catalog model
pub use catalog::{
    custom_submarket_display_name, Catalog, CatalogMarket, CatalogSnapshot, CatalogSubmarket,
    CatalogSymbol,
};
pub use instrument::{Instrument, Pip};
pub use status::StatusChanges;

// Projections
pub use automation::AutomationSymbol;
pub use fallback::FallbackOptions;
pub use options::{DropdownOption, OptionProjector, SymbolListing};
pub use ordering::{IndexSeries, VolatilityKey};

// Service
pub use pending::PendingResult;
pub use service::{InitPhase, SymbolCatalogService, SymbolCatalogServiceBuilder};

// Collaborators and configuration
pub use config::CatalogConfig;
pub use source::{
    ConfigProvider, IdentityLocalizer, Localizer, RawSymbolSource, SourceFuture,
    StaticSymbolSource, StaticTradingHours, StatusChangeHandler, TradingHoursSource,
};

// Error types
pub use error::{CatalogError, SourceError, SourceErrorKind};

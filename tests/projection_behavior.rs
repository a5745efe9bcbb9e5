//! Behavior tests for the dropdown and automation projections.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use symcat_core::{
    CatalogConfig, DropdownOption, FallbackOptions, Instrument, Localizer, Pip,
    StaticSymbolSource, StaticTradingHours, SymbolCatalogService,
};

struct Translated;

impl Localizer for Translated {
    fn decorate(&self, text: &str) -> String {
        match text {
            "(Closed)" => String::from("(Fermé)"),
            other => other.to_owned(),
        }
    }
}

async fn ready_service(instruments: Vec<Instrument>) -> SymbolCatalogService {
    let service = SymbolCatalogService::builder(
        Arc::new(StaticTradingHours::new()),
        Arc::new(StaticSymbolSource::new(instruments)),
    )
    .build();
    service.retrieve(false).await;
    service
}

fn volatility(code: &str, name: &str) -> Instrument {
    Instrument::new(code, "synthetic_index", "random_index")
        .with_market_display_name("Synthetic Indices")
        .with_display_name(name)
}

fn values(options: &[DropdownOption]) -> Vec<&str> {
    options.iter().map(|option| option.value.as_str()).collect()
}

fn labels(options: &[DropdownOption]) -> Vec<&str> {
    options.iter().map(|option| option.label.as_str()).collect()
}

// =============================================================================
// End-to-end scenario
// =============================================================================

#[tokio::test]
async fn single_open_instrument_projects_without_closed_suffix() {
    // Given: One open volatility index with a 0.001 pip
    let service = ready_service(vec![Instrument::new("R_10", "synthetic_index", "random_index")
        .with_market_display_name("Synthetic Indices")
        .with_pip(Pip::Number(0.001))])
    .await;

    // When: The catalog and market options are read
    let snapshot = service.snapshot();
    let options = service.market_options();

    // Then: One node per level, three pip digits, active, no suffix
    let catalog = snapshot.catalog();
    assert_eq!(catalog.market_count(), 1);
    assert_eq!(catalog.submarket_count(), 1);
    assert_eq!(catalog.symbol_count(), 1);
    let symbol = catalog.symbol("R_10").expect("symbol present");
    assert_eq!(symbol.pip_size, 3);
    assert!(symbol.is_active);
    assert_eq!(
        options,
        vec![DropdownOption::new("Synthetic Indices", "synthetic_index")]
    );
}

// =============================================================================
// Ordering
// =============================================================================

#[tokio::test]
async fn volatility_symbols_are_ordered_numerically_across_both_patterns() {
    // Given: Volatility symbols published in mixed order
    let service = ready_service(vec![
        volatility("1HZ100V", "Volatility 100 (1s) Index"),
        volatility("1HZ10V", "Volatility 10 (1s) Index"),
        volatility("R_25", "Volatility 25 Index"),
        volatility("R_100", "Volatility 100 Index"),
        volatility("BOOM500", "Boom 500 Index"),
    ])
    .await;

    // When: Symbol options are projected for the volatility submarket
    let options = service.symbol_options("random_index");

    // Then: Numeric keys come first, grouped by pattern, then the rest
    assert_eq!(
        values(&options),
        vec!["1HZ10V", "1HZ100V", "R_25", "R_100", "BOOM500"]
    );
}

#[tokio::test]
async fn closed_symbols_move_last_keeping_relative_order() {
    // Given: Alternating open and closed symbols in a plain submarket
    let service = ready_service(vec![
        Instrument::new("A", "forex", "minor_pairs").with_display_name("A"),
        Instrument::new("B", "forex", "minor_pairs")
            .with_display_name("B")
            .with_exchange_open(false),
        Instrument::new("C", "forex", "minor_pairs").with_display_name("C"),
        Instrument::new("D", "forex", "minor_pairs")
            .with_display_name("D")
            .with_trading_suspended(true),
    ])
    .await;

    // When: Symbol options are projected
    let options = service.symbol_options("minor_pairs");

    // Then: Open entries first, closed entries after, each group stable
    assert_eq!(values(&options), vec!["A", "C", "B", "D"]);
    assert_eq!(labels(&options), vec!["A", "C", "B (Closed)", "D (Closed)"]);
}

#[tokio::test]
async fn closed_volatility_symbol_sorts_after_open_ones() {
    // Given: A volatility submarket whose lowest index is closed
    let service = ready_service(vec![
        volatility("R_10", "Volatility 10 Index").with_exchange_open(false),
        volatility("R_50", "Volatility 50 Index"),
        volatility("R_25", "Volatility 25 Index"),
    ])
    .await;

    // When: Symbol options are projected
    let options = service.symbol_options("random_index");

    // Then: Numeric order applies within each group, closed group last
    assert_eq!(values(&options), vec!["R_25", "R_50", "R_10"]);
}

#[tokio::test]
async fn synthetic_market_and_random_index_are_pinned_first() {
    // Given: Markets and submarkets published in an unfavourable order
    let service = ready_service(vec![
        Instrument::new("frxEURUSD", "forex", "major_pairs").with_market_display_name("Forex"),
        Instrument::new("JD10", "synthetic_index", "jump_index")
            .with_market_display_name("Synthetic Indices"),
        volatility("R_10", "Volatility 10 Index"),
    ])
    .await;

    // When: Market and submarket options are projected
    let markets = service.market_options();
    let submarkets = service.submarket_options("synthetic_index");

    // Then: The pinned entries lead
    assert_eq!(values(&markets), vec!["synthetic_index", "forex"]);
    assert_eq!(values(&submarkets), vec!["random_index", "jump_index"]);
    assert_eq!(
        labels(&submarkets),
        vec!["Continuous Indices", "Jump Indices"]
    );
}

#[tokio::test]
async fn closed_suffix_is_localized() {
    // Given: A closed market and a translating localizer
    let service = SymbolCatalogService::builder(
        Arc::new(StaticTradingHours::new()),
        Arc::new(StaticSymbolSource::new(vec![Instrument::new(
            "frxEURUSD",
            "forex",
            "major_pairs",
        )
        .with_market_display_name("Forex")
        .with_exchange_open(false)])),
    )
    .with_localizer(Arc::new(Translated))
    .build();
    service.retrieve(false).await;

    // When: Market options are projected
    let options = service.market_options();

    // Then: The suffix goes through the localizer
    assert_eq!(labels(&options), vec!["Forex (Fermé)"]);
}

// =============================================================================
// Fallback tables
// =============================================================================

#[tokio::test]
async fn empty_catalog_returns_supplied_fallback_tables_unmodified() {
    // Given: A custom fallback table and an upstream with no instruments
    let fallback = FallbackOptions {
        markets: vec![
            DropdownOption::new("Zeta", "zeta"),
            DropdownOption::new("Alpha", "alpha"),
        ],
        submarkets: BTreeMap::from([(
            String::from("zeta"),
            vec![DropdownOption::new("Zeta Sub", "zeta_sub")],
        )]),
        symbols: BTreeMap::from([(
            String::from("random_index"),
            vec![
                DropdownOption::new("Volatility 100 Index", "R_100"),
                DropdownOption::new("Volatility 10 Index", "R_10"),
            ],
        )]),
    };
    let service = SymbolCatalogService::builder(
        Arc::new(StaticTradingHours::new()),
        Arc::new(StaticSymbolSource::new(Vec::new())),
    )
    .with_fallback(fallback.clone())
    .build();
    service.retrieve(false).await;

    // When/Then: Every level answers from the fallback table as supplied
    assert_eq!(service.market_options(), fallback.markets);
    assert_eq!(service.submarket_options("zeta"), fallback.submarkets["zeta"]);
    assert_eq!(
        service.symbol_options("random_index"),
        fallback.symbols["random_index"]
    );
    assert_eq!(
        service.submarket_options("unknown"),
        vec![DropdownOption::new("Default", "default")]
    );
    assert_eq!(
        service.symbol_options("unknown"),
        vec![DropdownOption::new("Default Symbol", "DEFAULT")]
    );
}

#[tokio::test]
async fn unknown_submarket_falls_back_even_when_catalog_is_populated() {
    // Given: A populated catalog without forex
    let service = ready_service(vec![volatility("R_10", "Volatility 10 Index")]).await;

    // When: Options are requested for absent parents
    let submarkets = service.submarket_options("forex");
    let symbols = service.symbol_options("major_pairs");

    // Then: The default fallback tables answer
    let fallback = FallbackOptions::default();
    assert_eq!(submarkets, fallback.submarket_options("forex"));
    assert_eq!(symbols, fallback.symbol_options("major_pairs"));
}

// =============================================================================
// Automation projection and listing
// =============================================================================

#[tokio::test]
async fn automation_list_skips_closed_markets_and_disabled_entries() {
    // Given: An open synthetic market, a closed forex market and a config
    // disabling one submarket and one symbol for automation
    let config = CatalogConfig {
        disabled_automation_submarkets: BTreeSet::from([String::from("crash_index")]),
        disabled_automation_symbols: BTreeSet::from([String::from("1HZ10V")]),
        ..CatalogConfig::default()
    };
    let service = SymbolCatalogService::builder(
        Arc::new(StaticTradingHours::new()),
        Arc::new(StaticSymbolSource::new(vec![
            Instrument::new("frxEURUSD", "forex", "major_pairs").with_exchange_open(false),
            volatility("R_100", "Volatility 100 Index"),
            volatility("1HZ10V", "Volatility 10 (1s) Index"),
            volatility("R_10", "Volatility 10 Index"),
            Instrument::new("BOOM500", "synthetic_index", "crash_index"),
        ])),
    )
    .with_config(Arc::new(config))
    .build();
    service.retrieve(false).await;

    // When: The automation list is projected
    let symbols = service.symbols_for_automation();

    // Then: Only open, enabled symbols remain, numerically ordered and grouped
    let entries = symbols
        .iter()
        .map(|entry| (entry.group.as_str(), entry.value.as_str()))
        .collect::<Vec<_>>();
    assert_eq!(
        entries,
        vec![
            ("Continuous Indices", "R_10"),
            ("Continuous Indices", "R_100"),
        ]
    );
}

#[tokio::test]
async fn listing_reports_every_symbol_with_parents() {
    // Given: Two markets, one of them closed
    let service = ready_service(vec![
        volatility("R_10", "Volatility 10 Index"),
        Instrument::new("frxEURUSD", "forex", "major_pairs")
            .with_market_display_name("Forex")
            .with_display_name("EUR/USD")
            .with_exchange_open(false),
    ])
    .await;

    // When: The listing is produced with and without the open filter
    let all = service.all_symbols(false);
    let open = service.all_symbols(true);

    // Then: The filter drops the closed market only
    assert_eq!(all.len(), 2);
    assert_eq!(all[1].market_display, "Forex");
    assert_eq!(all[1].submarket_display, "Major Pairs");
    assert_eq!(all[1].symbol_display, "EUR/USD");
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].symbol, "R_10");
}

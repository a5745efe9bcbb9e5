//! Behavior tests for catalog refresh cycles.
//!
//! These tests hold upstream fetches open with a gate so that concurrent,
//! forced and reset calls can be observed while a cycle is in flight.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use symcat_core::{
    InitPhase, Instrument, RawSymbolSource, SourceError, SourceFuture, StaticSymbolSource,
    StaticTradingHours, StatusChangeHandler, SymbolCatalogService, TradingHoursSource,
};
use tokio::sync::Semaphore;

/// Symbol source whose fetches block until a permit is released. Each fetch
/// takes the next queued response; the last one repeats.
struct GatedSymbols {
    responses: Mutex<VecDeque<Vec<Instrument>>>,
    gate: Semaphore,
    fetches: AtomicUsize,
}

impl GatedSymbols {
    fn new(responses: Vec<Vec<Instrument>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            gate: Semaphore::new(0),
            fetches: AtomicUsize::new(0),
        })
    }

    fn release(&self) {
        self.gate.add_permits(1);
    }

    fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl RawSymbolSource for GatedSymbols {
    fn has_data(&self) -> bool {
        false
    }

    fn cached(&self) -> Vec<Instrument> {
        Vec::new()
    }

    fn fetch<'a>(&'a self) -> SourceFuture<'a, Vec<Instrument>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let response = {
            let mut responses = self.responses.lock().expect("responses lock");
            if responses.len() > 1 {
                responses.pop_front().unwrap_or_default()
            } else {
                responses.front().cloned().unwrap_or_default()
            }
        };

        Box::pin(async move {
            let permit = self
                .gate
                .acquire()
                .await
                .map_err(|_| SourceError::unavailable("gate closed"))?;
            permit.forget();
            Ok(response)
        })
    }
}

struct FailingTradingHours;

impl TradingHoursSource for FailingTradingHours {
    fn initialise<'a>(&'a self) -> SourceFuture<'a, ()> {
        Box::pin(async { Err(SourceError::not_ready("trading times not loaded")) })
    }

    fn on_change(&self, _handler: StatusChangeHandler) {}
}

fn first_response() -> Vec<Instrument> {
    vec![Instrument::new("R_10", "synthetic_index", "random_index")]
}

fn second_response() -> Vec<Instrument> {
    vec![
        Instrument::new("R_10", "synthetic_index", "random_index"),
        Instrument::new("frxEURUSD", "forex", "major_pairs"),
    ]
}

fn gated_service(symbols: &Arc<GatedSymbols>) -> SymbolCatalogService {
    SymbolCatalogService::builder(Arc::new(StaticTradingHours::new()), symbols.clone()).build()
}

async fn wait_until(condition: impl Fn() -> bool) {
    for _ in 0..1_000 {
        if condition() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition was not reached");
}

async fn settle_tasks() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

// =============================================================================
// Single-flight: concurrent callers share one cycle
// =============================================================================

#[tokio::test]
async fn concurrent_callers_share_one_fetch_and_one_catalog() {
    // Given: A service whose upstream fetch is held open
    let symbols = GatedSymbols::new(vec![first_response()]);
    let service = gated_service(&symbols);

    // When: Eight callers retrieve concurrently before the fetch completes
    let callers = (0..8)
        .map(|_| {
            let service = service.clone();
            tokio::spawn(async move { service.retrieve(false).await })
        })
        .collect::<Vec<_>>();
    wait_until(|| symbols.fetch_count() == 1).await;
    settle_tasks().await;
    assert_eq!(service.phase(), InitPhase::Initializing);
    symbols.release();

    // Then: Every caller sees the same catalog instance and upstream ran once
    let mut snapshots = Vec::new();
    for caller in callers {
        snapshots.push(caller.await.expect("caller completes"));
    }
    assert_eq!(symbols.fetch_count(), 1);
    assert!(snapshots
        .iter()
        .all(|snapshot| Arc::ptr_eq(snapshot, &snapshots[0])));
    assert_eq!(snapshots[0].catalog().symbol_count(), 1);
    assert_eq!(service.phase(), InitPhase::Ready);
}

#[tokio::test]
async fn caller_after_completion_reuses_catalog_without_fetching() {
    // Given: A ready catalog
    let symbols = Arc::new(StaticSymbolSource::new(first_response()));
    let service =
        SymbolCatalogService::builder(Arc::new(StaticTradingHours::new()), symbols.clone()).build();
    let first = service.retrieve(false).await;

    // When: A later non-forced retrieve runs
    let second = service.retrieve(false).await;

    // Then: The cached catalog is returned as-is
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(symbols.fetch_count(), 1);
}

#[tokio::test]
async fn dropped_initiator_does_not_strand_waiters() {
    // Given: A cycle started by a caller that then goes away
    let symbols = GatedSymbols::new(vec![first_response()]);
    let service = gated_service(&symbols);
    let initiator = {
        let service = service.clone();
        tokio::spawn(async move { service.retrieve(false).await })
    };
    wait_until(|| symbols.fetch_count() == 1).await;
    let waiter = {
        let service = service.clone();
        tokio::spawn(async move { service.retrieve(false).await })
    };
    settle_tasks().await;
    initiator.abort();

    // When: The upstream fetch completes
    symbols.release();

    // Then: The remaining waiter still receives the catalog
    let snapshot = waiter.await.expect("waiter completes");
    assert_eq!(snapshot.catalog().symbol_count(), 1);
    assert_eq!(service.phase(), InitPhase::Ready);
}

// =============================================================================
// Forced refresh: independent cycles, last completion wins
// =============================================================================

#[tokio::test]
async fn forced_refresh_runs_alongside_inflight_cycle_and_last_completion_wins() {
    // Given: A non-forced cycle in flight
    let symbols = GatedSymbols::new(vec![first_response(), second_response()]);
    let service = gated_service(&symbols);
    let first = {
        let service = service.clone();
        tokio::spawn(async move { service.retrieve(false).await })
    };
    wait_until(|| symbols.fetch_count() == 1).await;

    // When: A forced refresh starts, and a plain caller arrives afterwards
    let forced = {
        let service = service.clone();
        tokio::spawn(async move { service.retrieve(true).await })
    };
    wait_until(|| symbols.fetch_count() == 2).await;
    let joiner = {
        let service = service.clone();
        tokio::spawn(async move { service.retrieve(false).await })
    };
    settle_tasks().await;

    // Then: The first cycle completes with its own data but does not end
    // initialisation while the forced cycle is outstanding
    symbols.release();
    let first = first.await.expect("first cycle completes");
    assert_eq!(first.catalog().symbol_count(), 1);
    assert_eq!(service.phase(), InitPhase::Initializing);

    // And: The forced cycle publishes last and the joiner observes it
    symbols.release();
    let forced = forced.await.expect("forced cycle completes");
    let joined = joiner.await.expect("joiner completes");
    assert_eq!(forced.catalog().symbol_count(), 2);
    assert!(Arc::ptr_eq(&forced, &joined));
    assert_eq!(service.snapshot().catalog().symbol_count(), 2);
    assert_eq!(service.phase(), InitPhase::Ready);
    assert_eq!(symbols.fetch_count(), 2);
}

// =============================================================================
// Reset while a cycle is in flight
// =============================================================================

#[tokio::test]
async fn clear_cache_during_cycle_keeps_stale_result_private() {
    // Given: A cycle in flight
    let symbols = GatedSymbols::new(vec![first_response(), second_response()]);
    let service = gated_service(&symbols);
    let stale = {
        let service = service.clone();
        tokio::spawn(async move { service.retrieve(false).await })
    };
    wait_until(|| symbols.fetch_count() == 1).await;

    // When: The cache is cleared before the cycle completes
    service.clear_cache();
    symbols.release();
    let stale = stale.await.expect("stale cycle completes");

    // Then: The stale caller gets its own catalog, the service stays reset
    assert_eq!(stale.catalog().symbol_count(), 1);
    assert!(service.snapshot().catalog().is_empty());
    assert_eq!(service.phase(), InitPhase::Uninitialized);

    // And: The next retrieve starts a fresh cycle
    symbols.release();
    let fresh = service.retrieve(false).await;
    assert_eq!(fresh.catalog().symbol_count(), 2);
    assert_eq!(symbols.fetch_count(), 2);
    assert_eq!(service.phase(), InitPhase::Ready);
}

// =============================================================================
// Degraded collaborators
// =============================================================================

#[tokio::test]
async fn trading_hours_failure_does_not_block_catalog() {
    // Given: Trading hours that fail to initialise
    let symbols = Arc::new(StaticSymbolSource::new(first_response()));
    let service = SymbolCatalogService::builder(Arc::new(FailingTradingHours), symbols).build();

    // When: The catalog is retrieved
    let snapshot = service.retrieve(false).await;

    // Then: The catalog is still built from the symbol list
    assert_eq!(snapshot.catalog().symbol_count(), 1);
    assert_eq!(service.phase(), InitPhase::Ready);
}

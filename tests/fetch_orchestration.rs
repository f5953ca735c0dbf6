//! Behavior-driven tests for bounded, failure-tolerant fan-out
//!
//! These tests drive the orchestrator against the fixture provider and check
//! what a batch caller observes when lookups are slow or fail.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use stogra_core::{
    FetchFailure, FetchOrchestrator, FixtureProvider, HistoryRange, MarketDataProvider,
    MarketDataService, MarketUniverse, ProviderError, ServiceConfig, Symbol, ViewCache,
};
use stogra_tests::sym;

type Lookup = Pin<Box<dyn Future<Output = Result<Vec<f64>, ProviderError>> + Send>>;

fn history_lookup(provider: &Arc<FixtureProvider>) -> impl Fn(&Symbol) -> Lookup {
    let provider = Arc::clone(provider);
    move |symbol: &Symbol| -> Lookup {
        let provider = Arc::clone(&provider);
        let symbol = symbol.clone();
        Box::pin(async move {
            provider
                .history(&symbol, HistoryRange::FiveDays)
                .await
                .map(|history| history.closes)
        })
    }
}

#[tokio::test(start_paused = true)]
async fn no_more_than_the_configured_number_of_lookups_run_at_once() {
    // Given: Six slow symbols and a limit of two concurrent lookups
    let symbols: Vec<Symbol> = ["AAPL", "MSFT", "NVDA", "META", "AMZN", "TSLA"]
        .into_iter()
        .map(sym)
        .collect();
    let provider = Arc::new(symbols.iter().fold(FixtureProvider::new(), |provider, symbol| {
        provider
            .with_history(symbol.clone(), vec![1.0, 2.0])
            .with_delay(symbol.clone(), Duration::from_millis(200))
    }));
    let orchestrator = FetchOrchestrator::new(2, Duration::from_secs(5));

    // When: The whole batch is gathered
    let closes = orchestrator
        .gather("test", symbols, history_lookup(&provider))
        .await;

    // Then: Every lookup succeeded, never more than two at a time
    assert_eq!(closes.len(), 6);
    assert_eq!(provider.peak_in_flight(), 2);
}

#[tokio::test(start_paused = true)]
async fn a_slow_lookup_times_out_without_stalling_the_batch() {
    // Given: One symbol that takes far longer than the per-call timeout
    let provider = Arc::new(
        FixtureProvider::new()
            .with_history(sym("AAPL"), vec![1.0, 2.0])
            .with_history(sym("SLOW"), vec![1.0, 2.0])
            .with_delay(sym("SLOW"), Duration::from_secs(60)),
    );
    let orchestrator = FetchOrchestrator::new(4, Duration::from_secs(1));

    // When: Both are settled
    let started = tokio::time::Instant::now();
    let mut settled = orchestrator
        .settle_all("test", vec![sym("AAPL"), sym("SLOW")], history_lookup(&provider))
        .await;
    settled.sort_by(|a, b| a.key.cmp(&b.key));

    // Then: The batch finishes at the timeout, with SLOW marked as timed out
    assert!(started.elapsed() < Duration::from_secs(2));
    assert!(settled[0].outcome.is_ok());
    assert_eq!(
        settled[1].outcome,
        Err(FetchFailure::TimedOut(Duration::from_secs(1)))
    );
}

#[tokio::test]
async fn provider_failures_are_reported_per_key() {
    let provider = Arc::new(
        FixtureProvider::new()
            .with_history(sym("AAPL"), vec![1.0, 2.0])
            .with_failure(sym("DOWN"), ProviderError::unavailable("maintenance")),
    );
    let orchestrator = FetchOrchestrator::new(4, Duration::from_secs(1));

    let settled = orchestrator
        .settle_all("test", vec![sym("DOWN"), sym("AAPL"), sym("GONE")], history_lookup(&provider))
        .await;

    let code_for = |key: &str| {
        settled
            .iter()
            .find(|s| s.key.as_str() == key)
            .map(|s| match &s.outcome {
                Ok(_) => "ok",
                Err(failure) => failure.code(),
            })
    };
    assert_eq!(settled.len(), 3);
    assert_eq!(code_for("AAPL"), Some("ok"));
    assert_eq!(code_for("DOWN"), Some("provider.unavailable"));
    assert_eq!(code_for("GONE"), Some("provider.not_found"));
}

#[tokio::test(start_paused = true)]
async fn service_batches_omit_symbols_whose_lookup_times_out() {
    // Given: A service with a one-second per-call budget and one hung symbol
    let provider = Arc::new(
        FixtureProvider::new()
            .with_history(sym("AAPL"), vec![1.0, 2.0])
            .with_history(sym("HUNG"), vec![1.0, 2.0])
            .with_delay(sym("HUNG"), Duration::from_secs(30)),
    );
    let config = ServiceConfig {
        call_timeout: Duration::from_secs(1),
        ..ServiceConfig::default()
    };
    let service = MarketDataService::new(
        Arc::clone(&provider) as Arc<dyn MarketDataProvider>,
        MarketUniverse::default(),
        config,
        ViewCache::new(),
    );

    // When: A batch includes the hung symbol
    let quotes = service.get_stocks_batch("HUNG,AAPL").await.expect("valid batch");

    // Then: Only the responsive symbol is returned
    let symbols: Vec<&str> = quotes.iter().map(|q| q.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["AAPL"]);
}

#[tokio::test]
async fn an_empty_batch_settles_immediately() {
    let provider = Arc::new(FixtureProvider::new());
    let orchestrator = FetchOrchestrator::new(4, Duration::from_secs(1));

    let closes = orchestrator
        .gather("test", Vec::<Symbol>::new(), history_lookup(&provider))
        .await;

    assert!(closes.is_empty());
    assert_eq!(provider.calls(), 0);
}

//! # Stogra Core
//!
//! Aggregation and caching layer behind the stogra market dashboard.
//!
//! ## Overview
//!
//! Every dashboard view is a fan-out over one upstream market-data provider:
//!
//! - **TTL cache** so repeated views inside a freshness window cost nothing upstream
//! - **Fetch orchestrator** bounding concurrency and per-call time, tolerating partial failure
//! - **Derived metrics** turning raw closes and profile fields into changes, rankings and splits
//! - **Market clock** answering whether the exchange is open and how long until it flips
//! - **Service façade** exposing the read operations the HTTP layer calls
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Provider implementations (Yahoo Finance, in-memory fixture) |
//! | [`cache`] | Lazily-expiring key/value cache |
//! | [`clock`] | Exchange session rules and status |
//! | [`config`] | Tracked universe, fan-out limits and TTL table |
//! | [`domain`] | Response DTOs, `Symbol` and `UtcDateTime` |
//! | [`error`] | Validation, service and configuration errors |
//! | [`http_client`] | HTTP client abstraction |
//! | [`metrics`] | Pure derivations over provider data |
//! | [`orchestrator`] | Bounded concurrent lookups |
//! | [`pacing`] | Outbound request pacing |
//! | [`provider`] | Provider trait and raw lookup types |
//! | [`service`] | `MarketDataService` read operations |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use stogra_core::{FixtureProvider, MarketDataService, MarketUniverse, ServiceConfig, ViewCache};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let service = MarketDataService::new(
//!         Arc::new(FixtureProvider::demo()),
//!         MarketUniverse::default(),
//!         ServiceConfig::default(),
//!         ViewCache::new(),
//!     );
//!
//!     for quote in service.get_stocks_batch("AAPL,MSFT").await? {
//!         println!("{} {:.2} ({:+.2}%)", quote.symbol, quote.price, quote.change_percent);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  CLI / HTTP     │
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ MarketData      │────▶│ TtlCache         │
//! │ Service         │     └──────────────────┘
//! └────────┬────────┘     ┌──────────────────┐
//!          ├─────────────▶│ Metrics / Clock  │
//!          ▼              └──────────────────┘
//! ┌─────────────────┐     ┌──────────────────┐
//! │ Fetch           │────▶│ MarketData       │
//! │ Orchestrator    │     │ Provider (trait) │
//! └─────────────────┘     └────────┬─────────┘
//!                                  ▼
//!                         ┌──────────────────┐
//!                         │ HTTP Client +    │
//!                         │ Request Pacer    │
//!                         └──────────────────┘
//! ```
//!
//! ## Error Handling
//!
//! Provider failures never reach callers of list views; they are logged and
//! the affected symbol drops out. Callers see only validation errors and
//! not-found on single-symbol lookups:
//!
//! ```rust
//! use stogra_core::{ServiceError, ValidationError};
//!
//! fn status_for(error: &ServiceError) -> u16 {
//!     match error {
//!         ServiceError::Validation(ValidationError::LimitOutOfRange { .. }) => 422,
//!         ServiceError::Validation(_) => 400,
//!         ServiceError::NotFound { .. } => 404,
//!     }
//! }
//! ```

pub mod adapters;
pub mod cache;
pub mod clock;
pub mod config;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod metrics;
pub mod orchestrator;
pub mod pacing;
pub mod provider;
pub mod service;

// Adapter implementations
pub use adapters::{FixtureProvider, YahooProvider};

// Caching
pub use cache::TtlCache;

// Session clock
pub use clock::{SessionEvent, SessionRule, SessionState};

// Configuration
pub use config::{IndexSpec, MarketUniverse, SectorEtf, SectorStocks, ServiceConfig, TtlPolicy};

// Domain models
pub use domain::{
    AnalystRating, DividendStock, EarningsEvent, FeaturedNews, IndexSnapshot, MarketSnapshot,
    MarketStatus, Mover, NewsItem, PayoutFrequency, Quote, RatingCategory, SectorPerformance, SessionTiming,
    Symbol, TickerListing, UtcDateTime, WeekExtremes, WeekRange,
};

// Error types
pub use error::{ConfigError, ServiceError, ValidationError};

// HTTP client types
pub use http_client::{HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient};

// Fan-out
pub use orchestrator::{FetchFailure, FetchOrchestrator, Settled};

// Pacing
pub use pacing::RequestPacer;

// Provider contract
pub use provider::{
    EarningsEstimate, HistoryRange, MarketDataProvider, PriceHistory, ProviderError,
    ProviderErrorKind, RawNews, TickerProfile,
};

// Service façade
pub use service::{CachedView, MarketDataService, ViewCache};

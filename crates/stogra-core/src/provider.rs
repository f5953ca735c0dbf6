//! Market-data provider contract and raw lookup types.
//!
//! The provider is the only latency-bearing collaborator. Everything derived
//! from its answers lives in [`crate::metrics`].
//!
//! | Lookup | Result | Used by |
//! |--------|--------|---------|
//! | `history` | [`PriceHistory`] | quotes, indices, sectors |
//! | `profile` | [`TickerProfile`] | quotes, ratings, dividends, 52-week range |
//! | `news` | `Vec<RawNews>` | news feed |
//! | `earnings_dates` | `Vec<EarningsEstimate>` | earnings calendar |

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::{Symbol, UtcDateTime};

/// Boxed lookup future returned by provider implementations.
pub type ProviderFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ProviderError>> + Send + 'a>>;

/// Daily history window requested from the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HistoryRange {
    TwoDays,
    FiveDays,
}

impl HistoryRange {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TwoDays => "2d",
            Self::FiveDays => "5d",
        }
    }
}

impl Display for HistoryRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Chronological daily closes for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceHistory {
    pub symbol: Symbol,
    pub closes: Vec<f64>,
}

impl PriceHistory {
    pub fn new(symbol: Symbol, closes: Vec<f64>) -> Self {
        Self { symbol, closes }
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    pub fn last_close(&self) -> Option<f64> {
        self.closes.last().copied()
    }
}

/// Descriptive and fundamental fields for one ticker. Every field is optional
/// because providers omit whatever they do not cover.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickerProfile {
    pub long_name: Option<String>,
    pub short_name: Option<String>,
    pub currency: Option<String>,
    pub market_cap: Option<f64>,
    pub previous_close: Option<f64>,
    pub current_price: Option<f64>,
    pub recommendation_key: Option<String>,
    pub target_median_price: Option<f64>,
    pub target_mean_price: Option<f64>,
    pub analyst_count: Option<u32>,
    /// Trailing yield as a fraction (`0.031` is 3.1%).
    pub dividend_yield: Option<f64>,
    pub dividend_rate: Option<f64>,
    pub last_dividend_value: Option<f64>,
    pub ex_dividend_date: Option<UtcDateTime>,
    pub fifty_two_week_high: Option<f64>,
    pub fifty_two_week_low: Option<f64>,
}

impl TickerProfile {
    /// Long name, then short name, then the ticker itself.
    pub fn display_name(&self, symbol: &Symbol) -> String {
        [self.long_name.as_deref(), self.short_name.as_deref()]
            .into_iter()
            .flatten()
            .find(|name| !name.trim().is_empty())
            .map(str::to_owned)
            .unwrap_or_else(|| symbol.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawNews {
    pub title: String,
    pub publisher: String,
    pub link: String,
    pub published_at: Option<UtcDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarningsEstimate {
    pub date: UtcDateTime,
    pub eps_estimate: Option<f64>,
}

/// Provider error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    NotFound,
    Unavailable,
    RateLimited,
    Timeout,
    Malformed,
    Internal,
}

/// Structured lookup failure reported by a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderError {
    kind: ProviderErrorKind,
    message: String,
}

impl ProviderError {
    fn new(kind: ProviderErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::NotFound, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Unavailable, message)
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::RateLimited, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Timeout, message)
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Malformed, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Internal, message)
    }

    pub const fn kind(&self) -> ProviderErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            ProviderErrorKind::NotFound => "provider.not_found",
            ProviderErrorKind::Unavailable => "provider.unavailable",
            ProviderErrorKind::RateLimited => "provider.rate_limited",
            ProviderErrorKind::Timeout => "provider.timeout",
            ProviderErrorKind::Malformed => "provider.malformed",
            ProviderErrorKind::Internal => "provider.internal",
        }
    }
}

impl Display for ProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for ProviderError {}

/// External market-data provider.
///
/// Implementations must be `Send + Sync`; the service shares one instance
/// across every concurrently running lookup.
pub trait MarketDataProvider: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Daily closes over `range`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns a `NotFound` [`ProviderError`] when the provider has no history
    /// for the symbol.
    fn history<'a>(&'a self, symbol: &'a Symbol, range: HistoryRange)
        -> ProviderFuture<'a, PriceHistory>;

    fn profile<'a>(&'a self, symbol: &'a Symbol) -> ProviderFuture<'a, TickerProfile>;

    fn news<'a>(&'a self, symbol: &'a Symbol) -> ProviderFuture<'a, Vec<RawNews>>;

    /// Past and future earnings dates with consensus EPS where known.
    fn earnings_dates<'a>(&'a self, symbol: &'a Symbol) -> ProviderFuture<'a, Vec<EarningsEstimate>>;
}

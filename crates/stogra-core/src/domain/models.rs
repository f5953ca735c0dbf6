use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::{Symbol, UtcDateTime};

/// Curated search directory entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerListing {
    pub symbol: Symbol,
    pub name: String,
    pub exchange: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl TickerListing {
    pub fn new(
        symbol: Symbol,
        name: impl Into<String>,
        exchange: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            symbol,
            name: name.into(),
            exchange: exchange.into(),
            kind: kind.into(),
        }
    }

    /// Case-insensitive substring match against symbol or company name.
    pub fn matches(&self, needle_lower: &str) -> bool {
        self.symbol.as_str().to_lowercase().contains(needle_lower)
            || self.name.to_lowercase().contains(needle_lower)
    }
}

/// Equity quote with daily change and a short sparkline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: Symbol,
    pub name: String,
    pub price: f64,
    pub previous_close: f64,
    pub change: f64,
    pub change_percent: f64,
    /// Most recent closes, oldest first, at most seven points.
    pub sparkline: Vec<f64>,
    pub market_cap: Option<f64>,
    pub currency: String,
}

/// Major index level and its daily move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexSnapshot {
    pub symbol: Symbol,
    pub name: String,
    pub price: f64,
    pub change_percent: f64,
}

impl IndexSnapshot {
    /// Zero-valued placeholder used when an index lookup fails.
    pub fn sentinel(symbol: Symbol, name: impl Into<String>) -> Self {
        Self {
            symbol,
            name: name.into(),
            price: 0.0,
            change_percent: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mover {
    pub symbol: Symbol,
    pub name: String,
    pub price: f64,
    pub change_percent: f64,
}

impl From<&Quote> for Mover {
    fn from(quote: &Quote) -> Self {
        Self {
            symbol: quote.symbol.clone(),
            name: quote.name.clone(),
            price: quote.price,
            change_percent: quote.change_percent,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub indices: Vec<IndexSnapshot>,
    pub top_movers: Vec<Mover>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorPerformance {
    pub name: String,
    pub change_percent: f64,
}

/// Consensus analyst recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatingCategory {
    Buy,
    Hold,
    Sell,
}

impl RatingCategory {
    /// Map a provider recommendation key; unknown keys count as hold.
    pub fn from_recommendation_key(key: &str) -> Self {
        match key.trim().to_ascii_lowercase().as_str() {
            "strong_buy" | "buy" => Self::Buy,
            "sell" | "strong_sell" | "underperform" => Self::Sell,
            _ => Self::Hold,
        }
    }

    pub const fn score(self) -> f64 {
        match self {
            Self::Buy => 4.5,
            Self::Hold => 3.0,
            Self::Sell => 2.0,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Hold => "hold",
            Self::Sell => "sell",
        }
    }
}

impl Display for RatingCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalystRating {
    pub symbol: Symbol,
    pub name: String,
    pub rating: RatingCategory,
    pub rating_score: f64,
    pub target_price: f64,
    pub current_price: f64,
    pub upside_percent: f64,
    pub analyst_count: u32,
}

/// When an earnings release lands relative to the trading session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionTiming {
    BeforeMarket,
    #[default]
    AfterMarket,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarningsEvent {
    pub symbol: Symbol,
    pub name: String,
    pub date: UtcDateTime,
    #[serde(rename = "time")]
    pub timing: SessionTiming,
    pub expected_eps: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub publisher: String,
    pub link: String,
    pub published_at: Option<UtcDateTime>,
    pub related_stocks: Vec<Symbol>,
}

/// Lead headline for a dashboard banner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeaturedNews {
    pub title: String,
    pub symbol: Symbol,
    pub summary: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayoutFrequency {
    Monthly,
    Quarterly,
    SemiAnnual,
    Annual,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DividendStock {
    pub symbol: Symbol,
    pub name: String,
    pub price: f64,
    /// Trailing yield in percent.
    pub dividend_yield: f64,
    pub annual_dividend: f64,
    pub payout_frequency: PayoutFrequency,
    pub ex_dividend_date: Option<UtcDateTime>,
}

/// Position of the current price inside the trailing 52-week range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekRange {
    pub symbol: Symbol,
    pub name: String,
    pub price: f64,
    pub week_high: f64,
    pub week_low: f64,
    pub percent_from_high: f64,
    pub is_new_high: bool,
    pub is_new_low: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekExtremes {
    pub highs: Vec<WeekRange>,
    pub lows: Vec<WeekRange>,
}

/// Exchange session status as reported to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketStatus {
    pub is_open: bool,
    pub exchange: String,
    pub next_event: String,
    /// `"{h}h {m}m"`, or empty when no boundary is pending today.
    pub countdown: String,
    pub open_time: String,
    pub close_time: String,
}

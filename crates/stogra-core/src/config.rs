//! Reference tables and tuning knobs for the market-data service.
//!
//! [`MarketUniverse`] is the static reference data (indices, sector ETFs,
//! tracked symbols, search directory). It ships with curated defaults and can
//! be replaced wholesale from a JSON file. [`ServiceConfig`] holds fan-out
//! limits, timeouts and the TTL table; environment variables override its
//! defaults.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::clock::SessionRule;
use crate::domain::TickerListing;
use crate::error::ConfigError;
use crate::Symbol;

pub const ENV_MAX_CONCURRENCY: &str = "STOGRA_MAX_CONCURRENCY";
pub const ENV_CALL_TIMEOUT_MS: &str = "STOGRA_CALL_TIMEOUT_MS";
pub const ENV_PACER_RPS: &str = "STOGRA_PACER_RPS";
pub const ENV_UNIVERSE_FILE: &str = "STOGRA_UNIVERSE_FILE";

/// Sector list read when a requested sector is not in the table.
pub const FALLBACK_SECTOR: &str = "all";

const DEFAULT_INDICES: &[(&str, &str)] = &[
    ("^GSPC", "S&P 500"),
    ("^IXIC", "Nasdaq"),
    ("^DJI", "Dow Jones"),
];

const DEFAULT_SECTORS: &[(&str, &str)] = &[
    ("Technology", "XLK"),
    ("Finance", "XLF"),
    ("Energy", "XLE"),
    ("Healthcare", "XLV"),
    ("Consumer", "XLP"),
];

const DEFAULT_TOP_SYMBOLS: &[&str] = &[
    "AAPL", "MSFT", "GOOGL", "AMZN", "NVDA", "META", "TSLA", "BRK-B", "UNH", "JNJ", "XOM", "V",
    "JPM", "WMT", "PG",
];

const DEFAULT_NEWS_SYMBOLS: &[&str] = &["NVDA", "AAPL", "TSLA", "META", "AMZN", "MSFT", "GOOGL"];

const DEFAULT_SECTOR_STOCKS: &[(&str, &[&str])] = &[
    (
        "all",
        &["NVDA", "AAPL", "MSFT", "GOOGL", "META", "AMZN", "TSLA", "AMD", "JPM", "JNJ"],
    ),
    (
        "tech",
        &["NVDA", "AAPL", "MSFT", "GOOGL", "META", "AMD", "NFLX", "ADBE", "CRM", "INTC"],
    ),
    (
        "finance",
        &["JPM", "V", "MA", "BRK-B", "BAC", "GS", "MS", "AXP", "BLK", "C"],
    ),
    ("energy", &["XOM", "CVX", "COP", "SLB", "EOG"]),
    ("healthcare", &["JNJ", "UNH", "PFE", "ABBV", "MRK"]),
];

const DEFAULT_DIVIDEND_SYMBOLS: &[&str] = &["CVX", "KO", "JNJ", "PG", "XOM", "PFE", "MRK", "HD"];

const DEFAULT_DIRECTORY: &[(&str, &str, &str)] = &[
    ("AAPL", "Apple Inc.", "NASDAQ"),
    ("MSFT", "Microsoft Corporation", "NASDAQ"),
    ("GOOGL", "Alphabet Inc. Class A", "NASDAQ"),
    ("GOOG", "Alphabet Inc. Class C", "NASDAQ"),
    ("AMZN", "Amazon.com Inc.", "NASDAQ"),
    ("NVDA", "NVIDIA Corporation", "NASDAQ"),
    ("META", "Meta Platforms Inc.", "NASDAQ"),
    ("TSLA", "Tesla Inc.", "NASDAQ"),
    ("BRK-B", "Berkshire Hathaway Inc.", "NYSE"),
    ("UNH", "UnitedHealth Group Inc.", "NYSE"),
    ("JNJ", "Johnson & Johnson", "NYSE"),
    ("XOM", "Exxon Mobil Corporation", "NYSE"),
    ("V", "Visa Inc.", "NYSE"),
    ("JPM", "JPMorgan Chase & Co.", "NYSE"),
    ("WMT", "Walmart Inc.", "NYSE"),
    ("PG", "Procter & Gamble Co.", "NYSE"),
    ("MA", "Mastercard Inc.", "NYSE"),
    ("HD", "Home Depot Inc.", "NYSE"),
    ("CVX", "Chevron Corporation", "NYSE"),
    ("KO", "Coca-Cola Co.", "NYSE"),
    ("PFE", "Pfizer Inc.", "NYSE"),
    ("MRK", "Merck & Co.", "NYSE"),
    ("CSCO", "Cisco Systems Inc.", "NASDAQ"),
    ("NFLX", "Netflix Inc.", "NASDAQ"),
    ("ADBE", "Adobe Inc.", "NASDAQ"),
];

/// Tracked market index with its display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSpec {
    pub symbol: Symbol,
    pub name: String,
}

/// Sector represented by one ETF.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectorEtf {
    pub name: String,
    pub symbol: Symbol,
}

impl SectorEtf {
    pub fn new(name: impl Into<String>, symbol: Symbol) -> Self {
        Self {
            name: name.into(),
            symbol,
        }
    }
}

/// Named stock list for the sector-filtered quote view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectorStocks {
    pub sector: String,
    pub symbols: Vec<Symbol>,
}

/// Static reference tables shared by every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketUniverse {
    pub indices: Vec<IndexSpec>,
    pub sectors: Vec<SectorEtf>,
    /// Ordered; movers, ratings and earnings read prefixes of this list.
    pub top_symbols: Vec<Symbol>,
    pub news_symbols: Vec<Symbol>,
    pub dividend_symbols: Vec<Symbol>,
    /// Keyed by lowercase sector name; [`FALLBACK_SECTOR`] covers unknown names.
    pub sector_stocks: Vec<SectorStocks>,
    pub directory: Vec<TickerListing>,
}

fn symbols(raw: &[&str]) -> Vec<Symbol> {
    raw.iter().filter_map(|s| Symbol::parse(s).ok()).collect()
}

impl Default for MarketUniverse {
    fn default() -> Self {
        Self {
            indices: DEFAULT_INDICES
                .iter()
                .filter_map(|(symbol, name)| {
                    Some(IndexSpec {
                        symbol: Symbol::parse(symbol).ok()?,
                        name: (*name).to_owned(),
                    })
                })
                .collect(),
            sectors: DEFAULT_SECTORS
                .iter()
                .filter_map(|(name, symbol)| Some(SectorEtf::new(*name, Symbol::parse(symbol).ok()?)))
                .collect(),
            top_symbols: symbols(DEFAULT_TOP_SYMBOLS),
            news_symbols: symbols(DEFAULT_NEWS_SYMBOLS),
            dividend_symbols: symbols(DEFAULT_DIVIDEND_SYMBOLS),
            sector_stocks: DEFAULT_SECTOR_STOCKS
                .iter()
                .map(|(sector, raw)| SectorStocks {
                    sector: (*sector).to_owned(),
                    symbols: symbols(raw),
                })
                .collect(),
            directory: DEFAULT_DIRECTORY
                .iter()
                .filter_map(|(symbol, name, exchange)| {
                    Some(TickerListing::new(
                        Symbol::parse(symbol).ok()?,
                        *name,
                        *exchange,
                        "Equity",
                    ))
                })
                .collect(),
        }
    }
}

impl MarketUniverse {
    /// Load a replacement universe. Omitted tables fall back to the defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let universe: Self = serde_json::from_str(&content)?;
        universe.validate()?;
        Ok(universe)
    }

    /// The file named by `STOGRA_UNIVERSE_FILE`, or the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        match universe_file_from_env() {
            Some(path) => Self::from_json_file(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.top_symbols.is_empty() {
            return Err(ConfigError::Invalid(String::from(
                "top_symbols must list at least one symbol",
            )));
        }
        if self.indices.is_empty() {
            return Err(ConfigError::Invalid(String::from(
                "indices must list at least one index",
            )));
        }
        Ok(())
    }

    /// Stocks listed under `sector`, matched without regard to case.
    pub fn sector_symbols(&self, sector: &str) -> Option<&[Symbol]> {
        self.sector_stocks
            .iter()
            .find(|entry| entry.sector.eq_ignore_ascii_case(sector))
            .map(|entry| entry.symbols.as_slice())
    }

    /// First `n` tracked symbols.
    pub fn top(&self, n: usize) -> &[Symbol] {
        &self.top_symbols[..n.min(self.top_symbols.len())]
    }
}

/// Freshness window per cached view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtlPolicy {
    pub quotes: Duration,
    pub snapshot: Duration,
    pub sectors: Duration,
    pub news: Duration,
    pub ratings: Duration,
    pub earnings: Duration,
    pub dividends: Duration,
    pub week_extremes: Duration,
}

impl Default for TtlPolicy {
    fn default() -> Self {
        Self {
            quotes: Duration::from_secs(30),
            snapshot: Duration::from_secs(30),
            sectors: Duration::from_secs(60),
            news: Duration::from_secs(300),
            ratings: Duration::from_secs(300),
            earnings: Duration::from_secs(3600),
            dividends: Duration::from_secs(3600),
            week_extremes: Duration::from_secs(300),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub max_concurrency: usize,
    pub call_timeout: Duration,
    pub pacer_per_second: u32,
    pub movers_universe: usize,
    pub movers_count: usize,
    pub news_symbols: usize,
    pub news_per_symbol: usize,
    pub ratings_universe: usize,
    pub earnings_universe: usize,
    pub week_extremes_count: usize,
    pub session: SessionRule,
    pub ttl: TtlPolicy,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 8,
            call_timeout: Duration::from_millis(10_000),
            pacer_per_second: 10,
            movers_universe: 15,
            movers_count: 5,
            news_symbols: 3,
            news_per_symbol: 2,
            ratings_universe: 6,
            earnings_universe: 10,
            week_extremes_count: 5,
            session: SessionRule::nyse(),
            ttl: TtlPolicy::default(),
        }
    }
}

impl ServiceConfig {
    /// Defaults with environment overrides applied. Unparseable values are
    /// ignored.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_concurrency: env_usize(ENV_MAX_CONCURRENCY, defaults.max_concurrency),
            call_timeout: Duration::from_millis(env_u64(
                ENV_CALL_TIMEOUT_MS,
                defaults.call_timeout.as_millis() as u64,
            )),
            pacer_per_second: env_u32(ENV_PACER_RPS, defaults.pacer_per_second),
            ..defaults
        }
    }
}

pub fn universe_file_from_env() -> Option<PathBuf> {
    env::var(ENV_UNIVERSE_FILE)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

fn env_u32(name: &str, default: u32) -> u32 {
    env::var(name)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

fn env_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_universe_carries_curated_tables() {
        let universe = MarketUniverse::default();
        assert_eq!(universe.indices.len(), 3);
        assert_eq!(universe.sectors.len(), 5);
        assert_eq!(universe.top_symbols.len(), 15);
        assert_eq!(universe.news_symbols.len(), 7);
        assert_eq!(universe.dividend_symbols.len(), 8);
        assert_eq!(universe.directory.len(), 25);
        assert!(universe.validate().is_ok());
        assert_eq!(universe.top(2).len(), 2);
        assert_eq!(universe.top(100).len(), 15);
    }

    #[test]
    fn sector_lookup_ignores_case() {
        let universe = MarketUniverse::default();
        let energy = universe.sector_symbols("Energy").expect("energy is listed");
        let names: Vec<&str> = energy.iter().map(Symbol::as_str).collect();
        assert_eq!(names, vec!["XOM", "CVX", "COP", "SLB", "EOG"]);
        assert_eq!(universe.sector_symbols(FALLBACK_SECTOR).map(<[Symbol]>::len), Some(10));
        assert!(universe.sector_symbols("utilities").is_none());
    }

    #[test]
    fn partial_file_falls_back_to_default_tables() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"{{"top_symbols": ["AAPL", "MSFT"], "sectors": [{{"name": "Tech", "symbol": "XLK"}}]}}"#
        )
        .expect("write universe");

        let universe = MarketUniverse::from_json_file(file.path()).expect("valid universe");
        assert_eq!(universe.top_symbols.len(), 2);
        assert_eq!(universe.sectors, vec![SectorEtf::new("Tech", Symbol::parse("XLK").expect("valid"))]);
        assert_eq!(universe.indices.len(), 3);
    }

    #[test]
    fn empty_top_symbols_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{"top_symbols": []}}"#).expect("write universe");

        let error = MarketUniverse::from_json_file(file.path()).expect_err("invalid universe");
        assert!(matches!(error, ConfigError::Invalid(_)));
    }

    #[test]
    fn invalid_symbols_fail_to_parse() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{"top_symbols": ["not a ticker"]}}"#).expect("write universe");

        let error = MarketUniverse::from_json_file(file.path()).expect_err("bad symbol");
        assert!(matches!(error, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_reports_its_path() {
        let error = MarketUniverse::from_json_file(Path::new("/nonexistent/universe.json"))
            .expect_err("missing file");
        match error {
            ConfigError::Io { path, .. } => assert_eq!(path, PathBuf::from("/nonexistent/universe.json")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn ttl_table_matches_view_tiers() {
        let ttl = TtlPolicy::default();
        assert_eq!(ttl.quotes, Duration::from_secs(30));
        assert_eq!(ttl.sectors, Duration::from_secs(60));
        assert_eq!(ttl.earnings, Duration::from_secs(3600));
    }
}

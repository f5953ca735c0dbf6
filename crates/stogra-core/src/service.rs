//! Public read operations over the provider, cache and metrics engine.
//!
//! Every operation follows the same path: check the view cache, fan out
//! provider lookups through the [`FetchOrchestrator`] on a miss, derive the
//! response with [`crate::metrics`], then store it under the view's TTL.
//!
//! Aggregate views (news, ratings, earnings, dividends) are cached as one full
//! ranked list and sliced to the caller's limit on the way out, so different
//! limits share one cache entry.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::clock;
use crate::config::{MarketUniverse, ServiceConfig, FALLBACK_SECTOR};
use crate::domain::{
    AnalystRating, DividendStock, EarningsEvent, FeaturedNews, MarketSnapshot, MarketStatus,
    NewsItem, Quote, SectorPerformance, TickerListing, WeekExtremes,
};
use crate::error::{ServiceError, ValidationError};
use crate::metrics;
use crate::orchestrator::{FetchOrchestrator, Settled};
use crate::provider::{HistoryRange, MarketDataProvider, PriceHistory, ProviderError, TickerProfile};
use crate::{Symbol, TtlCache, UtcDateTime};

pub const MIN_LIMIT: usize = 1;
pub const MAX_LIMIT: usize = 20;
pub const MIN_QUERY_LEN: usize = 1;
pub const MAX_QUERY_LEN: usize = 50;

const SNAPSHOT_KEY: &str = "market:snapshot";
const SECTORS_KEY: &str = "market:sectors";
const WEEK_EXTREMES_KEY: &str = "market:week-extremes";
const NEWS_KEY: &str = "news:feed";
const RATINGS_KEY: &str = "analyst:ratings";
const EARNINGS_KEY: &str = "earnings:calendar";
const DIVIDENDS_KEY: &str = "dividends:payers";

fn quote_key(symbol: &Symbol) -> String {
    format!("quote:{symbol}")
}

/// Values stored in the shared view cache.
#[derive(Debug, Clone)]
pub enum CachedView {
    Quote(Quote),
    Snapshot(MarketSnapshot),
    Sectors(Vec<SectorPerformance>),
    News(Vec<NewsItem>),
    Ratings(Vec<AnalystRating>),
    Earnings(Vec<EarningsEvent>),
    Dividends(Vec<DividendStock>),
    WeekExtremes(WeekExtremes),
}

pub type ViewCache = TtlCache<CachedView>;

#[derive(Clone)]
pub struct MarketDataService {
    provider: Arc<dyn MarketDataProvider>,
    orchestrator: FetchOrchestrator,
    universe: Arc<MarketUniverse>,
    config: ServiceConfig,
    cache: ViewCache,
}

impl MarketDataService {
    pub fn new(
        provider: Arc<dyn MarketDataProvider>,
        universe: MarketUniverse,
        config: ServiceConfig,
        cache: ViewCache,
    ) -> Self {
        Self {
            provider,
            orchestrator: FetchOrchestrator::new(config.max_concurrency, config.call_timeout),
            universe: Arc::new(universe),
            config,
            cache,
        }
    }

    pub fn universe(&self) -> &MarketUniverse {
        &self.universe
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn cache(&self) -> &ViewCache {
        &self.cache
    }

    /// Case-insensitive substring search over the curated directory.
    pub fn search_tickers(&self, query: &str, limit: usize) -> Result<Vec<TickerListing>, ServiceError> {
        let query = query.trim();
        let len = query.chars().count();
        if !(MIN_QUERY_LEN..=MAX_QUERY_LEN).contains(&len) {
            return Err(ValidationError::QueryLength {
                len,
                min: MIN_QUERY_LEN,
                max: MAX_QUERY_LEN,
            }
            .into());
        }
        let limit = validate_limit(limit)?;

        let needle = query.to_lowercase();
        Ok(self
            .universe
            .directory
            .iter()
            .filter(|listing| listing.matches(&needle))
            .take(limit)
            .cloned()
            .collect())
    }

    /// Quotes for a comma-delimited symbol list, in request order.
    ///
    /// Malformed tokens and symbols the provider cannot answer are left out;
    /// only a list with no valid symbol is rejected.
    pub async fn get_stocks_batch(&self, symbols: &str) -> Result<Vec<Quote>, ServiceError> {
        let symbols = Symbol::parse_list(symbols)?;
        Ok(self.quotes(&symbols).await)
    }

    pub async fn get_stock_detail(&self, symbol: &str) -> Result<Quote, ServiceError> {
        let symbol = Symbol::parse(symbol)?;
        let key = quote_key(&symbol);
        if let Some(quote) = self.cached(&key, |view| match view {
            CachedView::Quote(quote) => Some(quote),
            _ => None,
        }).await {
            return Ok(quote);
        }

        let provider = Arc::clone(&self.provider);
        let settled = self
            .orchestrator
            .settle_all("stock_detail", [symbol.clone()], move |s: &Symbol| {
                fetch_quote(Arc::clone(&provider), s.clone())
            })
            .await;

        match settled.into_iter().next().map(|Settled { outcome, .. }| outcome) {
            Some(Ok(quote)) => {
                self.store(key, CachedView::Quote(quote.clone()), self.config.ttl.quotes).await;
                Ok(quote)
            }
            Some(Err(failure)) => {
                warn!(%symbol, code = failure.code(), error = %failure, "stock detail lookup failed");
                Err(ServiceError::NotFound {
                    symbol: symbol.to_string(),
                })
            }
            None => Err(ServiceError::NotFound {
                symbol: symbol.to_string(),
            }),
        }
    }

    /// Quotes for the stocks listed under `sector` (case-insensitive).
    ///
    /// Unknown sectors read the fallback list.
    pub async fn get_stocks_by_sector(&self, sector: &str) -> Vec<Quote> {
        let sector = sector.trim();
        let symbols = match self.universe.sector_symbols(sector) {
            Some(symbols) => symbols,
            None => {
                info!(sector, fallback = FALLBACK_SECTOR, "unknown sector; using fallback list");
                self.universe.sector_symbols(FALLBACK_SECTOR).unwrap_or_default()
            }
        };
        self.quotes(symbols).await
    }

    pub async fn get_market_snapshot(&self) -> MarketSnapshot {
        if let Some(snapshot) = self.cached(SNAPSHOT_KEY, |view| match view {
            CachedView::Snapshot(snapshot) => Some(snapshot),
            _ => None,
        }).await {
            return snapshot;
        }

        let index_symbols: Vec<Symbol> = self.universe.indices.iter().map(|i| i.symbol.clone()).collect();
        let movers_universe = self.universe.top(self.config.movers_universe);
        let (histories, quotes) = tokio::join!(
            self.histories("indices", index_symbols, HistoryRange::TwoDays),
            self.quotes(movers_universe),
        );

        let indices = self
            .universe
            .indices
            .iter()
            .map(|index| {
                let history = histories.get(&index.symbol);
                if history.is_none() {
                    info!(symbol = %index.symbol, "index history missing; using zero sentinel");
                }
                metrics::index_snapshot(&index.symbol, &index.name, history)
            })
            .collect();

        let snapshot = MarketSnapshot {
            indices,
            top_movers: metrics::rank_movers(&quotes, self.config.movers_count),
        };
        self.store(
            SNAPSHOT_KEY,
            CachedView::Snapshot(snapshot.clone()),
            self.config.ttl.snapshot,
        )
        .await;
        snapshot
    }

    /// Session state at the current instant. Never cached.
    pub fn get_market_status(&self) -> MarketStatus {
        self.market_status_at(UtcDateTime::now())
    }

    pub fn market_status_at(&self, now: UtcDateTime) -> MarketStatus {
        clock::market_status(now, &self.config.session)
    }

    pub async fn get_sector_performance(&self) -> Vec<SectorPerformance> {
        if let Some(sectors) = self.cached(SECTORS_KEY, |view| match view {
            CachedView::Sectors(sectors) => Some(sectors),
            _ => None,
        }).await {
            return sectors;
        }

        let etfs: Vec<Symbol> = self.universe.sectors.iter().map(|s| s.symbol.clone()).collect();
        let histories = self.histories("sectors", etfs, HistoryRange::TwoDays).await;
        for sector in &self.universe.sectors {
            if !histories.contains_key(&sector.symbol) {
                info!(sector = %sector.name, etf = %sector.symbol, "sector history missing; reporting zero move");
            }
        }

        let sectors = metrics::sector_performance(&self.universe.sectors, |symbol| histories.get(symbol));
        self.store(SECTORS_KEY, CachedView::Sectors(sectors.clone()), self.config.ttl.sectors)
            .await;
        sectors
    }

    /// Headlines for the leading news symbols, newest first.
    pub async fn get_news(&self, limit: usize) -> Result<Vec<NewsItem>, ServiceError> {
        let limit = validate_limit(limit)?;
        let mut news = self.news_feed().await;
        news.truncate(limit);
        Ok(news)
    }

    /// Newest headline of the news feed, or `None` when the feed is empty.
    pub async fn get_featured_news(&self) -> Option<FeaturedNews> {
        metrics::featured_news(&self.news_feed().await)
    }

    /// Consensus ratings over the leading tracked symbols, best first.
    pub async fn get_analyst_ratings(&self, limit: usize) -> Result<Vec<AnalystRating>, ServiceError> {
        let limit = validate_limit(limit)?;
        if let Some(mut ratings) = self.cached(RATINGS_KEY, |view| match view {
            CachedView::Ratings(ratings) => Some(ratings),
            _ => None,
        }).await {
            ratings.truncate(limit);
            return Ok(ratings);
        }

        let symbols = self.universe.top(self.config.ratings_universe).to_vec();
        let ratings: Vec<AnalystRating> = self
            .profiles("ratings", symbols)
            .await
            .iter()
            .map(|(symbol, profile)| metrics::rating_from_profile(symbol, profile))
            .collect();

        let ranked = metrics::rank_ratings(ratings, usize::MAX);
        self.store(RATINGS_KEY, CachedView::Ratings(ranked.clone()), self.config.ttl.ratings)
            .await;
        Ok(ranked.into_iter().take(limit).collect())
    }

    /// Upcoming earnings releases, soonest first.
    pub async fn get_earnings(&self, limit: usize) -> Result<Vec<EarningsEvent>, ServiceError> {
        self.get_earnings_at(limit, UtcDateTime::now()).await
    }

    /// Like [`get_earnings`](Self::get_earnings) with an explicit notion of now.
    ///
    /// Cached calendars are filtered again on read so an event never outlives
    /// its date by up to a TTL.
    pub async fn get_earnings_at(
        &self,
        limit: usize,
        now: UtcDateTime,
    ) -> Result<Vec<EarningsEvent>, ServiceError> {
        let limit = validate_limit(limit)?;
        if let Some(events) = self.cached(EARNINGS_KEY, |view| match view {
            CachedView::Earnings(events) => Some(events),
            _ => None,
        }).await {
            return Ok(metrics::upcoming_earnings(events, now, limit));
        }

        let symbols = self.universe.top(self.config.earnings_universe).to_vec();
        let provider = Arc::clone(&self.provider);
        let events: Vec<EarningsEvent> = self
            .orchestrator
            .gather("earnings", symbols, move |symbol: &Symbol| {
                fetch_next_earnings(Arc::clone(&provider), symbol.clone(), now)
            })
            .await
            .into_iter()
            .flatten()
            .collect();

        let calendar = metrics::upcoming_earnings(events, now, usize::MAX);
        self.store(
            EARNINGS_KEY,
            CachedView::Earnings(calendar.clone()),
            self.config.ttl.earnings,
        )
        .await;
        Ok(calendar.into_iter().take(limit).collect())
    }

    /// Dividend payers by trailing yield, highest first.
    pub async fn get_dividend_stocks(&self, limit: usize) -> Result<Vec<DividendStock>, ServiceError> {
        let limit = validate_limit(limit)?;
        if let Some(mut stocks) = self.cached(DIVIDENDS_KEY, |view| match view {
            CachedView::Dividends(stocks) => Some(stocks),
            _ => None,
        }).await {
            stocks.truncate(limit);
            return Ok(stocks);
        }

        let symbols = self.universe.dividend_symbols.clone();
        let payers: Vec<DividendStock> = self
            .profiles("dividends", symbols)
            .await
            .iter()
            .filter_map(|(symbol, profile)| metrics::dividend_stock(symbol, profile))
            .collect();

        let ranked = metrics::rank_dividends(payers, usize::MAX);
        self.store(
            DIVIDENDS_KEY,
            CachedView::Dividends(ranked.clone()),
            self.config.ttl.dividends,
        )
        .await;
        Ok(ranked.into_iter().take(limit).collect())
    }

    /// Names trading closest to their 52-week high and low.
    pub async fn get_week_extremes(&self) -> WeekExtremes {
        if let Some(extremes) = self.cached(WEEK_EXTREMES_KEY, |view| match view {
            CachedView::WeekExtremes(extremes) => Some(extremes),
            _ => None,
        }).await {
            return extremes;
        }

        let symbols = self.universe.top(self.config.movers_universe).to_vec();
        let ranges: Vec<_> = self
            .profiles("week_extremes", symbols)
            .await
            .iter()
            .filter_map(|(symbol, profile)| metrics::week_range(symbol, profile))
            .collect();

        let extremes = metrics::split_week_extremes(&ranges, self.config.week_extremes_count);
        self.store(
            WEEK_EXTREMES_KEY,
            CachedView::WeekExtremes(extremes.clone()),
            self.config.ttl.week_extremes,
        )
        .await;
        extremes
    }

    async fn cached<T>(&self, key: &str, select: impl FnOnce(CachedView) -> Option<T>) -> Option<T> {
        match self.cache.get(key).await.and_then(select) {
            Some(value) => {
                debug!(key, "cache hit");
                Some(value)
            }
            None => {
                debug!(key, "cache miss");
                None
            }
        }
    }

    async fn store(&self, key: impl Into<String>, view: CachedView, ttl: Duration) {
        self.cache.set(key, view, ttl).await;
    }

    /// Full ranked feed shared by the news views.
    async fn news_feed(&self) -> Vec<NewsItem> {
        if let Some(news) = self.cached(NEWS_KEY, |view| match view {
            CachedView::News(news) => Some(news),
            _ => None,
        }).await {
            return news;
        }

        let count = self.config.news_symbols.min(self.universe.news_symbols.len());
        let symbols = self.universe.news_symbols[..count].to_vec();
        let per_symbol = self.config.news_per_symbol;
        let provider = Arc::clone(&self.provider);
        let batches = self
            .orchestrator
            .gather("news", symbols, move |symbol: &Symbol| {
                let provider = Arc::clone(&provider);
                let symbol = symbol.clone();
                async move {
                    let raw = provider.news(&symbol).await?;
                    Ok(metrics::news_for_symbol(&symbol, raw, per_symbol))
                }
            })
            .await;

        let feed = metrics::latest_news(batches.into_iter().flatten().collect(), usize::MAX);
        self.store(NEWS_KEY, CachedView::News(feed.clone()), self.config.ttl.news).await;
        feed
    }

    /// Quotes in `symbols` order, served from cache where fresh.
    async fn quotes(&self, symbols: &[Symbol]) -> Vec<Quote> {
        let mut found: HashMap<Symbol, Quote> = HashMap::with_capacity(symbols.len());
        let mut misses = Vec::new();
        for symbol in symbols {
            let hit = self
                .cached(&quote_key(symbol), |view| match view {
                    CachedView::Quote(quote) => Some(quote),
                    _ => None,
                })
                .await;
            match hit {
                Some(quote) => {
                    found.insert(symbol.clone(), quote);
                }
                None => misses.push(symbol.clone()),
            }
        }

        if !misses.is_empty() {
            let provider = Arc::clone(&self.provider);
            let fetched = self
                .orchestrator
                .gather("quotes", misses, move |symbol: &Symbol| {
                    fetch_quote(Arc::clone(&provider), symbol.clone())
                })
                .await;

            for quote in fetched {
                self.store(
                    quote_key(&quote.symbol),
                    CachedView::Quote(quote.clone()),
                    self.config.ttl.quotes,
                )
                .await;
                found.insert(quote.symbol.clone(), quote);
            }
        }

        symbols.iter().filter_map(|symbol| found.remove(symbol)).collect()
    }

    async fn histories(
        &self,
        label: &'static str,
        symbols: Vec<Symbol>,
        range: HistoryRange,
    ) -> HashMap<Symbol, PriceHistory> {
        let provider = Arc::clone(&self.provider);
        self.orchestrator
            .gather(label, symbols, move |symbol: &Symbol| {
                let provider = Arc::clone(&provider);
                let symbol = symbol.clone();
                async move { provider.history(&symbol, range).await }
            })
            .await
            .into_iter()
            .map(|history| (history.symbol.clone(), history))
            .collect()
    }

    /// Profiles in `symbols` order; failed lookups are left out.
    async fn profiles(&self, label: &'static str, symbols: Vec<Symbol>) -> Vec<(Symbol, TickerProfile)> {
        let provider = Arc::clone(&self.provider);
        let mut profiles = self
            .orchestrator
            .gather(label, symbols.clone(), move |symbol: &Symbol| {
                let provider = Arc::clone(&provider);
                let symbol = symbol.clone();
                async move {
                    let profile = provider.profile(&symbol).await?;
                    Ok((symbol, profile))
                }
            })
            .await;
        profiles.sort_by_key(|(symbol, _)| symbols.iter().position(|s| s == symbol));
        profiles
    }
}

fn validate_limit(limit: usize) -> Result<usize, ValidationError> {
    if (MIN_LIMIT..=MAX_LIMIT).contains(&limit) {
        Ok(limit)
    } else {
        Err(ValidationError::LimitOutOfRange {
            value: limit,
            min: MIN_LIMIT,
            max: MAX_LIMIT,
        })
    }
}

/// History plus profile for one symbol.
///
/// A missing profile degrades to history-only fields; missing history fails
/// the lookup.
async fn fetch_quote(provider: Arc<dyn MarketDataProvider>, symbol: Symbol) -> Result<Quote, ProviderError> {
    let (history, profile) = tokio::join!(
        provider.history(&symbol, HistoryRange::FiveDays),
        provider.profile(&symbol),
    );
    let history = history?;
    let profile = profile.unwrap_or_else(|error| {
        debug!(%symbol, code = error.code(), "profile unavailable, quoting from history");
        TickerProfile::default()
    });

    metrics::build_quote(&history, &profile)
        .ok_or_else(|| ProviderError::not_found(format!("no price history for {symbol}")))
}

async fn fetch_next_earnings(
    provider: Arc<dyn MarketDataProvider>,
    symbol: Symbol,
    now: UtcDateTime,
) -> Result<Option<EarningsEvent>, ProviderError> {
    let estimates = provider.earnings_dates(&symbol).await?;
    if !estimates.iter().any(|estimate| estimate.date > now) {
        return Ok(None);
    }

    let name = match provider.profile(&symbol).await {
        Ok(profile) => profile.display_name(&symbol),
        Err(_) => symbol.to_string(),
    };
    Ok(metrics::next_earnings(&symbol, &name, &estimates, now))
}

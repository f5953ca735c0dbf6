use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::config::MarketUniverse;
use crate::provider::{
    EarningsEstimate, HistoryRange, MarketDataProvider, PriceHistory, ProviderError,
    ProviderFuture, RawNews, TickerProfile,
};
use crate::{Symbol, UtcDateTime};

const DAY_SECONDS: i64 = 86_400;

/// Deterministic in-memory provider.
///
/// Symbols without configured history answer `NotFound`. Failures and delays
/// can be injected per symbol and apply to every lookup for that symbol.
#[derive(Debug, Default)]
pub struct FixtureProvider {
    histories: HashMap<Symbol, Vec<f64>>,
    profiles: HashMap<Symbol, TickerProfile>,
    news: HashMap<Symbol, Vec<RawNews>>,
    earnings: HashMap<Symbol, Vec<EarningsEstimate>>,
    failures: HashMap<Symbol, ProviderError>,
    delays: HashMap<Symbol, Duration>,
    calls: AtomicUsize,
    in_flight: Arc<AtomicUsize>,
    peak_in_flight: Arc<AtomicUsize>,
}

struct InFlight {
    current: Arc<AtomicUsize>,
}

impl InFlight {
    fn enter(current: &Arc<AtomicUsize>, peak: &AtomicUsize) -> Self {
        let now = current.fetch_add(1, Ordering::SeqCst) + 1;
        peak.fetch_max(now, Ordering::SeqCst);
        Self {
            current: Arc::clone(current),
        }
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.current.fetch_sub(1, Ordering::SeqCst);
    }
}

impl FixtureProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_history(mut self, symbol: Symbol, closes: Vec<f64>) -> Self {
        self.histories.insert(symbol, closes);
        self
    }

    pub fn with_profile(mut self, symbol: Symbol, profile: TickerProfile) -> Self {
        self.profiles.insert(symbol, profile);
        self
    }

    pub fn with_news(mut self, symbol: Symbol, items: Vec<RawNews>) -> Self {
        self.news.insert(symbol, items);
        self
    }

    pub fn with_earnings(mut self, symbol: Symbol, dates: Vec<EarningsEstimate>) -> Self {
        self.earnings.insert(symbol, dates);
        self
    }

    pub fn with_failure(mut self, symbol: Symbol, error: ProviderError) -> Self {
        self.failures.insert(symbol, error);
        self
    }

    pub fn with_delay(mut self, symbol: Symbol, delay: Duration) -> Self {
        self.delays.insert(symbol, delay);
        self
    }

    /// Total lookups served, failed ones included.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Highest number of lookups observed running at once.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    /// Plausible data for every symbol in the default universe, anchored at
    /// the current time so earnings dates stay in the future.
    pub fn demo() -> Self {
        Self::demo_at(&MarketUniverse::default(), UtcDateTime::now())
    }

    pub fn demo_at(universe: &MarketUniverse, now: UtcDateTime) -> Self {
        let mut symbols: Vec<(Symbol, String)> = Vec::new();
        symbols.extend(universe.indices.iter().map(|i| (i.symbol.clone(), i.name.clone())));
        symbols.extend(
            universe
                .sectors
                .iter()
                .map(|s| (s.symbol.clone(), format!("{} Sector ETF", s.name))),
        );
        symbols.extend(universe.directory.iter().map(|l| (l.symbol.clone(), l.name.clone())));
        for symbol in universe
            .top_symbols
            .iter()
            .chain(&universe.news_symbols)
            .chain(&universe.dividend_symbols)
            .chain(universe.sector_stocks.iter().flat_map(|entry| &entry.symbols))
        {
            symbols.push((symbol.clone(), symbol.to_string()));
        }

        let mut provider = Self::new();
        for (symbol, name) in symbols {
            if provider.histories.contains_key(&symbol) {
                continue;
            }
            let seed = symbol_seed(&symbol);
            let closes = demo_closes(seed);
            let profile = demo_profile(&name, seed, &closes, universe.dividend_symbols.contains(&symbol));
            provider.histories.insert(symbol.clone(), closes);
            provider.profiles.insert(symbol.clone(), profile);

            if !symbol.is_index() {
                let days_out = 3 + (seed % 60) as i64;
                if let Ok(date) = UtcDateTime::from_unix_timestamp(now.unix_timestamp() + days_out * DAY_SECONDS) {
                    provider.earnings.insert(
                        symbol.clone(),
                        vec![EarningsEstimate {
                            date,
                            eps_estimate: Some(0.5 + (seed % 300) as f64 / 100.0),
                        }],
                    );
                }
            }
        }

        for (rank, symbol) in universe.news_symbols.iter().enumerate() {
            let items = (0..2_i64)
                .map(|n| RawNews {
                    title: format!("{symbol} update #{}", n + 1),
                    publisher: String::from("Demo Wire"),
                    link: format!("https://news.example/{}/{}", symbol.as_str().to_ascii_lowercase(), n + 1),
                    published_at: UtcDateTime::from_unix_timestamp(
                        now.unix_timestamp() - (rank as i64 * 2 + n + 1) * 1_800,
                    )
                    .ok(),
                })
                .collect();
            provider.news.insert(symbol.clone(), items);
        }

        provider
    }

    async fn lookup<T>(&self, symbol: &Symbol, answer: impl FnOnce(&Self) -> Result<T, ProviderError>) -> Result<T, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let _in_flight = InFlight::enter(&self.in_flight, &self.peak_in_flight);

        if let Some(delay) = self.delays.get(symbol) {
            tokio::time::sleep(*delay).await;
        }
        if let Some(error) = self.failures.get(symbol) {
            return Err(error.clone());
        }
        answer(self)
    }
}

impl MarketDataProvider for FixtureProvider {
    fn name(&self) -> &'static str {
        "fixture"
    }

    fn history<'a>(&'a self, symbol: &'a Symbol, range: HistoryRange) -> ProviderFuture<'a, PriceHistory> {
        Box::pin(self.lookup(symbol, move |this| {
            let closes = this
                .histories
                .get(symbol)
                .filter(|closes| !closes.is_empty())
                .ok_or_else(|| ProviderError::not_found(format!("no price history for {symbol}")))?;
            let days = match range {
                HistoryRange::TwoDays => 2,
                HistoryRange::FiveDays => 5,
            };
            let start = closes.len().saturating_sub(days);
            Ok(PriceHistory::new(symbol.clone(), closes[start..].to_vec()))
        }))
    }

    fn profile<'a>(&'a self, symbol: &'a Symbol) -> ProviderFuture<'a, TickerProfile> {
        Box::pin(self.lookup(symbol, move |this| {
            this.profiles
                .get(symbol)
                .cloned()
                .ok_or_else(|| ProviderError::not_found(format!("no profile for {symbol}")))
        }))
    }

    fn news<'a>(&'a self, symbol: &'a Symbol) -> ProviderFuture<'a, Vec<RawNews>> {
        Box::pin(self.lookup(symbol, move |this| Ok(this.news.get(symbol).cloned().unwrap_or_default())))
    }

    fn earnings_dates<'a>(&'a self, symbol: &'a Symbol) -> ProviderFuture<'a, Vec<EarningsEstimate>> {
        Box::pin(self.lookup(symbol, move |this| {
            Ok(this.earnings.get(symbol).cloned().unwrap_or_default())
        }))
    }
}

fn symbol_seed(symbol: &Symbol) -> u64 {
    symbol
        .as_str()
        .bytes()
        .fold(0_u64, |acc, byte| acc.wrapping_mul(33).wrapping_add(u64::from(byte)))
}

fn demo_closes(seed: u64) -> Vec<f64> {
    let base = 40.0 + (seed % 4_000) as f64 / 10.0;
    (0..7_u64)
        .map(|day| {
            let swing = ((seed >> day) % 7) as f64 - 3.0;
            base * (1.0 + swing / 100.0)
        })
        .collect()
}

fn demo_profile(name: &str, seed: u64, closes: &[f64], pays_dividend: bool) -> TickerProfile {
    let price = closes.last().copied().unwrap_or_default();
    let recommendation = ["strong_buy", "buy", "hold", "sell"][(seed % 4) as usize];
    let yield_fraction = pays_dividend.then(|| 0.015 + (seed % 40) as f64 / 1_000.0);
    let annual = yield_fraction.map(|y| y * price);

    TickerProfile {
        long_name: Some(name.to_owned()),
        short_name: None,
        currency: Some(String::from("USD")),
        market_cap: Some(50_000_000_000.0 + (seed % 900) as f64 * 1_000_000_000.0),
        previous_close: closes.len().checked_sub(2).map(|i| closes[i]),
        current_price: Some(price),
        recommendation_key: Some(recommendation.to_owned()),
        target_median_price: Some(price * (1.0 + (seed % 25) as f64 / 100.0)),
        target_mean_price: None,
        analyst_count: Some(5 + (seed % 35) as u32),
        dividend_yield: yield_fraction,
        dividend_rate: annual,
        last_dividend_value: annual.map(|a| a / 4.0),
        ex_dividend_date: None,
        fifty_two_week_high: Some(price * (1.02 + (seed % 30) as f64 / 100.0)),
        fifty_two_week_low: Some(price * (0.98 - (seed % 30) as f64 / 100.0)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderErrorKind;

    fn symbol(raw: &str) -> Symbol {
        Symbol::parse(raw).expect("valid symbol")
    }

    #[tokio::test]
    async fn history_is_trimmed_to_the_requested_range() {
        let provider = FixtureProvider::new().with_history(symbol("AAPL"), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);

        let two = provider
            .history(&symbol("AAPL"), HistoryRange::TwoDays)
            .await
            .expect("history");
        assert_eq!(two.closes, vec![5.0, 6.0]);

        let five = provider
            .history(&symbol("AAPL"), HistoryRange::FiveDays)
            .await
            .expect("history");
        assert_eq!(five.closes.len(), 5);
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn unknown_symbols_and_injected_failures_error() {
        let provider = FixtureProvider::new()
            .with_history(symbol("MSFT"), vec![1.0])
            .with_failure(symbol("MSFT"), ProviderError::unavailable("maintenance"));

        let missing = provider
            .history(&symbol("BADSYMBOL"), HistoryRange::FiveDays)
            .await
            .expect_err("no data");
        assert_eq!(missing.kind(), ProviderErrorKind::NotFound);

        let failed = provider
            .history(&symbol("MSFT"), HistoryRange::FiveDays)
            .await
            .expect_err("injected");
        assert_eq!(failed.kind(), ProviderErrorKind::Unavailable);

        let news = provider.news(&symbol("BADSYMBOL")).await.expect("empty news");
        assert!(news.is_empty());
    }

    #[tokio::test]
    async fn demo_covers_the_default_universe() {
        let universe = MarketUniverse::default();
        let now = UtcDateTime::parse("2026-03-02T15:00:00Z").expect("valid");
        let provider = FixtureProvider::demo_at(&universe, now);

        for symbol in universe.top_symbols.iter().chain(universe.sectors.iter().map(|s| &s.symbol)) {
            let history = provider
                .history(symbol, HistoryRange::FiveDays)
                .await
                .expect("demo history");
            assert_eq!(history.closes.len(), 5);
        }

        let profile = provider.profile(&symbol("KO")).await.expect("demo profile");
        assert!(profile.dividend_yield.is_some());

        let earnings = provider.earnings_dates(&symbol("AAPL")).await.expect("demo earnings");
        assert!(earnings.iter().all(|e| e.date > now));
    }
}

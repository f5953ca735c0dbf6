use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::debug;

use crate::cache::TtlCache;
use crate::http_client::{HttpClient, HttpRequest};
use crate::pacing::RequestPacer;
use crate::provider::{
    EarningsEstimate, HistoryRange, MarketDataProvider, PriceHistory, ProviderError,
    ProviderFuture, RawNews, TickerProfile,
};
use crate::{Symbol, UtcDateTime};

const REFERER: &str = "https://finance.yahoo.com/";
const COOKIE_ENDPOINT: &str = "https://fc.yahoo.com";
const CRUMB_ENDPOINTS: [&str; 2] = [
    "https://query1.finance.yahoo.com/v1/test/getcrumb",
    "https://query2.finance.yahoo.com/v1/test/getcrumb",
];
const CHART_ENDPOINT: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const SUMMARY_ENDPOINT: &str = "https://query2.finance.yahoo.com/v10/finance/quoteSummary";
const SEARCH_ENDPOINT: &str = "https://query2.finance.yahoo.com/v1/finance/search";

const PROFILE_MODULES: &str = "price,summaryDetail,financialData,defaultKeyStatistics";
const NEWS_COUNT: usize = 8;

const CRUMB_KEY: &str = "crumb";
const CRUMB_TTL: Duration = Duration::from_secs(3600);

/// Yahoo Finance provider over the unofficial chart, quoteSummary and search
/// endpoints.
///
/// Yahoo requires a session cookie (kept by the transport's cookie jar) plus a
/// crumb token passed as a query parameter. The crumb is cached for an hour
/// and dropped whenever Yahoo answers 401 or 403. Failed calls are never
/// retried here.
#[derive(Clone)]
pub struct YahooProvider {
    http_client: Arc<dyn HttpClient>,
    pacer: RequestPacer,
    crumb: TtlCache<String>,
    refresh: Arc<Mutex<()>>,
    request_timeout_ms: u64,
}

impl YahooProvider {
    pub fn new(http_client: Arc<dyn HttpClient>, pacer: RequestPacer) -> Self {
        Self {
            http_client,
            pacer,
            crumb: TtlCache::new(),
            refresh: Arc::new(Mutex::new(())),
            request_timeout_ms: 10_000,
        }
    }

    pub fn with_request_timeout_ms(mut self, request_timeout_ms: u64) -> Self {
        self.request_timeout_ms = request_timeout_ms;
        self
    }

    fn request(&self, url: impl Into<String>) -> HttpRequest {
        HttpRequest::get(url)
            .with_header("referer", REFERER)
            .with_timeout_ms(self.request_timeout_ms)
    }

    async fn crumb(&self) -> Result<String, ProviderError> {
        if let Some(crumb) = self.crumb.get(CRUMB_KEY).await {
            return Ok(crumb);
        }

        // One refresh at a time; late arrivals reuse the winner's crumb.
        let _guard = self.refresh.lock().await;
        if let Some(crumb) = self.crumb.get(CRUMB_KEY).await {
            return Ok(crumb);
        }

        let crumb = self.fetch_crumb().await?;
        self.crumb.set(CRUMB_KEY, crumb.clone(), CRUMB_TTL).await;
        debug!(provider = "yahoo", "refreshed session crumb");
        Ok(crumb)
    }

    async fn fetch_crumb(&self) -> Result<String, ProviderError> {
        // The cookie endpoint usually answers 404 while still setting the
        // session cookie, so only transport failures matter here.
        self.pacer.ready().await;
        self.http_client
            .execute(self.request(COOKIE_ENDPOINT))
            .await
            .map_err(|e| ProviderError::unavailable(format!("failed to fetch Yahoo cookie: {}", e.message())))?;

        for endpoint in CRUMB_ENDPOINTS {
            self.pacer.ready().await;
            let Ok(response) = self.http_client.execute(self.request(endpoint)).await else {
                continue;
            };
            if response.status == 429 {
                return Err(ProviderError::rate_limited("Yahoo rate limited the crumb request"));
            }
            if !response.is_success() {
                continue;
            }

            let body = response.body.trim();
            if body.contains("<html") || body.contains("<!DOCTYPE") {
                continue;
            }
            if body.to_ascii_lowercase().contains("too many requests") {
                return Err(ProviderError::rate_limited("Yahoo rate limited the crumb request"));
            }
            if !body.is_empty() && body.len() < 100 && !body.contains(' ') {
                return Ok(body.to_owned());
            }
        }

        Err(ProviderError::unavailable(
            "failed to fetch Yahoo crumb from all endpoints",
        ))
    }

    async fn invalidate_crumb(&self) {
        self.crumb.clear().await;
    }

    /// Paced, crumb-authenticated GET decoded as JSON.
    async fn get_json<T: DeserializeOwned>(&self, symbol: &Symbol, url: String) -> Result<T, ProviderError> {
        let crumb = self.crumb().await?;
        let separator = if url.contains('?') { '&' } else { '?' };
        let url = format!("{url}{separator}crumb={}", urlencoding::encode(&crumb));

        self.pacer.ready().await;
        let response = self
            .http_client
            .execute(self.request(url))
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::timeout(format!("yahoo request for {symbol} timed out: {}", e.message()))
                } else {
                    ProviderError::unavailable(format!("yahoo transport error for {symbol}: {}", e.message()))
                }
            })?;

        match response.status {
            200..=299 => {}
            401 | 403 => {
                self.invalidate_crumb().await;
                return Err(ProviderError::unavailable(format!(
                    "yahoo rejected the session for {symbol} (status {})",
                    response.status
                )));
            }
            404 => return Err(ProviderError::not_found(format!("yahoo has no data for {symbol}"))),
            429 => return Err(ProviderError::rate_limited(format!("yahoo rate limited {symbol}"))),
            status => {
                return Err(ProviderError::unavailable(format!(
                    "yahoo returned status {status} for {symbol}"
                )))
            }
        }

        serde_json::from_str(&response.body)
            .map_err(|e| ProviderError::malformed(format!("failed to parse yahoo response for {symbol}: {e}")))
    }

    async fn fetch_history(&self, symbol: &Symbol, range: HistoryRange) -> Result<PriceHistory, ProviderError> {
        let url = format!(
            "{CHART_ENDPOINT}/{}?range={}&interval=1d",
            urlencoding::encode(symbol.as_str()),
            range.as_str()
        );
        let response: ChartResponse = self.get_json(symbol, url).await?;

        if let Some(error) = response.chart.error {
            return Err(error.into_provider_error(symbol));
        }

        let closes: Vec<f64> = response
            .chart
            .result
            .unwrap_or_default()
            .into_iter()
            .next()
            .and_then(|result| result.indicators.quote.into_iter().next())
            .map(|quote| quote.close.into_iter().flatten().filter(|c| c.is_finite()).collect())
            .unwrap_or_default();

        if closes.is_empty() {
            return Err(ProviderError::not_found(format!("no price history for {symbol}")));
        }
        Ok(PriceHistory::new(symbol.clone(), closes))
    }

    async fn fetch_summary(&self, symbol: &Symbol, modules: &str) -> Result<SummaryResult, ProviderError> {
        let url = format!(
            "{SUMMARY_ENDPOINT}/{}?modules={modules}",
            urlencoding::encode(symbol.as_str())
        );
        let response: SummaryResponse = self.get_json(symbol, url).await?;

        if let Some(error) = response.quote_summary.error {
            return Err(error.into_provider_error(symbol));
        }

        response
            .quote_summary
            .result
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::not_found(format!("no summary for {symbol}")))
    }

    async fn fetch_profile(&self, symbol: &Symbol) -> Result<TickerProfile, ProviderError> {
        let summary = self.fetch_summary(symbol, PROFILE_MODULES).await?;
        Ok(summary.into_profile())
    }

    async fn fetch_news(&self, symbol: &Symbol) -> Result<Vec<RawNews>, ProviderError> {
        let url = format!(
            "{SEARCH_ENDPOINT}?q={}&quotesCount=0&newsCount={NEWS_COUNT}",
            urlencoding::encode(symbol.as_str())
        );
        let response: SearchResponse = self.get_json(symbol, url).await?;

        Ok(response
            .news
            .into_iter()
            .map(|item| RawNews {
                title: item.title.unwrap_or_default(),
                publisher: item.publisher.unwrap_or_default(),
                link: item.link.unwrap_or_default(),
                published_at: item
                    .provider_publish_time
                    .filter(|ts| *ts > 0)
                    .and_then(|ts| UtcDateTime::from_unix_timestamp(ts).ok()),
            })
            .collect())
    }

    async fn fetch_earnings(&self, symbol: &Symbol) -> Result<Vec<EarningsEstimate>, ProviderError> {
        let summary = self.fetch_summary(symbol, "calendarEvents").await?;
        let Some(earnings) = summary.calendar_events.and_then(|events| events.earnings) else {
            return Ok(Vec::new());
        };

        let eps_estimate = earnings.earnings_average.as_ref().and_then(RawValue::value);
        Ok(earnings
            .earnings_date
            .iter()
            .filter_map(RawValue::timestamp)
            .map(|date| EarningsEstimate { date, eps_estimate })
            .collect())
    }
}

impl MarketDataProvider for YahooProvider {
    fn name(&self) -> &'static str {
        "yahoo"
    }

    fn history<'a>(&'a self, symbol: &'a Symbol, range: HistoryRange) -> ProviderFuture<'a, PriceHistory> {
        Box::pin(self.fetch_history(symbol, range))
    }

    fn profile<'a>(&'a self, symbol: &'a Symbol) -> ProviderFuture<'a, TickerProfile> {
        Box::pin(self.fetch_profile(symbol))
    }

    fn news<'a>(&'a self, symbol: &'a Symbol) -> ProviderFuture<'a, Vec<RawNews>> {
        Box::pin(self.fetch_news(symbol))
    }

    fn earnings_dates<'a>(&'a self, symbol: &'a Symbol) -> ProviderFuture<'a, Vec<EarningsEstimate>> {
        Box::pin(self.fetch_earnings(symbol))
    }
}

// Yahoo Finance response structures

#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    #[serde(default)]
    description: Option<String>,
}

impl ApiError {
    fn into_provider_error(self, symbol: &Symbol) -> ProviderError {
        let detail = self.description.unwrap_or_else(|| self.code.clone());
        if self.code.eq_ignore_ascii_case("not found") {
            ProviderError::not_found(format!("{symbol}: {detail}"))
        } else {
            ProviderError::unavailable(format!("yahoo API error for {symbol}: {detail}"))
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartData,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Deserialize)]
struct ChartQuote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    #[serde(rename = "quoteSummary")]
    quote_summary: SummaryData,
}

#[derive(Debug, Deserialize)]
struct SummaryData {
    #[serde(default)]
    result: Option<Vec<SummaryResult>>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryResult {
    #[serde(default)]
    price: Option<PriceModule>,
    #[serde(default)]
    summary_detail: Option<SummaryDetailModule>,
    #[serde(default)]
    financial_data: Option<FinancialDataModule>,
    #[serde(default)]
    default_key_statistics: Option<KeyStatisticsModule>,
    #[serde(default)]
    calendar_events: Option<CalendarEventsModule>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PriceModule {
    long_name: Option<String>,
    short_name: Option<String>,
    currency: Option<String>,
    market_cap: Option<RawValue>,
    regular_market_price: Option<RawValue>,
    regular_market_previous_close: Option<RawValue>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryDetailModule {
    previous_close: Option<RawValue>,
    dividend_yield: Option<RawValue>,
    dividend_rate: Option<RawValue>,
    ex_dividend_date: Option<RawValue>,
    fifty_two_week_high: Option<RawValue>,
    fifty_two_week_low: Option<RawValue>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FinancialDataModule {
    current_price: Option<RawValue>,
    recommendation_key: Option<String>,
    target_median_price: Option<RawValue>,
    target_mean_price: Option<RawValue>,
    number_of_analyst_opinions: Option<RawValue>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct KeyStatisticsModule {
    last_dividend_value: Option<RawValue>,
}

#[derive(Debug, Deserialize)]
struct CalendarEventsModule {
    #[serde(default)]
    earnings: Option<CalendarEarnings>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CalendarEarnings {
    #[serde(default)]
    earnings_date: Vec<RawValue>,
    #[serde(default)]
    earnings_average: Option<RawValue>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    news: Vec<SearchNewsItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchNewsItem {
    title: Option<String>,
    publisher: Option<String>,
    link: Option<String>,
    provider_publish_time: Option<i64>,
}

/// Yahoo wraps numbers as `{"raw": 1.23, "fmt": "1.23"}`.
#[derive(Debug, Clone, Deserialize)]
struct RawValue {
    #[serde(default)]
    raw: Option<f64>,
}

impl RawValue {
    fn value(&self) -> Option<f64> {
        self.raw.filter(|v| v.is_finite())
    }

    fn timestamp(&self) -> Option<UtcDateTime> {
        let seconds = self.value()?;
        UtcDateTime::from_unix_timestamp(seconds as i64).ok()
    }
}

fn raw(value: &Option<RawValue>) -> Option<f64> {
    value.as_ref().and_then(RawValue::value)
}

impl SummaryResult {
    fn into_profile(self) -> TickerProfile {
        let price = self.price.unwrap_or_default();
        let detail = self.summary_detail.unwrap_or_default();
        let financial = self.financial_data.unwrap_or_default();
        let statistics = self.default_key_statistics.unwrap_or_default();

        TickerProfile {
            long_name: price.long_name,
            short_name: price.short_name,
            currency: price.currency,
            market_cap: raw(&price.market_cap),
            previous_close: raw(&price.regular_market_previous_close)
                .or_else(|| raw(&detail.previous_close)),
            current_price: raw(&financial.current_price).or_else(|| raw(&price.regular_market_price)),
            recommendation_key: financial.recommendation_key,
            target_median_price: raw(&financial.target_median_price),
            target_mean_price: raw(&financial.target_mean_price),
            analyst_count: raw(&financial.number_of_analyst_opinions)
                .filter(|count| *count >= 0.0)
                .map(|count| count as u32),
            dividend_yield: raw(&detail.dividend_yield),
            dividend_rate: raw(&detail.dividend_rate),
            last_dividend_value: raw(&statistics.last_dividend_value),
            ex_dividend_date: detail.ex_dividend_date.as_ref().and_then(RawValue::timestamp),
            fifty_two_week_high: raw(&detail.fifty_two_week_high),
            fifty_two_week_low: raw(&detail.fifty_two_week_low),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_client::{HttpError, HttpFuture, HttpResponse};
    use crate::provider::ProviderErrorKind;
    use std::sync::Mutex as StdMutex;

    /// Answers requests from a fixed route table keyed by URL substring.
    struct ScriptedHttpClient {
        routes: Vec<(&'static str, Result<HttpResponse, HttpError>)>,
        requests: StdMutex<Vec<String>>,
    }

    impl ScriptedHttpClient {
        fn new(routes: Vec<(&'static str, Result<HttpResponse, HttpError>)>) -> Arc<Self> {
            let mut all = vec![
                ("fc.yahoo.com", Ok(HttpResponse::with_status(404, ""))),
                ("getcrumb", Ok(HttpResponse::ok_json("abc123"))),
            ];
            all.extend(routes);
            Arc::new(Self {
                routes: all,
                requests: StdMutex::new(Vec::new()),
            })
        }

        fn count(&self, needle: &str) -> usize {
            self.requests
                .lock()
                .expect("request log should not be poisoned")
                .iter()
                .filter(|url| url.contains(needle))
                .count()
        }
    }

    impl HttpClient for ScriptedHttpClient {
        fn execute<'a>(&'a self, request: HttpRequest) -> HttpFuture<'a> {
            let response = self
                .routes
                .iter()
                .find(|(needle, _)| request.url.contains(needle))
                .map(|(_, response)| response.clone())
                .unwrap_or_else(|| Ok(HttpResponse::with_status(500, "unrouted")));
            self.requests
                .lock()
                .expect("request log should not be poisoned")
                .push(request.url);
            Box::pin(async move { response })
        }
    }

    fn provider(client: Arc<ScriptedHttpClient>) -> YahooProvider {
        YahooProvider::new(client, RequestPacer::new(1_000))
    }

    fn symbol(raw: &str) -> Symbol {
        Symbol::parse(raw).expect("valid symbol")
    }

    const CHART_BODY: &str = r#"{"chart":{"result":[{"indicators":{"quote":[{"close":[187.1,null,189.9]}]}}],"error":null}}"#;

    #[tokio::test]
    async fn history_skips_null_closes_and_reuses_crumb() {
        let client = ScriptedHttpClient::new(vec![("v8/finance/chart", Ok(HttpResponse::ok_json(CHART_BODY)))]);
        let yahoo = provider(Arc::clone(&client));
        let aapl = symbol("AAPL");

        let history = yahoo
            .history(&aapl, HistoryRange::FiveDays)
            .await
            .expect("history should parse");
        assert_eq!(history.closes, vec![187.1, 189.9]);

        yahoo
            .history(&aapl, HistoryRange::TwoDays)
            .await
            .expect("second call should succeed");
        assert_eq!(client.count("getcrumb"), 1);
        assert_eq!(client.count("crumb=abc123"), 2);
        assert_eq!(client.count("range=2d"), 1);
    }

    #[tokio::test]
    async fn status_codes_map_to_error_kinds() {
        let cases = [
            (404, ProviderErrorKind::NotFound),
            (429, ProviderErrorKind::RateLimited),
            (503, ProviderErrorKind::Unavailable),
        ];

        for (status, kind) in cases {
            let client = ScriptedHttpClient::new(vec![(
                "v8/finance/chart",
                Ok(HttpResponse::with_status(status, "")),
            )]);
            let error = provider(client)
                .history(&symbol("MSFT"), HistoryRange::TwoDays)
                .await
                .expect_err("non-2xx should fail");
            assert_eq!(error.kind(), kind, "status {status}");
        }
    }

    #[tokio::test]
    async fn unauthorized_response_drops_the_crumb() {
        let client = ScriptedHttpClient::new(vec![(
            "v8/finance/chart",
            Ok(HttpResponse::with_status(401, "")),
        )]);
        let yahoo = provider(Arc::clone(&client));

        for _ in 0..2 {
            let error = yahoo
                .history(&symbol("TSLA"), HistoryRange::TwoDays)
                .await
                .expect_err("401 should fail");
            assert_eq!(error.kind(), ProviderErrorKind::Unavailable);
        }
        assert_eq!(client.count("getcrumb"), 2);
        assert_eq!(client.count("v8/finance/chart"), 2);
    }

    #[tokio::test]
    async fn empty_or_undecodable_history_is_classified() {
        let empty = ScriptedHttpClient::new(vec![(
            "v8/finance/chart",
            Ok(HttpResponse::ok_json(r#"{"chart":{"result":[{"indicators":{"quote":[{"close":[]}]}}]}}"#)),
        )]);
        let error = provider(empty)
            .history(&symbol("BADSYMBOL"), HistoryRange::FiveDays)
            .await
            .expect_err("empty history");
        assert_eq!(error.kind(), ProviderErrorKind::NotFound);

        let delisted = ScriptedHttpClient::new(vec![(
            "v8/finance/chart",
            Ok(HttpResponse::ok_json(
                r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#,
            )),
        )]);
        let error = provider(delisted)
            .history(&symbol("GONE"), HistoryRange::FiveDays)
            .await
            .expect_err("delisted");
        assert_eq!(error.kind(), ProviderErrorKind::NotFound);

        let garbage = ScriptedHttpClient::new(vec![("v8/finance/chart", Ok(HttpResponse::ok_json("<html>")))]);
        let error = provider(garbage)
            .history(&symbol("AAPL"), HistoryRange::FiveDays)
            .await
            .expect_err("malformed");
        assert_eq!(error.kind(), ProviderErrorKind::Malformed);
    }

    #[tokio::test]
    async fn transport_timeout_is_reported_as_timeout() {
        let client = ScriptedHttpClient::new(vec![(
            "v8/finance/chart",
            Err(HttpError::timed_out("request timeout")),
        )]);
        let error = provider(client)
            .history(&symbol("AAPL"), HistoryRange::FiveDays)
            .await
            .expect_err("timeout");
        assert_eq!(error.kind(), ProviderErrorKind::Timeout);
    }

    #[tokio::test]
    async fn profile_collects_fields_across_modules() {
        let body = r#"{"quoteSummary":{"result":[{
            "price":{"longName":"Coca-Cola Company","shortName":"Coca-Cola","currency":"USD",
                     "marketCap":{"raw":260000000000.0},"regularMarketPreviousClose":{"raw":61.5}},
            "summaryDetail":{"dividendYield":{"raw":0.0315},"dividendRate":{"raw":1.94},
                             "exDividendDate":{"raw":1772323200},"fiftyTwoWeekHigh":{"raw":73.5},"fiftyTwoWeekLow":{"raw":57.9}},
            "financialData":{"currentPrice":{"raw":62.0},"recommendationKey":"buy",
                             "targetMedianPrice":{"raw":70.0},"numberOfAnalystOpinions":{"raw":18}},
            "defaultKeyStatistics":{"lastDividendValue":{"raw":0.485}}
        }],"error":null}}"#;
        let client = ScriptedHttpClient::new(vec![("quoteSummary", Ok(HttpResponse::ok_json(body)))]);

        let profile = provider(client)
            .profile(&symbol("KO"))
            .await
            .expect("profile should parse");

        assert_eq!(profile.long_name.as_deref(), Some("Coca-Cola Company"));
        assert_eq!(profile.previous_close, Some(61.5));
        assert_eq!(profile.current_price, Some(62.0));
        assert_eq!(profile.recommendation_key.as_deref(), Some("buy"));
        assert_eq!(profile.analyst_count, Some(18));
        assert_eq!(profile.dividend_yield, Some(0.0315));
        assert_eq!(profile.last_dividend_value, Some(0.485));
        assert_eq!(profile.fifty_two_week_low, Some(57.9));
        assert!(profile.ex_dividend_date.is_some());
    }

    #[tokio::test]
    async fn earnings_dates_share_the_consensus_estimate() {
        let body = r#"{"quoteSummary":{"result":[{"calendarEvents":{"earnings":{
            "earningsDate":[{"raw":1777579200,"fmt":"2026-04-30"}],
            "earningsAverage":{"raw":1.62}
        }}}]}}"#;
        let client = ScriptedHttpClient::new(vec![("quoteSummary", Ok(HttpResponse::ok_json(body)))]);

        let dates = provider(client)
            .earnings_dates(&symbol("AAPL"))
            .await
            .expect("earnings should parse");

        assert_eq!(dates.len(), 1);
        assert_eq!(dates[0].date.unix_timestamp(), 1_777_579_200);
        assert_eq!(dates[0].eps_estimate, Some(1.62));
    }

    #[tokio::test]
    async fn news_maps_publish_time() {
        let body = r#"{"news":[
            {"title":"Chip demand climbs","publisher":"Wire","link":"https://news.test/1","providerPublishTime":1767261600},
            {"title":"Undated","publisher":"Wire","link":"https://news.test/2"}
        ]}"#;
        let client = ScriptedHttpClient::new(vec![("v1/finance/search", Ok(HttpResponse::ok_json(body)))]);

        let news = provider(client).news(&symbol("NVDA")).await.expect("news should parse");

        assert_eq!(news.len(), 2);
        assert_eq!(news[0].published_at.map(UtcDateTime::unix_timestamp), Some(1_767_261_600));
        assert!(news[1].published_at.is_none());
    }
}

mod feeds;
mod market;
mod quote;
mod search;

use std::sync::Arc;
use std::time::{Duration, Instant};

use stogra_core::{
    FixtureProvider, MarketDataProvider, MarketDataService, MarketUniverse, ReqwestHttpClient,
    RequestPacer, ServiceConfig, UtcDateTime, ViewCache, YahooProvider,
};
use tracing::debug;

use crate::cli::{Cli, Command};
use crate::error::CliError;
use crate::metadata::{Envelope, Metadata};

pub async fn run(cli: &Cli) -> Result<Envelope, CliError> {
    let config = service_config(cli);
    let universe = match &cli.universe {
        Some(path) => MarketUniverse::from_json_file(path)?,
        None => MarketUniverse::from_env()?,
    };
    let provider = provider(cli.mock, &universe, &config);
    let provider_name = provider.name();
    let service = MarketDataService::new(provider, universe, config, ViewCache::new());

    let started = Instant::now();
    let data = match &cli.command {
        Command::Search(args) => search::run(args, &service)?,
        Command::Stocks(args) => quote::batch(args, &service).await?,
        Command::Stock(args) => quote::detail(args, &service).await?,
        Command::SectorStocks(args) => quote::by_sector(args, &service).await?,
        Command::Snapshot => market::snapshot(&service).await?,
        Command::Status => market::status(&service)?,
        Command::Sectors => market::sectors(&service).await?,
        Command::WeekExtremes => market::week_extremes(&service).await?,
        Command::News(args) => feeds::news(args, &service).await?,
        Command::FeaturedNews => feeds::featured_news(&service).await?,
        Command::Ratings(args) => feeds::ratings(args, &service).await?,
        Command::Earnings(args) => feeds::earnings(args, &service).await?,
        Command::Dividends(args) => feeds::dividends(args, &service).await?,
    };
    let latency_ms = started.elapsed().as_millis() as u64;
    debug!(command = command_name(&cli.command), latency_ms, "command finished");

    Ok(Envelope {
        meta: Metadata::new(command_name(&cli.command), provider_name, latency_ms),
        data,
    })
}

fn service_config(cli: &Cli) -> ServiceConfig {
    let mut config = ServiceConfig::from_env();
    if let Some(max_concurrency) = cli.max_concurrency {
        config.max_concurrency = max_concurrency;
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config.call_timeout = Duration::from_millis(timeout_ms);
    }
    config
}

fn provider(mock: bool, universe: &MarketUniverse, config: &ServiceConfig) -> Arc<dyn MarketDataProvider> {
    if mock {
        return Arc::new(FixtureProvider::demo_at(universe, UtcDateTime::now()));
    }

    let pacer = RequestPacer::new(config.pacer_per_second);
    Arc::new(
        YahooProvider::new(Arc::new(ReqwestHttpClient::new()), pacer)
            .with_request_timeout_ms(config.call_timeout.as_millis() as u64),
    )
}

const fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Search(_) => "search",
        Command::Stocks(_) => "stocks",
        Command::Stock(_) => "stock",
        Command::SectorStocks(_) => "sector-stocks",
        Command::Snapshot => "snapshot",
        Command::Status => "status",
        Command::Sectors => "sectors",
        Command::News(_) => "news",
        Command::FeaturedNews => "featured-news",
        Command::Ratings(_) => "ratings",
        Command::Earnings(_) => "earnings",
        Command::Dividends(_) => "dividends",
        Command::WeekExtremes => "week-extremes",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    async fn run_args(args: &[&str]) -> Result<Envelope, CliError> {
        let cli = Cli::try_parse_from(args).expect("valid arguments");
        run(&cli).await
    }

    #[tokio::test]
    async fn mock_stocks_preserve_request_order() {
        let envelope = run_args(&["stogra", "--mock", "stocks", "MSFT,AAPL"])
            .await
            .expect("mock data");

        assert_eq!(envelope.meta.command, "stocks");
        assert_eq!(envelope.meta.provider, "fixture");
        assert_eq!(envelope.data["quotes"][0]["symbol"], "MSFT");
        assert_eq!(envelope.data["quotes"][1]["symbol"], "AAPL");
    }

    #[tokio::test]
    async fn mock_sector_stocks_follow_the_sector_table() {
        let envelope = run_args(&["stogra", "--mock", "sector-stocks", "ENERGY"])
            .await
            .expect("mock data");

        assert_eq!(envelope.meta.command, "sector-stocks");
        let symbols: Vec<&str> = envelope.data["quotes"]
            .as_array()
            .expect("quote list")
            .iter()
            .filter_map(|quote| quote["symbol"].as_str())
            .collect();
        assert_eq!(symbols, vec!["XOM", "CVX", "COP", "SLB", "EOG"]);
    }

    #[tokio::test]
    async fn unknown_single_symbol_maps_to_not_found() {
        let error = run_args(&["stogra", "--mock", "stock", "ZZZZ"])
            .await
            .expect_err("not in fixture data");
        assert_eq!(error.exit_code(), 3);
    }

    #[tokio::test]
    async fn out_of_range_limit_maps_to_validation() {
        let error = run_args(&["stogra", "--mock", "news", "--limit", "50"])
            .await
            .expect_err("limit too large");
        assert_eq!(error.exit_code(), 2);
    }

    #[tokio::test]
    async fn missing_universe_file_maps_to_config() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("missing.json");
        let path = path.to_str().expect("utf-8 path");

        let error = run_args(&["stogra", "--mock", "--universe", path, "status"])
            .await
            .expect_err("file does not exist");
        assert_eq!(error.exit_code(), 5);
    }
}

//! CLI argument definitions for stogra.
//!
//! Every command runs one read operation of the market-data service and
//! prints its result as JSON on stdout. Logs go to stderr and follow
//! `RUST_LOG` (default `warn`).
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `search` | Search the curated ticker directory |
//! | `stocks` | Quotes for a comma-delimited symbol list |
//! | `stock` | Quote for one symbol |
//! | `sector-stocks` | Quotes for a sector's stock list |
//! | `snapshot` | Index levels and top movers |
//! | `status` | Exchange session status |
//! | `sectors` | Sector performance via sector ETFs |
//! | `news` | Latest headlines for tracked names |
//! | `featured-news` | Newest headline with its lead symbol |
//! | `ratings` | Analyst consensus, best first |
//! | `earnings` | Upcoming earnings, soonest first |
//! | `dividends` | Dividend payers by yield |
//! | `week-extremes` | Names nearest their 52-week high and low |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--mock` | `false` | Serve deterministic fixture data, no network |
//! | `--universe` | built-in | JSON file replacing the tracked universe |
//! | `--max-concurrency` | `8` | Concurrent provider lookups |
//! | `--timeout-ms` | `10000` | Per-lookup timeout in ms |
//!
//! # Examples
//!
//! ```bash
//! stogra stocks AAPL,MSFT,NVDA --pretty
//! stogra snapshot --mock
//! stogra news --limit 5
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Market dashboard data from the command line.
#[derive(Debug, Parser)]
#[command(
    name = "stogra",
    author,
    version,
    about = "Cached, aggregated market views for the stogra dashboard"
)]
pub struct Cli {
    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Use the offline fixture provider instead of Yahoo Finance.
    #[arg(long, global = true, default_value_t = false)]
    pub mock: bool,

    /// Market universe JSON file. Falls back to STOGRA_UNIVERSE_FILE, then the
    /// built-in tables.
    #[arg(long, global = true)]
    pub universe: Option<PathBuf>,

    /// Maximum concurrent provider lookups.
    #[arg(long, global = true, env = "STOGRA_MAX_CONCURRENCY")]
    pub max_concurrency: Option<usize>,

    /// Per-lookup timeout in milliseconds.
    #[arg(long, global = true, env = "STOGRA_CALL_TIMEOUT_MS")]
    pub timeout_ms: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Search tickers by symbol or company name.
    ///
    ///   stogra search apple
    ///   stogra search bank --limit 3
    Search(SearchArgs),

    /// Quotes for a comma-delimited list of symbols, in request order.
    ///
    ///   stogra stocks AAPL,MSFT,GOOGL
    Stocks(StocksArgs),

    /// Quote for a single symbol.
    ///
    ///   stogra stock NVDA
    Stock(StockArgs),

    /// Quotes for the stocks listed under a sector; unknown sectors use "all".
    ///
    ///   stogra sector-stocks tech
    SectorStocks(SectorArgs),

    /// Major index levels plus the day's biggest movers.
    Snapshot,

    /// Whether the exchange is open, and the countdown to the next bell.
    Status,

    /// Daily move of each sector's representative ETF.
    Sectors,

    /// Latest headlines for the most-watched names.
    News(LimitArgs),

    /// The newest headline, or null when there is none.
    FeaturedNews,

    /// Analyst consensus ratings, best-rated first.
    Ratings(LimitArgs),

    /// Upcoming earnings releases, soonest first.
    Earnings(LimitArgs),

    /// Dividend payers ranked by trailing yield.
    Dividends(LimitArgs),

    /// Names trading closest to their 52-week high and low.
    WeekExtremes,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Free-form query (1 to 50 characters).
    pub query: String,

    /// Maximum number of results.
    #[arg(long, default_value_t = 5)]
    pub limit: usize,
}

#[derive(Debug, Args)]
pub struct StocksArgs {
    /// Comma-delimited symbols, e.g. "AAPL,MSFT".
    pub symbols: String,
}

#[derive(Debug, Args)]
pub struct StockArgs {
    pub symbol: String,
}

#[derive(Debug, Args)]
pub struct SectorArgs {
    /// Sector name, e.g. "tech" or "energy".
    #[arg(default_value = "all")]
    pub sector: String,
}

#[derive(Debug, Args)]
pub struct LimitArgs {
    /// Number of entries to return (1 to 20).
    #[arg(long, default_value_t = 10)]
    pub limit: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_after_the_subcommand() {
        let cli = Cli::try_parse_from([
            "stogra",
            "news",
            "--limit",
            "3",
            "--mock",
            "--timeout-ms",
            "250",
        ])
        .expect("valid arguments");

        assert!(cli.mock);
        assert_eq!(cli.timeout_ms, Some(250));
        assert!(matches!(cli.command, Command::News(LimitArgs { limit: 3 })));
    }

    #[test]
    fn week_extremes_uses_kebab_case() {
        let cli = Cli::try_parse_from(["stogra", "week-extremes"]).expect("valid arguments");
        assert!(matches!(cli.command, Command::WeekExtremes));
    }

    #[test]
    fn sector_stocks_defaults_to_all() {
        let cli = Cli::try_parse_from(["stogra", "sector-stocks"]).expect("valid arguments");
        match cli.command {
            Command::SectorStocks(args) => assert_eq!(args.sector, "all"),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}

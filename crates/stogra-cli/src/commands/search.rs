use serde::Serialize;
use serde_json::Value;

use stogra_core::{MarketDataService, TickerListing};

use crate::cli::SearchArgs;
use crate::error::CliError;

#[derive(Debug, Serialize)]
struct SearchResponseData<'a> {
    query: &'a str,
    results: Vec<TickerListing>,
}

pub fn run(args: &SearchArgs, service: &MarketDataService) -> Result<Value, CliError> {
    let results = service.search_tickers(&args.query, args.limit)?;
    Ok(serde_json::to_value(SearchResponseData {
        query: args.query.trim(),
        results,
    })?)
}

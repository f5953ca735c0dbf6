use serde::Serialize;
use serde_json::Value;

use stogra_core::{MarketDataService, Quote};

use crate::cli::{SectorArgs, StockArgs, StocksArgs};
use crate::error::CliError;

#[derive(Debug, Serialize)]
struct QuoteResponseData {
    quotes: Vec<Quote>,
}

pub async fn batch(args: &StocksArgs, service: &MarketDataService) -> Result<Value, CliError> {
    let quotes = service.get_stocks_batch(&args.symbols).await?;
    Ok(serde_json::to_value(QuoteResponseData { quotes })?)
}

pub async fn detail(args: &StockArgs, service: &MarketDataService) -> Result<Value, CliError> {
    let quote = service.get_stock_detail(&args.symbol).await?;
    Ok(serde_json::to_value(quote)?)
}

pub async fn by_sector(args: &SectorArgs, service: &MarketDataService) -> Result<Value, CliError> {
    let quotes = service.get_stocks_by_sector(&args.sector).await;
    Ok(serde_json::to_value(QuoteResponseData { quotes })?)
}

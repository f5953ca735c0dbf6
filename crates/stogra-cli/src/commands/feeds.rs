use serde::Serialize;
use serde_json::Value;

use stogra_core::{AnalystRating, DividendStock, EarningsEvent, MarketDataService, NewsItem};

use crate::cli::LimitArgs;
use crate::error::CliError;

#[derive(Debug, Serialize)]
struct NewsResponseData {
    news: Vec<NewsItem>,
}

#[derive(Debug, Serialize)]
struct RatingsResponseData {
    ratings: Vec<AnalystRating>,
}

#[derive(Debug, Serialize)]
struct EarningsResponseData {
    earnings: Vec<EarningsEvent>,
}

#[derive(Debug, Serialize)]
struct DividendsResponseData {
    dividends: Vec<DividendStock>,
}

pub async fn news(args: &LimitArgs, service: &MarketDataService) -> Result<Value, CliError> {
    let news = service.get_news(args.limit).await?;
    Ok(serde_json::to_value(NewsResponseData { news })?)
}

pub async fn featured_news(service: &MarketDataService) -> Result<Value, CliError> {
    Ok(serde_json::to_value(service.get_featured_news().await)?)
}

pub async fn ratings(args: &LimitArgs, service: &MarketDataService) -> Result<Value, CliError> {
    let ratings = service.get_analyst_ratings(args.limit).await?;
    Ok(serde_json::to_value(RatingsResponseData { ratings })?)
}

pub async fn earnings(args: &LimitArgs, service: &MarketDataService) -> Result<Value, CliError> {
    let earnings = service.get_earnings(args.limit).await?;
    Ok(serde_json::to_value(EarningsResponseData { earnings })?)
}

pub async fn dividends(args: &LimitArgs, service: &MarketDataService) -> Result<Value, CliError> {
    let dividends = service.get_dividend_stocks(args.limit).await?;
    Ok(serde_json::to_value(DividendsResponseData { dividends })?)
}

use serde::Serialize;
use serde_json::Value;

use stogra_core::{MarketDataService, SectorPerformance};

use crate::error::CliError;

#[derive(Debug, Serialize)]
struct SectorResponseData {
    sectors: Vec<SectorPerformance>,
}

pub async fn snapshot(service: &MarketDataService) -> Result<Value, CliError> {
    Ok(serde_json::to_value(service.get_market_snapshot().await)?)
}

pub fn status(service: &MarketDataService) -> Result<Value, CliError> {
    Ok(serde_json::to_value(service.get_market_status())?)
}

pub async fn sectors(service: &MarketDataService) -> Result<Value, CliError> {
    let sectors = service.get_sector_performance().await;
    Ok(serde_json::to_value(SectorResponseData { sectors })?)
}

pub async fn week_extremes(service: &MarketDataService) -> Result<Value, CliError> {
    Ok(serde_json::to_value(service.get_week_extremes().await)?)
}

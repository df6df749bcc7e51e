use clap::Args;
use serde::Deserialize;
use serde_json::Value;

use propval_core::market::{assess_market, Listing};
use propval_core::valuation::MarketStatistics;

use crate::input;

/// Arguments for the area market outlook
#[derive(Args)]
pub struct MarketArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MarketInput {
    location_code: String,
    #[serde(default)]
    market: MarketStatistics,
    #[serde(default)]
    listings: Vec<Listing>,
}

pub fn run_market(args: MarketArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let market_input: MarketInput = input::read_payload(args.input.as_deref(), "market outlook")?;
    let result = assess_market(
        &market_input.location_code,
        &market_input.market,
        &market_input.listings,
    )?;
    Ok(serde_json::to_value(result)?)
}

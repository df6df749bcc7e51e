use clap::Args;
use serde_json::Value;

use propval_core::geo;
use propval_core::valuation::{estimate_rent, estimate_value, estimate_value_as_of};

use super::RequestArgs;

/// Arguments for a point valuation
#[derive(Args)]
pub struct ValueArgs {
    #[command(flatten)]
    pub request: RequestArgs,
}

/// Arguments for the rule-based rent estimate
#[derive(Args)]
pub struct RentArgs {
    #[command(flatten)]
    pub request: RequestArgs,
}

pub fn run_value(args: ValueArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request = args.request.load("valuation")?;
    let profile = geo::resolve(&request.property.location_code);
    let result = match request.as_of_year {
        Some(year) => estimate_value_as_of(&request.property, &request.market, profile, year)?,
        None => estimate_value(&request.property, &request.market, profile)?,
    };
    Ok(serde_json::to_value(result)?)
}

pub fn run_rent(args: RentArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request = args.request.load("rent estimate")?;
    request.property.validate()?;
    let result = estimate_rent(&request.property);
    Ok(serde_json::to_value(result)?)
}

use clap::Args;
use serde_json::{json, Value};

use propval_core::geo;

/// Arguments for the location profile lookup
#[derive(Args)]
pub struct GeoArgs {
    /// Five-digit location (postal) code
    pub location_code: String,
}

pub fn run_geo(args: GeoArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let profile = geo::resolve(&args.location_code);
    Ok(json!({
        "location_code": args.location_code.trim(),
        "calibrated": !profile.is_default(),
        "amenity_multiplier": profile.amenity_multiplier(),
        "school_rating_estimate": geo::school_rating_estimate(profile),
        "profile": profile,
    }))
}

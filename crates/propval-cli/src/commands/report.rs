use clap::Args;
use serde_json::{json, Value};

use propval_core::report::{analyze_batch, analyze_property, PropertyAnalysisRequest};

use super::override_assumptions;
use crate::input;

/// Arguments for the full property report
#[derive(Args)]
pub struct ReportArgs {
    /// Path to JSON input file: one request, or an array of requests
    #[arg(long)]
    pub input: Option<String>,

    /// Assumptions applied to every request (JSON or YAML)
    #[arg(long)]
    pub assumptions: Option<String>,

    /// Measure property age against this year instead of the current one
    #[arg(long)]
    pub as_of_year: Option<i32>,
}

pub fn run_report(args: ReportArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let payload: Value = input::read_payload(args.input.as_deref(), "property report")?;

    let batch = payload.is_array();
    let mut requests: Vec<PropertyAnalysisRequest> = if batch {
        serde_json::from_value(payload)?
    } else {
        vec![serde_json::from_value(payload)?]
    };
    for request in &mut requests {
        override_assumptions(request, args.assumptions.as_deref())?;
        if let Some(year) = args.as_of_year {
            request.as_of_year = Some(year);
        }
    }

    if !batch {
        let output = analyze_property(&requests[0])?;
        return Ok(serde_json::to_value(output)?);
    }

    tracing::info!(count = requests.len(), "analysing property batch");
    let results = analyze_batch(&requests)
        .into_iter()
        .zip(&requests)
        .map(|(outcome, request)| match outcome {
            Ok(output) => serde_json::to_value(output),
            Err(e) => Ok(json!({
                "location_code": request.property.location_code,
                "error": e.to_string(),
            })),
        })
        .collect::<Result<Vec<Value>, _>>()?;
    Ok(Value::Array(results))
}

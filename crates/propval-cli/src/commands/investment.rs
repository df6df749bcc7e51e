use clap::Args;
use serde_json::{json, Value};
use std::time::Instant;

use propval_core::investment::analyze_with;
use propval_core::report::prepare_subject;
use propval_core::types::with_metadata;

use super::{override_assumptions, RequestArgs};

/// Arguments for the base-case investment analysis
#[derive(Args)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub request: RequestArgs,

    /// Assumptions file (JSON or YAML); its `base` section drives the analysis
    #[arg(long)]
    pub assumptions: Option<String>,

    /// Projection horizon in years (defaults to the assumptions' horizon)
    #[arg(long)]
    pub horizon: Option<u32>,
}

pub fn run_analyze(args: AnalyzeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let mut request = args.request.load("investment analysis")?;
    override_assumptions(&mut request, args.assumptions.as_deref())?;
    let horizon = args.horizon.unwrap_or(request.assumptions.horizon_years);

    let subject = prepare_subject(&request)?;
    let analysis = analyze_with(
        &subject.valuation,
        &subject.rental,
        &subject.loan,
        horizon,
        &request.assumptions.base,
    )?;

    let mut warnings = subject.notes;
    if analysis.internal_rate_of_return.is_none() {
        warnings.push("IRR not solvable for the projected cash flows".into());
    }

    let output = with_metadata(
        "Leveraged first-year cash flow with year-by-year appreciation and amortisation",
        &json!({
            "horizon_years": horizon,
            "financing": request.financing,
            "expenses": request.assumptions.base.expenses,
            "growth": request.assumptions.base.growth,
        }),
        warnings,
        start.elapsed().as_micros() as u64,
        analysis,
    );
    Ok(serde_json::to_value(output)?)
}

use clap::Args;
use serde_json::{json, Value};
use std::time::Instant;

use propval_core::report::prepare_subject;
use propval_core::scenarios::generate_scenarios_with;
use propval_core::types::with_metadata;

use super::{override_assumptions, RequestArgs};

/// Arguments for the three-scenario stress run
#[derive(Args)]
pub struct ScenariosArgs {
    #[command(flatten)]
    pub request: RequestArgs,

    /// Scenario overlays, weights and base assumptions (JSON or YAML)
    #[arg(long)]
    pub assumptions: Option<String>,

    /// Projection horizon in years (overrides the assumptions' horizon)
    #[arg(long)]
    pub horizon: Option<u32>,

    /// Print only the per-scenario summary rows
    #[arg(long)]
    pub summary: bool,
}

pub fn run_scenarios(args: ScenariosArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let mut request = args.request.load("scenario analysis")?;
    override_assumptions(&mut request, args.assumptions.as_deref())?;
    if let Some(horizon) = args.horizon {
        request.assumptions.horizon_years = horizon;
    }

    let subject = prepare_subject(&request)?;
    let set = generate_scenarios_with(
        &subject.valuation,
        &subject.rental,
        &subject.loan,
        &request.assumptions,
    )?;

    if args.summary {
        return Ok(serde_json::to_value(&set.summary.rows)?);
    }

    let mut warnings = subject.notes;
    warnings.extend(
        set.summary
            .rows
            .iter()
            .filter(|r| r.internal_rate_of_return.is_none())
            .map(|r| format!("{} scenario: IRR not solvable", r.scenario)),
    );

    let output = with_metadata(
        "Base case re-run under conservative and optimistic overlays, probability weighted",
        &json!({
            "financing": request.financing,
            "scenarios": request.assumptions,
        }),
        warnings,
        start.elapsed().as_micros() as u64,
        set,
    );
    Ok(serde_json::to_value(output)?)
}

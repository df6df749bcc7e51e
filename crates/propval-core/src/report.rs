use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::geo;
use crate::investment::LoanTerms;
use crate::scenarios::{generate_scenarios_with, ScenarioAssumptions, ScenarioSet};
use crate::scoring::{explain, score, Commentary, ScoreCard};
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::valuation::{
    estimate_rent, estimate_value, estimate_value_as_of, MarketStatistics, PropertyInput,
    RentalEstimate, ValuationResult,
};
use crate::PropvalResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Financing for the report. Price comes from the request or the estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinancingInput {
    pub down_payment_fraction: Rate,
    pub annual_interest_rate: Rate,
    pub amortization_years: u32,
}

impl Default for FinancingInput {
    fn default() -> Self {
        Self {
            down_payment_fraction: dec!(0.20),
            annual_interest_rate: dec!(0.07),
            amortization_years: 30,
        }
    }
}

/// Everything known about one property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyAnalysisRequest {
    pub property: PropertyInput,
    #[serde(default)]
    pub market: MarketStatistics,
    /// Provider rent; the rule-based estimate is used when absent
    #[serde(default)]
    pub rental: Option<RentalEstimate>,
    /// Asking or offer price; the point estimate is used when absent
    #[serde(default)]
    pub purchase_price: Option<Money>,
    #[serde(default)]
    pub financing: FinancingInput,
    /// Pins the year property age is measured against
    #[serde(default)]
    pub as_of_year: Option<i32>,
    #[serde(default)]
    pub assumptions: ScenarioAssumptions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RentSource {
    Provided,
    RuleBased,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyReport {
    pub location_code: String,
    pub county: String,
    pub valuation: ValuationResult,
    pub rental: RentalEstimate,
    pub rent_source: RentSource,
    pub purchase_price: Money,
    pub scenarios: ScenarioSet,
    /// Scores and commentary refer to the moderate scenario
    pub scores: ScoreCard,
    pub commentary: Commentary,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Valuation, rent and financing resolved from a request, with a note for
/// every default that had to be filled in.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedSubject {
    pub valuation: ValuationResult,
    pub rental: RentalEstimate,
    pub rent_source: RentSource,
    pub loan: LoanTerms,
    pub notes: Vec<String>,
}

/// Resolve the location, value the property and fill in rent and price where
/// the request leaves them out.
pub fn prepare_subject(request: &PropertyAnalysisRequest) -> PropvalResult<PreparedSubject> {
    let mut notes: Vec<String> = Vec::new();

    let property = &request.property;
    let profile = geo::resolve(&property.location_code);
    if profile.is_default() {
        notes.push(format!(
            "Location code '{}' has no calibrated profile; Default coefficients used",
            property.location_code
        ));
    }

    let valuation = match request.as_of_year {
        Some(year) => estimate_value_as_of(property, &request.market, profile, year)?,
        None => estimate_value(property, &request.market, profile)?,
    };
    notes.extend(
        valuation
            .fallbacks
            .iter()
            .map(|f| format!("Market default applied: {f}")),
    );

    let (rental, rent_source) = match &request.rental {
        Some(r) if r.monthly_rent > Decimal::ZERO => (r.clone(), RentSource::Provided),
        _ => {
            let estimate = estimate_rent(property);
            notes.push(format!(
                "No rental estimate supplied; rule-based rent of {}/month used",
                estimate.monthly_rent
            ));
            (estimate, RentSource::RuleBased)
        }
    };

    let purchase_price = match request.purchase_price {
        Some(p) => p,
        None => {
            notes.push("No purchase price supplied; point estimate used".into());
            valuation.point_estimate
        }
    };

    let loan = LoanTerms {
        purchase_price,
        down_payment_fraction: request.financing.down_payment_fraction,
        annual_interest_rate: request.financing.annual_interest_rate,
        amortization_years: request.financing.amortization_years,
    };

    Ok(PreparedSubject {
        valuation,
        rental,
        rent_source,
        loan,
        notes,
    })
}

/// Value, finance, stress and score one property.
pub fn analyze_property(
    request: &PropertyAnalysisRequest,
) -> PropvalResult<ComputationOutput<PropertyReport>> {
    let start = Instant::now();

    let PreparedSubject {
        valuation,
        rental,
        rent_source,
        loan,
        notes,
    } = prepare_subject(request)?;
    let mut warnings = notes;
    let property = &request.property;

    let scenarios = generate_scenarios_with(&valuation, &rental, &loan, &request.assumptions)?;

    for row in &scenarios.summary.rows {
        if row.internal_rate_of_return.is_none() {
            warnings.push(format!("{} scenario: IRR not solvable", row.scenario));
        }
    }

    let scores = score(&scenarios.moderate, &request.market);
    let commentary = explain(&scenarios.moderate, &request.market, property, &rental);

    let report = PropertyReport {
        location_code: valuation.context.location_code.clone(),
        county: valuation.context.county.clone(),
        purchase_price: loan.purchase_price,
        valuation,
        rental,
        rent_source,
        scenarios,
        scores,
        commentary,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Rule-based valuation with leveraged cash-flow projection and three-scenario stress",
        &serde_json::json!({
            "location_code": report.location_code,
            "county": report.county,
            "financing": request.financing,
            "scenarios": request.assumptions,
            "horizon_years": request.assumptions.horizon_years,
        }),
        warnings,
        elapsed,
        report,
    ))
}

/// Analyse independent properties; results keep the request order.
#[cfg(feature = "parallel")]
pub fn analyze_batch(
    requests: &[PropertyAnalysisRequest],
) -> Vec<PropvalResult<ComputationOutput<PropertyReport>>> {
    use rayon::prelude::*;

    requests.par_iter().map(analyze_property).collect()
}

/// Analyse independent properties; results keep the request order.
#[cfg(not(feature = "parallel"))]
pub fn analyze_batch(
    requests: &[PropertyAnalysisRequest],
) -> Vec<PropvalResult<ComputationOutput<PropertyReport>>> {
    requests.iter().map(analyze_property).collect()
}

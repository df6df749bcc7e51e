use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::overlay::{ScenarioAssumptions, ScenarioKind};
use crate::investment::{analyze_with, InvestmentAnalysis, LoanTerms};
use crate::types::{round_currency, round_ratio, Money, Rate};
use crate::valuation::{RentalEstimate, ValuationResult};
use crate::PropvalResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Headline figures of one scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioRow {
    pub scenario: ScenarioKind,
    /// Weight in the summary (0-1)
    pub probability: Rate,
    /// Annual mortgage rate after the overlay, percent
    pub interest_rate: Decimal,
    /// Rent after the overlay
    pub monthly_rent: Money,
    pub monthly_cash_flow: Money,
    /// Percent
    pub cap_rate: Decimal,
    /// Percent
    pub cash_on_cash_return: Decimal,
    /// Percent; `None` when unsolvable
    pub internal_rate_of_return: Option<Decimal>,
    /// Equity in the final projection year
    pub equity_at_horizon: Money,
    /// Total return in the final projection year
    pub total_return_at_horizon: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSummary {
    pub rows: Vec<ScenarioRow>,
    pub weighted_monthly_cash_flow: Money,
    /// `None` if any scenario's IRR is unsolvable
    pub weighted_internal_rate_of_return: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSet {
    pub conservative: InvestmentAnalysis,
    pub moderate: InvestmentAnalysis,
    pub optimistic: InvestmentAnalysis,
    pub summary: ScenarioSummary,
}

impl ScenarioSet {
    pub fn get(&self, kind: ScenarioKind) -> &InvestmentAnalysis {
        match kind {
            ScenarioKind::Conservative => &self.conservative,
            ScenarioKind::Moderate => &self.moderate,
            ScenarioKind::Optimistic => &self.optimistic,
        }
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Run the investment analysis under the default conservative, moderate and
/// optimistic overlays.
pub fn generate_scenarios(
    valuation: &ValuationResult,
    rental: &RentalEstimate,
    base_loan: &LoanTerms,
) -> PropvalResult<ScenarioSet> {
    generate_scenarios_with(
        valuation,
        rental,
        base_loan,
        &ScenarioAssumptions::default(),
    )
}

/// Run the investment analysis once per scenario overlay. The moderate case
/// is the base case unchanged.
pub fn generate_scenarios_with(
    valuation: &ValuationResult,
    rental: &RentalEstimate,
    base_loan: &LoanTerms,
    assumptions: &ScenarioAssumptions,
) -> PropvalResult<ScenarioSet> {
    assumptions.validate()?;

    let run = |kind: ScenarioKind| -> PropvalResult<InvestmentAnalysis> {
        let overlay = assumptions.overlay(kind);
        let loan = overlay.apply_to_loan(base_loan);
        let analysis_assumptions = overlay.apply_to_assumptions(&assumptions.base);
        tracing::debug!(
            scenario = %kind,
            rate = %loan.annual_interest_rate,
            rent_adjustment = %analysis_assumptions.rent_adjustment,
            "running scenario"
        );
        analyze_with(
            valuation,
            rental,
            &loan,
            assumptions.horizon_years,
            &analysis_assumptions,
        )
    };

    let conservative = run(ScenarioKind::Conservative)?;
    let moderate = run(ScenarioKind::Moderate)?;
    let optimistic = run(ScenarioKind::Optimistic)?;

    let rows: Vec<ScenarioRow> = [
        (ScenarioKind::Conservative, &conservative),
        (ScenarioKind::Moderate, &moderate),
        (ScenarioKind::Optimistic, &optimistic),
    ]
    .into_iter()
    .map(|(kind, analysis)| summary_row(kind, assumptions.weights.weight(kind), analysis))
    .collect();

    let weighted_monthly_cash_flow = round_currency(
        rows.iter()
            .map(|r| r.probability * r.monthly_cash_flow)
            .sum(),
    );
    let weighted_internal_rate_of_return = rows
        .iter()
        .map(|r| r.internal_rate_of_return.map(|irr| r.probability * irr))
        .sum::<Option<Decimal>>()
        .map(round_ratio);

    Ok(ScenarioSet {
        conservative,
        moderate,
        optimistic,
        summary: ScenarioSummary {
            rows,
            weighted_monthly_cash_flow,
            weighted_internal_rate_of_return,
        },
    })
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn summary_row(kind: ScenarioKind, probability: Rate, a: &InvestmentAnalysis) -> ScenarioRow {
    let last = a.yearly_projections.last();
    ScenarioRow {
        scenario: kind,
        probability,
        interest_rate: a.loan.interest_rate,
        monthly_rent: a.income.monthly_rent,
        monthly_cash_flow: a.monthly_cash_flow,
        cap_rate: a.cap_rate,
        cash_on_cash_return: a.cash_on_cash_return,
        internal_rate_of_return: a.internal_rate_of_return,
        equity_at_horizon: last.map(|p| p.equity).unwrap_or(Decimal::ZERO),
        total_return_at_horizon: last.map(|p| p.total_return).unwrap_or(Decimal::ZERO),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo;
    use crate::scenarios::ScenarioOverlay;
    use crate::valuation::{
        estimate_value_as_of, ConditionTier, MarketStatistics, PropertyCategory, PropertyInput,
    };
    use rust_decimal_macros::dec;

    fn inputs() -> (ValuationResult, RentalEstimate, LoanTerms) {
        let property = PropertyInput {
            location_code: "98402".into(),
            living_area: dec!(1400),
            lot_area: Some(dec!(5000)),
            bedrooms: 3,
            bathrooms: dec!(1.5),
            year_built: 1975,
            category: PropertyCategory::Detached,
            condition: ConditionTier::Original,
        };
        let valuation = estimate_value_as_of(
            &property,
            &MarketStatistics::default(),
            geo::resolve("98402"),
            2025,
        )
        .unwrap();
        let rental = RentalEstimate {
            monthly_rent: dec!(2400),
            rent_low: None,
            rent_high: None,
            confidence: None,
        };
        let loan = LoanTerms {
            purchase_price: valuation.point_estimate,
            down_payment_fraction: dec!(0.25),
            annual_interest_rate: dec!(0.065),
            amortization_years: 30,
        };
        (valuation, rental, loan)
    }

    #[test]
    fn test_scenarios_ordered() {
        let (v, r, l) = inputs();
        let set = generate_scenarios(&v, &r, &l).unwrap();
        assert!(set.conservative.monthly_cash_flow <= set.moderate.monthly_cash_flow);
        assert!(set.moderate.monthly_cash_flow <= set.optimistic.monthly_cash_flow);
        let irr = |a: &InvestmentAnalysis| a.internal_rate_of_return.unwrap();
        assert!(irr(&set.conservative) <= irr(&set.moderate));
        assert!(irr(&set.moderate) <= irr(&set.optimistic));
    }

    #[test]
    fn test_moderate_matches_base_analysis() {
        let (v, r, l) = inputs();
        let set = generate_scenarios(&v, &r, &l).unwrap();
        let base = crate::investment::analyze(&v, &r, &l, 10).unwrap();
        assert_eq!(set.moderate, base);
    }

    #[test]
    fn test_weighted_summary() {
        let (v, r, l) = inputs();
        let set = generate_scenarios(&v, &r, &l).unwrap();
        let s = &set.summary;
        assert_eq!(s.rows.len(), 3);
        let expected = round_currency(
            dec!(0.25) * set.conservative.monthly_cash_flow
                + dec!(0.5) * set.moderate.monthly_cash_flow
                + dec!(0.25) * set.optimistic.monthly_cash_flow,
        );
        assert_eq!(s.weighted_monthly_cash_flow, expected);
        assert!(s.weighted_internal_rate_of_return.is_some());
    }

    #[test]
    fn test_invalid_overlay_fails_before_running() {
        let (v, r, l) = inputs();
        let assumptions = ScenarioAssumptions {
            conservative: ScenarioOverlay::optimistic(),
            ..Default::default()
        };
        assert!(generate_scenarios_with(&v, &r, &l, &assumptions).is_err());
    }
}

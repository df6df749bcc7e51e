use pretty_assertions::assert_eq;
use proptest::prelude::*;
use propval_core::geo;
use propval_core::investment::{analyze_with, LoanTerms};
use propval_core::scenarios::{
    generate_scenarios, generate_scenarios_with, ScenarioAssumptions, ScenarioKind,
    ScenarioOverlay,
};
use propval_core::valuation::{
    estimate_value_as_of, ConditionTier, MarketStatistics, PropertyCategory, PropertyInput,
    RentalEstimate, ValuationResult,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn valuation(code: &str, area: u32, year_built: i32) -> ValuationResult {
    let property = PropertyInput {
        location_code: code.into(),
        living_area: Decimal::from(area),
        lot_area: Some(dec!(6000)),
        bedrooms: 3,
        bathrooms: dec!(2),
        year_built,
        category: PropertyCategory::Detached,
        condition: ConditionTier::WellMaintained,
    };
    estimate_value_as_of(&property, &MarketStatistics::default(), geo::resolve(code), 2025)
        .unwrap()
}

fn rent(monthly: Decimal) -> RentalEstimate {
    RentalEstimate {
        monthly_rent: monthly,
        rent_low: None,
        rent_high: None,
        confidence: None,
    }
}

fn loan_for(v: &ValuationResult, down: Decimal, rate: Decimal) -> LoanTerms {
    LoanTerms {
        purchase_price: v.point_estimate,
        down_payment_fraction: down,
        annual_interest_rate: rate,
        amortization_years: 30,
    }
}

#[test]
fn test_moderate_is_the_unmodified_base_case() {
    let v = valuation("98682", 1700, 1994);
    let r = rent(dec!(2600));
    let l = loan_for(&v, dec!(0.20), dec!(0.07));
    let assumptions = ScenarioAssumptions::default();

    let set = generate_scenarios_with(&v, &r, &l, &assumptions).unwrap();
    let base = analyze_with(&v, &r, &l, assumptions.horizon_years, &assumptions.base).unwrap();
    assert_eq!(set.moderate, base);
    assert_eq!(set.get(ScenarioKind::Moderate), &base);
}

#[test]
fn test_overlays_shift_the_rate_both_ways() {
    let v = valuation("98682", 1700, 1994);
    let set = generate_scenarios(&v, &rent(dec!(2600)), &loan_for(&v, dec!(0.20), dec!(0.07))).unwrap();
    assert_eq!(set.conservative.loan.interest_rate, dec!(7.5));
    assert_eq!(set.moderate.loan.interest_rate, dec!(7));
    assert_eq!(set.optimistic.loan.interest_rate, dec!(6.5));
    assert_eq!(set.conservative.income.monthly_rent, dec!(2340));
    assert_eq!(set.optimistic.income.monthly_rent, dec!(2860));
}

#[test]
fn test_custom_overlays_are_honoured() {
    let v = valuation("98402", 1500, 1985);
    let r = rent(dec!(2300));
    let l = loan_for(&v, dec!(0.25), dec!(0.065));
    let assumptions = ScenarioAssumptions {
        conservative: ScenarioOverlay {
            rate_shift: dec!(0.02),
            ..ScenarioOverlay::neutral()
        },
        optimistic: ScenarioOverlay {
            rent_adjustment: dec!(0.2),
            ..ScenarioOverlay::neutral()
        },
        horizon_years: 15,
        ..Default::default()
    };
    let set = generate_scenarios_with(&v, &r, &l, &assumptions).unwrap();
    assert_eq!(set.conservative.loan.interest_rate, dec!(8.5));
    assert_eq!(set.conservative.income.monthly_rent, dec!(2300));
    assert_eq!(set.optimistic.income.monthly_rent, dec!(2760));
    assert_eq!(set.moderate.yearly_projections.len(), 15);
}

#[test]
fn test_summary_rows_follow_scenario_order() {
    let v = valuation("98208", 2000, 2008);
    let set = generate_scenarios(&v, &rent(dec!(3100)), &loan_for(&v, dec!(0.20), dec!(0.068))).unwrap();
    let kinds: Vec<ScenarioKind> = set.summary.rows.iter().map(|r| r.scenario).collect();
    assert_eq!(kinds, ScenarioKind::ALL.to_vec());
    let total: Decimal = set.summary.rows.iter().map(|r| r.probability).sum();
    assert_eq!(total, Decimal::ONE);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(40))]

    #[test]
    fn prop_scenarios_are_ordered(
        code in prop_oneof![Just("98103"), Just("98208"), Just("98402"), Just("98682"), Just("30301")],
        area in 800u32..4000,
        year_built in 1920i32..2024,
        rent_per_k in 3u32..9,
        down_pct in 5u32..50,
        rate_bp in 300u32..900,
    ) {
        let v = valuation(code, area, year_built);
        let monthly = v.point_estimate * Decimal::from(rent_per_k) / dec!(1000);
        let l = loan_for(&v, Decimal::from(down_pct) / dec!(100), Decimal::from(rate_bp) / dec!(10000));
        let set = generate_scenarios(&v, &rent(monthly.round()), &l).unwrap();

        prop_assert!(set.conservative.monthly_cash_flow <= set.moderate.monthly_cash_flow);
        prop_assert!(set.moderate.monthly_cash_flow <= set.optimistic.monthly_cash_flow);

        if let (Some(c), Some(m), Some(o)) = (
            set.conservative.internal_rate_of_return,
            set.moderate.internal_rate_of_return,
            set.optimistic.internal_rate_of_return,
        ) {
            prop_assert!(c <= m, "conservative {} > moderate {}", c, m);
            prop_assert!(m <= o, "moderate {} > optimistic {}", m, o);
        }

        let last = |kind: ScenarioKind| set.get(kind).yearly_projections.last().map(|p| p.equity);
        prop_assert!(last(ScenarioKind::Conservative) <= last(ScenarioKind::Moderate));
        prop_assert!(last(ScenarioKind::Moderate) <= last(ScenarioKind::Optimistic));
    }

    #[test]
    fn prop_scenarios_are_reproducible(area in 900u32..3500, rate_bp in 400u32..800) {
        let v = valuation("98103", area, 1999);
        let l = loan_for(&v, dec!(0.2), Decimal::from(rate_bp) / dec!(10000));
        let a = generate_scenarios(&v, &rent(dec!(3200)), &l).unwrap();
        let b = generate_scenarios(&v, &rent(dec!(3200)), &l).unwrap();
        prop_assert_eq!(a, b);
    }
}

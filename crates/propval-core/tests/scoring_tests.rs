use pretty_assertions::assert_eq;
use propval_core::geo;
use propval_core::investment::{analyze, InvestmentAnalysis, LoanTerms};
use propval_core::scoring::{explain, recommendation_score, risk_score, score};
use propval_core::valuation::{
    estimate_value_as_of, ConditionTier, MarketStatistics, PropertyCategory, PropertyInput,
    RentalEstimate,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn property(year_built: i32) -> PropertyInput {
    PropertyInput {
        location_code: "98402".into(),
        living_area: dec!(1600),
        lot_area: Some(dec!(6500)),
        bedrooms: 3,
        bathrooms: dec!(2),
        year_built,
        category: PropertyCategory::Detached,
        condition: ConditionTier::WellMaintained,
    }
}

fn rental() -> RentalEstimate {
    RentalEstimate {
        monthly_rent: dec!(2700),
        rent_low: None,
        rent_high: None,
        confidence: None,
    }
}

fn base_analysis() -> InvestmentAnalysis {
    let v = estimate_value_as_of(
        &property(1996),
        &MarketStatistics::default(),
        geo::resolve("98402"),
        2025,
    )
    .unwrap();
    let loan = LoanTerms {
        purchase_price: v.point_estimate,
        down_payment_fraction: dec!(0.20),
        annual_interest_rate: dec!(0.07),
        amortization_years: 30,
    };
    analyze(&v, &rental(), &loan, 10).unwrap()
}

/// Analysis pinned to the given headline figures.
fn with_figures(
    monthly_cash_flow: Decimal,
    cap_rate: Decimal,
    cash_on_cash: Decimal,
    dscr: Option<Decimal>,
) -> InvestmentAnalysis {
    let mut a = base_analysis();
    a.monthly_cash_flow = monthly_cash_flow;
    a.cap_rate = cap_rate;
    a.cash_on_cash_return = cash_on_cash;
    a.debt_service_coverage_ratio = dscr;
    a
}

fn strong_market() -> MarketStatistics {
    MarketStatistics {
        median_price_per_area: Some(dec!(1000)),
        vacancy_rate: Some(dec!(4)),
        year_over_year_appreciation: Some(dec!(6)),
        unemployment_rate: Some(dec!(3)),
        crime_index: Some(dec!(20)),
        school_rating: Some(dec!(9)),
        days_on_market: Some(dec!(18)),
        ..Default::default()
    }
}

fn weak_market() -> MarketStatistics {
    MarketStatistics {
        vacancy_rate: Some(dec!(9.5)),
        crime_index: Some(dec!(82)),
        days_on_market: Some(dec!(75)),
        ..Default::default()
    }
}

// ===========================================================================
// Risk
// ===========================================================================

#[test]
fn test_risk_all_credits_caps_at_100() {
    let a = with_figures(dec!(650), dec!(7), dec!(9), Some(dec!(1.4)));
    assert_eq!(risk_score(&a, &strong_market()), 100);
}

#[test]
fn test_risk_all_debits_floors_at_zero() {
    let a = with_figures(dec!(-400), dec!(3), dec!(-6), Some(dec!(0.8)));
    assert_eq!(risk_score(&a, &weak_market()), 0);
}

#[test]
fn test_risk_without_market_data() {
    // strong coverage only: 50 + 10
    let a = with_figures(dec!(150), dec!(5), dec!(6), Some(dec!(1.3)));
    assert_eq!(risk_score(&a, &MarketStatistics::default()), 60);

    // all-cash counts as strong coverage
    let cash = with_figures(dec!(150), dec!(5), dec!(6), None);
    assert_eq!(risk_score(&cash, &MarketStatistics::default()), 60);
}

#[test]
fn test_risk_thresholds_are_strict() {
    // DSCR exactly 1.25 and cap exactly 6 earn nothing
    let a = with_figures(dec!(10), dec!(6), dec!(8), Some(dec!(1.25)));
    assert_eq!(risk_score(&a, &MarketStatistics::default()), 50);
}

// ===========================================================================
// Recommendation
// ===========================================================================

#[test]
fn test_recommendation_best_case() {
    let mut a = with_figures(dec!(650), dec!(9), dec!(13), Some(dec!(1.5)));
    a.price_per_area = Some(dec!(850));
    assert_eq!(recommendation_score(&a, &strong_market()), 100);
}

#[test]
fn test_recommendation_tier_edges() {
    let mut a = with_figures(dec!(500), dec!(8), dec!(12), Some(dec!(1.3)));
    a.price_per_area = None;
    // 20 + 15 + 15, market silent
    assert_eq!(recommendation_score(&a, &MarketStatistics::default()), 50);

    let flat = with_figures(Decimal::ZERO, dec!(4), dec!(5), Some(dec!(1.0)));
    assert_eq!(recommendation_score(&flat, &MarketStatistics::default()), 0);
}

#[test]
fn test_recommendation_price_per_area_bands() {
    let market = MarketStatistics {
        median_price_per_area: Some(dec!(400)),
        ..Default::default()
    };
    let points = |ppa: Decimal| {
        let mut a = with_figures(Decimal::ZERO, Decimal::ZERO, Decimal::ZERO, None);
        a.price_per_area = Some(ppa);
        recommendation_score(&a, &market)
    };
    assert_eq!(points(dec!(350)), 15);
    assert_eq!(points(dec!(360)), 10);
    assert_eq!(points(dec!(420)), 5);
    assert_eq!(points(dec!(440)), 0);
}

#[test]
fn test_scores_stay_in_range_for_real_analysis() {
    let a = base_analysis();
    for market in [strong_market(), weak_market(), MarketStatistics::default()] {
        let card = score(&a, &market);
        assert!(card.risk_score <= 100);
        assert!(card.recommendation_score <= 100);
    }
}

// ===========================================================================
// Commentary
// ===========================================================================

#[test]
fn test_commentary_flags_weak_deal() {
    let a = with_figures(dec!(-250), dec!(3.2), dec!(-4), Some(dec!(0.85)));
    let c = explain(&a, &weak_market(), &property(1962), &rental());
    assert!(c.warnings.iter().any(|w| w.contains("DSCR of 0.85")));
    assert!(c.warnings.iter().any(|w| w == "Significant negative cash flow"));
    assert!(c.warnings.iter().any(|w| w.contains("1962")));
    assert!(c.warnings.iter().any(|w| w.contains("75 days")));
    assert!(!c.insights.iter().any(|i| i.contains("cash flow")));
}

#[test]
fn test_commentary_praises_strong_deal() {
    let a = with_figures(dec!(420), dec!(8.5), dec!(11), Some(dec!(1.6)));
    let c = explain(&a, &strong_market(), &property(2004), &rental());
    assert!(c.insights.iter().any(|i| i.contains("420")));
    assert!(c.insights.iter().any(|i| i.contains("8.5%")));
    assert!(c.insights.iter().any(|i| i.contains("9/10")));
    assert!(c.warnings.is_empty(), "{:?}", c.warnings);
}

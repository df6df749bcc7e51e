use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::investment::InvestmentAnalysis;
use crate::types::round_ratio;
use crate::valuation::{MarketStatistics, PropertyInput, RentalEstimate};

/// Year whose projection is quoted in the insights.
pub const PROJECTION_HEADLINE_YEAR: u32 = 10;
/// Properties built before this year are flagged.
pub const OLDER_PROPERTY_YEAR: i32 = 1980;

/// Human-readable strengths and red flags of a purchase.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Commentary {
    pub insights: Vec<String>,
    pub warnings: Vec<String>,
}

pub fn explain(
    analysis: &InvestmentAnalysis,
    market: &MarketStatistics,
    property: &PropertyInput,
    rental: &RentalEstimate,
) -> Commentary {
    Commentary {
        insights: insights(analysis, market, rental),
        warnings: warnings(analysis, market, property),
    }
}

fn insights(a: &InvestmentAnalysis, m: &MarketStatistics, rental: &RentalEstimate) -> Vec<String> {
    let mut out = Vec::new();

    if a.monthly_cash_flow > dec!(300) {
        out.push(format!(
            "Strong positive cash flow of ${}/month",
            a.monthly_cash_flow
        ));
    } else if a.monthly_cash_flow > Decimal::ZERO {
        out.push(format!("Modest cash flow of ${}/month", a.monthly_cash_flow));
    }

    if a.cap_rate > dec!(8) {
        out.push(format!(
            "Excellent cap rate of {}% - above market average",
            a.cap_rate
        ));
    } else if a.cap_rate > dec!(5) {
        out.push(format!("Good cap rate of {}%", a.cap_rate));
    }

    if let Some(yoy) = m.year_over_year_appreciation.filter(|y| *y > dec!(5)) {
        out.push(format!(
            "Strong market appreciation of {}% annually",
            yoy.round_dp(1)
        ));
    }

    if let Some(dom) = m.days_on_market.filter(|d| *d < dec!(30)) {
        out.push(format!(
            "Hot market - properties sell in {dom} days on average"
        ));
    }

    if a.loan.purchase_price > Decimal::ZERO {
        let rent_to_price = rental.monthly_rent * dec!(12) / a.loan.purchase_price;
        if rent_to_price > dec!(0.01) {
            out.push(format!(
                "Strong rent-to-price ratio of {}%",
                round_ratio(rent_to_price * dec!(100))
            ));
        }
    }

    if let Some(rating) = m.school_rating.filter(|r| *r >= dec!(8)) {
        out.push(format!("Excellent school rating ({rating}/10)"));
    }

    if let Some(p) = a
        .yearly_projections
        .iter()
        .find(|p| p.year == PROJECTION_HEADLINE_YEAR)
    {
        out.push(format!(
            "{}-year projection: ${} value, ${} equity",
            p.year, p.property_value, p.equity
        ));
    }

    if let Some(irr) = a.internal_rate_of_return.filter(|r| *r > dec!(15)) {
        out.push(format!("Exceptional IRR of {irr}%"));
    }

    out
}

fn warnings(a: &InvestmentAnalysis, m: &MarketStatistics, property: &PropertyInput) -> Vec<String> {
    let mut out = Vec::new();

    if let Some(dscr) = a.debt_service_coverage_ratio.filter(|d| *d < Decimal::ONE) {
        out.push(format!("DSCR of {dscr} is below 1.0"));
    }

    if a.monthly_cash_flow < dec!(-100) {
        out.push("Significant negative cash flow".to_string());
    }

    if let Some(vacancy) = m.vacancy_rate.filter(|v| *v > dec!(8)) {
        out.push(format!("High vacancy rate of {}%", vacancy.round_dp(1)));
    }

    if let Some(crime) = m.crime_index.filter(|c| *c > dec!(70)) {
        out.push(format!("Higher crime index ({crime})"));
    }

    if property.year_built < OLDER_PROPERTY_YEAR {
        out.push(format!("Older property (built {})", property.year_built));
    }

    if let Some(dom) = m.days_on_market.filter(|d| *d > dec!(60)) {
        out.push(format!("Properties take {dom} days to sell"));
    }

    if let (Some(ppa), Some(market_ppa)) = (a.price_per_area, m.median_price_per_area) {
        if market_ppa > Decimal::ZERO && ppa > market_ppa * dec!(1.15) {
            let premium = ((ppa / market_ppa - Decimal::ONE) * dec!(100)).round();
            out.push(format!("Price per sq ft is {premium}% above market"));
        }
    }

    out
}

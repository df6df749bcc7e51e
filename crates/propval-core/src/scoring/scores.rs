use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::investment::InvestmentAnalysis;
use crate::valuation::MarketStatistics;

/// Both scores are integers in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreCard {
    /// Higher is safer
    pub risk_score: u32,
    /// Higher is a stronger buy
    pub recommendation_score: u32,
}

const RISK_BASE: i32 = 50;

/// Score an analysed purchase against its neighbourhood. Missing market
/// indicators neither add nor subtract points.
pub fn score(analysis: &InvestmentAnalysis, market: &MarketStatistics) -> ScoreCard {
    ScoreCard {
        risk_score: risk_score(analysis, market),
        recommendation_score: recommendation_score(analysis, market),
    }
}

fn above(value: Option<Decimal>, threshold: Decimal) -> bool {
    value.is_some_and(|v| v > threshold)
}

fn below(value: Option<Decimal>, threshold: Decimal) -> bool {
    value.is_some_and(|v| v < threshold)
}

fn clamp_score(score: i32) -> u32 {
    score.clamp(0, 100) as u32
}

pub fn risk_score(a: &InvestmentAnalysis, m: &MarketStatistics) -> u32 {
    let mut score = RISK_BASE;

    // An all-cash purchase has unlimited coverage
    let dscr_strong = a
        .debt_service_coverage_ratio
        .map_or(true, |d| d > dec!(1.25));
    let dscr_weak = below(a.debt_service_coverage_ratio, Decimal::ONE);

    let credits = [
        (dscr_strong, 10),
        (a.cap_rate > dec!(6), 10),
        (a.cash_on_cash_return > dec!(8), 10),
        (below(m.vacancy_rate, dec!(5)), 5),
        (above(m.year_over_year_appreciation, dec!(4)), 5),
        (below(m.unemployment_rate, dec!(4)), 5),
        (m.school_rating.is_some_and(|s| s >= dec!(8)), 5),
    ];
    let debits = [
        (dscr_weak, 15),
        (a.cap_rate < dec!(4), 10),
        (a.monthly_cash_flow < Decimal::ZERO, 20),
        (above(m.vacancy_rate, dec!(8)), 10),
        (above(m.crime_index, dec!(70)), 10),
        (above(m.days_on_market, dec!(60)), 5),
    ];

    score += credits.iter().filter(|(hit, _)| *hit).map(|(_, p)| p).sum::<i32>();
    score -= debits.iter().filter(|(hit, _)| *hit).map(|(_, p)| p).sum::<i32>();
    clamp_score(score)
}

/// Points for the first threshold the value clears, in descending order.
fn tiered(value: Decimal, tiers: &[(Decimal, i32)]) -> i32 {
    tiers
        .iter()
        .find(|(threshold, _)| value > *threshold)
        .map(|(_, points)| *points)
        .unwrap_or(0)
}

pub fn recommendation_score(a: &InvestmentAnalysis, m: &MarketStatistics) -> u32 {
    let mut score = 0;

    score += tiered(
        a.monthly_cash_flow,
        &[(dec!(500), 30), (dec!(200), 20), (Decimal::ZERO, 10)],
    );
    score += tiered(a.cap_rate, &[(dec!(8), 20), (dec!(6), 15), (dec!(4), 10)]);
    score += tiered(
        a.cash_on_cash_return,
        &[(dec!(12), 20), (dec!(8), 15), (dec!(5), 10)],
    );
    if let Some(yoy) = m.year_over_year_appreciation {
        score += tiered(yoy, &[(dec!(5), 8), (dec!(3), 5)]);
    }
    if let Some(vacancy) = m.vacancy_rate {
        score += if vacancy < dec!(5) {
            7
        } else if vacancy < dec!(7) {
            4
        } else {
            0
        };
    }
    if let (Some(ppa), Some(market_ppa)) = (a.price_per_area, m.median_price_per_area) {
        score += if ppa < market_ppa * dec!(0.9) {
            15
        } else if ppa < market_ppa {
            10
        } else if ppa < market_ppa * dec!(1.1) {
            5
        } else {
            0
        };
    }

    clamp_score(score)
}

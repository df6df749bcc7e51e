use chrono::Datelike;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::factors::{
    age_band, age_factor, category_multiplier, condition_multiplier, lot_premium,
    market_momentum, room_value, size_multiplier, AgeBand, MarketMomentum, RoomValue,
};
use super::property::{ConditionTier, MarketStatistics, PropertyCategory, PropertyInput};
use super::rent;
use crate::assumptions::ExpenseAssumptions;
use crate::geo::{self, GeoProfile};
use crate::types::{grow, round_currency, round_ratio, Money, Rate};
use crate::PropvalResult;

/// Half-width of the value band around the point estimate.
pub const VALUE_BAND: Decimal = dec!(0.03);
/// Forecast covers the current year plus this many years.
pub const FORECAST_YEARS: u32 = 5;

const DEFAULT_SALE_TO_LIST: Decimal = dec!(1.0);
const DEFAULT_MONTHS_OF_SUPPLY: Decimal = dec!(2.5);
const DEFAULT_SENTIMENT: Decimal = dec!(0.02);
const SENTIMENT_GROWTH_WEIGHT: Decimal = dec!(0.015);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Letter grade from the estimated net rental yield.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValuationGrade {
    #[serde(rename = "A+")]
    APlus,
    #[serde(rename = "A")]
    A,
    #[serde(rename = "B+")]
    BPlus,
    #[serde(rename = "B")]
    B,
}

impl ValuationGrade {
    /// Grade for a net yield given in percent.
    pub fn from_net_yield(net_yield_pct: Decimal) -> Self {
        if net_yield_pct > dec!(4.5) {
            Self::APlus
        } else if net_yield_pct > dec!(3.5) {
            Self::A
        } else if net_yield_pct > dec!(2.5) {
            Self::BPlus
        } else {
            Self::B
        }
    }
}

impl std::fmt::Display for ValuationGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::APlus => write!(f, "A+"),
            Self::A => write!(f, "A"),
            Self::BPlus => write!(f, "B+"),
            Self::B => write!(f, "B"),
        }
    }
}

/// Every intermediate factor of the estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationBreakdown {
    pub base_price_per_area: Money,
    pub size_multiplier: Decimal,
    pub adjusted_price_per_area: Money,
    pub structure_value: Money,
    pub rooms: RoomValue,
    pub lot_premium: Money,
    pub base_value: Money,
    pub age_band: AgeBand,
    pub age_factor: Decimal,
    pub momentum: MarketMomentum,
    pub condition_multiplier: Decimal,
    pub amenity_multiplier: Decimal,
    pub category_multiplier: Decimal,
}

/// What downstream investment analysis needs to know about the subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationContext {
    pub location_code: String,
    pub county: String,
    pub as_of_year: i32,
    pub living_area: Decimal,
    pub age_years: u32,
    pub condition: ConditionTier,
    pub category: PropertyCategory,
    pub tax_rate: Rate,
    /// Annual appreciation after the sentiment adjustment, never negative
    pub appreciation_rate: Rate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationResult {
    pub point_estimate: Money,
    pub low_bound: Money,
    pub high_bound: Money,
    /// Projected value for the current year and the next five
    pub forecast: Vec<Money>,
    pub grade: ValuationGrade,
    /// Estimated net rental yield, percent
    pub net_yield: Decimal,
    /// Rule-based monthly rent used for the grade
    pub estimated_monthly_rent: Money,
    /// 0-10, from market data or the location estimate
    pub school_rating: Decimal,
    pub market_news: Vec<String>,
    pub breakdown: ValuationBreakdown,
    pub context: ValuationContext,
    /// Defaults applied for missing inputs
    pub fallbacks: Vec<String>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Estimate market value as of the current calendar year.
pub fn estimate_value(
    property: &PropertyInput,
    market: &MarketStatistics,
    geo: &GeoProfile,
) -> PropvalResult<ValuationResult> {
    estimate_value_as_of(property, market, geo, chrono::Utc::now().year())
}

/// Estimate market value with property age measured against `as_of_year`.
///
/// Missing market statistics never fail the estimate; each default applied
/// is listed in `fallbacks`.
pub fn estimate_value_as_of(
    property: &PropertyInput,
    market: &MarketStatistics,
    geo: &GeoProfile,
    as_of_year: i32,
) -> PropvalResult<ValuationResult> {
    property.validate()?;
    let mut fallbacks: Vec<String> = Vec::new();

    // --- Market inputs ---
    let base_price_per_area = match market.median_price_per_area {
        Some(ppa) if ppa > Decimal::ZERO => ppa,
        _ => {
            fallbacks.push(format!(
                "median_price_per_area: {} tier of {} per sq ft",
                geo.name, geo.fallback_price_per_area
            ));
            geo.fallback_price_per_area
        }
    };
    let sale_to_list = market.sale_to_list_ratio.unwrap_or_else(|| {
        fallbacks.push(format!("sale_to_list_ratio: {DEFAULT_SALE_TO_LIST}"));
        DEFAULT_SALE_TO_LIST
    });
    let months_of_supply = market.months_of_supply.unwrap_or_else(|| {
        fallbacks.push(format!("months_of_supply: {DEFAULT_MONTHS_OF_SUPPLY}"));
        DEFAULT_MONTHS_OF_SUPPLY
    });
    let sentiment = market.sentiment_score.unwrap_or_else(|| {
        fallbacks.push(format!("sentiment_score: {DEFAULT_SENTIMENT}"));
        DEFAULT_SENTIMENT
    });
    let school_rating = match market.school_rating {
        Some(rating) => rating,
        None => {
            let estimate = geo::school_rating_estimate(geo);
            fallbacks.push(format!("school_rating: location estimate {estimate}"));
            estimate
        }
    };

    // --- Structure, rooms, land ---
    let area = property.living_area;
    let size = size_multiplier(area);
    let adjusted_price_per_area = base_price_per_area * size;
    let structure_value = adjusted_price_per_area * area;
    let rooms = room_value(area, property.bedrooms, property.bathrooms, geo);
    let lot = lot_premium(
        property.lot_area.unwrap_or(Decimal::ZERO).max(Decimal::ZERO),
        geo,
    );
    let base_value = structure_value + rooms.total() + lot;

    // --- Multipliers ---
    let age = property.age_as_of(as_of_year);
    let depreciation = age_factor(age, property.condition);
    let momentum = market_momentum(months_of_supply, sale_to_list, sentiment);
    let condition = condition_multiplier(property.condition);
    let amenity = geo.amenity_multiplier();
    let category = category_multiplier(property.category);

    let final_value =
        base_value * depreciation * momentum.multiplier * condition * amenity * category;

    // --- Band and forecast ---
    let appreciation_rate =
        (geo.base_appreciation_rate + sentiment * SENTIMENT_GROWTH_WEIGHT).max(Decimal::ZERO);
    let forecast = (0..=FORECAST_YEARS)
        .map(|year| grow(final_value, appreciation_rate, year).map(round_currency))
        .collect::<PropvalResult<Vec<Money>>>()?;

    // --- Grade ---
    let estimated_rent = rent::monthly_rent(property);
    let net_yield = net_yield_pct(final_value, estimated_rent, property, age, geo);

    tracing::debug!(
        location_code = %property.location_code,
        county = geo.name,
        fallbacks = fallbacks.len(),
        "valuation estimated"
    );

    Ok(ValuationResult {
        point_estimate: round_currency(final_value),
        low_bound: round_currency(final_value * (Decimal::ONE - VALUE_BAND)),
        high_bound: round_currency(final_value * (Decimal::ONE + VALUE_BAND)),
        forecast,
        grade: ValuationGrade::from_net_yield(net_yield),
        net_yield,
        estimated_monthly_rent: round_currency(estimated_rent),
        school_rating,
        market_news: market.recent_news.clone(),
        breakdown: ValuationBreakdown {
            base_price_per_area,
            size_multiplier: size,
            adjusted_price_per_area,
            structure_value: round_currency(structure_value),
            rooms,
            lot_premium: round_currency(lot),
            base_value: round_currency(base_value),
            age_band: age_band(age),
            age_factor: depreciation,
            momentum,
            condition_multiplier: condition,
            amenity_multiplier: amenity,
            category_multiplier: category,
        },
        context: ValuationContext {
            location_code: property.location_code.trim().to_string(),
            county: geo.name.to_string(),
            as_of_year,
            living_area: area,
            age_years: age,
            condition: property.condition,
            category: property.category,
            tax_rate: geo.tax_rate,
            appreciation_rate,
        },
        fallbacks,
    })
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// (12 * rent - tax - insurance - maintenance - 12 * HOA) / value, percent.
fn net_yield_pct(
    value: Money,
    monthly_rent: Money,
    property: &PropertyInput,
    age: u32,
    geo: &GeoProfile,
) -> Decimal {
    if value <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let costs = ExpenseAssumptions::default();
    let annual_rent = monthly_rent * dec!(12);
    let tax = value * geo.tax_rate;
    let insurance = value * costs.insurance_rate;
    let maintenance = value * costs.maintenance_rate(age, property.condition);
    let hoa = costs.monthly_hoa_for(property.category) * dec!(12);

    round_ratio((annual_rent - tax - insurance - maintenance - hoa) / value * dec!(100))
}

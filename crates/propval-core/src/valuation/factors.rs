//! Piecewise valuation factors.
//!
//! Each non-linear adjustment is an ordered table walked top to bottom, so the
//! breakpoints can be read (and tested) directly against the constants.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::property::{ConditionTier, PropertyCategory};
use crate::geo::GeoProfile;
use crate::types::Money;

// ---------------------------------------------------------------------------
// Size
// ---------------------------------------------------------------------------

/// (exclusive upper bound on living area, price-per-area multiplier).
/// An area equal to a bound falls through to the next row.
pub const SIZE_BUCKETS: [(Decimal, Decimal); 6] = [
    (dec!(1000), dec!(1.18)),
    (dec!(1500), dec!(1.10)),
    (dec!(2000), dec!(1.05)),
    (dec!(2500), dec!(1.00)),
    (dec!(3500), dec!(0.96)),
    (dec!(5000), dec!(0.92)),
];

/// Multiplier for homes at or above the last bucket bound.
pub const LARGE_HOME_MULTIPLIER: Decimal = dec!(0.88);

pub fn size_multiplier(living_area: Decimal) -> Decimal {
    SIZE_BUCKETS
        .iter()
        .find(|(upper, _)| living_area < *upper)
        .map(|(_, m)| *m)
        .unwrap_or(LARGE_HOME_MULTIPLIER)
}

// ---------------------------------------------------------------------------
// Age and condition
// ---------------------------------------------------------------------------

/// Age bands, each closed at its upper bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgeBand {
    /// 0-5 years
    New,
    /// 6-15 years
    Recent,
    /// 16-30 years
    Established,
    /// 31-50 years
    Mature,
    /// Over 50 years
    Historic,
}

const AGE_BANDS: [(u32, AgeBand); 4] = [
    (5, AgeBand::New),
    (15, AgeBand::Recent),
    (30, AgeBand::Established),
    (50, AgeBand::Mature),
];

pub fn age_band(age: u32) -> AgeBand {
    AGE_BANDS
        .iter()
        .find(|(max_age, _)| age <= *max_age)
        .map(|(_, band)| *band)
        .unwrap_or(AgeBand::Historic)
}

/// Linear depreciation `start - slope * (age - origin)`, optionally floored.
#[derive(Debug, Clone, Copy, PartialEq)]
struct DepreciationLine {
    start: Decimal,
    slope: Decimal,
    origin: u32,
    floor: Option<Decimal>,
}

impl DepreciationLine {
    const fn new(start: Decimal, slope: Decimal, origin: u32) -> Self {
        Self {
            start,
            slope,
            origin,
            floor: None,
        }
    }

    const fn flat(value: Decimal) -> Self {
        Self::new(value, Decimal::ZERO, 0)
    }

    fn at(&self, age: u32) -> Decimal {
        let elapsed = Decimal::from(age.saturating_sub(self.origin));
        let value = self.start - self.slope * elapsed;
        match self.floor {
            Some(floor) => value.max(floor),
            None => value,
        }
    }
}

fn depreciation_line(band: AgeBand, condition: ConditionTier) -> DepreciationLine {
    use ConditionTier::*;
    match band {
        AgeBand::New => match condition {
            NewLuxury | Renovated => DepreciationLine::new(dec!(1.12), dec!(0.015), 0),
            _ => DepreciationLine::new(dec!(1.08), dec!(0.012), 0),
        },
        AgeBand::Recent => match condition {
            NewLuxury | Renovated => DepreciationLine::new(dec!(1.05), dec!(0.003), 0),
            _ => DepreciationLine::new(dec!(0.98), dec!(0.003), 0),
        },
        AgeBand::Established => match condition {
            Renovated => DepreciationLine::new(dec!(1.02), dec!(0.008), 15),
            WellMaintained | NewLuxury => DepreciationLine::new(dec!(0.95), dec!(0.012), 15),
            _ => DepreciationLine::new(dec!(0.88), dec!(0.015), 15),
        },
        AgeBand::Mature => match condition {
            Renovated => DepreciationLine::new(dec!(0.90), dec!(0.006), 30),
            WellMaintained => DepreciationLine::new(dec!(0.75), dec!(0.008), 30),
            _ => DepreciationLine::new(dec!(0.65), dec!(0.010), 30),
        },
        AgeBand::Historic => match condition {
            Renovated | NewLuxury => DepreciationLine::flat(dec!(0.85)),
            WellMaintained => DepreciationLine::flat(dec!(0.68)),
            _ => DepreciationLine {
                floor: Some(dec!(0.5)),
                ..DepreciationLine::new(dec!(0.60), dec!(0.005), 50)
            },
        },
    }
}

/// Combined age/condition depreciation factor.
pub fn age_factor(age: u32, condition: ConditionTier) -> Decimal {
    depreciation_line(age_band(age), condition).at(age)
}

/// Price multiplier for the condition tier on top of depreciation.
pub fn condition_multiplier(condition: ConditionTier) -> Decimal {
    match condition {
        ConditionTier::NewLuxury => dec!(1.15),
        ConditionTier::Renovated => dec!(1.08),
        ConditionTier::WellMaintained => dec!(1.00),
        ConditionTier::Original => dec!(0.91),
        ConditionTier::FixerUpper => dec!(0.79),
        ConditionTier::Unspecified => Decimal::ONE,
    }
}

/// Discount for attached homes; other categories are neutral.
pub fn category_multiplier(category: PropertyCategory) -> Decimal {
    match category {
        PropertyCategory::Attached => dec!(0.91),
        PropertyCategory::Detached | PropertyCategory::Other => Decimal::ONE,
    }
}

// ---------------------------------------------------------------------------
// Rooms
// ---------------------------------------------------------------------------

const AREA_PER_EXPECTED_BEDROOM: Decimal = dec!(500);
const AREA_PER_EXPECTED_BATHROOM: Decimal = dec!(700);

/// Value contributed by bedrooms and bathrooms, discounted when the count is
/// high for the living area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomValue {
    pub expected_bedrooms: Decimal,
    pub expected_bathrooms: Decimal,
    pub bedroom_value: Money,
    pub bathroom_value: Money,
}

impl RoomValue {
    pub fn total(&self) -> Money {
        self.bedroom_value + self.bathroom_value
    }
}

pub fn room_value(
    living_area: Decimal,
    bedrooms: u32,
    bathrooms: Decimal,
    geo: &GeoProfile,
) -> RoomValue {
    let expected_bedrooms = (living_area / AREA_PER_EXPECTED_BEDROOM)
        .floor()
        .clamp(dec!(2), dec!(5));
    let expected_bathrooms = (living_area / AREA_PER_EXPECTED_BATHROOM)
        .floor()
        .clamp(dec!(1.5), dec!(4));

    let bedrooms = Decimal::from(bedrooms);
    let excess_beds = bedrooms - expected_bedrooms;
    let bed_discount = if excess_beds > Decimal::ONE {
        dec!(0.85)
    } else if excess_beds > Decimal::ZERO {
        dec!(0.95)
    } else {
        Decimal::ONE
    };

    let bath_discount = if bathrooms - expected_bathrooms > dec!(0.5) {
        dec!(0.90)
    } else {
        Decimal::ONE
    };

    RoomValue {
        expected_bedrooms,
        expected_bathrooms,
        bedroom_value: bedrooms * geo.bedroom_unit_value * bed_discount,
        bathroom_value: bathrooms * geo.bathroom_unit_value * bath_discount,
    }
}

// ---------------------------------------------------------------------------
// Lot
// ---------------------------------------------------------------------------

/// (tier lower bound, tier upper bound, share of land value). The last tier
/// is open-ended. Area inside a tier's (lower, upper] range earns its share.
pub const LOT_TIERS: [(Decimal, Option<Decimal>, Decimal); 4] = [
    (dec!(0), Some(dec!(4000)), dec!(0)),
    (dec!(4000), Some(dec!(8000)), dec!(0.85)),
    (dec!(8000), Some(dec!(15000)), dec!(0.65)),
    (dec!(15000), None, dec!(0.45)),
];

/// Premium for land beyond the standard lot, tiered at declining shares of
/// the location's land value per area unit.
pub fn lot_premium(lot_area: Decimal, geo: &GeoProfile) -> Money {
    let rate = geo.lot_value_per_area_unit;
    LOT_TIERS
        .iter()
        .map(|(lower, upper, share)| {
            let top = upper.map_or(lot_area, |u| lot_area.min(u));
            let in_tier = (top - *lower).max(Decimal::ZERO);
            in_tier * rate * *share
        })
        .sum()
}

// ---------------------------------------------------------------------------
// Market momentum
// ---------------------------------------------------------------------------

/// Months of supply below which the market counts as tight.
pub const BALANCED_SUPPLY_MONTHS: Decimal = dec!(3.5);
/// Sale-to-list ratio treated as neutral.
pub const NEUTRAL_SALE_TO_LIST: Decimal = dec!(0.97);
pub const MOMENTUM_FLOOR: Decimal = dec!(0.85);
pub const MOMENTUM_CEILING: Decimal = dec!(1.25);

/// Momentum components, kept separate for the breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketMomentum {
    pub supply_pressure: Decimal,
    pub bidding_pressure: Decimal,
    pub sentiment_lift: Decimal,
    /// 1 + components, clamped to [0.85, 1.25]
    pub multiplier: Decimal,
}

pub fn market_momentum(
    months_of_supply: Decimal,
    sale_to_list_ratio: Decimal,
    sentiment: Decimal,
) -> MarketMomentum {
    let supply_pressure = ((BALANCED_SUPPLY_MONTHS - months_of_supply) * dec!(0.04)).max(Decimal::ZERO);
    let bidding_pressure = (sale_to_list_ratio - NEUTRAL_SALE_TO_LIST) * dec!(1.5);
    let sentiment_lift = sentiment * dec!(0.12);
    let multiplier = (Decimal::ONE + supply_pressure + bidding_pressure + sentiment_lift)
        .clamp(MOMENTUM_FLOOR, MOMENTUM_CEILING);

    MarketMomentum {
        supply_pressure,
        bidding_pressure,
        sentiment_lift,
        multiplier,
    }
}

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::property::{ConditionTier, PropertyInput, RentalEstimate};
use crate::types::{round_currency, Money};

/// Base monthly rent per square foot of living area.
pub const BASE_RENT_PER_AREA: Money = dec!(2.45);
/// Half-width of the rent range around the estimate.
pub const RENT_RANGE: Decimal = dec!(0.08);
/// Confidence attached to the rule-based estimate.
pub const RULE_BASED_CONFIDENCE: Decimal = dec!(0.6);

/// Per-area rent multiplier by bedroom count, relative to a 3-bedroom home.
pub fn bedroom_rent_multiplier(bedrooms: u32) -> Decimal {
    match bedrooms {
        1 => dec!(1.28),
        2 => dec!(1.18),
        3 => dec!(1.00),
        4 => dec!(1.15),
        5 => dec!(1.35),
        _ => Decimal::ONE,
    }
}

pub fn condition_rent_multiplier(condition: ConditionTier) -> Decimal {
    match condition {
        ConditionTier::NewLuxury => dec!(1.15),
        ConditionTier::Renovated => dec!(1.08),
        ConditionTier::WellMaintained => dec!(1.00),
        ConditionTier::Original => dec!(0.94),
        ConditionTier::FixerUpper => dec!(0.85),
        ConditionTier::Unspecified => Decimal::ONE,
    }
}

/// Unrounded rule-based monthly rent.
pub(crate) fn monthly_rent(property: &PropertyInput) -> Money {
    property.living_area
        * BASE_RENT_PER_AREA
        * bedroom_rent_multiplier(property.bedrooms)
        * condition_rent_multiplier(property.condition)
}

/// Rule-based rent estimate, used when no provider estimate is available.
pub fn estimate_rent(property: &PropertyInput) -> RentalEstimate {
    let rent = monthly_rent(property);
    RentalEstimate {
        monthly_rent: round_currency(rent),
        rent_low: Some(round_currency(rent * (Decimal::ONE - RENT_RANGE))),
        rent_high: Some(round_currency(rent * (Decimal::ONE + RENT_RANGE))),
        confidence: Some(RULE_BASED_CONFIDENCE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::valuation::PropertyCategory;
    use rust_decimal_macros::dec;

    fn property(bedrooms: u32, condition: ConditionTier) -> PropertyInput {
        PropertyInput {
            location_code: "98103".into(),
            living_area: dec!(1000),
            lot_area: None,
            bedrooms,
            bathrooms: dec!(1),
            year_built: 1990,
            category: PropertyCategory::Detached,
            condition,
        }
    }

    #[test]
    fn test_three_bed_baseline() {
        let est = estimate_rent(&property(3, ConditionTier::WellMaintained));
        assert_eq!(est.monthly_rent, dec!(2450));
        assert_eq!(est.rent_low, Some(dec!(2254)));
        assert_eq!(est.rent_high, Some(dec!(2646)));
    }

    #[test]
    fn test_multipliers_compose() {
        let est = estimate_rent(&property(5, ConditionTier::FixerUpper));
        // 1000 * 2.45 * 1.35 * 0.85 = 2811.375
        assert_eq!(est.monthly_rent, dec!(2811));
        let est = estimate_rent(&property(7, ConditionTier::Unspecified));
        assert_eq!(est.monthly_rent, dec!(2450));
    }
}

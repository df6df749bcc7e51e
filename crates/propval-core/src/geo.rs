use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Rate};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Counties with calibrated location coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum County {
    King,
    Snohomish,
    Pierce,
    Clark,
}

impl std::fmt::Display for County {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::King => write!(f, "King"),
            Self::Snohomish => write!(f, "Snohomish"),
            Self::Pierce => write!(f, "Pierce"),
            Self::Clark => write!(f, "Clark"),
        }
    }
}

/// Location coefficients for one county. Immutable; see [`resolve`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoProfile {
    /// County name, or "Default" for the fallback profile
    pub name: &'static str,
    /// Annual property tax as a fraction of value
    pub tax_rate: Rate,
    /// Long-run annual price appreciation
    pub base_appreciation_rate: Rate,
    /// Land value per area unit, scales the lot premium tiers
    pub lot_value_per_area_unit: Money,
    /// Value multiplier for school quality (1.0 = neutral)
    pub school_premium: Decimal,
    /// Value multiplier for walkability
    pub walkability_factor: Decimal,
    /// Value multiplier for commute distance to major employers
    pub job_proximity_factor: Decimal,
    /// Value multiplier for local crime; below 1.0 is a discount
    pub crime_discount: Decimal,
    /// Value multiplier for transit access
    pub transit_premium: Decimal,
    /// County-wide price level relative to the region. Reported only; not
    /// part of [`GeoProfile::amenity_multiplier`]
    pub county_premium: Decimal,
    /// Neighbourhood desirability score (0-1), feeds the school rating estimate
    pub niche_score: Decimal,
    /// Price per area used when no market median is available
    pub fallback_price_per_area: Money,
    /// Value contributed by one bedroom
    pub bedroom_unit_value: Money,
    /// Value contributed by one bathroom
    pub bathroom_unit_value: Money,
}

impl GeoProfile {
    /// Product of the micro-market multipliers applied to the final value.
    pub fn amenity_multiplier(&self) -> Decimal {
        self.school_premium
            * self.walkability_factor
            * self.job_proximity_factor
            * self.crime_discount
            * self.transit_premium
    }

    pub fn is_default(&self) -> bool {
        self.name == DEFAULT_PROFILE.name
    }
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

const KING: GeoProfile = GeoProfile {
    name: "King",
    tax_rate: dec!(0.0094),
    base_appreciation_rate: dec!(0.045),
    lot_value_per_area_unit: dec!(75),
    school_premium: dec!(1.08),
    walkability_factor: dec!(1.05),
    job_proximity_factor: dec!(1.12),
    crime_discount: dec!(0.98),
    transit_premium: dec!(1.06),
    county_premium: dec!(1.15),
    niche_score: dec!(0.6),
    fallback_price_per_area: dec!(520),
    bedroom_unit_value: dec!(35000),
    bathroom_unit_value: dec!(25000),
};

const SNOHOMISH: GeoProfile = GeoProfile {
    name: "Snohomish",
    tax_rate: dec!(0.0089),
    base_appreciation_rate: dec!(0.042),
    lot_value_per_area_unit: dec!(40),
    school_premium: dec!(1.04),
    walkability_factor: dec!(1.02),
    job_proximity_factor: dec!(1.06),
    crime_discount: dec!(0.99),
    transit_premium: dec!(1.03),
    county_premium: dec!(1.08),
    niche_score: dec!(0.4),
    fallback_price_per_area: dec!(465),
    bedroom_unit_value: dec!(28000),
    bathroom_unit_value: dec!(20000),
};

const PIERCE: GeoProfile = GeoProfile {
    name: "Pierce",
    tax_rate: dec!(0.0102),
    base_appreciation_rate: dec!(0.038),
    lot_value_per_area_unit: dec!(25),
    school_premium: dec!(1.02),
    walkability_factor: dec!(1.01),
    job_proximity_factor: dec!(1.03),
    crime_discount: dec!(0.97),
    transit_premium: dec!(1.02),
    county_premium: dec!(1.00),
    niche_score: dec!(0.2),
    fallback_price_per_area: dec!(380),
    bedroom_unit_value: dec!(22000),
    bathroom_unit_value: dec!(16000),
};

const CLARK: GeoProfile = GeoProfile {
    name: "Clark",
    tax_rate: dec!(0.0091),
    base_appreciation_rate: dec!(0.040),
    lot_value_per_area_unit: dec!(28),
    school_premium: dec!(1.03),
    walkability_factor: dec!(1.02),
    job_proximity_factor: dec!(1.04),
    crime_discount: dec!(0.98),
    transit_premium: dec!(1.02),
    county_premium: dec!(1.03),
    niche_score: dec!(0.3),
    fallback_price_per_area: dec!(450),
    bedroom_unit_value: dec!(22000),
    bathroom_unit_value: dec!(16000),
};

static DEFAULT_PROFILE: GeoProfile = GeoProfile {
    name: "Default",
    tax_rate: dec!(0.0092),
    base_appreciation_rate: dec!(0.040),
    lot_value_per_area_unit: dec!(35),
    school_premium: dec!(1.0),
    walkability_factor: dec!(1.0),
    job_proximity_factor: dec!(1.0),
    crime_discount: dec!(1.0),
    transit_premium: dec!(1.0),
    county_premium: dec!(1.0),
    niche_score: dec!(0.0),
    fallback_price_per_area: dec!(450),
    bedroom_unit_value: dec!(22000),
    bathroom_unit_value: dec!(16000),
};

static PROFILES: [(County, GeoProfile); 4] = [
    (County::King, KING),
    (County::Snohomish, SNOHOMISH),
    (County::Pierce, PIERCE),
    (County::Clark, CLARK),
];

static LOCATION_CODES: [(&str, County); 10] = [
    ("98275", County::Snohomish),
    ("98012", County::Snohomish),
    ("98208", County::Snohomish),
    ("98052", County::King),
    ("98103", County::King),
    ("98004", County::King),
    ("98033", County::King),
    ("98402", County::Pierce),
    ("98391", County::Pierce),
    ("98682", County::Clark),
];

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// County a location code belongs to, if it is a calibrated one.
pub fn county_for(location_code: &str) -> Option<County> {
    let code = location_code.trim();
    LOCATION_CODES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, county)| *county)
}

/// Profile for a county.
pub fn profile(county: County) -> &'static GeoProfile {
    PROFILES
        .iter()
        .find(|(c, _)| *c == county)
        .map(|(_, p)| p)
        .unwrap_or(&DEFAULT_PROFILE)
}

/// Resolve a location code to its profile. Unknown codes get the Default
/// profile; this never fails.
pub fn resolve(location_code: &str) -> &'static GeoProfile {
    match county_for(location_code) {
        Some(county) => profile(county),
        None => {
            tracing::debug!(location_code, "unknown location code, using Default geo profile");
            &DEFAULT_PROFILE
        }
    }
}

/// The fallback profile.
pub fn default_profile() -> &'static GeoProfile {
    &DEFAULT_PROFILE
}

/// Fallback school rating (0-10) when no rating service data is supplied.
pub fn school_rating_estimate(profile: &GeoProfile) -> Decimal {
    (dec!(7.5) + profile.niche_score).floor()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_known_code_resolves_county() {
        let p = resolve("98052");
        assert_eq!(p.name, "King");
        assert_eq!(p.tax_rate, dec!(0.0094));
        assert_eq!(county_for(" 98275 "), Some(County::Snohomish));
    }

    #[test]
    fn test_unknown_code_falls_back_to_default() {
        let p = resolve("10001");
        assert_eq!(p.name, "Default");
        assert!(p.is_default());
        assert_eq!(p.amenity_multiplier(), Decimal::ONE);
        assert!(resolve("").is_default());
    }

    #[test]
    fn test_every_code_maps_to_calibrated_profile() {
        for (code, county) in LOCATION_CODES.iter() {
            let p = resolve(code);
            assert_eq!(p.name, county.to_string());
            assert!(!p.is_default());
        }
    }

    #[test]
    fn test_amenity_multiplier_king() {
        // 1.08 * 1.05 * 1.12 * 0.98 * 1.06
        let expected = dec!(1.08) * dec!(1.05) * dec!(1.12) * dec!(0.98) * dec!(1.06);
        assert_eq!(profile(County::King).amenity_multiplier(), expected);
    }

    #[test]
    fn test_school_rating_estimate() {
        assert_eq!(school_rating_estimate(profile(County::King)), dec!(8));
        assert_eq!(school_rating_estimate(default_profile()), dec!(7));
    }
}

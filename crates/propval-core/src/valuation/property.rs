use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::PropvalError;
use crate::types::{Money, Rate};
use crate::PropvalResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Structural category. Only the attached discount and HOA dues depend on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyCategory {
    #[serde(alias = "Single Family House", alias = "Single Family", alias = "Detached")]
    Detached,
    #[serde(alias = "Townhome", alias = "Townhouse", alias = "Attached")]
    Attached,
    /// Condos, multi-family and anything unrecognised; neutral in the model
    #[serde(other)]
    Other,
}

impl std::fmt::Display for PropertyCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Detached => write!(f, "Detached"),
            Self::Attached => write!(f, "Attached"),
            Self::Other => write!(f, "Other"),
        }
    }
}

/// Condition tier, best first: NewLuxury > Renovated > WellMaintained >
/// Original > FixerUpper. `Unspecified` is neutral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionTier {
    #[serde(alias = "New/Luxury", alias = "NewLuxury")]
    NewLuxury,
    #[serde(alias = "Renovated")]
    Renovated,
    #[serde(alias = "Well Maintained", alias = "WellMaintained")]
    WellMaintained,
    #[serde(alias = "Original")]
    Original,
    #[serde(alias = "Fixer-upper", alias = "Fixer-Upper", alias = "FixerUpper")]
    FixerUpper,
    #[serde(other)]
    Unspecified,
}

impl std::fmt::Display for ConditionTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NewLuxury => write!(f, "New/Luxury"),
            Self::Renovated => write!(f, "Renovated"),
            Self::WellMaintained => write!(f, "Well Maintained"),
            Self::Original => write!(f, "Original"),
            Self::FixerUpper => write!(f, "Fixer-upper"),
            Self::Unspecified => write!(f, "Unspecified"),
        }
    }
}

/// Physical attributes of the subject property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyInput {
    /// Postal code used to resolve the location profile
    pub location_code: String,
    /// Finished living area in square feet
    pub living_area: Decimal,
    /// Lot area in square feet, if known
    #[serde(default)]
    pub lot_area: Option<Decimal>,
    pub bedrooms: u32,
    pub bathrooms: Decimal,
    pub year_built: i32,
    pub category: PropertyCategory,
    #[serde(default = "default_condition")]
    pub condition: ConditionTier,
}

fn default_condition() -> ConditionTier {
    ConditionTier::Unspecified
}

impl PropertyInput {
    pub fn validate(&self) -> PropvalResult<()> {
        if self.living_area <= Decimal::ZERO {
            return Err(PropvalError::InvalidInput {
                field: "living_area".into(),
                reason: "Living area must be positive".into(),
            });
        }
        if self.bathrooms < Decimal::ZERO {
            return Err(PropvalError::InvalidInput {
                field: "bathrooms".into(),
                reason: "Bathroom count cannot be negative".into(),
            });
        }
        Ok(())
    }

    /// Age in whole years as of `year`; future build years count as new.
    pub fn age_as_of(&self, year: i32) -> u32 {
        u32::try_from(year.saturating_sub(self.year_built)).unwrap_or(0)
    }
}

/// Location statistics as delivered by the data providers. Every field is
/// optional; percentages are in percent (4.5 = 4.5%).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketStatistics {
    pub median_price_per_area: Option<Money>,
    /// Sold price over list price (1.02 = 2% over asking)
    pub sale_to_list_ratio: Option<Decimal>,
    pub months_of_supply: Option<Decimal>,
    /// News sentiment, roughly -1..1
    pub sentiment_score: Option<Decimal>,
    pub recent_news: Vec<String>,
    pub vacancy_rate: Option<Decimal>,
    pub year_over_year_appreciation: Option<Decimal>,
    pub unemployment_rate: Option<Decimal>,
    /// 0-100, higher is worse
    pub crime_index: Option<Decimal>,
    /// 0-10
    pub school_rating: Option<Decimal>,
    pub days_on_market: Option<Decimal>,
    pub median_income: Option<Money>,
    pub population: Option<u64>,
    pub median_price: Option<Money>,
    pub average_rent: Option<Money>,
}

/// Monthly rent for the subject, from a provider or [`super::estimate_rent`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentalEstimate {
    pub monthly_rent: Money,
    #[serde(default)]
    pub rent_low: Option<Money>,
    #[serde(default)]
    pub rent_high: Option<Money>,
    /// Provider confidence (0-1)
    #[serde(default)]
    pub confidence: Option<Rate>,
}

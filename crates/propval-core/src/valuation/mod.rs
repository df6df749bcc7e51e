//! Rule-based market value estimate for a single residential property.

pub mod factors;
pub mod model;
pub mod property;
pub mod rent;

pub use model::{
    estimate_value, estimate_value_as_of, ValuationBreakdown, ValuationContext, ValuationGrade,
    ValuationResult,
};
pub use property::{
    ConditionTier, MarketStatistics, PropertyCategory, PropertyInput, RentalEstimate,
};
pub use rent::estimate_rent;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::PropvalError;
use crate::investment::{AnalysisAssumptions, LoanTerms};
use crate::types::{Multiple, Rate};
use crate::PropvalResult;

/// Tolerance on the scenario weights summing to one.
pub const WEIGHT_TOLERANCE: Decimal = dec!(0.001);

/// Default projection horizon for scenario runs.
pub const DEFAULT_HORIZON_YEARS: u32 = 10;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    Conservative,
    Moderate,
    Optimistic,
}

impl ScenarioKind {
    pub const ALL: [ScenarioKind; 3] = [Self::Conservative, Self::Moderate, Self::Optimistic];
}

impl std::fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Conservative => write!(f, "Conservative"),
            Self::Moderate => write!(f, "Moderate"),
            Self::Optimistic => write!(f, "Optimistic"),
        }
    }
}

/// Deltas applied to the base case for one scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioOverlay {
    /// Added to the annual interest rate; the result is floored at zero
    pub rate_shift: Rate,
    /// Fractional change to rent
    pub rent_adjustment: Rate,
    /// Multiplies every expense line
    pub expense_multiplier: Multiple,
    /// Added to the appreciation rate
    pub appreciation_shift: Rate,
    /// Added to annual rent growth
    pub rent_growth_shift: Rate,
}

impl Default for ScenarioOverlay {
    fn default() -> Self {
        Self::neutral()
    }
}

impl ScenarioOverlay {
    pub fn neutral() -> Self {
        Self {
            rate_shift: Decimal::ZERO,
            rent_adjustment: Decimal::ZERO,
            expense_multiplier: Decimal::ONE,
            appreciation_shift: Decimal::ZERO,
            rent_growth_shift: Decimal::ZERO,
        }
    }

    pub fn conservative() -> Self {
        Self {
            rate_shift: dec!(0.005),
            rent_adjustment: dec!(-0.10),
            expense_multiplier: dec!(1.15),
            appreciation_shift: dec!(-0.02),
            rent_growth_shift: dec!(-0.01),
        }
    }

    pub fn optimistic() -> Self {
        Self {
            rate_shift: dec!(-0.005),
            rent_adjustment: dec!(0.10),
            expense_multiplier: dec!(0.90),
            appreciation_shift: dec!(0.015),
            rent_growth_shift: dec!(0.01),
        }
    }

    pub fn is_neutral(&self) -> bool {
        *self == Self::neutral()
    }

    /// True when no axis is better for the investor than the base case.
    pub fn is_unfavorable(&self) -> bool {
        self.rate_shift >= Decimal::ZERO
            && self.rent_adjustment <= Decimal::ZERO
            && self.expense_multiplier >= Decimal::ONE
            && self.appreciation_shift <= Decimal::ZERO
            && self.rent_growth_shift <= Decimal::ZERO
    }

    /// True when no axis is worse for the investor than the base case.
    pub fn is_favorable(&self) -> bool {
        self.rate_shift <= Decimal::ZERO
            && self.rent_adjustment >= Decimal::ZERO
            && self.expense_multiplier <= Decimal::ONE
            && self.appreciation_shift >= Decimal::ZERO
            && self.rent_growth_shift >= Decimal::ZERO
    }

    /// Loan terms with the rate shift applied.
    pub fn apply_to_loan(&self, base: &LoanTerms) -> LoanTerms {
        LoanTerms {
            annual_interest_rate: (base.annual_interest_rate + self.rate_shift)
                .max(Decimal::ZERO),
            ..base.clone()
        }
    }

    /// Analysis assumptions with this overlay composed onto `base`.
    pub fn apply_to_assumptions(&self, base: &AnalysisAssumptions) -> AnalysisAssumptions {
        let mut out = base.clone();
        out.rent_adjustment = base.rent_adjustment + self.rent_adjustment;
        out.expense_multiplier = base.expense_multiplier * self.expense_multiplier;
        out.appreciation_shift = base.appreciation_shift + self.appreciation_shift;
        out.growth.rent_growth = base.growth.rent_growth + self.rent_growth_shift;
        out
    }
}

/// Probability weights for the scenario summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioWeights {
    pub conservative: Rate,
    pub moderate: Rate,
    pub optimistic: Rate,
}

impl Default for ScenarioWeights {
    fn default() -> Self {
        Self {
            conservative: dec!(0.25),
            moderate: dec!(0.50),
            optimistic: dec!(0.25),
        }
    }
}

impl ScenarioWeights {
    pub fn weight(&self, kind: ScenarioKind) -> Rate {
        match kind {
            ScenarioKind::Conservative => self.conservative,
            ScenarioKind::Moderate => self.moderate,
            ScenarioKind::Optimistic => self.optimistic,
        }
    }

    pub fn validate(&self) -> PropvalResult<()> {
        for kind in ScenarioKind::ALL {
            let w = self.weight(kind);
            if w < Decimal::ZERO || w > Decimal::ONE {
                return Err(PropvalError::InvalidInput {
                    field: format!("weights.{}", kind.to_string().to_lowercase()),
                    reason: "Weight must be between 0 and 1".into(),
                });
            }
        }
        let total = self.conservative + self.moderate + self.optimistic;
        if (total - Decimal::ONE).abs() > WEIGHT_TOLERANCE {
            return Err(PropvalError::InvalidInput {
                field: "weights".into(),
                reason: format!("Scenario weights must sum to 1.0 (got {total})"),
            });
        }
        Ok(())
    }
}

/// Scenario configuration: overlays, weights, horizon and the base-case
/// analysis assumptions every scenario starts from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioAssumptions {
    pub conservative: ScenarioOverlay,
    pub optimistic: ScenarioOverlay,
    pub weights: ScenarioWeights,
    pub horizon_years: u32,
    pub base: AnalysisAssumptions,
}

impl Default for ScenarioAssumptions {
    fn default() -> Self {
        Self {
            conservative: ScenarioOverlay::conservative(),
            optimistic: ScenarioOverlay::optimistic(),
            weights: ScenarioWeights::default(),
            horizon_years: DEFAULT_HORIZON_YEARS,
            base: AnalysisAssumptions::default(),
        }
    }
}

impl ScenarioAssumptions {
    pub fn overlay(&self, kind: ScenarioKind) -> ScenarioOverlay {
        match kind {
            ScenarioKind::Conservative => self.conservative.clone(),
            ScenarioKind::Moderate => ScenarioOverlay::neutral(),
            ScenarioKind::Optimistic => self.optimistic.clone(),
        }
    }

    pub fn validate(&self) -> PropvalResult<()> {
        if !self.conservative.is_unfavorable() || self.conservative.is_neutral() {
            return Err(PropvalError::InvalidInput {
                field: "conservative".into(),
                reason: "Conservative overlay must be less favorable than the base case on \
                         every axis and not entirely neutral"
                    .into(),
            });
        }
        if !self.optimistic.is_favorable() || self.optimistic.is_neutral() {
            return Err(PropvalError::InvalidInput {
                field: "optimistic".into(),
                reason: "Optimistic overlay must be more favorable than the base case on \
                         every axis and not entirely neutral"
                    .into(),
            });
        }
        self.weights.validate()?;
        self.base.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_defaults_validate() {
        assert!(ScenarioAssumptions::default().validate().is_ok());
    }

    #[test]
    fn test_reversed_overlay_rejected() {
        let mut a = ScenarioAssumptions::default();
        a.conservative.rent_adjustment = dec!(0.05);
        assert!(a.validate().is_err());

        let mut a = ScenarioAssumptions::default();
        a.optimistic = ScenarioOverlay::neutral();
        assert!(a.validate().is_err());
    }

    #[test]
    fn test_weights_must_sum_to_one() {
        let mut a = ScenarioAssumptions::default();
        a.weights.moderate = dec!(0.6);
        assert!(a.validate().is_err());

        // within tolerance
        a.weights.moderate = dec!(0.5005);
        assert!(a.validate().is_ok());
    }

    #[test]
    fn test_optimistic_rate_floored_at_zero() {
        let base = LoanTerms {
            purchase_price: dec!(300000),
            down_payment_fraction: dec!(0.25),
            annual_interest_rate: dec!(0.002),
            amortization_years: 30,
        };
        let loan = ScenarioOverlay::optimistic().apply_to_loan(&base);
        assert_eq!(loan.annual_interest_rate, Decimal::ZERO);
    }

    #[test]
    fn test_overlay_composes_with_base_assumptions() {
        let base = AnalysisAssumptions {
            expense_multiplier: dec!(1.1),
            ..Default::default()
        };
        let out = ScenarioOverlay::conservative().apply_to_assumptions(&base);
        assert_eq!(out.expense_multiplier, dec!(1.265));
        assert_eq!(out.rent_adjustment, dec!(-0.10));
        assert_eq!(out.growth.rent_growth, dec!(0.02));
    }
}

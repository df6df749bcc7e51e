//! Operating-cost and growth coefficients.
//!
//! These are assumptions rather than model structure, so they are plain serde
//! structs with `Default` impls that callers (and the CLI's `--assumptions`
//! file) can override.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::PropvalError;
use crate::types::{Money, Rate};
use crate::valuation::{ConditionTier, PropertyCategory};
use crate::PropvalResult;

/// Age below which the reduced maintenance rate applies.
pub const NEWER_PROPERTY_AGE: u32 = 15;

/// Annual operating-expense coefficients.
///
/// Basis per line is fixed: insurance and maintenance scale with property
/// value, management and vacancy with gross income, HOA and utilities are flat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpenseAssumptions {
    /// Insurance as a fraction of value
    pub insurance_rate: Rate,
    /// Maintenance as a fraction of value for newer or renovated homes
    pub maintenance_rate_newer: Rate,
    /// Maintenance as a fraction of value otherwise
    pub maintenance_rate_older: Rate,
    /// Property management fee as a fraction of gross income
    pub management_fee_rate: Rate,
    /// Vacancy reserve as a fraction of gross income
    pub vacancy_rate: Rate,
    /// HOA dues per month for non-detached homes
    pub monthly_hoa: Money,
    /// Owner-paid utilities per month
    pub monthly_utilities: Money,
    /// Closing and initial costs as a fraction of purchase price
    pub closing_cost_rate: Rate,
    /// Other annual income (parking, storage, laundry)
    pub other_income: Money,
}

impl Default for ExpenseAssumptions {
    fn default() -> Self {
        Self {
            insurance_rate: dec!(0.003),
            maintenance_rate_newer: dec!(0.006),
            maintenance_rate_older: dec!(0.015),
            management_fee_rate: dec!(0.08),
            vacancy_rate: dec!(0.05),
            monthly_hoa: dec!(250),
            monthly_utilities: dec!(100),
            closing_cost_rate: dec!(0.03),
            other_income: Decimal::ZERO,
        }
    }
}

impl ExpenseAssumptions {
    pub fn maintenance_rate(&self, age_years: u32, condition: ConditionTier) -> Rate {
        if age_years < NEWER_PROPERTY_AGE || condition == ConditionTier::Renovated {
            self.maintenance_rate_newer
        } else {
            self.maintenance_rate_older
        }
    }

    pub fn monthly_hoa_for(&self, category: PropertyCategory) -> Money {
        match category {
            PropertyCategory::Detached => Decimal::ZERO,
            _ => self.monthly_hoa,
        }
    }

    pub fn validate(&self) -> PropvalResult<()> {
        let fractions = [
            ("insurance_rate", self.insurance_rate),
            ("maintenance_rate_newer", self.maintenance_rate_newer),
            ("maintenance_rate_older", self.maintenance_rate_older),
            ("management_fee_rate", self.management_fee_rate),
            ("vacancy_rate", self.vacancy_rate),
            ("closing_cost_rate", self.closing_cost_rate),
        ];
        for (field, value) in fractions {
            if value < Decimal::ZERO || value >= Decimal::ONE {
                return Err(PropvalError::InvalidInput {
                    field: format!("expenses.{field}"),
                    reason: "Must be a fraction in [0, 1)".into(),
                });
            }
        }
        if self.management_fee_rate + self.vacancy_rate >= Decimal::ONE {
            return Err(PropvalError::InvalidInput {
                field: "expenses.management_fee_rate".into(),
                reason: "Management fee and vacancy reserve together must stay below 100% of income"
                    .into(),
            });
        }
        let flats = [
            ("monthly_hoa", self.monthly_hoa),
            ("monthly_utilities", self.monthly_utilities),
            ("other_income", self.other_income),
        ];
        for (field, value) in flats {
            if value < Decimal::ZERO {
                return Err(PropvalError::InvalidInput {
                    field: format!("expenses.{field}"),
                    reason: "Must not be negative".into(),
                });
            }
        }
        Ok(())
    }
}

/// Annual growth of rent and operating expenses over the projection.
/// Property appreciation comes from the valuation's location profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowthAssumptions {
    pub rent_growth: Rate,
    pub expense_growth: Rate,
}

impl Default for GrowthAssumptions {
    fn default() -> Self {
        Self {
            rent_growth: dec!(0.03),
            expense_growth: dec!(0.025),
        }
    }
}

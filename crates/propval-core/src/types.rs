use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::PropvalError;
use crate::PropvalResult;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%) on input. Outputs that are
/// documented as percentages carry the `_pct` meaning explicitly.
pub type Rate = Decimal;

/// Multiples (e.g., 14.9x gross rent)
pub type Multiple = Decimal;

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

// ---------------------------------------------------------------------------
// Boundary rounding
// ---------------------------------------------------------------------------

/// Round a currency amount to whole units (half away from zero).
pub fn round_currency(value: Money) -> Money {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Round a currency amount to cents.
pub fn round_cents(value: Money) -> Money {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Round a ratio or percentage figure to 2 dp.
pub fn round_ratio(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Convert a decimal rate into a percentage rounded to 2 dp (0.0725 -> 7.25).
pub fn to_percent(rate: Rate) -> Decimal {
    round_ratio(rate * dec!(100))
}

/// Compute (1 + r)^n via iterative multiplication (avoids Decimal::powd drift).
/// Fails once the factor leaves the Decimal range.
pub fn compound(rate: Rate, n: u32) -> PropvalResult<Decimal> {
    let factor = Decimal::ONE
        .checked_add(rate)
        .ok_or_else(|| compounding_overflow(rate, n))?;
    (0..n).try_fold(Decimal::ONE, |acc, _| {
        acc.checked_mul(factor)
            .ok_or_else(|| compounding_overflow(rate, n))
    })
}

/// `amount * (1 + rate)^n`, as an error instead of an overflow.
pub fn grow(amount: Money, rate: Rate, n: u32) -> PropvalResult<Money> {
    compound(rate, n)?
        .checked_mul(amount)
        .ok_or_else(|| compounding_overflow(rate, n))
}

fn compounding_overflow(rate: Rate, n: u32) -> PropvalError {
    PropvalError::FinancialImpossibility(format!(
        "Compounding {rate} over {n} periods overflows"
    ))
}

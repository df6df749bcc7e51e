use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::PropvalError;
use crate::types::{compound, Money, Rate};
use crate::PropvalResult;

/// Width of the final IRR bracket, in rate units.
pub const IRR_TOLERANCE: Decimal = dec!(0.000001);
/// Bisection cap. Halving an 11-unit bracket reaches 1e-6 in ~24 steps.
pub const MAX_IRR_ITERATIONS: u32 = 200;
/// Lowest admissible rate (-99%).
pub const IRR_LOWER_BOUND: Rate = dec!(-0.99);
/// Highest admissible rate (1000%).
pub const IRR_UPPER_BOUND: Rate = dec!(10.0);

// Long streams leave Decimal range at the extreme rates; each bracket end
// retreats along its ladder until NPV is representable.
const LOWER_BOUND_LADDER: [Rate; 4] = [IRR_LOWER_BOUND, dec!(-0.90), dec!(-0.75), dec!(-0.50)];
const UPPER_BOUND_LADDER: [Rate; 3] = [IRR_UPPER_BOUND, dec!(5.0), dec!(2.0)];

/// Net Present Value of a series of cash flows
pub fn npv(rate: Rate, cash_flows: &[Money]) -> PropvalResult<Money> {
    if rate <= dec!(-1) {
        return Err(PropvalError::InvalidInput {
            field: "rate".into(),
            reason: "Discount rate must be greater than -100%".into(),
        });
    }

    let mut result = Decimal::ZERO;
    let one_plus_r = Decimal::ONE + rate;
    let mut discount = Decimal::ONE;

    for (t, cf) in cash_flows.iter().enumerate() {
        if t > 0 {
            discount = discount.checked_mul(one_plus_r).ok_or_else(|| {
                PropvalError::FinancialImpossibility(format!(
                    "discount factor overflows at rate {rate} (period {t})"
                ))
            })?;
        }
        if discount.is_zero() {
            return Err(PropvalError::DivisionByZero {
                context: format!("NPV discount factor at period {t}"),
            });
        }
        result = cf
            .checked_div(discount)
            .and_then(|pv| result.checked_add(pv))
            .ok_or_else(|| {
                PropvalError::FinancialImpossibility(format!(
                    "NPV overflows at rate {rate} (period {t})"
                ))
            })?;
    }

    Ok(result)
}

/// Outcome of the bounded IRR search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IrrSolution {
    /// Solved rate as a decimal, `None` when no root was bracketed or the
    /// iteration cap was hit before the bracket closed.
    pub rate: Option<Rate>,
    pub iterations: u32,
    pub converged: bool,
}

/// Internal Rate of Return by bisection on [`IRR_LOWER_BOUND`, `IRR_UPPER_BOUND`].
///
/// Bisection is used instead of Newton-Raphson so that termination and the
/// reported precision do not depend on the starting guess. The bracket must
/// contain a sign change of NPV; otherwise the stream has no IRR in the
/// admissible range and `rate` is `None`.
pub fn irr(cash_flows: &[Money]) -> PropvalResult<IrrSolution> {
    if cash_flows.len() < 2 {
        return Err(PropvalError::InsufficientData(
            "IRR requires at least 2 cash flows".into(),
        ));
    }

    let (mut lo, npv_lo) = representable_bound(&LOWER_BOUND_LADDER, cash_flows)?;
    let (mut hi, npv_hi) = representable_bound(&UPPER_BOUND_LADDER, cash_flows)?;

    if npv_lo.is_zero() {
        return Ok(IrrSolution {
            rate: Some(lo),
            iterations: 0,
            converged: true,
        });
    }
    if npv_hi.is_zero() {
        return Ok(IrrSolution {
            rate: Some(hi),
            iterations: 0,
            converged: true,
        });
    }
    if npv_lo.is_sign_negative() == npv_hi.is_sign_negative() {
        return Ok(IrrSolution {
            rate: None,
            iterations: 0,
            converged: false,
        });
    }

    let lo_negative = npv_lo.is_sign_negative();

    for i in 1..=MAX_IRR_ITERATIONS {
        let mid = (lo + hi) / dec!(2);
        let npv_mid = npv(mid, cash_flows)?;

        if npv_mid.is_zero() {
            return Ok(IrrSolution {
                rate: Some(mid),
                iterations: i,
                converged: true,
            });
        }

        if npv_mid.is_sign_negative() == lo_negative {
            lo = mid;
        } else {
            hi = mid;
        }

        if hi - lo < IRR_TOLERANCE {
            return Ok(IrrSolution {
                rate: Some((lo + hi) / dec!(2)),
                iterations: i,
                converged: true,
            });
        }
    }

    Ok(IrrSolution {
        rate: None,
        iterations: MAX_IRR_ITERATIONS,
        converged: false,
    })
}

fn representable_bound(ladder: &[Rate], cash_flows: &[Money]) -> PropvalResult<(Rate, Money)> {
    let mut last_err = None;
    for &rate in ladder {
        match npv(rate, cash_flows) {
            Ok(value) => return Ok((rate, value)),
            Err(e) => last_err = Some(e),
        }
    }
    Err(last_err.unwrap_or_else(|| {
        PropvalError::InsufficientData("empty IRR bound ladder".into())
    }))
}

/// Standard fixed-rate mortgage payment: P * r(1+r)^n / ((1+r)^n - 1)
pub fn monthly_payment(
    principal: Money,
    monthly_rate: Rate,
    total_months: u32,
) -> PropvalResult<Money> {
    if total_months == 0 {
        return Err(PropvalError::DivisionByZero {
            context: "monthly payment with zero months".into(),
        });
    }

    if monthly_rate.is_zero() {
        // Interest-free: straight-line amortisation
        return Ok(principal / Decimal::from(total_months));
    }

    let factor = compound(monthly_rate, total_months)?;
    let numerator = principal
        .checked_mul(monthly_rate)
        .and_then(|v| v.checked_mul(factor))
        .ok_or_else(|| {
            PropvalError::FinancialImpossibility(format!(
                "Payment on {principal} at {monthly_rate} per month over {total_months} months overflows"
            ))
        })?;
    let denominator = factor - Decimal::ONE;

    if denominator.is_zero() {
        return Err(PropvalError::DivisionByZero {
            context: "mortgage payment denominator".into(),
        });
    }

    Ok(numerator / denominator)
}

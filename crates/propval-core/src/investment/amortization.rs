use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::PropvalError;
use crate::time_value::monthly_payment;
use crate::types::{Money, Rate};
use crate::PropvalResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One monthly payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationEntry {
    /// 1-based month number
    pub month: u32,
    pub payment: Money,
    pub interest: Money,
    pub principal: Money,
    /// Balance after this payment
    pub balance: Money,
}

/// Payments, interest and principal aggregated over one loan year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanYear {
    pub year: u32,
    pub debt_service: Money,
    pub interest: Money,
    pub principal: Money,
    pub closing_balance: Money,
}

/// Full monthly schedule of a fixed-rate, fully amortising loan.
///
/// The final scheduled payment clears whatever balance is left, so the
/// balance is exactly zero at the end of the term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    pub principal: Money,
    pub annual_rate: Rate,
    pub term_years: u32,
    /// Level monthly payment, unrounded
    pub monthly_payment: Money,
    pub entries: Vec<AmortizationEntry>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Build the monthly schedule for `principal` at `annual_rate` over
/// `term_years`. A zero rate amortises straight-line.
pub fn build_schedule(
    principal: Money,
    annual_rate: Rate,
    term_years: u32,
) -> PropvalResult<AmortizationSchedule> {
    if principal < Decimal::ZERO {
        return Err(PropvalError::InvalidInput {
            field: "loan_amount".into(),
            reason: "Loan amount cannot be negative".into(),
        });
    }
    if annual_rate < Decimal::ZERO {
        return Err(PropvalError::InvalidInput {
            field: "annual_interest_rate".into(),
            reason: "Interest rate cannot be negative".into(),
        });
    }
    if term_years == 0 {
        return Err(PropvalError::InvalidInput {
            field: "amortization_years".into(),
            reason: "Amortization term must be at least one year".into(),
        });
    }

    let monthly_rate = annual_rate / dec!(12);
    let total_months = term_years * 12;
    let payment = monthly_payment(principal, monthly_rate, total_months)?;

    let mut entries = Vec::with_capacity(total_months as usize);
    let mut balance = principal;
    for month in 1..=total_months {
        let interest = balance * monthly_rate;
        let (principal_part, payment_made) = if month == total_months {
            (balance, balance + interest)
        } else {
            let p = (payment - interest).min(balance);
            (p, p + interest)
        };
        balance = (balance - principal_part).max(Decimal::ZERO);
        entries.push(AmortizationEntry {
            month,
            payment: payment_made,
            interest,
            principal: principal_part,
            balance,
        });
    }

    Ok(AmortizationSchedule {
        principal,
        annual_rate,
        term_years,
        monthly_payment: payment,
        entries,
    })
}

impl AmortizationSchedule {
    /// Aggregate for loan year `year` (1-based). Years past the term carry
    /// no payments and a zero balance.
    pub fn year(&self, year: u32) -> LoanYear {
        let first = (year.saturating_sub(1) * 12) as usize;
        let months = self.entries.iter().skip(first).take(12);

        let mut summary = LoanYear {
            year,
            debt_service: Decimal::ZERO,
            interest: Decimal::ZERO,
            principal: Decimal::ZERO,
            closing_balance: self.balance_after_year(year),
        };
        for entry in months {
            summary.debt_service += entry.payment;
            summary.interest += entry.interest;
            summary.principal += entry.principal;
        }
        summary
    }

    /// Outstanding balance after `year` full loan years.
    pub fn balance_after_year(&self, year: u32) -> Money {
        if year == 0 {
            return self.principal;
        }
        let last = (year * 12) as usize;
        self.entries
            .get(last.saturating_sub(1))
            .map(|e| e.balance)
            .unwrap_or(Decimal::ZERO)
    }

    pub fn total_interest(&self) -> Money {
        self.entries.iter().map(|e| e.interest).sum()
    }

    pub fn has_debt(&self) -> bool {
        self.principal > Decimal::ZERO
    }
}

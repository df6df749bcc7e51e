use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::amortization::{build_schedule, AmortizationSchedule};
use crate::assumptions::{ExpenseAssumptions, GrowthAssumptions};
use crate::error::PropvalError;
use crate::time_value::irr;
use crate::types::{
    grow, round_cents, round_currency, round_ratio, to_percent, Money, Multiple, Rate,
};
use crate::valuation::{RentalEstimate, ValuationResult};
use crate::PropvalResult;

/// Longest supported projection horizon.
pub const MAX_HORIZON_YEARS: u32 = 50;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Financing terms for the acquisition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub purchase_price: Money,
    /// Down payment as a fraction of price (0.20 = 20%)
    pub down_payment_fraction: Rate,
    /// Annual nominal rate as a decimal (0.07 = 7%)
    pub annual_interest_rate: Rate,
    pub amortization_years: u32,
}

impl LoanTerms {
    pub fn validate(&self) -> PropvalResult<()> {
        if self.purchase_price <= Decimal::ZERO {
            return Err(PropvalError::InvalidInput {
                field: "purchase_price".into(),
                reason: "Purchase price must be positive".into(),
            });
        }
        if self.down_payment_fraction < Decimal::ZERO || self.down_payment_fraction > Decimal::ONE
        {
            return Err(PropvalError::InvalidInput {
                field: "down_payment_fraction".into(),
                reason: "Down payment must be a fraction between 0 and 1".into(),
            });
        }
        if self.annual_interest_rate < Decimal::ZERO {
            return Err(PropvalError::InvalidInput {
                field: "annual_interest_rate".into(),
                reason: "Interest rate cannot be negative".into(),
            });
        }
        if self.amortization_years == 0 {
            return Err(PropvalError::InvalidInput {
                field: "amortization_years".into(),
                reason: "Amortization term must be at least one year".into(),
            });
        }
        Ok(())
    }

    pub fn down_payment(&self) -> Money {
        self.purchase_price * self.down_payment_fraction
    }

    pub fn loan_amount(&self) -> Money {
        self.purchase_price - self.down_payment()
    }
}

/// Adjustments applied on top of the valuation and rental inputs.
/// The neutral default reproduces the base case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisAssumptions {
    pub expenses: ExpenseAssumptions,
    pub growth: GrowthAssumptions,
    /// Fractional change to the monthly rent (-0.10 = 10% lower)
    pub rent_adjustment: Rate,
    /// Applied to every operating-expense line
    pub expense_multiplier: Multiple,
    /// Added to the valuation's appreciation rate
    pub appreciation_shift: Rate,
}

impl Default for AnalysisAssumptions {
    fn default() -> Self {
        Self {
            expenses: ExpenseAssumptions::default(),
            growth: GrowthAssumptions::default(),
            rent_adjustment: Decimal::ZERO,
            expense_multiplier: Decimal::ONE,
            appreciation_shift: Decimal::ZERO,
        }
    }
}

impl AnalysisAssumptions {
    pub fn validate(&self) -> PropvalResult<()> {
        self.expenses.validate()?;
        if self.rent_adjustment <= dec!(-1) {
            return Err(PropvalError::InvalidInput {
                field: "rent_adjustment".into(),
                reason: "Rent adjustment must leave a positive rent".into(),
            });
        }
        if self.expense_multiplier < Decimal::ZERO {
            return Err(PropvalError::InvalidInput {
                field: "expense_multiplier".into(),
                reason: "Expense multiplier cannot be negative".into(),
            });
        }
        if self.growth.rent_growth <= dec!(-1) || self.growth.expense_growth <= dec!(-1) {
            return Err(PropvalError::InvalidInput {
                field: "growth".into(),
                reason: "Growth rates must be greater than -100%".into(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanSummary {
    pub purchase_price: Money,
    /// Cash paid at purchase, excluding closing costs
    pub down_payment: Money,
    /// Principal borrowed
    pub loan_amount: Money,
    /// Annual rate, percent
    pub interest_rate: Decimal,
    pub amortization_years: u32,
    /// Principal and interest, rounded to cents
    pub monthly_payment: Money,
    /// Twelve rounded monthly payments
    pub annual_debt_service: Money,
    /// Purchase price times the closing-cost rate
    pub closing_costs: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeSummary {
    /// Rent after any scenario adjustment
    pub monthly_rent: Money,
    pub annual_rent: Money,
    /// Annual non-rent income (parking, laundry)
    pub other_income: Money,
    /// Annual rent plus other income, before vacancy
    pub gross_income: Money,
}

/// Annual operating expenses by line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseBreakdown {
    pub property_tax: Money,
    pub insurance: Money,
    pub maintenance: Money,
    pub management: Money,
    pub hoa: Money,
    pub utilities: Money,
    pub vacancy: Money,
    pub total: Money,
}

/// Growth rates in effect for the projection, as decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthSummary {
    pub appreciation_rate: Rate,
    pub rent_growth: Rate,
    pub expense_growth: Rate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyProjection {
    /// Holding year, starting at 1
    pub year: u32,
    /// Value at the end of the year
    pub property_value: Money,
    /// Change in value over the year
    pub appreciation: Money,
    /// Gross income for the year
    pub rental_income: Money,
    pub operating_expenses: Money,
    /// Mortgage payments made in the year; zero once the loan is paid off
    pub debt_service: Money,
    /// Income less expenses and debt service
    pub cash_flow: Money,
    /// Sum of cash flow through this year
    pub cumulative_cash_flow: Money,
    pub principal_paid: Money,
    /// Loan balance at year end
    pub loan_balance: Money,
    /// Property value less loan balance
    pub equity: Money,
    /// Equity plus cumulative cash flow, less the initial investment
    pub total_return: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyEquity {
    pub year: u32,
    pub loan_balance: Money,
    pub property_value: Money,
    pub equity: Money,
    /// Percent of property value
    pub equity_percentage: Decimal,
}

/// Leveraged buy-and-hold analysis. Ratios are in percent, 2 dp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentAnalysis {
    pub loan: LoanSummary,
    pub income: IncomeSummary,
    /// First-year operating expenses
    pub expenses: ExpenseBreakdown,
    /// First-year net operating income: gross income less expenses
    pub noi: Money,
    /// NOI less debt service, divided by twelve
    pub monthly_cash_flow: Money,
    pub annual_cash_flow: Money,
    /// NOI / purchase price, percent
    pub cap_rate: Decimal,
    /// Annual cash flow / total investment, percent
    pub cash_on_cash_return: Decimal,
    /// Purchase price / annual rent
    pub gross_rent_multiplier: Multiple,
    /// `None` when the purchase carries no debt
    pub debt_service_coverage_ratio: Option<Decimal>,
    /// First-year cash flow, principal and appreciation over total
    /// investment, percent
    pub return_on_investment: Decimal,
    /// `None` when the cash-flow stream has no solvable IRR
    pub internal_rate_of_return: Option<Decimal>,
    /// Down payment plus closing costs
    pub total_investment: Money,
    /// Purchase price per square foot of living area
    pub price_per_area: Option<Money>,
    pub growth: GrowthSummary,
    /// One row per year of the horizon
    pub yearly_projections: Vec<YearlyProjection>,
    pub equity_build_up: Vec<YearlyEquity>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Analyse the purchase with neutral assumptions.
pub fn analyze(
    valuation: &ValuationResult,
    rental: &RentalEstimate,
    loan: &LoanTerms,
    horizon_years: u32,
) -> PropvalResult<InvestmentAnalysis> {
    analyze_with(
        valuation,
        rental,
        loan,
        horizon_years,
        &AnalysisAssumptions::default(),
    )
}

/// Analyse the purchase: first-year income, expenses and returns, then a
/// year-by-year projection over `horizon_years` and the resulting IRR.
pub fn analyze_with(
    valuation: &ValuationResult,
    rental: &RentalEstimate,
    loan: &LoanTerms,
    horizon_years: u32,
    assumptions: &AnalysisAssumptions,
) -> PropvalResult<InvestmentAnalysis> {
    validate_input(rental, loan, horizon_years, assumptions)?;

    let ctx = &valuation.context;
    let value = valuation.point_estimate;
    let appreciation_rate = ctx.appreciation_rate + assumptions.appreciation_shift;
    if appreciation_rate <= dec!(-1) {
        return Err(PropvalError::InvalidInput {
            field: "appreciation_shift".into(),
            reason: "Appreciation must stay above -100%".into(),
        });
    }

    // --- Financing ---
    let schedule = build_schedule(
        loan.loan_amount(),
        loan.annual_interest_rate,
        loan.amortization_years,
    )?;
    let monthly_payment = round_cents(schedule.monthly_payment);
    let annual_debt_service = monthly_payment * dec!(12);
    let closing_costs = loan.purchase_price * assumptions.expenses.closing_cost_rate;
    let total_investment = round_currency(loan.down_payment() + closing_costs);

    // --- Income ---
    let monthly_rent = rental.monthly_rent * (Decimal::ONE + assumptions.rent_adjustment);
    let annual_rent = monthly_rent * dec!(12);
    let other_income = assumptions.expenses.other_income;
    let gross_income = annual_rent + other_income;

    // --- Expenses ---
    let expenses = operating_expenses(value, gross_income, valuation, assumptions);

    // --- First-year returns ---
    let noi = gross_income - expenses.total;
    let annual_cash_flow = noi - annual_debt_service;
    let monthly_cash_flow = annual_cash_flow / dec!(12);

    let cap_rate = to_percent(noi / loan.purchase_price);
    let cash_on_cash = if total_investment.is_zero() {
        Decimal::ZERO
    } else {
        to_percent(annual_cash_flow / total_investment)
    };
    let grm = round_ratio(loan.purchase_price / annual_rent);
    let dscr = if schedule.has_debt() && !annual_debt_service.is_zero() {
        Some(round_ratio(noi / annual_debt_service))
    } else {
        None
    };

    // --- Projection ---
    let growth = GrowthSummary {
        appreciation_rate,
        rent_growth: assumptions.growth.rent_growth,
        expense_growth: assumptions.growth.expense_growth,
    };
    let yearly_projections = project(
        value,
        gross_income,
        expenses.total,
        &schedule,
        &growth,
        total_investment,
        horizon_years,
    )?;
    let equity_build_up = equity_build_up(&yearly_projections);

    let return_on_investment = match yearly_projections.first() {
        Some(y1) if !total_investment.is_zero() => to_percent(
            (y1.cash_flow + y1.principal_paid + y1.appreciation) / total_investment,
        ),
        _ => Decimal::ZERO,
    };

    let internal_rate_of_return = projected_irr(total_investment, &yearly_projections)?;

    let price_per_area = if ctx.living_area > Decimal::ZERO {
        Some(round_cents(loan.purchase_price / ctx.living_area))
    } else {
        None
    };

    Ok(InvestmentAnalysis {
        loan: LoanSummary {
            purchase_price: round_currency(loan.purchase_price),
            down_payment: round_currency(loan.down_payment()),
            loan_amount: round_currency(loan.loan_amount()),
            interest_rate: round_ratio(loan.annual_interest_rate * dec!(100)),
            amortization_years: loan.amortization_years,
            monthly_payment,
            annual_debt_service: round_currency(annual_debt_service),
            closing_costs: round_currency(closing_costs),
        },
        income: IncomeSummary {
            monthly_rent: round_currency(monthly_rent),
            annual_rent: round_currency(annual_rent),
            other_income: round_currency(other_income),
            gross_income: round_currency(gross_income),
        },
        expenses: round_expenses(&expenses),
        noi: round_currency(noi),
        monthly_cash_flow: round_currency(monthly_cash_flow),
        annual_cash_flow: round_currency(annual_cash_flow),
        cap_rate,
        cash_on_cash_return: cash_on_cash,
        gross_rent_multiplier: grm,
        debt_service_coverage_ratio: dscr,
        return_on_investment,
        internal_rate_of_return,
        total_investment,
        price_per_area,
        growth,
        yearly_projections,
        equity_build_up,
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_input(
    rental: &RentalEstimate,
    loan: &LoanTerms,
    horizon_years: u32,
    assumptions: &AnalysisAssumptions,
) -> PropvalResult<()> {
    loan.validate()?;
    if rental.monthly_rent <= Decimal::ZERO {
        return Err(PropvalError::InvalidInput {
            field: "monthly_rent".into(),
            reason: "Monthly rent must be positive".into(),
        });
    }
    if horizon_years == 0 || horizon_years > MAX_HORIZON_YEARS {
        return Err(PropvalError::InvalidInput {
            field: "horizon_years".into(),
            reason: format!("Horizon must be between 1 and {MAX_HORIZON_YEARS} years"),
        });
    }
    assumptions.validate()
}

// ---------------------------------------------------------------------------
// Expenses
// ---------------------------------------------------------------------------

fn operating_expenses(
    value: Money,
    gross_income: Money,
    valuation: &ValuationResult,
    assumptions: &AnalysisAssumptions,
) -> ExpenseBreakdown {
    let ctx = &valuation.context;
    let costs = &assumptions.expenses;
    let m = assumptions.expense_multiplier;

    let property_tax = value * ctx.tax_rate * m;
    let insurance = value * costs.insurance_rate * m;
    let maintenance = value * costs.maintenance_rate(ctx.age_years, ctx.condition) * m;
    let management = gross_income * costs.management_fee_rate * m;
    let hoa = costs.monthly_hoa_for(ctx.category) * dec!(12) * m;
    let utilities = costs.monthly_utilities * dec!(12) * m;
    let vacancy = gross_income * costs.vacancy_rate * m;
    let total = property_tax + insurance + maintenance + management + hoa + utilities + vacancy;

    ExpenseBreakdown {
        property_tax,
        insurance,
        maintenance,
        management,
        hoa,
        utilities,
        vacancy,
        total,
    }
}

fn round_expenses(e: &ExpenseBreakdown) -> ExpenseBreakdown {
    ExpenseBreakdown {
        property_tax: round_currency(e.property_tax),
        insurance: round_currency(e.insurance),
        maintenance: round_currency(e.maintenance),
        management: round_currency(e.management),
        hoa: round_currency(e.hoa),
        utilities: round_currency(e.utilities),
        vacancy: round_currency(e.vacancy),
        total: round_currency(e.total),
    }
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

/// Year-by-year projection. Amounts are rounded per row; cumulative cash
/// flow, equity and total return are built from the rounded figures so each
/// row is internally consistent.
fn project(
    start_value: Money,
    year_one_income: Money,
    year_one_expenses: Money,
    schedule: &AmortizationSchedule,
    growth: &GrowthSummary,
    total_investment: Money,
    horizon_years: u32,
) -> PropvalResult<Vec<YearlyProjection>> {
    let mut rows = Vec::with_capacity(horizon_years as usize);
    let mut previous_value = round_currency(start_value);
    let mut cumulative = Decimal::ZERO;

    for year in 1..=horizon_years {
        let property_value = round_currency(grow(start_value, growth.appreciation_rate, year)?);
        let rental_income = round_currency(grow(year_one_income, growth.rent_growth, year - 1)?);
        let operating_expenses =
            round_currency(grow(year_one_expenses, growth.expense_growth, year - 1)?);

        let loan_year = schedule.year(year);
        let debt_service = round_currency(loan_year.debt_service);
        let loan_balance = round_currency(loan_year.closing_balance);

        let cash_flow = rental_income - operating_expenses - debt_service;
        cumulative = cumulative.checked_add(cash_flow).ok_or_else(|| {
            PropvalError::FinancialImpossibility(format!(
                "Cumulative cash flow overflows in year {year}"
            ))
        })?;
        let equity = property_value - loan_balance;
        let total_return = (equity - total_investment)
            .checked_add(cumulative)
            .ok_or_else(|| {
                PropvalError::FinancialImpossibility(format!(
                    "Total return overflows in year {year}"
                ))
            })?;

        rows.push(YearlyProjection {
            year,
            property_value,
            appreciation: property_value - previous_value,
            rental_income,
            operating_expenses,
            debt_service,
            cash_flow,
            cumulative_cash_flow: cumulative,
            principal_paid: round_currency(loan_year.principal),
            loan_balance,
            equity,
            total_return,
        });
        previous_value = property_value;
    }

    Ok(rows)
}

fn equity_build_up(projections: &[YearlyProjection]) -> Vec<YearlyEquity> {
    projections
        .iter()
        .map(|p| YearlyEquity {
            year: p.year,
            loan_balance: p.loan_balance,
            property_value: p.property_value,
            equity: p.equity,
            equity_percentage: if p.property_value.is_zero() {
                Decimal::ZERO
            } else {
                to_percent(p.equity / p.property_value)
            },
        })
        .collect()
}

/// IRR of `[-total_investment, cf_1, ..., cf_H + equity_H]`, in percent.
fn projected_irr(
    total_investment: Money,
    projections: &[YearlyProjection],
) -> PropvalResult<Option<Decimal>> {
    let Some(last) = projections.last() else {
        return Ok(None);
    };
    let mut flows = Vec::with_capacity(projections.len() + 1);
    flows.push(-total_investment);
    flows.extend(projections.iter().map(|p| p.cash_flow));
    if let Some(terminal) = flows.last_mut() {
        *terminal += last.equity;
    }

    let solution = match irr(&flows) {
        Ok(s) => s,
        Err(PropvalError::FinancialImpossibility(reason)) => {
            tracing::warn!(%reason, "IRR search left the representable range");
            return Ok(None);
        }
        Err(e) => return Err(e),
    };

    match solution.rate {
        Some(rate) => Ok(Some(to_percent(rate))),
        None => {
            tracing::warn!(
                iterations = solution.iterations,
                years = projections.len(),
                "IRR not solvable for projected cash flows"
            );
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo;
    use crate::valuation::{
        estimate_value_as_of, ConditionTier, MarketStatistics, PropertyCategory, PropertyInput,
    };
    use rust_decimal_macros::dec;

    fn valuation() -> ValuationResult {
        let property = PropertyInput {
            location_code: "98275".into(),
            living_area: dec!(2200),
            lot_area: Some(dec!(7200)),
            bedrooms: 4,
            bathrooms: dec!(2.5),
            year_built: 2005,
            category: PropertyCategory::Detached,
            condition: ConditionTier::WellMaintained,
        };
        estimate_value_as_of(
            &property,
            &MarketStatistics::default(),
            geo::resolve("98275"),
            2025,
        )
        .unwrap()
    }

    fn rent(monthly: Money) -> RentalEstimate {
        RentalEstimate {
            monthly_rent: monthly,
            rent_low: None,
            rent_high: None,
            confidence: None,
        }
    }

    fn terms() -> LoanTerms {
        LoanTerms {
            purchase_price: dec!(500000),
            down_payment_fraction: dec!(0.20),
            annual_interest_rate: dec!(0.07),
            amortization_years: 30,
        }
    }

    #[test]
    fn test_mortgage_and_total_investment() {
        let a = analyze(&valuation(), &rent(dec!(2800)), &terms(), 10).unwrap();
        assert_eq!(a.loan.loan_amount, dec!(400000));
        assert_eq!(a.loan.monthly_payment, dec!(2661.21));
        // 100k down + 15k closing
        assert_eq!(a.total_investment, dec!(115000));
        assert_eq!(a.gross_rent_multiplier, dec!(14.88));
    }

    #[test]
    fn test_detached_pays_no_hoa() {
        let a = analyze(&valuation(), &rent(dec!(2800)), &terms(), 5).unwrap();
        assert_eq!(a.expenses.hoa, Decimal::ZERO);
        assert_eq!(a.expenses.utilities, dec!(1200));
        // 8% management and 5% vacancy on 33,600 gross
        assert_eq!(a.expenses.management, dec!(2688));
        assert_eq!(a.expenses.vacancy, dec!(1680));
    }

    #[test]
    fn test_projection_rows_consistent() {
        let a = analyze(&valuation(), &rent(dec!(2800)), &terms(), 10).unwrap();
        assert_eq!(a.yearly_projections.len(), 10);
        let mut cumulative = Decimal::ZERO;
        for p in &a.yearly_projections {
            assert_eq!(p.equity, p.property_value - p.loan_balance);
            assert_eq!(
                p.cash_flow,
                p.rental_income - p.operating_expenses - p.debt_service
            );
            cumulative += p.cash_flow;
            assert_eq!(p.cumulative_cash_flow, cumulative);
            assert_eq!(p.total_return, p.equity + cumulative - a.total_investment);
        }
    }

    #[test]
    fn test_debt_service_stops_after_payoff() {
        let mut loan = terms();
        loan.amortization_years = 5;
        let a = analyze(&valuation(), &rent(dec!(2800)), &loan, 8).unwrap();
        let y5 = &a.yearly_projections[4];
        let y6 = &a.yearly_projections[5];
        assert_eq!(y5.loan_balance, Decimal::ZERO);
        assert!(y5.debt_service > Decimal::ZERO);
        assert_eq!(y6.debt_service, Decimal::ZERO);
        assert_eq!(y6.principal_paid, Decimal::ZERO);
        assert_eq!(y6.equity, y6.property_value);
    }

    #[test]
    fn test_all_cash_purchase_has_no_dscr() {
        let mut loan = terms();
        loan.down_payment_fraction = Decimal::ONE;
        let a = analyze(&valuation(), &rent(dec!(2800)), &loan, 5).unwrap();
        assert_eq!(a.debt_service_coverage_ratio, None);
        assert_eq!(a.loan.monthly_payment, Decimal::ZERO);
        assert_eq!(a.total_investment, dec!(515000));
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        let v = valuation();
        assert!(analyze(&v, &rent(Decimal::ZERO), &terms(), 10).is_err());
        let mut loan = terms();
        loan.purchase_price = Decimal::ZERO;
        assert!(analyze(&v, &rent(dec!(2800)), &loan, 10).is_err());
        let mut loan = terms();
        loan.down_payment_fraction = dec!(1.5);
        assert!(analyze(&v, &rent(dec!(2800)), &loan, 10).is_err());
        assert!(analyze(&v, &rent(dec!(2800)), &terms(), 0).is_err());
    }

    #[test]
    fn test_rent_adjustment_and_multiplier() {
        let v = valuation();
        let base = analyze(&v, &rent(dec!(3000)), &terms(), 5).unwrap();
        let stressed = analyze_with(
            &v,
            &rent(dec!(3000)),
            &terms(),
            5,
            &AnalysisAssumptions {
                rent_adjustment: dec!(-0.10),
                expense_multiplier: dec!(1.15),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(stressed.income.monthly_rent, dec!(2700));
        assert!(stressed.expenses.total > base.expenses.total);
        assert!(stressed.monthly_cash_flow < base.monthly_cash_flow);
    }
}

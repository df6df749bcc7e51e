//! Leveraged buy-and-hold analysis: financing, operating cash flow, and a
//! multi-year projection with equity build-up and IRR.

pub mod amortization;
pub mod cash_flow;

pub use amortization::{build_schedule, AmortizationEntry, AmortizationSchedule, LoanYear};
pub use cash_flow::{
    analyze, analyze_with, AnalysisAssumptions, ExpenseBreakdown, GrowthSummary, IncomeSummary,
    InvestmentAnalysis, LoanSummary, LoanTerms, YearlyEquity, YearlyProjection,
    MAX_HORIZON_YEARS,
};

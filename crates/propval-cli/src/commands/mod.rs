pub mod geo;
pub mod investment;
pub mod market;
pub mod report;
pub mod scenarios;
pub mod valuation;

use clap::Args;
use rust_decimal::Decimal;

use propval_core::report::PropertyAnalysisRequest;
use propval_core::scenarios::ScenarioAssumptions;
use propval_core::valuation::RentalEstimate;

use crate::input;

/// Input flags shared by every command that takes a property request.
#[derive(Args)]
pub struct RequestArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,

    /// Measure property age against this year instead of the current one
    #[arg(long)]
    pub as_of_year: Option<i32>,

    /// Asking or offer price, replacing the one in the input
    #[arg(long)]
    pub purchase_price: Option<Decimal>,

    /// Down payment as a fraction of price (e.g. 0.25)
    #[arg(long)]
    pub down_payment: Option<Decimal>,

    /// Annual mortgage rate as a decimal (e.g. 0.065)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Monthly rent, replacing any rental estimate in the input
    #[arg(long)]
    pub rent: Option<Decimal>,
}

impl RequestArgs {
    pub fn load(&self, what: &str) -> Result<PropertyAnalysisRequest, Box<dyn std::error::Error>> {
        let mut request: PropertyAnalysisRequest =
            input::read_payload(self.input.as_deref(), what)?;
        self.apply(&mut request);
        Ok(request)
    }

    /// Flag values win over the input; range checks are left to the engine.
    fn apply(&self, request: &mut PropertyAnalysisRequest) {
        if let Some(year) = self.as_of_year {
            request.as_of_year = Some(year);
        }
        if let Some(price) = self.purchase_price {
            request.purchase_price = Some(price);
        }
        if let Some(down) = self.down_payment {
            request.financing.down_payment_fraction = down;
        }
        if let Some(rate) = self.rate {
            request.financing.annual_interest_rate = rate;
        }
        if let Some(rent) = self.rent {
            request.rental = Some(RentalEstimate {
                monthly_rent: rent,
                rent_low: None,
                rent_high: None,
                confidence: None,
            });
        }
    }
}

/// Replace the request's assumptions with the contents of `path`, if given.
pub fn override_assumptions(
    request: &mut PropertyAnalysisRequest,
    path: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = path {
        let assumptions: ScenarioAssumptions = input::file::read_config(path)?;
        request.assumptions = assumptions;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn request() -> PropertyAnalysisRequest {
        serde_json::from_value(json!({
            "property": {
                "location_code": "98208",
                "living_area": "1900",
                "bedrooms": 3,
                "bathrooms": "2",
                "year_built": 1992,
                "category": "detached"
            },
            "purchase_price": "550000"
        }))
        .unwrap()
    }

    fn flags() -> RequestArgs {
        RequestArgs {
            input: None,
            as_of_year: None,
            purchase_price: None,
            down_payment: None,
            rate: None,
            rent: None,
        }
    }

    #[test]
    fn test_no_flags_leave_request_untouched() {
        let mut req = request();
        flags().apply(&mut req);
        assert_eq!(req, request());
    }

    #[test]
    fn test_financing_flags_override_input() {
        let mut req = request();
        RequestArgs {
            purchase_price: Some(dec!(610000)),
            down_payment: Some(dec!(0.25)),
            rate: Some(dec!(0.065)),
            rent: Some(dec!(3100)),
            as_of_year: Some(2025),
            ..flags()
        }
        .apply(&mut req);

        assert_eq!(req.purchase_price, Some(dec!(610000)));
        assert_eq!(req.financing.down_payment_fraction, dec!(0.25));
        assert_eq!(req.financing.annual_interest_rate, dec!(0.065));
        assert_eq!(req.rental.map(|r| r.monthly_rent), Some(dec!(3100)));
        assert_eq!(req.as_of_year, Some(2025));
    }
}

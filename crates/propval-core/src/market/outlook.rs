use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::PropvalError;
use crate::types::{round_currency, round_ratio, Money, Rate};
use crate::valuation::MarketStatistics;
use crate::PropvalResult;

/// Listings considered for the area averages.
pub const LISTING_SAMPLE: usize = 10;
/// Listings returned in the shortlist.
pub const SHORTLIST_LEN: usize = 5;
/// Monthly rent per square foot used to approximate listing rents.
pub const RENT_PER_AREA: Money = dec!(1.5);
/// Living area assumed for listings that do not report one.
pub const DEFAULT_LISTING_AREA: Decimal = dec!(1500);
/// Annual operating costs as a fraction of list price.
pub const EXPENSE_RATIO: Rate = dec!(0.03);
/// Loan-to-value and rate of the interest-only financing proxy.
pub const PROXY_LTV: Rate = dec!(0.8);
pub const PROXY_RATE: Rate = dec!(0.07);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A for-sale listing in the area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    #[serde(default)]
    pub address: Option<String>,
    pub price: Money,
    #[serde(default)]
    pub living_area: Option<Decimal>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketTrend {
    Hot,
    Moderate,
    Slow,
}

impl MarketTrend {
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Hot => "High demand, fast sales",
            Self::Moderate => "Balanced market conditions",
            Self::Slow => "Slower market, more negotiating power",
        }
    }
}

impl std::fmt::Display for MarketTrend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hot => write!(f, "HOT"),
            Self::Moderate => write!(f, "MODERATE"),
            Self::Slow => write!(f, "SLOW"),
        }
    }
}

/// Back-of-envelope economics of one listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingSnapshot {
    pub address: String,
    pub price: Money,
    pub estimated_rent: Money,
    pub estimated_cash_flow: Money,
    /// Percent
    pub cap_rate: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketOutlook {
    pub location_code: String,
    pub average_property_price: Money,
    pub average_rent: Money,
    pub price_to_rent_ratio: Decimal,
    pub trend: MarketTrend,
    /// 0-100
    pub investment_potential: u32,
    pub insights: Vec<String>,
    /// Best listings by simplified cap rate
    pub top_listings: Vec<ListingSnapshot>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Summarise an area for investors from its statistics and current listings.
///
/// Averages come from the priced listings among the first ten; with none,
/// the market's median price and average rent are used instead.
pub fn assess_market(
    location_code: &str,
    market: &MarketStatistics,
    listings: &[Listing],
) -> PropvalResult<MarketOutlook> {
    let mut snapshots: Vec<ListingSnapshot> = listings
        .iter()
        .take(LISTING_SAMPLE)
        .filter(|l| l.price > Decimal::ZERO)
        .map(snapshot)
        .collect();

    let (average_price, average_rent) = if snapshots.is_empty() {
        match (market.median_price, market.average_rent) {
            (Some(price), Some(rent)) => (price, rent),
            _ => {
                return Err(PropvalError::InsufficientData(
                    "No priced listings and no median price / average rent for the area".into(),
                ))
            }
        }
    } else {
        let count = Decimal::from(snapshots.len());
        let total_price: Money = snapshots.iter().map(|s| s.price).sum();
        let total_rent: Money = listings
            .iter()
            .take(LISTING_SAMPLE)
            .filter(|l| l.price > Decimal::ZERO)
            .map(listing_rent)
            .sum();
        (total_price / count, total_rent / count)
    };

    if average_rent <= Decimal::ZERO {
        return Err(PropvalError::DivisionByZero {
            context: "price-to-rent ratio (average rent)".into(),
        });
    }
    let price_to_rent = average_price / (average_rent * dec!(12));

    let trend = classify_trend(market);
    let investment_potential = investment_potential(market, price_to_rent);
    let insights = market_insights(market, trend, price_to_rent, investment_potential);

    snapshots.sort_by(|a, b| b.cap_rate.cmp(&a.cap_rate));
    snapshots.truncate(SHORTLIST_LEN);

    Ok(MarketOutlook {
        location_code: location_code.trim().to_string(),
        average_property_price: round_currency(average_price),
        average_rent: round_currency(average_rent),
        price_to_rent_ratio: round_ratio(price_to_rent),
        trend,
        investment_potential,
        insights,
        top_listings: snapshots,
    })
}

/// Hot when homes sell fast and prices rise quickly; slow when either
/// signal is weak; moderate otherwise or when the data is missing.
pub fn classify_trend(market: &MarketStatistics) -> MarketTrend {
    let dom = market.days_on_market;
    let yoy = market.year_over_year_appreciation;
    let fast = dom.is_some_and(|d| d < dec!(30));
    let rising = yoy.is_some_and(|y| y > dec!(5));
    if fast && rising {
        MarketTrend::Hot
    } else if dom.is_some_and(|d| d > dec!(60)) || yoy.is_some_and(|y| y < dec!(2)) {
        MarketTrend::Slow
    } else {
        MarketTrend::Moderate
    }
}

/// Area investment potential on a 0-100 scale, starting from 50.
pub fn investment_potential(market: &MarketStatistics, price_to_rent: Decimal) -> u32 {
    let mut potential: i32 = 50;

    if let Some(yoy) = market.year_over_year_appreciation {
        potential += if yoy > dec!(5) {
            15
        } else if yoy > dec!(3) {
            8
        } else {
            0
        };
    }
    if let Some(vacancy) = market.vacancy_rate {
        potential += if vacancy < dec!(5) {
            10
        } else if vacancy < dec!(7) {
            5
        } else {
            0
        };
    }
    if let Some(dom) = market.days_on_market {
        potential += if dom < dec!(30) {
            10
        } else if dom < dec!(45) {
            5
        } else {
            0
        };
    }
    potential += if price_to_rent < dec!(15) {
        10
    } else if price_to_rent < dec!(18) {
        5
    } else {
        0
    };
    if market.median_income.is_some_and(|i| i > dec!(70000)) {
        potential += 5;
    }

    potential.clamp(0, 100) as u32
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn listing_rent(listing: &Listing) -> Money {
    listing.living_area.unwrap_or(DEFAULT_LISTING_AREA) * RENT_PER_AREA
}

fn snapshot(listing: &Listing) -> ListingSnapshot {
    let rent = listing_rent(listing);
    let expenses = listing.price * EXPENSE_RATIO;
    let mortgage = listing.price * PROXY_LTV * PROXY_RATE / dec!(12);
    let cash_flow = rent - expenses / dec!(12) - mortgage;
    let cap_rate = (rent * dec!(12) - expenses) / listing.price * dec!(100);

    ListingSnapshot {
        address: listing.address.clone().unwrap_or_else(|| "N/A".to_string()),
        price: listing.price,
        estimated_rent: round_currency(rent),
        estimated_cash_flow: round_currency(cash_flow),
        cap_rate: round_ratio(cap_rate),
    }
}

fn market_insights(
    market: &MarketStatistics,
    trend: MarketTrend,
    price_to_rent: Decimal,
    potential: u32,
) -> Vec<String> {
    let mut out = vec![
        format!("Market trend: {trend} - {}", trend.describe()),
        format!("Investment potential score: {potential}/100"),
    ];

    if let Some(yoy) = market.year_over_year_appreciation {
        if yoy > dec!(5) {
            out.push(format!("Strong {}% annual appreciation", yoy.round_dp(1)));
        } else if yoy < dec!(2) {
            out.push(format!("Low {}% appreciation rate", yoy.round_dp(1)));
        }
    }
    if let Some(vacancy) = market.vacancy_rate {
        if vacancy < dec!(5) {
            out.push(format!(
                "Low {}% vacancy rate - high rental demand",
                vacancy.round_dp(1)
            ));
        } else if vacancy > dec!(8) {
            out.push(format!("Higher {}% vacancy rate", vacancy.round_dp(1)));
        }
    }
    if price_to_rent < dec!(15) {
        out.push(format!(
            "Favorable price-to-rent ratio of {} - good for investors",
            price_to_rent.round_dp(1)
        ));
    } else if price_to_rent > dec!(20) {
        out.push(format!(
            "High price-to-rent ratio of {} - appreciation play",
            price_to_rent.round_dp(1)
        ));
    }
    if let Some(income) = market.median_income.filter(|i| *i > dec!(80000)) {
        out.push(format!(
            "High median income (${}) - quality tenants",
            round_currency(income)
        ));
    }
    if let Some(dom) = market.days_on_market.filter(|d| *d < dec!(30)) {
        out.push(format!("Fast-moving market - {dom} days average"));
    }
    if let Some(population) = market.population.filter(|p| *p > 100_000) {
        out.push(format!(
            "Large population ({population}) - diverse rental pool"
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn listing(price: Money, area: Option<Decimal>) -> Listing {
        Listing {
            address: None,
            price,
            living_area: area,
        }
    }

    #[test]
    fn test_trend_classification() {
        let hot = MarketStatistics {
            days_on_market: Some(dec!(20)),
            year_over_year_appreciation: Some(dec!(6)),
            ..Default::default()
        };
        assert_eq!(classify_trend(&hot), MarketTrend::Hot);

        let slow = MarketStatistics {
            days_on_market: Some(dec!(20)),
            year_over_year_appreciation: Some(dec!(1.5)),
            ..Default::default()
        };
        assert_eq!(classify_trend(&slow), MarketTrend::Slow);

        assert_eq!(
            classify_trend(&MarketStatistics::default()),
            MarketTrend::Moderate
        );
    }

    #[test]
    fn test_snapshot_economics() {
        // 1000 sq ft at 1.5/sq ft = 1500 rent; 200k price
        let s = snapshot(&listing(dec!(200000), Some(dec!(1000))));
        assert_eq!(s.estimated_rent, dec!(1500));
        // 1500 - 6000/12 - 200000*0.8*0.07/12 = 1500 - 500 - 933.33
        assert_eq!(s.estimated_cash_flow, dec!(67));
        // (18000 - 6000) / 200000
        assert_eq!(s.cap_rate, dec!(6.00));
        assert_eq!(s.address, "N/A");
    }

    #[test]
    fn test_only_first_ten_listings_count() {
        let mut listings: Vec<Listing> = (0..10).map(|_| listing(dec!(300000), None)).collect();
        listings.push(listing(dec!(9000000), None));
        let out = assess_market("98103", &MarketStatistics::default(), &listings).unwrap();
        assert_eq!(out.average_property_price, dec!(300000));
        assert_eq!(out.average_rent, dec!(2250));
        assert_eq!(out.top_listings.len(), SHORTLIST_LEN);
    }

    #[test]
    fn test_falls_back_to_market_medians() {
        let market = MarketStatistics {
            median_price: Some(dec!(540000)),
            average_rent: Some(dec!(3000)),
            ..Default::default()
        };
        let out = assess_market("98052", &market, &[listing(Decimal::ZERO, None)]).unwrap();
        assert_eq!(out.price_to_rent_ratio, dec!(15));
        assert!(out.top_listings.is_empty());

        assert!(assess_market("98052", &MarketStatistics::default(), &[]).is_err());
    }

    #[test]
    fn test_investment_potential_scoring() {
        let market = MarketStatistics {
            year_over_year_appreciation: Some(dec!(5.5)),
            vacancy_rate: Some(dec!(4)),
            days_on_market: Some(dec!(25)),
            median_income: Some(dec!(95000)),
            ..Default::default()
        };
        // 50 + 15 + 10 + 10 + 10 + 5
        assert_eq!(investment_potential(&market, dec!(12)), 100);
        assert_eq!(investment_potential(&MarketStatistics::default(), dec!(25)), 50);
        assert_eq!(investment_potential(&MarketStatistics::default(), dec!(16)), 55);
    }
}

#![cfg(feature = "market")]

use pretty_assertions::assert_eq;
use propval_core::market::{assess_market, classify_trend, Listing, MarketTrend};
use propval_core::valuation::MarketStatistics;
use propval_core::PropvalError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn listing(address: &str, price: Decimal, area: Option<Decimal>) -> Listing {
    Listing {
        address: Some(address.into()),
        price,
        living_area: area,
    }
}

#[test]
fn test_outlook_from_listings() {
    let market = MarketStatistics {
        year_over_year_appreciation: Some(dec!(6.2)),
        days_on_market: Some(dec!(21)),
        vacancy_rate: Some(dec!(4.5)),
        median_income: Some(dec!(91000)),
        ..Default::default()
    };
    let listings = vec![
        listing("12 Alder St", dec!(480000), Some(dec!(1600))),
        listing("88 Birch Ave", dec!(620000), Some(dec!(2000))),
        listing("301 Cedar Ct", dec!(350000), None),
    ];

    let outlook = assess_market(" 98208 ", &market, &listings).unwrap();
    assert_eq!(outlook.location_code, "98208");
    assert_eq!(outlook.trend, MarketTrend::Hot);
    // rents 2400 + 3000 + 2250 over three listings
    assert_eq!(outlook.average_rent, dec!(2550));
    assert_eq!(outlook.average_property_price, dec!(483333));
    assert_eq!(outlook.top_listings.len(), 3);
    assert!(outlook
        .top_listings
        .windows(2)
        .all(|w| w[0].cap_rate >= w[1].cap_rate));
    assert_eq!(outlook.top_listings[0].address, "301 Cedar Ct");
    // 50 + 15 + 10 + 10 + 5 (P/R ~15.8 earns 5)
    assert_eq!(outlook.investment_potential, 95);
    assert!(outlook.insights[0].starts_with("Market trend: HOT"));
}

#[test]
fn test_only_first_ten_listings_count_and_shortlist_is_five() {
    let mut listings: Vec<Listing> = (0..12)
        .map(|i| listing(&format!("{i} Main St"), dec!(400000), Some(dec!(1500))))
        .collect();
    listings[10].price = dec!(5000000);
    listings[11].price = dec!(5000000);

    let outlook = assess_market("98682", &MarketStatistics::default(), &listings).unwrap();
    assert_eq!(outlook.average_property_price, dec!(400000));
    assert_eq!(outlook.top_listings.len(), 5);
}

#[test]
fn test_falls_back_to_area_medians() {
    let market = MarketStatistics {
        median_price: Some(dec!(540000)),
        average_rent: Some(dec!(2500)),
        ..Default::default()
    };
    let outlook = assess_market("98402", &market, &[]).unwrap();
    assert_eq!(outlook.average_property_price, dec!(540000));
    assert_eq!(outlook.price_to_rent_ratio, dec!(18));
    assert!(outlook.top_listings.is_empty());
}

#[test]
fn test_no_prices_anywhere_is_insufficient_data() {
    let unpriced = vec![listing("1 Elm", Decimal::ZERO, None)];
    let err = assess_market("98402", &MarketStatistics::default(), &unpriced).unwrap_err();
    assert!(matches!(err, PropvalError::InsufficientData(_)));
}

#[test]
fn test_trend_classification() {
    let stats = |dom: Option<Decimal>, yoy: Option<Decimal>| MarketStatistics {
        days_on_market: dom,
        year_over_year_appreciation: yoy,
        ..Default::default()
    };
    assert_eq!(classify_trend(&stats(Some(dec!(20)), Some(dec!(6)))), MarketTrend::Hot);
    assert_eq!(classify_trend(&stats(Some(dec!(20)), Some(dec!(4)))), MarketTrend::Moderate);
    assert_eq!(classify_trend(&stats(Some(dec!(75)), Some(dec!(6)))), MarketTrend::Slow);
    assert_eq!(classify_trend(&stats(None, Some(dec!(1.5)))), MarketTrend::Slow);
    assert_eq!(classify_trend(&stats(None, None)), MarketTrend::Moderate);
}

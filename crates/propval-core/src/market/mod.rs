//! Area-level outlook from market statistics and current listings.

pub mod outlook;

pub use outlook::{
    assess_market, classify_trend, investment_potential, Listing, ListingSnapshot, MarketOutlook,
    MarketTrend,
};

//! Risk and recommendation scores plus plain-language commentary for an
//! analysed purchase.

pub mod insights;
pub mod scores;

pub use insights::{explain, Commentary};
pub use scores::{recommendation_score, risk_score, score, ScoreCard};

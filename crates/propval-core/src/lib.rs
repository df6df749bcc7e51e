pub mod error;
pub mod time_value;
pub mod types;

#[cfg(feature = "valuation")]
pub mod assumptions;

#[cfg(feature = "valuation")]
pub mod geo;

#[cfg(feature = "valuation")]
pub mod valuation;

#[cfg(feature = "investment")]
pub mod investment;

#[cfg(feature = "scenarios")]
pub mod scenarios;

#[cfg(feature = "scoring")]
pub mod scoring;

#[cfg(feature = "scoring")]
pub mod report;

#[cfg(feature = "market")]
pub mod market;

pub use error::PropvalError;
pub use types::*;

/// Standard result type for all propval operations
pub type PropvalResult<T> = Result<T, PropvalError>;

pub mod amortization;
pub mod error;
pub mod time_value;
pub mod types;

#[cfg(feature = "comparison")]
pub mod comparison;

#[cfg(feature = "lookup")]
pub mod lookup;

pub use error::MortgageError;
pub use types::*;

/// Standard result type for all mortgage operations
pub type MortgageResult<T> = Result<T, MortgageError>;

pub mod amortization;
pub mod defaults;
pub mod error;
pub mod formatting;
pub mod loan;
pub mod time_value;
pub mod types;

#[cfg(feature = "mortgage")]
pub mod mortgage;

#[cfg(feature = "refinance")]
pub mod refinance;

#[cfg(feature = "closing_costs")]
pub mod closing_costs;

pub use error::FirstKeyError;
pub use types::*;

/// Standard result type for all FirstKey computations
pub type FirstKeyResult<T> = Result<T, FirstKeyError>;

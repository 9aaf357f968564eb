pub mod error;
pub mod types;

#[cfg(feature = "scoring")]
pub mod scoring;

#[cfg(feature = "screening")]
pub mod screening;

pub use error::FraudScoringError;
pub use types::*;

/// Standard result type for all fraud-scoring operations
pub type FraudScoringResult<T> = Result<T, FraudScoringError>;

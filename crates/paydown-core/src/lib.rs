pub mod accounts;
pub mod allocation;
pub mod compare;
pub mod error;
pub mod monte_carlo;
pub mod returns;
pub mod simulate;
pub mod types;

pub use error::PaydownError;
pub use types::*;

/// Standard result type for all paydown operations
pub type PaydownResult<T> = Result<T, PaydownError>;

pub mod proportional;
pub mod strategy;

pub use proportional::Proportional;
pub use strategy::{Allocation, AllocationStrategy, ExtraPaydownPolicy, InvestFirst, LoanFirst, Split};

pub mod investment;
pub mod loan;

pub use investment::InvestmentAccount;
pub use loan::{LoanAccount, LoanMonth};

use serde::{Deserialize, Serialize};

use crate::accounts::loan::LoanMonth;
use crate::types::Money;

/// Aggregate activity for one simulated year. The final snapshot may
/// cover fewer than twelve months when the horizon is not a whole
/// number of years.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlySnapshot {
    /// 1-based year ordinal.
    pub year: u32,
    pub interest_paid: Money,
    pub principal_paid: Money,
    pub loan_balance_end: Money,
    pub contributions: Money,
    pub investment_returns: Money,
    pub investment_balance_end: Money,
}

/// Accumulates monthly activity and flushes it into a `YearlySnapshot`
/// at each year close. Kept as its own object so the year-boundary
/// transition is testable in isolation.
#[derive(Debug, Clone, Default)]
pub struct YearAccumulator {
    interest_paid: Money,
    principal_paid: Money,
    contributions: Money,
    investment_returns: Money,
}

impl YearAccumulator {
    pub fn new() -> Self {
        YearAccumulator::default()
    }

    pub fn record_loan_month(&mut self, month: &LoanMonth) {
        self.interest_paid += month.interest_paid;
        self.principal_paid += month.principal_paid;
    }

    /// Principal retired by redirected mid-month cash (no interest).
    pub fn record_extra_principal(&mut self, amount: Money) {
        self.principal_paid += amount;
    }

    pub fn record_investment_month(&mut self, contribution: Money, growth: Money) {
        self.contributions += contribution;
        self.investment_returns += growth;
    }

    /// Emit the snapshot for the year just ended and reset for the next.
    pub fn close(
        &mut self,
        year: u32,
        loan_balance_end: Money,
        investment_balance_end: Money,
    ) -> YearlySnapshot {
        let snapshot = YearlySnapshot {
            year,
            interest_paid: self.interest_paid,
            principal_paid: self.principal_paid,
            loan_balance_end,
            contributions: self.contributions,
            investment_returns: self.investment_returns,
            investment_balance_end,
        };
        *self = YearAccumulator::default();
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_close_emits_totals_and_resets() {
        let mut acc = YearAccumulator::new();
        acc.record_loan_month(&LoanMonth {
            interest_paid: 50.0,
            principal_paid: 250.0,
            overpayment: 0.0,
        });
        acc.record_loan_month(&LoanMonth {
            interest_paid: 48.0,
            principal_paid: 252.0,
            overpayment: 0.0,
        });
        acc.record_extra_principal(100.0);
        acc.record_investment_month(95.0, 3.5);

        let snapshot = acc.close(1, 9_000.0, 98.5);
        assert_eq!(snapshot.year, 1);
        assert!((snapshot.interest_paid - 98.0).abs() < 1e-9);
        assert!((snapshot.principal_paid - 602.0).abs() < 1e-9);
        assert_eq!(snapshot.loan_balance_end, 9_000.0);
        assert_eq!(snapshot.contributions, 95.0);
        assert_eq!(snapshot.investment_returns, 3.5);
        assert_eq!(snapshot.investment_balance_end, 98.5);

        // Second close starts from zero
        let next = acc.close(2, 8_000.0, 200.0);
        assert_eq!(next.interest_paid, 0.0);
        assert_eq!(next.principal_paid, 0.0);
        assert_eq!(next.contributions, 0.0);
        assert_eq!(next.investment_returns, 0.0);
    }
}

use crate::types::{Money, Rate, MONTHS_PER_YEAR};

/// Fee-adjusted monthly growth rate as a fraction: (return − fee) / 12,
/// with both inputs in percentage points.
pub fn effective_monthly_rate(annual_return: Rate, annual_fee: Rate) -> f64 {
    (annual_return - annual_fee) / 100.0 / MONTHS_PER_YEAR as f64
}

/// Investment account state, advanced one month at a time.
#[derive(Debug, Clone)]
pub struct InvestmentAccount {
    balance: Money,
}

impl InvestmentAccount {
    pub fn new(initial_balance: Money) -> Self {
        InvestmentAccount {
            balance: initial_balance,
        }
    }

    pub fn balance(&self) -> Money {
        self.balance
    }

    /// Add the month's contribution, then grow the whole balance by the
    /// given monthly rate (already fee-adjusted). Growth is applied
    /// multiplicatively to the balance, so fee drag compounds exactly
    /// like returns do. Negative rates shrink the balance with no floor.
    /// Returns the dollar growth for the month.
    pub fn advance(&mut self, contribution: Money, monthly_rate: f64) -> Money {
        self.balance += contribution;
        let growth = self.balance * monthly_rate;
        self.balance += growth;
        growth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_monthly_rate_subtracts_fee() {
        // 7% return with a 1% fee => 6% / 12 = 0.5% per month
        assert!((effective_monthly_rate(7.0, 1.0) - 0.005).abs() < 1e-12);
    }

    #[test]
    fn test_advance_adds_then_grows() {
        let mut acct = InvestmentAccount::new(1000.0);
        let growth = acct.advance(200.0, 0.01);
        assert!((growth - 12.0).abs() < 1e-9);
        assert!((acct.balance() - 1212.0).abs() < 1e-9);
    }

    #[test]
    fn test_negative_rate_is_uncapped() {
        let mut acct = InvestmentAccount::new(1000.0);
        let growth = acct.advance(0.0, -0.02);
        assert!((growth + 20.0).abs() < 1e-9);
        assert!((acct.balance() - 980.0).abs() < 1e-9);
    }

    #[test]
    fn test_balance_stays_nonnegative_under_losses() {
        let mut acct = InvestmentAccount::new(100.0);
        for _ in 0..120 {
            acct.advance(0.0, -0.05);
        }
        assert!(acct.balance() >= 0.0);
    }

    #[test]
    fn test_fee_drag_compounds() {
        let mut with_fee = InvestmentAccount::new(10_000.0);
        let mut without_fee = InvestmentAccount::new(10_000.0);
        for _ in 0..24 {
            with_fee.advance(100.0, effective_monthly_rate(7.0, 1.5));
            without_fee.advance(100.0, effective_monthly_rate(7.0, 0.0));
        }
        assert!(with_fee.balance() < without_fee.balance());
    }
}

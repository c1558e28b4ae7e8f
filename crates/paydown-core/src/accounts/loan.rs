use serde::{Deserialize, Serialize};

use crate::error::PaydownError;
use crate::types::{LoanSpec, Money, Rate, LOAN_BALANCE_EPSILON, MONTHS_PER_YEAR};
use crate::PaydownResult;

/// What one month of amortization did to a single loan.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct LoanMonth {
    pub interest_paid: Money,
    pub principal_paid: Money,
    /// Payment in excess of what the loan could absorb this month.
    /// Not consumed here; the caller redirects it.
    pub overpayment: Money,
}

/// Amortizing loan state, advanced one month at a time.
#[derive(Debug, Clone)]
pub struct LoanAccount {
    balance: Money,
    apr: Rate,
    remaining_term_months: u32,
}

impl LoanAccount {
    pub fn new(spec: &LoanSpec) -> Self {
        LoanAccount {
            balance: spec.amount,
            apr: spec.apr,
            remaining_term_months: spec.term_months,
        }
    }

    pub fn balance(&self) -> Money {
        self.balance
    }

    /// Paid off once the balance is gone or the scheduled term has run out.
    pub fn is_paid_off(&self) -> bool {
        self.balance <= LOAN_BALANCE_EPSILON || self.remaining_term_months == 0
    }

    /// Still carries a positive balance, so extra paydown can reach it.
    pub fn is_open(&self) -> bool {
        self.balance > LOAN_BALANCE_EPSILON
    }

    fn monthly_rate(&self) -> f64 {
        self.apr / 100.0 / MONTHS_PER_YEAR as f64
    }

    /// Payment required to amortize the remaining balance over the
    /// remaining term. Re-derived each month, so extra paydown lowers
    /// subsequent minimums. Zero once the loan is paid off.
    pub fn minimum_payment(&self) -> Money {
        if self.is_paid_off() {
            return 0.0;
        }
        let rate = self.monthly_rate();
        let n = self.remaining_term_months;
        if rate == 0.0 {
            // Straight-line division for interest-free loans
            return self.balance / n as f64;
        }
        let compounded = (1.0 + rate).powi(n as i32);
        self.balance * rate * compounded / (compounded - 1.0)
    }

    /// Apply one month of amortization. Interest accrues first; the
    /// payment covers it before touching principal. Anything beyond the
    /// full payoff cost comes back as `overpayment`.
    pub fn advance(&mut self, payment: Money) -> PaydownResult<LoanMonth> {
        if payment < 0.0 {
            return Err(PaydownError::InvalidInput {
                field: "payment".into(),
                reason: format!("Loan payment must be >= 0 (got {payment})"),
            });
        }

        self.remaining_term_months = self.remaining_term_months.saturating_sub(1);

        if self.balance <= LOAN_BALANCE_EPSILON {
            return Ok(LoanMonth {
                overpayment: payment,
                ..LoanMonth::default()
            });
        }

        let interest = self.balance * self.monthly_rate();
        let interest_paid = payment.min(interest);
        let toward_principal = payment - interest_paid;
        let principal_paid = toward_principal.min(self.balance);
        let overpayment = toward_principal - principal_paid;

        // Unpaid interest is not capitalized: the balance only ever
        // decreases by the principal actually applied.
        self.balance -= principal_paid;

        Ok(LoanMonth {
            interest_paid,
            principal_paid,
            overpayment,
        })
    }

    /// Reduce principal directly, without accruing another month of
    /// interest. Used when freed cash is redirected within a month that
    /// has already been advanced. Returns the amount actually consumed.
    pub fn apply_extra_principal(&mut self, amount: Money) -> Money {
        let consumed = amount.min(self.balance).max(0.0);
        self.balance -= consumed;
        consumed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loan(amount: f64, apr: f64, term_months: u32) -> LoanAccount {
        LoanAccount::new(&LoanSpec {
            amount,
            apr,
            term_months,
        })
    }

    #[test]
    fn test_zero_apr_minimum_is_straight_line() {
        let l = loan(1200.0, 0.0, 12);
        assert_eq!(l.minimum_payment(), 100.0);
    }

    #[test]
    fn test_amortized_minimum_payment() {
        // Standard amortization: $10,000 at 6% over 36 months
        let l = loan(10_000.0, 6.0, 36);
        assert!(
            (l.minimum_payment() - 304.2194).abs() < 0.01,
            "minimum_payment={}",
            l.minimum_payment()
        );
    }

    #[test]
    fn test_advance_splits_interest_first() {
        let mut l = loan(10_000.0, 6.0, 36);
        let m = l.advance(304.22).unwrap();
        // First month interest = 10000 * 0.005 = 50
        assert!((m.interest_paid - 50.0).abs() < 1e-9);
        assert!((m.principal_paid - 254.22).abs() < 1e-9);
        assert_eq!(m.overpayment, 0.0);
        assert!((l.balance() - 9745.78).abs() < 1e-9);
    }

    #[test]
    fn test_advance_returns_overpayment() {
        let mut l = loan(100.0, 12.0, 12);
        let m = l.advance(500.0).unwrap();
        assert!((m.interest_paid - 1.0).abs() < 1e-9);
        assert!((m.principal_paid - 100.0).abs() < 1e-9);
        assert!((m.overpayment - 399.0).abs() < 1e-9);
        assert!(l.is_paid_off());
    }

    #[test]
    fn test_negative_payment_rejected() {
        let mut l = loan(100.0, 5.0, 12);
        assert!(l.advance(-1.0).is_err());
    }

    #[test]
    fn test_paying_minimum_retires_loan_at_term() {
        let mut l = loan(10_000.0, 6.0, 36);
        let mut principal_total = 0.0;
        for _ in 0..36 {
            let payment = l.minimum_payment();
            let m = l.advance(payment).unwrap();
            principal_total += m.principal_paid;
        }
        assert!(l.is_paid_off(), "balance={}", l.balance());
        assert!(
            (principal_total - 10_000.0).abs() < 1e-4,
            "principal_total={principal_total}"
        );
    }

    #[test]
    fn test_zero_apr_full_term_principal_sums_exactly() {
        let mut l = loan(1200.0, 0.0, 12);
        let mut principal_total = 0.0;
        for _ in 0..12 {
            let payment = l.minimum_payment();
            principal_total += l.advance(payment).unwrap().principal_paid;
        }
        assert_eq!(principal_total, 1200.0);
        assert_eq!(l.balance(), 0.0);
    }

    #[test]
    fn test_minimum_payment_zero_after_payoff() {
        let mut l = loan(50.0, 0.0, 6);
        l.advance(50.0).unwrap();
        assert!(l.is_paid_off());
        assert_eq!(l.minimum_payment(), 0.0);
    }

    #[test]
    fn test_underpayment_never_grows_balance() {
        let mut l = loan(10_000.0, 12.0, 36);
        // Payment below the accrued interest of $100
        let m = l.advance(40.0).unwrap();
        assert!((m.interest_paid - 40.0).abs() < 1e-9);
        assert_eq!(m.principal_paid, 0.0);
        assert_eq!(l.balance(), 10_000.0);
    }

    #[test]
    fn test_apply_extra_principal_caps_at_balance() {
        let mut l = loan(100.0, 5.0, 12);
        let consumed = l.apply_extra_principal(250.0);
        assert_eq!(consumed, 100.0);
        assert_eq!(l.balance(), 0.0);
    }
}

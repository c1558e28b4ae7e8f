use crate::accounts::loan::LoanAccount;
use crate::types::{Money, BUDGET_EPSILON};

/// How one month's budget is divided.
#[derive(Debug, Clone)]
pub struct Allocation {
    /// Payment to each loan, index-aligned with the loan slice.
    pub loan_payments: Vec<Money>,
    pub investment_contribution: Money,
    /// Amount by which the budget fell short of the minimum payments.
    pub shortfall: Option<Money>,
}

/// How extra funds are divided across open loans. Pluggable so that
/// avalanche/snowball orderings can be added without touching the
/// simulator or the strategies.
pub trait ExtraPaydownPolicy: Send + Sync {
    /// Split `extra` across open loans. Amounts are nonnegative, sum to
    /// at most `extra`, and paid-off loans receive nothing.
    fn split_extra(&self, extra: Money, loans: &[LoanAccount]) -> Vec<Money>;
}

/// Decides, for one month, how the total budget is split between
/// required loan payments, extra paydown, and investing.
pub trait AllocationStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn allocate(&self, budget: Money, loans: &[LoanAccount]) -> Allocation;

    /// Policy used to route cash freed by a mid-month payoff back into
    /// the remaining open loans. Strategies that never pay extra
    /// principal return None; their freed cash goes to the investment
    /// account instead.
    fn paydown_policy(&self) -> Option<&dyn ExtraPaydownPolicy> {
        None
    }
}

/// Step 1 of every strategy: cover each loan's minimum payment. On a
/// shortfall, minimums are scaled proportionally to their size and
/// nothing is invested that month.
fn cover_minimums(budget: Money, loans: &[LoanAccount]) -> (Vec<Money>, Money, Option<Money>) {
    let minimums: Vec<Money> = loans.iter().map(LoanAccount::minimum_payment).collect();
    let total: Money = minimums.iter().sum();
    if total > budget + BUDGET_EPSILON {
        let scale = budget / total;
        let payments = minimums.iter().map(|m| m * scale).collect();
        (payments, 0.0, Some(total - budget))
    } else {
        let extra = (budget - total).max(0.0);
        (minimums, extra, None)
    }
}

fn any_open(loans: &[LoanAccount]) -> bool {
    loans.iter().any(LoanAccount::is_open)
}

/// All extra goes to paying down open loans; investing starts only once
/// every loan is retired, at which point the full budget flows in.
pub struct LoanFirst {
    paydown: Box<dyn ExtraPaydownPolicy>,
}

impl LoanFirst {
    pub fn new(paydown: Box<dyn ExtraPaydownPolicy>) -> Self {
        LoanFirst { paydown }
    }
}

impl AllocationStrategy for LoanFirst {
    fn name(&self) -> &'static str {
        "loan-first"
    }

    fn allocate(&self, budget: Money, loans: &[LoanAccount]) -> Allocation {
        let (mut payments, extra, shortfall) = cover_minimums(budget, loans);
        if !any_open(loans) {
            return Allocation {
                loan_payments: payments,
                investment_contribution: budget,
                shortfall: None,
            };
        }
        let split = self.paydown.split_extra(extra, loans);
        let assigned: Money = split.iter().sum();
        for (payment, extra_payment) in payments.iter_mut().zip(&split) {
            *payment += extra_payment;
        }
        Allocation {
            loan_payments: payments,
            investment_contribution: (extra - assigned).max(0.0),
            shortfall,
        }
    }

    fn paydown_policy(&self) -> Option<&dyn ExtraPaydownPolicy> {
        Some(self.paydown.as_ref())
    }
}

/// Loans get only their minimums; all extra goes to the investment
/// account for the full horizon.
pub struct InvestFirst;

impl AllocationStrategy for InvestFirst {
    fn name(&self) -> &'static str {
        "invest-first"
    }

    fn allocate(&self, budget: Money, loans: &[LoanAccount]) -> Allocation {
        let (payments, extra, shortfall) = cover_minimums(budget, loans);
        if !any_open(loans) {
            return Allocation {
                loan_payments: payments,
                investment_contribution: budget,
                shortfall: None,
            };
        }
        Allocation {
            loan_payments: payments,
            investment_contribution: extra,
            shortfall,
        }
    }
}

/// Fraction `paydown_fraction` of the extra goes to open loans, the
/// rest to the investment account. A retired loan's share of the
/// paydown pool flows to the remaining open loans, not to investing;
/// once every loan is retired the full budget is invested.
pub struct Split {
    paydown_fraction: f64,
    paydown: Box<dyn ExtraPaydownPolicy>,
}

impl Split {
    /// `paydown_fraction` in 0..=1.
    pub fn new(paydown_fraction: f64, paydown: Box<dyn ExtraPaydownPolicy>) -> Self {
        Split {
            paydown_fraction,
            paydown,
        }
    }
}

impl AllocationStrategy for Split {
    fn name(&self) -> &'static str {
        "split"
    }

    fn allocate(&self, budget: Money, loans: &[LoanAccount]) -> Allocation {
        let (mut payments, extra, shortfall) = cover_minimums(budget, loans);
        if !any_open(loans) {
            return Allocation {
                loan_payments: payments,
                investment_contribution: budget,
                shortfall: None,
            };
        }
        let pool = extra * self.paydown_fraction;
        let split = self.paydown.split_extra(pool, loans);
        let assigned: Money = split.iter().sum();
        for (payment, extra_payment) in payments.iter_mut().zip(&split) {
            *payment += extra_payment;
        }
        Allocation {
            loan_payments: payments,
            investment_contribution: (extra - assigned).max(0.0),
            shortfall,
        }
    }

    fn paydown_policy(&self) -> Option<&dyn ExtraPaydownPolicy> {
        Some(self.paydown.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocation::proportional::Proportional;
    use crate::types::LoanSpec;

    fn loan(amount: f64, apr: f64, term_months: u32) -> LoanAccount {
        LoanAccount::new(&LoanSpec {
            amount,
            apr,
            term_months,
        })
    }

    fn paid_off(amount: f64) -> LoanAccount {
        let mut l = loan(amount, 5.0, 60);
        l.apply_extra_principal(amount);
        l
    }

    #[test]
    fn test_loan_first_sends_extra_to_loans() {
        let loans = vec![loan(10_000.0, 6.0, 36)];
        let strategy = LoanFirst::new(Box::new(Proportional));
        let alloc = strategy.allocate(400.0, &loans);
        assert_eq!(alloc.investment_contribution, 0.0);
        assert!((alloc.loan_payments[0] - 400.0).abs() < 1e-9);
        assert!(alloc.shortfall.is_none());
    }

    #[test]
    fn test_invest_first_sends_extra_to_investment() {
        let loans = vec![loan(10_000.0, 6.0, 36)];
        let strategy = InvestFirst;
        let alloc = strategy.allocate(400.0, &loans);
        let minimum = loans[0].minimum_payment();
        assert!((alloc.loan_payments[0] - minimum).abs() < 1e-9);
        assert!((alloc.investment_contribution - (400.0 - minimum)).abs() < 1e-9);
    }

    #[test]
    fn test_split_divides_extra() {
        let loans = vec![loan(10_000.0, 6.0, 36)];
        let strategy = Split::new(0.5, Box::new(Proportional));
        let alloc = strategy.allocate(400.0, &loans);
        let minimum = loans[0].minimum_payment();
        let extra = 400.0 - minimum;
        assert!((alloc.loan_payments[0] - (minimum + extra * 0.5)).abs() < 1e-9);
        assert!((alloc.investment_contribution - extra * 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_shortfall_scales_minimums_proportionally() {
        let loans = vec![loan(10_000.0, 6.0, 36), loan(5_000.0, 4.0, 24)];
        let minimums: Vec<f64> = loans.iter().map(LoanAccount::minimum_payment).collect();
        let total: f64 = minimums.iter().sum();
        assert!(total > 400.0);

        let strategy = InvestFirst;
        let alloc = strategy.allocate(400.0, &loans);
        let shortfall = alloc.shortfall.expect("expected a shortfall");
        assert!((shortfall - (total - 400.0)).abs() < 1e-9);
        assert_eq!(alloc.investment_contribution, 0.0);
        // Scaled payments keep the minimums' proportions
        assert!((alloc.loan_payments[0] / alloc.loan_payments[1]
            - minimums[0] / minimums[1])
            .abs()
            < 1e-9);
        let paid: f64 = alloc.loan_payments.iter().sum();
        assert!((paid - 400.0).abs() < 1e-9);
    }

    #[test]
    fn test_all_retired_invests_full_budget() {
        let loans = vec![paid_off(1000.0), paid_off(2000.0)];
        for strategy in [
            Box::new(LoanFirst::new(Box::new(Proportional))) as Box<dyn AllocationStrategy>,
            Box::new(InvestFirst),
            Box::new(Split::new(0.5, Box::new(Proportional))),
        ] {
            let alloc = strategy.allocate(400.0, &loans);
            assert_eq!(
                alloc.investment_contribution,
                400.0,
                "strategy {}",
                strategy.name()
            );
            assert!(alloc.loan_payments.iter().all(|&p| p == 0.0));
        }
    }

    #[test]
    fn test_split_redirects_retired_share_to_open_loan() {
        // One of two loans retired: the whole paydown pool goes to the
        // surviving loan, and the invest share stays at (1-p) * extra.
        let loans = vec![paid_off(2000.0), loan(10_000.0, 6.0, 36)];
        let strategy = Split::new(0.5, Box::new(Proportional));
        let alloc = strategy.allocate(600.0, &loans);
        let minimum = loans[1].minimum_payment();
        let extra = 600.0 - minimum;
        assert_eq!(alloc.loan_payments[0], 0.0);
        assert!((alloc.loan_payments[1] - (minimum + extra * 0.5)).abs() < 1e-9);
        assert!((alloc.investment_contribution - extra * 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_extra_payments_never_exceed_extra() {
        let loans = vec![loan(8_000.0, 5.0, 48), loan(3_000.0, 10.0, 24)];
        let strategy = LoanFirst::new(Box::new(Proportional));
        let alloc = strategy.allocate(1_000.0, &loans);
        let minimums: f64 = loans.iter().map(LoanAccount::minimum_payment).sum();
        let extra_paid: f64 = alloc.loan_payments.iter().sum::<f64>() - minimums;
        assert!(extra_paid <= (1_000.0 - minimums) + 1e-9);
    }
}

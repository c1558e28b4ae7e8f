use crate::accounts::loan::LoanAccount;
use crate::allocation::strategy::ExtraPaydownPolicy;
use crate::types::Money;

/// Balance-weighted proportional paydown: extra funds split across open
/// loans by outstanding-balance share. The only sub-policy implemented;
/// avalanche and snowball would slot in as further `ExtraPaydownPolicy`
/// implementations.
#[derive(Debug, Clone, Copy, Default)]
pub struct Proportional;

impl ExtraPaydownPolicy for Proportional {
    fn split_extra(&self, extra: Money, loans: &[LoanAccount]) -> Vec<Money> {
        let open_balance: Money = loans
            .iter()
            .filter(|l| l.is_open())
            .map(LoanAccount::balance)
            .sum();
        if extra <= 0.0 || open_balance <= 0.0 {
            return vec![0.0; loans.len()];
        }
        loans
            .iter()
            .map(|l| {
                if l.is_open() {
                    extra * l.balance() / open_balance
                } else {
                    0.0
                }
            })
            .collect()
    }
}

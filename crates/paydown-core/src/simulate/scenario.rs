use serde::{Deserialize, Serialize};

use crate::accounts::investment::{effective_monthly_rate, InvestmentAccount};
use crate::accounts::loan::LoanAccount;
use crate::allocation::strategy::AllocationStrategy;
use crate::returns::path::ReturnPathGenerator;
use crate::simulate::accumulator::{YearAccumulator, YearlySnapshot};
use crate::types::{InvestmentSpec, LoanSpec, Money, LOAN_BALANCE_EPSILON, MONTHS_PER_YEAR};
use crate::PaydownResult;

/// Everything needed to construct fresh account state for one run.
/// Monte Carlo trials each build their own accounts from this, so no
/// mutable state crosses trial boundaries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub loans: Vec<LoanSpec>,
    pub investment: InvestmentSpec,
    pub monthly_budget: Money,
    pub horizon_months: u32,
}

/// A month in which the budget could not cover the minimum payments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortfallEvent {
    /// 1-based month index.
    pub month: u32,
    pub amount: Money,
}

/// Output of a single simulated run over the full horizon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioRun {
    pub yearly: Vec<YearlySnapshot>,
    pub loans_remaining_balance: Money,
    pub investment_balance: Money,
    pub final_net_worth: Money,
    pub total_interest_paid: Money,
    pub shortfalls: Vec<ShortfallEvent>,
}

/// Drives the loans and the investment account month by month under one
/// allocation strategy and one return path.
pub struct ScenarioSimulator<'a> {
    config: &'a ScenarioConfig,
}

impl<'a> ScenarioSimulator<'a> {
    pub fn new(config: &'a ScenarioConfig) -> Self {
        ScenarioSimulator { config }
    }

    pub fn run(
        &self,
        strategy: &dyn AllocationStrategy,
        returns: &mut dyn ReturnPathGenerator,
    ) -> PaydownResult<ScenarioRun> {
        let cfg = self.config;
        let mut loans: Vec<LoanAccount> = cfg.loans.iter().map(LoanAccount::new).collect();
        let mut investment = InvestmentAccount::new(cfg.investment.initial_balance);
        let mut accumulator = YearAccumulator::new();

        let mut yearly: Vec<YearlySnapshot> = Vec::new();
        let mut shortfalls: Vec<ShortfallEvent> = Vec::new();
        let mut total_interest_paid = 0.0;
        let mut monthly_rate = 0.0;

        for month in 1..=cfg.horizon_months {
            // One annual draw, held constant across the year's months.
            if (month - 1) % MONTHS_PER_YEAR == 0 {
                let annual_return = returns.next_annual_return();
                monthly_rate = effective_monthly_rate(annual_return, cfg.investment.annual_fee);
            }

            let allocation = strategy.allocate(cfg.monthly_budget, &loans);
            if let Some(amount) = allocation.shortfall {
                shortfalls.push(ShortfallEvent { month, amount });
            }

            let mut freed = 0.0;
            for (loan, payment) in loans.iter_mut().zip(&allocation.loan_payments) {
                let applied = loan.advance(*payment)?;
                total_interest_paid += applied.interest_paid;
                accumulator.record_loan_month(&applied);
                freed += applied.overpayment;
            }

            // A payment that retires its loan mid-month frees cash.
            // Re-offer it to the remaining open loans before letting it
            // fall through to the investment account. Each pass either
            // consumes everything or retires another loan, so this
            // terminates within loans.len() passes.
            if let Some(policy) = strategy.paydown_policy() {
                while freed > LOAN_BALANCE_EPSILON && loans.iter().any(LoanAccount::is_open) {
                    let redirected = policy.split_extra(freed, &loans);
                    let mut consumed = 0.0;
                    for (loan, amount) in loans.iter_mut().zip(&redirected) {
                        let applied = loan.apply_extra_principal(*amount);
                        accumulator.record_extra_principal(applied);
                        consumed += applied;
                    }
                    if consumed <= LOAN_BALANCE_EPSILON {
                        break;
                    }
                    freed -= consumed;
                }
            }

            let contribution = allocation.investment_contribution + freed.max(0.0);
            let growth = investment.advance(contribution, monthly_rate);
            accumulator.record_investment_month(contribution, growth);

            if month % MONTHS_PER_YEAR == 0 || month == cfg.horizon_months {
                let year = month.div_ceil(MONTHS_PER_YEAR);
                yearly.push(accumulator.close(
                    year,
                    total_loan_balance(&loans),
                    investment.balance(),
                ));
            }
        }

        let loans_remaining_balance = total_loan_balance(&loans);
        let investment_balance = investment.balance();
        Ok(ScenarioRun {
            yearly,
            loans_remaining_balance,
            investment_balance,
            final_net_worth: investment_balance - loans_remaining_balance,
            total_interest_paid,
            shortfalls,
        })
    }
}

fn total_loan_balance(loans: &[LoanAccount]) -> Money {
    loans.iter().map(LoanAccount::balance).sum()
}

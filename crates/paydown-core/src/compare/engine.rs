use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::allocation::proportional::Proportional;
use crate::allocation::strategy::{AllocationStrategy, InvestFirst, LoanFirst, Split};
use crate::error::PaydownError;
use crate::monte_carlo::runner::{MonteCarloOutcome, MonteCarloRunner};
use crate::returns::path::FixedReturns;
use crate::simulate::accumulator::YearlySnapshot;
use crate::simulate::scenario::{ScenarioConfig, ScenarioSimulator, ShortfallEvent};
use crate::types::{
    with_metadata, ComputationOutput, InvestmentSpec, LoanSpec, Money, Rate,
    DEFAULT_SPLIT_PERCENTAGE, DEFAULT_TRIAL_COUNT, DEFAULT_VOLATILITY,
};
use crate::PaydownResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Validated parameter set for a full comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonInput {
    pub loans: Vec<LoanSpec>,
    pub investment: InvestmentSpec,
    /// Total monthly amount available across all loans and investing.
    pub monthly_budget: Money,
    pub horizon_months: u32,
    /// Share of extra directed to extra paydown in the split scenario,
    /// percentage points.
    #[serde(default = "default_split_percentage")]
    pub split_percentage: Rate,
    /// Also run Monte Carlo for each scenario.
    #[serde(default)]
    pub monte_carlo: bool,
    #[serde(default = "default_trial_count")]
    pub trial_count: u32,
    /// Annual return standard deviation, percentage points.
    #[serde(default = "default_volatility")]
    pub volatility: Rate,
    /// Master seed for reproducible Monte Carlo batches.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_split_percentage() -> Rate {
    DEFAULT_SPLIT_PERCENTAGE
}

fn default_trial_count() -> u32 {
    DEFAULT_TRIAL_COUNT
}

fn default_volatility() -> Rate {
    DEFAULT_VOLATILITY
}

/// The three compared scenarios, in declaration (tie-break) order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    LoanFirst,
    InvestFirst,
    Split,
}

impl ScenarioKind {
    pub const ALL: [ScenarioKind; 3] = [
        ScenarioKind::LoanFirst,
        ScenarioKind::InvestFirst,
        ScenarioKind::Split,
    ];

    pub fn label(&self, split_percentage: Rate) -> String {
        match self {
            ScenarioKind::LoanFirst => "Loan-first".to_string(),
            ScenarioKind::InvestFirst => "Invest-first".to_string(),
            ScenarioKind::Split => format!("Split ({split_percentage:.0}% paydown)"),
        }
    }
}

/// One scenario's full outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub kind: ScenarioKind,
    pub name: String,
    pub yearly: Vec<YearlySnapshot>,
    pub loans_remaining_balance: Money,
    pub investment_balance: Money,
    pub final_net_worth: Money,
    pub total_interest_paid: Money,
    pub shortfalls: Vec<ShortfallEvent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monte_carlo: Option<MonteCarloOutcome>,
}

/// The chosen scenario and the metric it won on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationResult {
    pub recommended: ScenarioKind,
    pub name: String,
    pub metric: String,
    pub final_net_worth: Money,
}

/// Everything the rendering layer needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonOutput {
    pub scenarios: Vec<ScenarioResult>,
    pub recommendation: RecommendationResult,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn invalid(field: &str, reason: impl Into<String>) -> PaydownError {
    PaydownError::InvalidInput {
        field: field.into(),
        reason: reason.into(),
    }
}

/// Fail fast on malformed parameters, before any simulation starts.
fn validate(input: &ComparisonInput) -> PaydownResult<()> {
    for (i, loan) in input.loans.iter().enumerate() {
        if loan.amount <= 0.0 || loan.amount.is_nan() {
            return Err(invalid(
                &format!("loans[{i}].amount"),
                format!("Must be > 0 (got {})", loan.amount),
            ));
        }
        if !(0.0..=100.0).contains(&loan.apr) {
            return Err(invalid(
                &format!("loans[{i}].apr"),
                format!("Must be within 0..=100 (got {})", loan.apr),
            ));
        }
        if loan.term_months < 1 {
            return Err(invalid(&format!("loans[{i}].term_months"), "Must be >= 1"));
        }
    }
    if input.investment.initial_balance < 0.0 || input.investment.initial_balance.is_nan() {
        return Err(invalid(
            "investment.initial_balance",
            format!("Must be >= 0 (got {})", input.investment.initial_balance),
        ));
    }
    if !(0.0..=3.0).contains(&input.investment.annual_fee) {
        return Err(invalid(
            "investment.annual_fee",
            format!("Must be within 0..=3 (got {})", input.investment.annual_fee),
        ));
    }
    if input.monthly_budget <= 0.0 || input.monthly_budget.is_nan() {
        return Err(invalid(
            "monthly_budget",
            format!("Must be > 0 (got {})", input.monthly_budget),
        ));
    }
    if input.horizon_months < 1 {
        return Err(invalid("horizon_months", "Must be >= 1"));
    }
    if !(0.0..=100.0).contains(&input.split_percentage) {
        return Err(invalid(
            "split_percentage",
            format!("Must be within 0..=100 (got {})", input.split_percentage),
        ));
    }
    if input.monte_carlo {
        if input.trial_count < 1 {
            return Err(invalid("trial_count", "Must be at least 1"));
        }
        if input.volatility <= 0.0 || input.volatility.is_nan() {
            return Err(invalid(
                "volatility",
                format!("Must be > 0 (got {})", input.volatility),
            ));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

fn strategy_for(kind: ScenarioKind, split_percentage: Rate) -> Box<dyn AllocationStrategy> {
    match kind {
        ScenarioKind::LoanFirst => Box::new(LoanFirst::new(Box::new(Proportional))),
        ScenarioKind::InvestFirst => Box::new(InvestFirst),
        ScenarioKind::Split => Box::new(Split::new(
            split_percentage / 100.0,
            Box::new(Proportional),
        )),
    }
}

/// Run the three scenarios deterministically, optionally with a Monte
/// Carlo batch each, and derive the recommendation: highest final net
/// worth, ties broken by lowest total interest paid, then by scenario
/// declaration order.
pub fn run_comparison(
    input: &ComparisonInput,
) -> PaydownResult<ComputationOutput<ComparisonOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate(input)?;

    let config = ScenarioConfig {
        loans: input.loans.clone(),
        investment: input.investment.clone(),
        monthly_budget: input.monthly_budget,
        horizon_months: input.horizon_months,
    };
    let simulator = ScenarioSimulator::new(&config);

    let mut scenarios: Vec<ScenarioResult> = Vec::with_capacity(ScenarioKind::ALL.len());
    for kind in ScenarioKind::ALL {
        let strategy = strategy_for(kind, input.split_percentage);
        let mut path = FixedReturns::new(input.investment.expected_annual_return);
        let run = simulator.run(strategy.as_ref(), &mut path)?;

        if let Some(first) = run.shortfalls.first() {
            warnings.push(format!(
                "{}: monthly budget short of minimum payments in {} month(s), first in month {} (${:.2} short)",
                kind.label(input.split_percentage),
                run.shortfalls.len(),
                first.month,
                first.amount
            ));
        }

        let monte_carlo = if input.monte_carlo {
            let runner = MonteCarloRunner {
                trial_count: input.trial_count,
                volatility: input.volatility,
                seed: input.seed,
            };
            Some(runner.run(&config, strategy.as_ref())?)
        } else {
            None
        };

        scenarios.push(ScenarioResult {
            kind,
            name: kind.label(input.split_percentage),
            yearly: run.yearly,
            loans_remaining_balance: run.loans_remaining_balance,
            investment_balance: run.investment_balance,
            final_net_worth: run.final_net_worth,
            total_interest_paid: run.total_interest_paid,
            shortfalls: run.shortfalls,
            monte_carlo,
        });
    }

    let mut best = 0;
    for i in 1..scenarios.len() {
        let (leader, challenger) = (&scenarios[best], &scenarios[i]);
        if challenger.final_net_worth > leader.final_net_worth
            || (challenger.final_net_worth == leader.final_net_worth
                && challenger.total_interest_paid < leader.total_interest_paid)
        {
            best = i;
        }
    }
    let recommendation = RecommendationResult {
        recommended: scenarios[best].kind,
        name: scenarios[best].name.clone(),
        metric: "final_net_worth".to_string(),
        final_net_worth: scenarios[best].final_net_worth,
    };

    let output = ComparisonOutput {
        scenarios,
        recommendation,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Debt Paydown vs Investment Scenario Comparison",
        &serde_json::json!({
            "num_loans": input.loans.len(),
            "monthly_budget": input.monthly_budget,
            "horizon_months": input.horizon_months,
            "split_percentage": input.split_percentage,
            "monte_carlo": input.monte_carlo,
            "trial_count": input.trial_count,
            "volatility": input.volatility,
            "seed": input.seed,
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

/// Monetary amounts. IEEE-754 f64, matching the precision the callers
/// (web/CLI layer) hand in and render back out.
pub type Money = f64;

/// Rates expressed as percentage points (5.0 = 5%), never as fractions.
pub type Rate = f64;

pub const MONTHS_PER_YEAR: u32 = 12;

/// Threshold below which a loan balance is considered paid off.
pub const LOAN_BALANCE_EPSILON: f64 = 1e-8;

/// Tolerance when comparing the budget against the sum of minimum payments.
pub const BUDGET_EPSILON: f64 = 1e-6;

/// Annual standard deviation of sampled returns, in percentage points.
pub const DEFAULT_VOLATILITY: Rate = 15.0;

/// Share of extra budget directed to extra loan paydown in the split
/// scenario, in percentage points.
pub const DEFAULT_SPLIT_PERCENTAGE: Rate = 50.0;

pub const DEFAULT_TRIAL_COUNT: u32 = 1_000;

/// A single loan as provided by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanSpec {
    /// Outstanding principal, > 0.
    pub amount: Money,
    /// Annual percentage rate, 0..=100.
    pub apr: Rate,
    /// Remaining term in months, >= 1.
    pub term_months: u32,
}

/// Investment account parameters as provided by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestmentSpec {
    /// Starting balance, >= 0.
    #[serde(default)]
    pub initial_balance: Money,
    /// Expected annual return in percentage points; may be negative.
    pub expected_annual_return: Rate,
    /// Annual fee drag in percentage points, 0..=3.
    #[serde(default)]
    pub annual_fee: Rate,
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "ieee754_f64".to_string(),
        },
    }
}

use clap::Args;
use serde_json::Value;

use paydown_core::compare::{run_comparison, ComparisonInput};

use crate::input;

/// Arguments for the three-scenario comparison.
#[derive(Args)]
pub struct CompareArgs {
    /// Path to a JSON input file (reads stdin when omitted)
    #[arg(long)]
    pub input: Option<String>,

    /// Also run a Monte Carlo batch for every scenario
    #[arg(long)]
    pub monte_carlo: bool,

    /// Number of Monte Carlo trials
    #[arg(long)]
    pub trials: Option<u32>,

    /// Master seed for reproducible Monte Carlo batches
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn run_compare(args: CompareArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut comparison: ComparisonInput = if let Some(ref path) = args.input {
        input::read_json(path)?
    } else if let Some(data) = input::read_stdin()? {
        serde_json::from_str(&data)?
    } else {
        return Err("compare needs --input <file.json> or JSON piped on stdin".into());
    };

    // Flags override whatever the JSON document carries.
    if args.monte_carlo {
        comparison.monte_carlo = true;
    }
    if let Some(trials) = args.trials {
        comparison.trial_count = trials;
    }
    if let Some(seed) = args.seed {
        comparison.seed = Some(seed);
    }

    let output = run_comparison(&comparison)?;
    Ok(serde_json::to_value(output)?)
}

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::allocation::strategy::AllocationStrategy;
use crate::error::PaydownError;
use crate::returns::path::SampledReturns;
use crate::simulate::scenario::{ScenarioConfig, ScenarioSimulator};
use crate::types::{Money, Rate};
use crate::PaydownResult;

/// Distribution of final net worth across independent trials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloOutcome {
    pub trials: u32,
    pub mean_net_worth: Money,
    /// Probability of ending with positive net worth.
    pub success_probability: f64,
    pub percentile_10: Money,
    pub percentile_50: Money,
    pub percentile_90: Money,
}

impl MonteCarloOutcome {
    /// Statistics over an unordered multiset of final-net-worth samples.
    /// The same formula applies to a full batch or an early-terminated
    /// one, so partial aggregates stay consistent. Sorts in place.
    ///
    /// # Panics
    /// Panics if `samples` is empty.
    pub fn from_samples(samples: &mut [f64]) -> Self {
        assert!(!samples.is_empty());
        samples.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let n = samples.len() as f64;
        let mean_net_worth = samples.iter().sum::<f64>() / n;
        let successes = samples.iter().filter(|&&v| v > 0.0).count();
        MonteCarloOutcome {
            trials: samples.len() as u32,
            mean_net_worth,
            success_probability: successes as f64 / n,
            percentile_10: percentile_sorted(samples, 10.0),
            percentile_50: percentile_sorted(samples, 50.0),
            percentile_90: percentile_sorted(samples, 90.0),
        }
    }
}

/// Repeats a scenario simulation with independently sampled return
/// paths and aggregates the outcome distribution.
#[derive(Debug, Clone)]
pub struct MonteCarloRunner {
    pub trial_count: u32,
    /// Annual return standard deviation, percentage points.
    pub volatility: Rate,
    /// Master seed; trial seeds are derived from it, so identical seeds
    /// reproduce identical statistics. None draws from entropy.
    pub seed: Option<u64>,
}

impl MonteCarloRunner {
    /// Run the full configured batch. At least 1000 trials are
    /// recommended for stable percentile estimates.
    pub fn run(
        &self,
        config: &ScenarioConfig,
        strategy: &dyn AllocationStrategy,
    ) -> PaydownResult<MonteCarloOutcome> {
        self.run_capped(config, strategy, self.trial_count)
    }

    /// Run at most `max_trials` of the configured batch. Lets a caller
    /// stop a long batch early; the partial statistics use the same
    /// formula as a full run.
    pub fn run_capped(
        &self,
        config: &ScenarioConfig,
        strategy: &dyn AllocationStrategy,
        max_trials: u32,
    ) -> PaydownResult<MonteCarloOutcome> {
        let trials = self.trial_count.min(max_trials);
        if trials == 0 {
            return Err(PaydownError::InvalidInput {
                field: "trial_count".into(),
                reason: "Must be at least 1".into(),
            });
        }

        let mut master = match self.seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        // Seeds are drawn up front: each trial owns disjoint state, so
        // trials could be fanned out across threads without changing
        // the aggregate.
        let trial_seeds: Vec<u64> = (0..trials).map(|_| master.gen()).collect();

        let simulator = ScenarioSimulator::new(config);
        let mut samples: Vec<f64> = Vec::with_capacity(trials as usize);
        for trial_seed in trial_seeds {
            let mut path = SampledReturns::new(
                config.investment.expected_annual_return,
                self.volatility,
                trial_seed,
            )?;
            let run = simulator.run(strategy, &mut path)?;
            samples.push(run.final_net_worth);
        }

        Ok(MonteCarloOutcome::from_samples(&mut samples))
    }
}

/// Percentile from a **sorted** slice using linear interpolation.
fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    assert!(!sorted.is_empty());
    if sorted.len() == 1 {
        return sorted[0];
    }
    let rank = p / 100.0 * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if lower == upper {
        sorted[lower]
    } else {
        let frac = rank - lower as f64;
        sorted[lower] * (1.0 - frac) + sorted[upper] * frac
    }
}

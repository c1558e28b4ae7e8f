use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use statrs::distribution::Normal;

use crate::error::PaydownError;
use crate::types::Rate;
use crate::PaydownResult;

/// Source of annual investment returns, one draw per simulated year.
pub trait ReturnPathGenerator {
    /// Annual return for the next simulated year, in percentage points.
    fn next_annual_return(&mut self) -> Rate;
}

/// Deterministic path: the expected return, every year.
#[derive(Debug, Clone, Copy)]
pub struct FixedReturns {
    annual_return: Rate,
}

impl FixedReturns {
    pub fn new(annual_return: Rate) -> Self {
        FixedReturns { annual_return }
    }
}

impl ReturnPathGenerator for FixedReturns {
    fn next_annual_return(&mut self) -> Rate {
        self.annual_return
    }
}

/// Stochastic path: Normal(expected return, volatility), drawn
/// independently per year. No autocorrelation across years and no
/// floor — a bad year can push the sampled return arbitrarily negative.
pub struct SampledReturns {
    distribution: Normal,
    rng: StdRng,
}

impl SampledReturns {
    /// `mean` and `volatility` in percentage points; volatility must be
    /// positive. Seeded explicitly so trials are reproducible.
    pub fn new(mean: Rate, volatility: Rate, seed: u64) -> PaydownResult<Self> {
        let distribution =
            Normal::new(mean, volatility).map_err(|e| PaydownError::InvalidInput {
                field: "volatility".into(),
                reason: format!("Invalid Normal parameters: {e}"),
            })?;
        Ok(SampledReturns {
            distribution,
            rng: StdRng::seed_from_u64(seed),
        })
    }
}

impl ReturnPathGenerator for SampledReturns {
    fn next_annual_return(&mut self) -> Rate {
        self.rng.sample(self.distribution)
    }
}

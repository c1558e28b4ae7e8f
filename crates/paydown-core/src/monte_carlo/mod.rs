pub mod runner;

pub use runner::{MonteCarloOutcome, MonteCarloRunner};

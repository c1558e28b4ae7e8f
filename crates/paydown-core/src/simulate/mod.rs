pub mod accumulator;
pub mod scenario;

pub use accumulator::{YearAccumulator, YearlySnapshot};
pub use scenario::{ScenarioConfig, ScenarioRun, ScenarioSimulator, ShortfallEvent};

pub mod engine;

pub use engine::{
    run_comparison, ComparisonInput, ComparisonOutput, RecommendationResult, ScenarioKind,
    ScenarioResult,
};

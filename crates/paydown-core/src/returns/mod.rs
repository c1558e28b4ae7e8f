pub mod path;

pub use path::{FixedReturns, ReturnPathGenerator, SampledReturns};

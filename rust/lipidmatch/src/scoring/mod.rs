mod accumulator;
pub(crate) mod aggregate;
pub mod metrics;

pub use accumulator::ScoreAccumulator;
pub use metrics::AlignmentMetrics;

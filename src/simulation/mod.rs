//! Stochastic exit simulation.

pub mod monte_carlo;
pub mod stats;

pub use monte_carlo::MonteCarloSimulator;
pub use stats::{percentile_sorted, SampleSummary, StreamingStats};

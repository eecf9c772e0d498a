//! Monte Carlo exit analysis.
//!
//! Each trial multiplies every base cash flow by `1 + N(0, cf_volatility)`
//! and values the perturbed forecast with the DCF engine. Rates, stake and
//! invested amount stay fixed, so assumptions are validated once up front
//! and no trial can fail afterwards. Parallel runs are split into chunks,
//! each with its own jumped random stream.

use rayon::prelude::*;
use tracing::debug;

use super::stats::{SampleSummary, StreamingStats};
use crate::core::error::{Result, VentureError};
use crate::core::random::{JumpableSource, RandomSource};
use crate::core::types::{ExitAssumptions, MonteCarloResult};
use crate::valuation::dcf::DcfValuationEngine;

/// Default trials per random stream in parallel runs.
pub const DEFAULT_CHUNK_SIZE: usize = 1_000;

/// Default upper bound on trials per run.
pub const DEFAULT_MAX_TRIALS: usize = 1_000_000;

/// Simulator over perturbed cash-flow forecasts.
#[derive(Debug, Clone, Copy)]
pub struct MonteCarloSimulator {
    engine: DcfValuationEngine,
    chunk_size: usize,
    max_trials: usize,
}

impl Default for MonteCarloSimulator {
    fn default() -> Self {
        Self::new()
    }
}

impl MonteCarloSimulator {
    pub fn new() -> Self {
        Self::with_chunk_size(DEFAULT_CHUNK_SIZE)
    }

    /// Simulator with a custom chunk size (clamped to at least 1).
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        Self {
            engine: DcfValuationEngine::new(),
            chunk_size: chunk_size.max(1),
            max_trials: DEFAULT_MAX_TRIALS,
        }
    }

    /// Set the largest trial count a run accepts.
    pub fn with_max_trials(mut self, max_trials: usize) -> Self {
        self.max_trials = max_trials;
        self
    }

    /// Run `trials` draws sequentially from `rng`.
    pub fn run<R: RandomSource>(
        &self,
        base: &ExitAssumptions,
        trials: usize,
        cf_volatility: f64,
        rng: &mut R,
    ) -> Result<MonteCarloResult> {
        self.check_inputs(base, trials, cf_volatility)?;

        let mut acc = TrialAccumulator::with_capacity(trials);
        let mut scratch = Vec::with_capacity(base.cash_flows.len());
        for _ in 0..trials {
            let (exit, roi) = self.draw_trial(base, cf_volatility, rng, &mut scratch);
            acc.push(exit, roi);
        }

        debug!(trials, cf_volatility, "monte carlo run complete");
        Ok(acc.finish(trials))
    }

    /// Run `trials` draws on the rayon pool.
    ///
    /// Streams are cloned from `rng` and jumped once per chunk, so the result
    /// depends on the seed and chunk size only, not on the thread count.
    pub fn run_parallel<R: JumpableSource>(
        &self,
        base: &ExitAssumptions,
        trials: usize,
        cf_volatility: f64,
        rng: &R,
    ) -> Result<MonteCarloResult> {
        self.check_inputs(base, trials, cf_volatility)?;

        let n_chunks = trials.div_ceil(self.chunk_size);
        let mut stream = rng.clone();
        let chunk_rngs: Vec<R> = (0..n_chunks)
            .map(|_| {
                let chunk_rng = stream.clone();
                stream.jump();
                chunk_rng
            })
            .collect();

        let chunks: Vec<TrialAccumulator> = chunk_rngs
            .into_par_iter()
            .enumerate()
            .map(|(chunk_idx, mut chunk_rng)| {
                let start = chunk_idx * self.chunk_size;
                let end = start.saturating_add(self.chunk_size).min(trials);
                let mut acc = TrialAccumulator::with_capacity(end - start);
                let mut scratch = Vec::with_capacity(base.cash_flows.len());
                for _ in start..end {
                    let (exit, roi) =
                        self.draw_trial(base, cf_volatility, &mut chunk_rng, &mut scratch);
                    acc.push(exit, roi);
                }
                acc
            })
            .collect();

        // Merge in chunk order so the floating-point result is reproducible
        let acc = chunks
            .into_iter()
            .fold(TrialAccumulator::with_capacity(trials), TrialAccumulator::merge);

        debug!(trials, chunks = n_chunks, cf_volatility, "parallel monte carlo run complete");
        Ok(acc.finish(trials))
    }

    fn check_inputs(&self, base: &ExitAssumptions, trials: usize, cf_volatility: f64) -> Result<()> {
        if trials < 1 {
            return Err(VentureError::invalid_parameter("montecarlo_trials must be at least 1"));
        }
        if trials > self.max_trials {
            return Err(VentureError::invalid_parameter(format!(
                "montecarlo_trials must be at most {}, got {}",
                self.max_trials, trials
            )));
        }
        if !cf_volatility.is_finite() || cf_volatility < 0.0 {
            return Err(VentureError::invalid_parameter(format!(
                "cf_volatility must be a non-negative number, got {}",
                cf_volatility
            )));
        }
        self.engine.validate(base)
    }

    /// One perturbed valuation: `(exit_valuation, investor_roi)`.
    fn draw_trial<R: RandomSource>(
        &self,
        base: &ExitAssumptions,
        cf_volatility: f64,
        rng: &mut R,
        scratch: &mut Vec<f64>,
    ) -> (f64, f64) {
        scratch.clear();
        scratch.extend(
            base.cash_flows
                .iter()
                .map(|cf| cf * (1.0 + cf_volatility * rng.next_normal())),
        );
        let result = self.engine.value(scratch, base);
        (result.exit_valuation, result.investor_roi)
    }
}

/// Moments accumulate online; the samples are kept only for percentiles.
struct TrialAccumulator {
    exit_stats: StreamingStats,
    roi_stats: StreamingStats,
    exits: Vec<f64>,
    rois: Vec<f64>,
}

impl TrialAccumulator {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            exit_stats: StreamingStats::new(),
            roi_stats: StreamingStats::new(),
            exits: Vec::with_capacity(capacity),
            rois: Vec::with_capacity(capacity),
        }
    }

    fn push(&mut self, exit: f64, roi: f64) {
        self.exit_stats.update(exit);
        self.roi_stats.update(roi);
        self.exits.push(exit);
        self.rois.push(roi);
    }

    fn merge(mut self, other: Self) -> Self {
        self.exit_stats = self.exit_stats.merge(other.exit_stats);
        self.roi_stats = self.roi_stats.merge(other.roi_stats);
        self.exits.extend(other.exits);
        self.rois.extend(other.rois);
        self
    }

    fn finish(mut self, trials: usize) -> MonteCarloResult {
        let exit = SampleSummary::from_parts(&self.exit_stats, &mut self.exits);
        let roi = SampleSummary::from_parts(&self.roi_stats, &mut self.rois);
        MonteCarloResult {
            trials_count: trials,
            mean_exit_value: exit.mean,
            median_exit_value: exit.median,
            std_exit_value: exit.std_dev,
            p10_exit_value: exit.p10,
            p90_exit_value: exit.p90,
            mean_roi: roi.mean,
            median_roi: roi.median,
            std_roi: roi.std_dev,
            p10_roi: roi.p10,
            p90_roi: roi.p90,
        }
    }
}

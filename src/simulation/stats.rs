//! Sample statistics for simulation output.
//!
//! Mean and variance accumulate online with Welford's algorithm; order
//! statistics come from a sorted copy of the sample.

/// Streaming mean/variance accumulator using Welford's algorithm.
#[derive(Debug, Clone, Copy, Default)]
pub struct StreamingStats {
    /// Number of observations.
    count: usize,
    /// Running mean.
    mean: f64,
    /// Running M2 for variance calculation.
    m2: f64,
}

impl StreamingStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update with a new observation.
    pub fn update(&mut self, value: f64) {
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        let delta2 = value - self.mean;
        self.m2 += delta * delta2;
    }

    /// Combine two accumulators (Chan et al. parallel update).
    pub fn merge(mut self, other: Self) -> Self {
        if other.count == 0 {
            return self;
        }
        if self.count == 0 {
            return other;
        }
        let count = self.count + other.count;
        let delta = other.mean - self.mean;
        self.mean += delta * other.count as f64 / count as f64;
        self.m2 += other.m2 + delta * delta * (self.count as f64 * other.count as f64) / count as f64;
        self.count = count;
        self
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Get the sample variance.
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            return 0.0;
        }
        self.m2 / (self.count - 1) as f64
    }

    /// Get the sample standard deviation.
    #[inline]
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }
}

/// Percentile of an ascending-sorted sample, `p` in [0, 1].
///
/// Linear interpolation between the order statistics around rank
/// `p * (n - 1)`. Returns NaN for an empty sample.
pub fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return f64::NAN;
    }
    let rank = p.clamp(0.0, 1.0) * (n - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    let frac = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Reduced distribution of one sampled quantity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleSummary {
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub p10: f64,
    pub p90: f64,
}

impl SampleSummary {
    /// Combine precomputed moments with order statistics of `sample`.
    ///
    /// The sample is sorted in place.
    pub fn from_parts(stats: &StreamingStats, sample: &mut [f64]) -> Self {
        sample.sort_by(|a, b| a.total_cmp(b));
        Self {
            mean: stats.mean(),
            median: percentile_sorted(sample, 0.5),
            std_dev: stats.std_dev(),
            p10: percentile_sorted(sample, 0.1),
            p90: percentile_sorted(sample, 0.9),
        }
    }
}

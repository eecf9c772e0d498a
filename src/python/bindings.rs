//! PyO3 function bindings for ventureval.

use pyo3::prelude::*;

use crate::analysis::AnalysisOrchestrator;
use crate::captable::{CapTableEngine, JvCapTableEngine};
use crate::core::config::AnalyzerConfig;
use crate::core::random::Xoshiro256;
use crate::core::types::{
    CapTableRow, ExitAssumptions, ExitResult, InitialInvestments, JvRow, MonteCarloResult, Round,
    RoundSequence,
};
use crate::simulation::MonteCarloSimulator;
use crate::valuation::DcfValuationEngine;

// ============================================================================
// Configuration Classes
// ============================================================================

/// Python-exposed analyzer configuration.
#[pyclass]
#[derive(Debug, Clone)]
pub struct PyAnalyzerConfig {
    #[pyo3(get, set)]
    pub seed: u64,
    #[pyo3(get, set)]
    pub parallel_threshold: usize,
    #[pyo3(get, set)]
    pub chunk_size: usize,
    #[pyo3(get, set)]
    pub max_trials: usize,
    #[pyo3(get, set)]
    pub ownership_tolerance: f64,
}

#[pymethods]
impl PyAnalyzerConfig {
    #[new]
    #[pyo3(signature = (seed=42, parallel_threshold=2000, chunk_size=1000, max_trials=1_000_000, ownership_tolerance=1e-9))]
    fn new(
        seed: u64,
        parallel_threshold: usize,
        chunk_size: usize,
        max_trials: usize,
        ownership_tolerance: f64,
    ) -> Self {
        Self {
            seed,
            parallel_threshold,
            chunk_size,
            max_trials,
            ownership_tolerance,
        }
    }

    /// Load from a YAML file.
    #[staticmethod]
    fn from_yaml(path: &str) -> PyResult<Self> {
        Ok(AnalyzerConfig::from_path(path)?.into())
    }
}

impl From<AnalyzerConfig> for PyAnalyzerConfig {
    fn from(config: AnalyzerConfig) -> Self {
        Self {
            seed: config.seed,
            parallel_threshold: config.parallel_threshold,
            chunk_size: config.chunk_size,
            max_trials: config.max_trials,
            ownership_tolerance: config.ownership_tolerance,
        }
    }
}

impl From<&PyAnalyzerConfig> for AnalyzerConfig {
    fn from(py_config: &PyAnalyzerConfig) -> Self {
        AnalyzerConfig {
            seed: py_config.seed,
            parallel_threshold: py_config.parallel_threshold,
            chunk_size: py_config.chunk_size,
            max_trials: py_config.max_trials,
            ownership_tolerance: py_config.ownership_tolerance,
            ..Default::default()
        }
    }
}

// ============================================================================
// Result Classes
// ============================================================================

/// Python-exposed DCF exit result.
#[pyclass]
#[derive(Debug, Clone)]
pub struct PyExitResult {
    #[pyo3(get)]
    pub pv_cashflows: f64,
    #[pyo3(get)]
    pub terminal_value: f64,
    #[pyo3(get)]
    pub pv_terminal_value: f64,
    #[pyo3(get)]
    pub exit_valuation: f64,
    #[pyo3(get)]
    pub investor_roi: f64,
}

#[pymethods]
impl PyExitResult {
    fn __repr__(&self) -> String {
        format!(
            "ExitResult(exit_valuation={:.2}, investor_roi={:.4})",
            self.exit_valuation, self.investor_roi
        )
    }
}

impl From<ExitResult> for PyExitResult {
    fn from(r: ExitResult) -> Self {
        Self {
            pv_cashflows: r.pv_cashflows,
            terminal_value: r.terminal_value,
            pv_terminal_value: r.pv_terminal_value,
            exit_valuation: r.exit_valuation,
            investor_roi: r.investor_roi,
        }
    }
}

/// Python-exposed Monte Carlo summary.
#[pyclass]
#[derive(Debug, Clone)]
pub struct PyMonteCarloResult {
    #[pyo3(get)]
    pub trials_count: usize,
    #[pyo3(get)]
    pub mean_exit_value: f64,
    #[pyo3(get)]
    pub median_exit_value: f64,
    #[pyo3(get)]
    pub std_exit_value: f64,
    #[pyo3(get)]
    pub p10_exit_value: f64,
    #[pyo3(get)]
    pub p90_exit_value: f64,
    #[pyo3(get)]
    pub mean_roi: f64,
    #[pyo3(get)]
    pub median_roi: f64,
    #[pyo3(get)]
    pub std_roi: f64,
    #[pyo3(get)]
    pub p10_roi: f64,
    #[pyo3(get)]
    pub p90_roi: f64,
}

#[pymethods]
impl PyMonteCarloResult {
    fn __repr__(&self) -> String {
        format!(
            "MonteCarloResult(trials={}, median_exit={:.2}, p10={:.2}, p90={:.2})",
            self.trials_count, self.median_exit_value, self.p10_exit_value, self.p90_exit_value
        )
    }
}

impl From<MonteCarloResult> for PyMonteCarloResult {
    fn from(r: MonteCarloResult) -> Self {
        Self {
            trials_count: r.trials_count,
            mean_exit_value: r.mean_exit_value,
            median_exit_value: r.median_exit_value,
            std_exit_value: r.std_exit_value,
            p10_exit_value: r.p10_exit_value,
            p90_exit_value: r.p90_exit_value,
            mean_roi: r.mean_roi,
            median_roi: r.median_roi,
            std_roi: r.std_roi,
            p10_roi: r.p10_roi,
            p90_roi: r.p90_roi,
        }
    }
}

/// (round, pre_money, investment, post_money, founders_pct, new_investor_pct)
type PyCapTableRow = (String, f64, f64, f64, f64, f64);

/// (round, pre_money, investment, post_money, ag_inno, partner, grant, external)
type PyJvRow = (String, f64, f64, f64, f64, f64, f64, f64);

// ============================================================================
// Analysis Functions
// ============================================================================

/// Run a full JSON analysis request and return the JSON response.
#[pyfunction]
#[pyo3(signature = (request_json, config=None))]
pub fn analyze(request_json: &str, config: Option<&PyAnalyzerConfig>) -> String {
    let rust_config = config.map(AnalyzerConfig::from).unwrap_or_default();
    AnalysisOrchestrator::new(rust_config).run_json(request_json).to_json()
}

/// Single-founder dilution. Returns (final_dilution, rows).
#[pyfunction]
pub fn simulate_dilution(
    pre_money: f64,
    rounds: Vec<(String, f64)>,
) -> PyResult<(f64, Vec<PyCapTableRow>)> {
    let outcome = CapTableEngine::new().run(pre_money, &to_sequence(rounds)?)?;
    let rows = outcome.rows.into_iter().map(cap_table_tuple).collect();
    Ok((outcome.final_dilution, rows))
}

/// Joint-venture dilution. Returns (final (ag_inno, partner, grant, external), rows).
#[pyfunction]
pub fn simulate_jv_dilution(
    ag_inno: f64,
    partner: f64,
    grant: f64,
    rounds: Vec<(String, f64)>,
) -> PyResult<((f64, f64, f64, f64), Vec<PyJvRow>)> {
    let outcome = JvCapTableEngine::new()
        .run(&InitialInvestments::new(ag_inno, partner, grant), &to_sequence(rounds)?)?;
    let own = outcome.final_ownership;
    let rows = outcome.rows.into_iter().map(jv_tuple).collect();
    Ok((
        (own.ag_inno_fraction, own.partner_fraction, own.grant_fraction, own.external_fraction),
        rows,
    ))
}

/// Deterministic DCF exit valuation.
#[pyfunction]
pub fn dcf_exit(
    cash_flows: Vec<f64>,
    discount_rate: f64,
    growth_rate: f64,
    investor_share: f64,
    invested_amount: f64,
) -> PyResult<PyExitResult> {
    let assumptions = ExitAssumptions {
        cash_flows,
        discount_rate,
        growth_rate,
        investor_share,
        invested_amount,
    };
    Ok(DcfValuationEngine::new().run(&assumptions)?.into())
}

/// Monte Carlo exit analysis over perturbed cash flows.
#[allow(clippy::too_many_arguments)]
#[pyfunction]
#[pyo3(signature = (cash_flows, discount_rate, growth_rate, investor_share, invested_amount, trials=10000, cf_volatility=0.2, seed=42))]
pub fn monte_carlo_exit(
    py: Python<'_>,
    cash_flows: Vec<f64>,
    discount_rate: f64,
    growth_rate: f64,
    investor_share: f64,
    invested_amount: f64,
    trials: usize,
    cf_volatility: f64,
    seed: u64,
) -> PyResult<PyMonteCarloResult> {
    let assumptions = ExitAssumptions {
        cash_flows,
        discount_rate,
        growth_rate,
        investor_share,
        invested_amount,
    };
    let rng = Xoshiro256::new(seed);
    let result = py.allow_threads(|| {
        MonteCarloSimulator::new().run_parallel(&assumptions, trials, cf_volatility, &rng)
    })?;
    Ok(result.into())
}

// ============================================================================
// Helper Functions
// ============================================================================

fn to_sequence(rounds: Vec<(String, f64)>) -> PyResult<RoundSequence> {
    Ok(RoundSequence::new(
        rounds.into_iter().map(|(name, amount)| Round::new(name, amount)).collect(),
    )?)
}

fn cap_table_tuple(row: CapTableRow) -> PyCapTableRow {
    (
        row.round_name,
        row.pre_money,
        row.investment,
        row.post_money,
        row.founders_pct,
        row.new_investor_pct,
    )
}

fn jv_tuple(row: JvRow) -> PyJvRow {
    (
        row.round_name,
        row.pre_money,
        row.investment,
        row.post_money,
        row.ownership.ag_inno_fraction,
        row.ownership.partner_fraction,
        row.ownership.grant_fraction,
        row.ownership.external_fraction,
    )
}

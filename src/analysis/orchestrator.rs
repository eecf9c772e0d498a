//! Composition root: dispatches a request to the engines it names.

use tracing::{error, info, warn};

use super::request::{AnalysisRequest, JvDilutionRequest, ParentDilutionRequest};
use super::response::{
    AnalysisFailure, AnalysisResponse, AnalysisResults, DataEnvelope, JvDilutionResult,
    ParentDilutionResult, SubAnalysis,
};
use crate::captable::equity_returns::simulate_equity_returns;
use crate::captable::jv::JvCapTableEngine;
use crate::captable::parent::CapTableEngine;
use crate::core::config::AnalyzerConfig;
use crate::core::error::{Result, VentureError};
use crate::core::random::{JumpableSource, Xoshiro256};
use crate::core::types::{ExitAssumptions, MonteCarloResult, RoundSequence};
use crate::simulation::monte_carlo::MonteCarloSimulator;
use crate::valuation::comparison::compare_valuations;
use crate::valuation::dcf::DcfValuationEngine;

/// Runs every analysis named in a request and assembles one response.
///
/// Sub-analyses are independent: one failing does not stop the others, and
/// the results that did complete are still returned.
#[derive(Debug, Clone)]
pub struct AnalysisOrchestrator {
    config: AnalyzerConfig,
    cap_table: CapTableEngine,
    jv: JvCapTableEngine,
    dcf: DcfValuationEngine,
    simulator: MonteCarloSimulator,
}

impl Default for AnalysisOrchestrator {
    fn default() -> Self {
        Self::new(AnalyzerConfig::default())
    }
}

impl AnalysisOrchestrator {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self {
            cap_table: CapTableEngine::new(),
            jv: JvCapTableEngine::with_tolerance(config.ownership_tolerance),
            dcf: DcfValuationEngine::new(),
            simulator: MonteCarloSimulator::with_chunk_size(config.chunk_size)
                .with_max_trials(config.max_trials),
            config,
        }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Parse a JSON payload and run it. Unparseable payloads are rejected whole.
    pub fn run_json(&self, payload: &str) -> AnalysisResponse {
        match AnalysisRequest::from_json(payload) {
            Ok(request) => self.run(&request),
            Err(e) => {
                warn!(error = %e, "rejecting malformed analysis request");
                AnalysisResponse::rejected(&e)
            }
        }
    }

    /// Run with a random source seeded from the configuration.
    pub fn run(&self, request: &AnalysisRequest) -> AnalysisResponse {
        self.run_with_source(request, Xoshiro256::new(self.config.seed))
    }

    /// Run with an explicit random source for the Monte Carlo step.
    pub fn run_with_source<R: JumpableSource>(
        &self,
        request: &AnalysisRequest,
        mut rng: R,
    ) -> AnalysisResponse {
        info!(analyses = ?request.requested(), "running analysis request");

        let mut results = AnalysisResults::default();
        let mut failures = Vec::new();

        if let Some(parent) = &request.parent_dilution {
            results.parent_dilution = record(
                &mut failures,
                SubAnalysis::ParentDilution,
                self.parent_dilution(parent),
            );
        }

        if let Some(jv) = &request.jv_dilution {
            results.jv_dilution =
                record(&mut failures, SubAnalysis::JvDilution, self.jv_dilution(jv));
        }

        if let Some(exit) = &request.exit_analysis {
            results.exit_analysis =
                record(&mut failures, SubAnalysis::ExitAnalysis, self.dcf.run(exit));

            // A failed exit analysis already reports why its inputs are unusable
            if request.run_montecarlo && results.exit_analysis.is_some() {
                results.montecarlo = record(
                    &mut failures,
                    SubAnalysis::MonteCarlo,
                    self.montecarlo(request, exit, &mut rng),
                );
            }
        }

        if let Some(input) = &request.valuation_comparison {
            results.valuation_comparison = record(
                &mut failures,
                SubAnalysis::ValuationComparison,
                compare_valuations(input).map(|data| DataEnvelope { data }),
            );
        }

        if let Some(input) = &request.equity_returns {
            results.equity_returns = record(
                &mut failures,
                SubAnalysis::EquityReturns,
                simulate_equity_returns(input).map(|data| DataEnvelope { data }),
            );
        }

        AnalysisResponse::from_parts(results, failures)
    }

    fn parent_dilution(&self, request: &ParentDilutionRequest) -> Result<ParentDilutionResult> {
        let rounds = RoundSequence::new(request.rounds.clone())?;
        let outcome = self.cap_table.run(request.pre_money, &rounds)?;
        Ok(outcome.into())
    }

    fn jv_dilution(&self, request: &JvDilutionRequest) -> Result<JvDilutionResult> {
        let rounds = RoundSequence::new(request.rounds.clone())?;
        let outcome = self.jv.run(&request.initial_investments, &rounds)?;
        Ok(outcome.into())
    }

    fn montecarlo<R: JumpableSource>(
        &self,
        request: &AnalysisRequest,
        exit: &ExitAssumptions,
        rng: &mut R,
    ) -> Result<MonteCarloResult> {
        let trials = request.montecarlo_trials.ok_or_else(|| {
            VentureError::invalid_parameter("montecarlo_trials is required when run_montecarlo is set")
        })?;
        let cf_volatility = request.cf_volatility.ok_or_else(|| {
            VentureError::invalid_parameter("cf_volatility is required when run_montecarlo is set")
        })?;
        let trials = usize::try_from(trials)
            .ok()
            .filter(|&t| t >= 1)
            .ok_or_else(|| {
                VentureError::invalid_parameter(format!(
                    "montecarlo_trials must be at least 1, got {}",
                    trials
                ))
            })?;
        if trials > self.config.max_trials {
            return Err(VentureError::invalid_parameter(format!(
                "montecarlo_trials must be at most {}, got {}",
                self.config.max_trials, trials
            )));
        }

        if trials >= self.config.parallel_threshold {
            self.simulator.run_parallel(exit, trials, cf_volatility, &*rng)
        } else {
            self.simulator.run(exit, trials, cf_volatility, rng)
        }
    }
}

/// Keep a successful result, or log and collect the failure.
fn record<T>(
    failures: &mut Vec<AnalysisFailure>,
    analysis: SubAnalysis,
    result: Result<T>,
) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            if err.is_validation() {
                warn!(analysis = analysis.as_str(), error = %err, "sub-analysis rejected");
            } else {
                error!(analysis = analysis.as_str(), error = %err, "sub-analysis aborted");
            }
            failures.push(AnalysisFailure {
                analysis,
                error: err,
            });
            None
        }
    }
}

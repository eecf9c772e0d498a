//! Analysis response envelope.

use std::fmt;

use serde::Serialize;

use crate::captable::equity_returns::EquityReturnsResult;
use crate::captable::jv::JvDilutionOutcome;
use crate::captable::parent::DilutionOutcome;
use crate::core::error::VentureError;
use crate::core::types::{CapTableRow, ExitResult, JvOwnership, JvRow, MonteCarloResult};
use crate::valuation::comparison::ValuationComparison;

/// Sub-analyses an orchestrated request can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubAnalysis {
    ParentDilution,
    JvDilution,
    ExitAnalysis,
    MonteCarlo,
    ValuationComparison,
    EquityReturns,
}

impl SubAnalysis {
    /// Wire name used in requests and results.
    pub fn as_str(self) -> &'static str {
        match self {
            SubAnalysis::ParentDilution => "parent_dilution",
            SubAnalysis::JvDilution => "jv_dilution",
            SubAnalysis::ExitAnalysis => "exit_analysis",
            SubAnalysis::MonteCarlo => "montecarlo",
            SubAnalysis::ValuationComparison => "valuation_comparison",
            SubAnalysis::EquityReturns => "equity_returns",
        }
    }
}

impl fmt::Display for SubAnalysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A sub-analysis that did not complete.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisFailure {
    pub analysis: SubAnalysis,
    pub error: VentureError,
}

impl fmt::Display for AnalysisFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.error.is_validation() {
            write!(f, "{}: {}", self.analysis, self.error)
        } else {
            write!(f, "{}: internal error: {}", self.analysis, self.error)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParentDilutionResult {
    pub data: Vec<CapTableRow>,
    /// Founders' final share in percent.
    pub final_dilution: f64,
}

impl From<DilutionOutcome> for ParentDilutionResult {
    fn from(outcome: DilutionOutcome) -> Self {
        Self {
            final_dilution: outcome.final_dilution_pct(),
            data: outcome.rows,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JvDilutionResult {
    pub data: Vec<JvRow>,
    pub final_ownership: JvOwnership,
}

impl From<JvDilutionOutcome> for JvDilutionResult {
    fn from(outcome: JvDilutionOutcome) -> Self {
        Self {
            data: outcome.rows,
            final_ownership: outcome.final_ownership,
        }
    }
}

/// Wrapper matching the `{data: ...}` shape of the supplementary analyses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

/// Results of every sub-analysis that completed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisResults {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_dilution: Option<ParentDilutionResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jv_dilution: Option<JvDilutionResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_analysis: Option<ExitResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub montecarlo: Option<MonteCarloResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valuation_comparison: Option<DataEnvelope<ValuationComparison>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equity_returns: Option<DataEnvelope<EquityReturnsResult>>,
}

/// Response envelope: `{success, results?, error?}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<AnalysisResults>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Per-analysis failures behind `error`.
    #[serde(skip)]
    pub failures: Vec<AnalysisFailure>,
}

impl AnalysisResponse {
    /// Build from completed results and any sub-analysis failures.
    pub fn from_parts(results: AnalysisResults, failures: Vec<AnalysisFailure>) -> Self {
        let error = if failures.is_empty() {
            None
        } else {
            Some(
                failures
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; "),
            )
        };
        Self {
            success: failures.is_empty(),
            results: Some(results),
            error,
            failures,
        }
    }

    /// Whole-request failure with no results.
    pub fn rejected(error: &VentureError) -> Self {
        Self {
            success: false,
            results: None,
            error: Some(error.to_string()),
            failures: Vec::new(),
        }
    }

    /// Serialize to the JSON wire format.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            format!(
                r#"{{"success":false,"error":{}}}"#,
                serde_json::Value::String(format!("serialization failed: {}", e))
            )
        })
    }

    /// Failure reported for `analysis`, if any.
    pub fn failure(&self, analysis: SubAnalysis) -> Option<&AnalysisFailure> {
        self.failures.iter().find(|f| f.analysis == analysis)
    }
}

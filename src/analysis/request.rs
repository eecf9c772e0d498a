//! Analysis request envelope.

use serde::{Deserialize, Serialize};

use crate::captable::equity_returns::EquityReturnsInput;
use crate::core::error::Result;
use crate::core::types::{Amount, ExitAssumptions, InitialInvestments, Round};
use crate::valuation::comparison::ValuationComparisonInput;

/// Single-founder dilution inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParentDilutionRequest {
    pub pre_money: Amount,
    pub rounds: Vec<Round>,
}

/// Joint-venture dilution inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JvDilutionRequest {
    pub initial_investments: InitialInvestments,
    pub rounds: Vec<Round>,
}

/// A request naming any subset of the available analyses.
///
/// Absent members are simply not run. `run_montecarlo`,
/// `montecarlo_trials` and `cf_volatility` only apply together with
/// `exit_analysis`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_dilution: Option<ParentDilutionRequest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jv_dilution: Option<JvDilutionRequest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_analysis: Option<ExitAssumptions>,
    #[serde(default)]
    pub run_montecarlo: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub montecarlo_trials: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cf_volatility: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valuation_comparison: Option<ValuationComparisonInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equity_returns: Option<EquityReturnsInput>,
}

impl AnalysisRequest {
    /// Parse a JSON request payload.
    pub fn from_json(payload: &str) -> Result<Self> {
        Ok(serde_json::from_str(payload)?)
    }

    /// Wire names of the requested analyses, in execution order.
    pub fn requested(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.parent_dilution.is_some() {
            names.push("parent_dilution");
        }
        if self.jv_dilution.is_some() {
            names.push("jv_dilution");
        }
        if self.exit_analysis.is_some() {
            names.push("exit_analysis");
            if self.run_montecarlo {
                names.push("montecarlo");
            }
        }
        if self.valuation_comparison.is_some() {
            names.push("valuation_comparison");
        }
        if self.equity_returns.is_some() {
            names.push("equity_returns");
        }
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_request() {
        let req = AnalysisRequest::from_json(
            r#"{
                "parent_dilution": {"pre_money": 1000, "rounds": [{"round": "Seed", "amount": 500}]},
                "jv_dilution": {"initial_investments": {"ag_inno": 40, "partner": 30, "grant": 30}, "rounds": []},
                "exit_analysis": {"cash_flows": [100], "discount_rate": 0.1, "growth_rate": 0.0,
                                  "investor_share": 0.2, "invested_amount": 100},
                "run_montecarlo": true, "montecarlo_trials": 100, "cf_volatility": 0.2
            }"#,
        )
        .unwrap();
        assert_eq!(req.parent_dilution.as_ref().unwrap().rounds[0].name, "Seed");
        assert_eq!(req.montecarlo_trials, Some(100));
        assert_eq!(
            req.requested(),
            vec!["parent_dilution", "jv_dilution", "exit_analysis", "montecarlo"]
        );
    }

    #[test]
    fn test_missing_required_field_is_structural() {
        let err = AnalysisRequest::from_json(r#"{"parent_dilution": {"rounds": []}}"#).unwrap_err();
        assert!(err.to_string().contains("pre_money"));
    }

    #[test]
    fn test_montecarlo_without_exit_not_requested() {
        let req = AnalysisRequest::from_json(r#"{"run_montecarlo": true}"#).unwrap();
        assert!(req.exit_analysis.is_none());
        assert!(req.requested().is_empty());
    }
}

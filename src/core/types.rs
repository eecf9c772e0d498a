//! Core data types for ventureval.

use serde::{Deserialize, Serialize};

use super::error::{Result, VentureError};

/// Type alias for monetary amounts.
pub type Amount = f64;

/// One financing event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Round {
    /// Round label (e.g. "Seed", "A").
    #[serde(rename = "round")]
    pub name: String,
    /// Capital invested in this round.
    pub amount: Amount,
}

impl Round {
    /// Create a new round.
    pub fn new(name: impl Into<String>, amount: Amount) -> Self {
        Self {
            name: name.into(),
            amount,
        }
    }
}

/// Ordered, validated list of financing rounds. Order defines dilution order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoundSequence {
    rounds: Vec<Round>,
}

impl RoundSequence {
    /// Validate and wrap a list of rounds.
    ///
    /// Every amount must be finite and non-negative.
    pub fn new(rounds: Vec<Round>) -> Result<Self> {
        for (idx, round) in rounds.iter().enumerate() {
            if !round.amount.is_finite() || round.amount < 0.0 {
                return Err(VentureError::invalid_parameter(format!(
                    "investment amount for round {} ({}) must be a non-negative number, got {}",
                    idx + 1,
                    round.name,
                    round.amount
                )));
            }
        }
        Ok(Self { rounds })
    }

    /// Empty sequence.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Get the number of rounds.
    #[inline]
    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    /// Check if empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    /// Iterate rounds in dilution order.
    pub fn iter(&self) -> std::slice::Iter<'_, Round> {
        self.rounds.iter()
    }
}

impl<'a> IntoIterator for &'a RoundSequence {
    type Item = &'a Round;
    type IntoIter = std::slice::Iter<'a, Round>;

    fn into_iter(self) -> Self::IntoIter {
        self.rounds.iter()
    }
}

/// One row of the single-founder dilution table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapTableRow {
    #[serde(rename = "round")]
    pub round_name: String,
    pub pre_money: Amount,
    pub investment: Amount,
    pub post_money: Amount,
    /// Founders' cumulative fraction after this round.
    pub founders_pct: f64,
    /// Fraction bought by this round's investors.
    pub new_investor_pct: f64,
}

/// Ownership split of a joint venture. The four fractions sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JvOwnership {
    #[serde(rename = "ag_inno_pct")]
    pub ag_inno_fraction: f64,
    #[serde(rename = "partner_pct")]
    pub partner_fraction: f64,
    #[serde(rename = "grant_pct")]
    pub grant_fraction: f64,
    #[serde(rename = "external_pct")]
    pub external_fraction: f64,
}

impl JvOwnership {
    /// Sum of all four fractions.
    #[inline]
    pub fn total(&self) -> f64 {
        self.ag_inno_fraction + self.partner_fraction + self.grant_fraction + self.external_fraction
    }

    /// Dilute every holder by `new_pct` and credit the new money to external investors.
    pub fn dilute(&self, new_pct: f64) -> Self {
        let keep = 1.0 - new_pct;
        Self {
            ag_inno_fraction: self.ag_inno_fraction * keep,
            partner_fraction: self.partner_fraction * keep,
            grant_fraction: self.grant_fraction * keep,
            external_fraction: self.external_fraction * keep + new_pct,
        }
    }
}

/// Founding contributions of the three JV stakeholders.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InitialInvestments {
    pub ag_inno: Amount,
    pub partner: Amount,
    pub grant: Amount,
}

impl InitialInvestments {
    pub fn new(ag_inno: Amount, partner: Amount, grant: Amount) -> Self {
        Self {
            ag_inno,
            partner,
            grant,
        }
    }

    #[inline]
    pub fn total(&self) -> Amount {
        self.ag_inno + self.partner + self.grant
    }
}

/// One row of the JV dilution table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JvRow {
    #[serde(rename = "round")]
    pub round_name: String,
    pub pre_money: Amount,
    pub investment: Amount,
    pub post_money: Amount,
    pub new_investor_pct: f64,
    #[serde(flatten)]
    pub ownership: JvOwnership,
}

/// Inputs of a DCF exit valuation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExitAssumptions {
    /// Forecast cash flows; period `i` (1-indexed) is discounted `i` times.
    pub cash_flows: Vec<f64>,
    pub discount_rate: f64,
    /// Perpetuity growth rate after the forecast horizon.
    pub growth_rate: f64,
    /// Investor's ownership fraction at exit.
    pub investor_share: f64,
    pub invested_amount: Amount,
}

/// Output of a DCF exit valuation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExitResult {
    /// Present value of the explicit forecast.
    pub pv_cashflows: f64,
    /// Undiscounted perpetuity value at the end of the horizon.
    pub terminal_value: f64,
    /// Terminal value discounted to today.
    pub pv_terminal_value: f64,
    pub exit_valuation: f64,
    pub investor_roi: f64,
}

/// Distribution summary of a Monte Carlo exit analysis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloResult {
    pub trials_count: usize,
    pub mean_exit_value: f64,
    pub median_exit_value: f64,
    pub std_exit_value: f64,
    pub p10_exit_value: f64,
    pub p90_exit_value: f64,
    pub mean_roi: f64,
    pub median_roi: f64,
    pub std_roi: f64,
    pub p10_roi: f64,
    pub p90_roi: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_sequence_rejects_negative() {
        let err = RoundSequence::new(vec![Round::new("Seed", 100.0), Round::new("A", -1.0)])
            .unwrap_err();
        assert!(err.to_string().contains("round 2 (A)"));
    }

    #[test]
    fn test_round_sequence_rejects_nan() {
        assert!(RoundSequence::new(vec![Round::new("Seed", f64::NAN)]).is_err());
    }

    #[test]
    fn test_round_sequence_accepts_zero_amount() {
        let seq = RoundSequence::new(vec![Round::new("Seed", 100.0), Round::new("A", 0.0)]).unwrap();
        assert_eq!(seq.len(), 2);
        assert_eq!(seq.iter().map(|r| r.amount).sum::<f64>(), 100.0);
    }

    #[test]
    fn test_jv_dilute_preserves_total() {
        let own = JvOwnership {
            ag_inno_fraction: 0.5,
            partner_fraction: 0.3,
            grant_fraction: 0.2,
            external_fraction: 0.0,
        };
        let diluted = own.dilute(0.25);
        assert!((diluted.total() - 1.0).abs() < 1e-12);
        assert!((diluted.external_fraction - 0.25).abs() < 1e-12);
        assert!((diluted.ag_inno_fraction - 0.375).abs() < 1e-12);
    }

    #[test]
    fn test_round_wire_name() {
        let json = serde_json::to_string(&Round::new("Seed", 5.0)).unwrap();
        assert_eq!(json, r#"{"round":"Seed","amount":5.0}"#);
    }
}

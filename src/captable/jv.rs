//! Joint-venture dilution: three founding stakeholders plus external investors.

use tracing::{debug, error};

use crate::core::error::{Result, VentureError};
use crate::core::types::{InitialInvestments, JvOwnership, JvRow, RoundSequence};

/// Default tolerance for the ownership-sum invariant.
pub const DEFAULT_OWNERSHIP_TOLERANCE: f64 = 1e-9;

/// Outcome of a JV dilution run.
#[derive(Debug, Clone, PartialEq)]
pub struct JvDilutionOutcome {
    /// Ownership after the last round (initial split with no rounds).
    pub final_ownership: JvOwnership,
    pub rows: Vec<JvRow>,
}

/// Propagates JV ownership dilution round by round.
#[derive(Debug, Clone, Copy)]
pub struct JvCapTableEngine {
    tolerance: f64,
}

impl Default for JvCapTableEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl JvCapTableEngine {
    pub fn new() -> Self {
        Self::with_tolerance(DEFAULT_OWNERSHIP_TOLERANCE)
    }

    /// Engine with a custom ownership-sum tolerance.
    pub fn with_tolerance(tolerance: f64) -> Self {
        Self { tolerance }
    }

    /// Initial split of the three founding stakeholders.
    pub fn initial_ownership(&self, initial: &InitialInvestments) -> Result<JvOwnership> {
        for (name, amount) in [
            ("ag_inno", initial.ag_inno),
            ("partner", initial.partner),
            ("grant", initial.grant),
        ] {
            if !amount.is_finite() || amount < 0.0 {
                return Err(VentureError::invalid_parameter(format!(
                    "initial investment {} must be a non-negative number, got {}",
                    name, amount
                )));
            }
        }

        let total = initial.total();
        if total <= 0.0 {
            return Err(VentureError::invalid_parameter(
                "total initial investment must be positive",
            ));
        }

        Ok(JvOwnership {
            ag_inno_fraction: initial.ag_inno / total,
            partner_fraction: initial.partner / total,
            grant_fraction: initial.grant / total,
            external_fraction: 0.0,
        })
    }

    /// Run the dilution chain. The JV's own capital is the first pre-money.
    pub fn run(
        &self,
        initial: &InitialInvestments,
        rounds: &RoundSequence,
    ) -> Result<JvDilutionOutcome> {
        let mut ownership = self.initial_ownership(initial)?;
        self.check_invariant(&ownership, "initial")?;

        let mut pre_money = initial.total();
        let mut rows = Vec::with_capacity(rounds.len());

        for round in rounds {
            let investment = round.amount;
            let post_money = pre_money + investment;
            let new_investor_pct = investment / post_money;

            ownership = ownership.dilute(new_investor_pct);
            self.check_invariant(&ownership, &round.name)?;

            rows.push(JvRow {
                round_name: round.name.clone(),
                pre_money,
                investment,
                post_money,
                new_investor_pct,
                ownership,
            });

            pre_money = post_money;
        }

        debug!(
            rounds = rounds.len(),
            external = ownership.external_fraction,
            "jv dilution complete"
        );

        Ok(JvDilutionOutcome {
            final_ownership: ownership,
            rows,
        })
    }

    fn check_invariant(&self, ownership: &JvOwnership, stage: &str) -> Result<()> {
        let total = ownership.total();
        if (total - 1.0).abs() > self.tolerance {
            error!(stage, total, "jv ownership fractions do not sum to 1");
            return Err(VentureError::invariant_violation(format!(
                "ownership fractions sum to {} after {}",
                total, stage
            )));
        }
        Ok(())
    }
}

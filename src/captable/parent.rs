//! Single-founder dilution across a sequence of rounds.

use tracing::debug;

use crate::core::error::{Result, VentureError};
use crate::core::types::{Amount, CapTableRow, RoundSequence};

/// Outcome of a single-founder dilution run.
#[derive(Debug, Clone, PartialEq)]
pub struct DilutionOutcome {
    /// Founders' fraction after the last round (1.0 with no rounds).
    pub final_dilution: f64,
    pub rows: Vec<CapTableRow>,
}

impl DilutionOutcome {
    /// Founders' final share as a percentage.
    #[inline]
    pub fn final_dilution_pct(&self) -> f64 {
        self.final_dilution * 100.0
    }
}

/// Running state carried from one round to the next.
#[derive(Debug, Clone, Copy)]
struct CapTableState {
    pre_money: Amount,
    founders_fraction: f64,
}

/// Propagates founder dilution round by round.
#[derive(Debug, Clone, Copy, Default)]
pub struct CapTableEngine;

impl CapTableEngine {
    pub fn new() -> Self {
        Self
    }

    /// Run the dilution chain starting from `pre_money`.
    ///
    /// A round whose post-money is zero is treated as a zero-investment round
    /// and leaves the founders' fraction untouched.
    pub fn run(&self, pre_money: Amount, rounds: &RoundSequence) -> Result<DilutionOutcome> {
        if !pre_money.is_finite() || pre_money < 0.0 {
            return Err(VentureError::invalid_parameter(format!(
                "pre_money must be a non-negative number, got {}",
                pre_money
            )));
        }

        let mut rows = Vec::with_capacity(rounds.len());
        let initial = CapTableState {
            pre_money,
            founders_fraction: 1.0,
        };

        let state = rounds.iter().fold(initial, |state, round| {
            let investment = round.amount;
            let post_money = state.pre_money + investment;
            let new_investor_pct = if post_money > 0.0 {
                investment / post_money
            } else {
                0.0
            };
            let founders_fraction = state.founders_fraction * (1.0 - new_investor_pct);

            rows.push(CapTableRow {
                round_name: round.name.clone(),
                pre_money: state.pre_money,
                investment,
                post_money,
                founders_pct: founders_fraction,
                new_investor_pct,
            });

            CapTableState {
                pre_money: post_money,
                founders_fraction,
            }
        });

        debug!(
            rounds = rounds.len(),
            final_dilution = state.founders_fraction,
            "parent dilution complete"
        );

        Ok(DilutionOutcome {
            final_dilution: state.founders_fraction,
            rows,
        })
    }
}

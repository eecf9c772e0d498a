//! Multi-round dilution for named participants with exit returns.
//!
//! Initial partners hold fixed fractions (the rest is unallocated). Each
//! round adds an `Investor-<round>` participant. An optional per-round
//! override pins the new investor's fraction and back-solves the round size.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::error::{Result, VentureError};
use crate::core::types::{Amount, Round};

/// Overrides further than this from the priced fraction replace it.
const OVERRIDE_THRESHOLD: f64 = 0.001;

/// Input of an equity-returns simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityReturnsInput {
    pub initial_valuation: Amount,
    pub investment_rounds: Vec<Round>,
    pub initial_partners: BTreeMap<String, f64>,
    #[serde(default)]
    pub new_investors_per_round: BTreeMap<String, f64>,
}

/// Fraction held by one participant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantShare {
    pub participant: String,
    pub pct: f64,
}

/// One round of the simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityRoundRecord {
    pub round: String,
    pub investment: Amount,
    pub pre_money: Amount,
    pub post_money: Amount,
    pub new_investor_pct: f64,
    pub total_investment: Amount,
    pub equity: Vec<ParticipantShare>,
    pub unallocated_pct: f64,
}

/// Exit proceeds of one participant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantReturn {
    pub participant: String,
    pub final_equity_pct: f64,
    pub return_amount: Amount,
    pub roi_percentage: f64,
}

/// Full simulation result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityReturnsResult {
    pub simulation_data: Vec<EquityRoundRecord>,
    pub final_equity_distribution: Vec<ParticipantShare>,
    pub participant_returns: Vec<ParticipantReturn>,
    pub total_investment: Amount,
    pub exit_valuation: Amount,
    pub total_return: Amount,
    pub roi_percentage: f64,
}

/// Simulate named-participant dilution and exit at the final post-money.
pub fn simulate_equity_returns(input: &EquityReturnsInput) -> Result<EquityReturnsResult> {
    if !(input.initial_valuation.is_finite() && input.initial_valuation > 0.0) {
        return Err(VentureError::invalid_parameter(
            "initial_valuation must be positive",
        ));
    }
    for (name, pct) in &input.initial_partners {
        if !(0.0..=1.0).contains(pct) {
            return Err(VentureError::invalid_parameter(format!(
                "partner {} fraction must be between 0 and 1, got {}",
                name, pct
            )));
        }
    }
    let allocated: f64 = input.initial_partners.values().sum();
    if allocated > 1.0 + 1e-12 {
        return Err(VentureError::invalid_parameter(
            "initial partner fractions must not exceed 100% in total",
        ));
    }
    for (name, pct) in &input.new_investors_per_round {
        if !(pct.is_finite() && *pct >= 0.0 && *pct < 1.0) {
            return Err(VentureError::invalid_parameter(format!(
                "override for round {} must be in [0, 1), got {}",
                name, pct
            )));
        }
    }

    let mut equity: Vec<ParticipantShare> = input
        .initial_partners
        .iter()
        .map(|(name, pct)| ParticipantShare {
            participant: name.clone(),
            pct: *pct,
        })
        .collect();
    let mut unallocated = (1.0 - allocated).max(0.0);
    let mut valuation = input.initial_valuation;
    let mut total_investment = 0.0;
    let mut records = Vec::with_capacity(input.investment_rounds.len());

    for (idx, round) in input.investment_rounds.iter().enumerate() {
        let mut amount = round.amount;
        if !(amount.is_finite() && amount > 0.0) {
            return Err(VentureError::invalid_parameter(format!(
                "investment amount for round {} ({}) must be positive",
                idx + 1,
                round.name
            )));
        }

        let mut new_pct = amount / (valuation + amount);
        if let Some(&pinned) = input.new_investors_per_round.get(&round.name) {
            if (new_pct - pinned).abs() > OVERRIDE_THRESHOLD {
                new_pct = pinned;
                amount = valuation * new_pct / (1.0 - new_pct);
            }
        }
        let post_money = valuation + amount;

        let keep = 1.0 - new_pct;
        for share in &mut equity {
            share.pct *= keep;
        }
        unallocated *= keep;
        equity.push(ParticipantShare {
            participant: format!("Investor-{}", round.name),
            pct: new_pct,
        });

        total_investment += amount;
        records.push(EquityRoundRecord {
            round: round.name.clone(),
            investment: amount,
            pre_money: valuation,
            post_money,
            new_investor_pct: new_pct,
            total_investment,
            equity: equity.clone(),
            unallocated_pct: unallocated,
        });
        valuation = post_money;
    }

    let exit_valuation = valuation;
    let total_return = exit_valuation - total_investment;
    let participant_returns = equity
        .iter()
        .map(|share| {
            let return_amount = total_return * share.pct;
            ParticipantReturn {
                participant: share.participant.clone(),
                final_equity_pct: share.pct,
                return_amount,
                roi_percentage: percent_of(return_amount, total_investment),
            }
        })
        .collect();

    debug!(
        rounds = records.len(),
        participants = equity.len(),
        "equity returns simulation complete"
    );

    Ok(EquityReturnsResult {
        simulation_data: records,
        final_equity_distribution: equity,
        participant_returns,
        total_investment,
        exit_valuation,
        total_return,
        roi_percentage: percent_of(total_return, total_investment),
    })
}

#[inline]
fn percent_of(value: f64, base: f64) -> f64 {
    if base > 0.0 {
        value / base * 100.0
    } else {
        0.0
    }
}

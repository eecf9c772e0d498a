//! Discounted-cash-flow exit valuation.

use tracing::debug;

use crate::core::error::{Result, VentureError};
use crate::core::types::{ExitAssumptions, ExitResult};

/// Stateless DCF engine. Identical inputs always give identical outputs.
#[derive(Debug, Clone, Copy, Default)]
pub struct DcfValuationEngine;

impl DcfValuationEngine {
    pub fn new() -> Self {
        Self
    }

    /// Validate and value a set of exit assumptions.
    pub fn run(&self, a: &ExitAssumptions) -> Result<ExitResult> {
        self.validate(a)?;
        let result = self.value(&a.cash_flows, a);
        debug!(
            periods = a.cash_flows.len(),
            exit_valuation = result.exit_valuation,
            "dcf valuation complete"
        );
        Ok(result)
    }

    /// Check every input the valuation depends on.
    pub fn validate(&self, a: &ExitAssumptions) -> Result<()> {
        if a.cash_flows.is_empty() {
            return Err(VentureError::empty_data("cash_flows"));
        }
        if let Some(idx) = a.cash_flows.iter().position(|cf| !cf.is_finite()) {
            return Err(VentureError::invalid_parameter(format!(
                "cash flow for period {} is not a finite number",
                idx + 1
            )));
        }
        if !a.discount_rate.is_finite() || a.discount_rate <= -1.0 {
            return Err(VentureError::invalid_parameter(format!(
                "discount_rate must be greater than -1, got {}",
                a.discount_rate
            )));
        }
        if !a.growth_rate.is_finite() {
            return Err(VentureError::invalid_parameter("growth_rate must be a finite number"));
        }
        if a.discount_rate <= a.growth_rate {
            return Err(VentureError::invalid_parameter(format!(
                "terminal value undefined: growth_rate ({}) >= discount_rate ({})",
                a.growth_rate, a.discount_rate
            )));
        }
        if !(0.0..=1.0).contains(&a.investor_share) {
            return Err(VentureError::invalid_parameter(format!(
                "investor_share must be between 0 and 1, got {}",
                a.investor_share
            )));
        }
        if !a.invested_amount.is_finite() || a.invested_amount < 0.0 {
            return Err(VentureError::invalid_parameter(format!(
                "invested_amount must be a non-negative number, got {}",
                a.invested_amount
            )));
        }
        if a.invested_amount == 0.0 {
            return Err(VentureError::division_by_zero(
                "investor_roi (invested_amount is 0)",
            ));
        }
        Ok(())
    }

    /// Value `cash_flows` under the rates and stake of `a`.
    ///
    /// Caller must have validated `a`; `cash_flows` must be non-empty.
    pub(crate) fn value(&self, cash_flows: &[f64], a: &ExitAssumptions) -> ExitResult {
        let growth = 1.0 + a.discount_rate;
        let mut factor = 1.0;
        let mut pv_cashflows = 0.0;
        for cf in cash_flows {
            factor *= growth;
            pv_cashflows += cf / factor;
        }

        let last = cash_flows.last().copied().unwrap_or(0.0);
        let terminal_value = last * (1.0 + a.growth_rate) / (a.discount_rate - a.growth_rate);
        let pv_terminal_value = terminal_value / factor;
        let exit_valuation = pv_cashflows + pv_terminal_value;
        let investor_roi =
            (exit_valuation * a.investor_share - a.invested_amount) / a.invested_amount;

        ExitResult {
            pv_cashflows,
            terminal_value,
            pv_terminal_value,
            exit_valuation,
            investor_roi,
        }
    }
}

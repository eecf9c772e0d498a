//! Pre-money / post-money valuation comparison with partner value split.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, VentureError};
use crate::core::types::{Amount, Round};

/// Input of a valuation comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationComparisonInput {
    pub pre_money: Amount,
    pub post_money: Amount,
    pub investment_rounds: Vec<Round>,
    /// Partner name -> equity fraction.
    pub partner_equity_splits: BTreeMap<String, f64>,
}

/// Value attributed to one partner at post-money.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PartnerReturn {
    pub equity_percentage: f64,
    pub equity_value: Amount,
    pub return_amount: Amount,
    pub return_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationComparison {
    pub pre_money_valuation: Amount,
    pub post_money_valuation: Amount,
    pub total_investment: Amount,
    pub valuation_multiple: f64,
    pub investor_roi_multiple: f64,
    pub investor_roi_percentage: f64,
    pub investor_total_return: Amount,
    pub investor_equity_value: Amount,
    pub investor_equity_percentage: f64,
    pub partner_returns: BTreeMap<String, PartnerReturn>,
    pub investment_rounds: Vec<Round>,
}

/// Compare valuations and split post-money value between partners and investors.
pub fn compare_valuations(input: &ValuationComparisonInput) -> Result<ValuationComparison> {
    let pre = input.pre_money;
    let post = input.post_money;
    if !(pre.is_finite() && post.is_finite() && pre > 0.0 && post > 0.0) {
        return Err(VentureError::invalid_parameter("valuations must be positive"));
    }
    if post < pre {
        return Err(VentureError::invalid_parameter(
            "post_money must not be lower than pre_money",
        ));
    }
    if let Some(round) = input
        .investment_rounds
        .iter()
        .find(|r| !(r.amount.is_finite() && r.amount >= 0.0))
    {
        return Err(VentureError::invalid_parameter(format!(
            "investment amount for round {} must be non-negative",
            round.name
        )));
    }

    let total_investment: Amount = input.investment_rounds.iter().map(|r| r.amount).sum();
    let investor_roi_multiple = if total_investment > 0.0 {
        (post - total_investment) / total_investment
    } else {
        0.0
    };

    let mut partner_returns = BTreeMap::new();
    for (partner, &pct) in &input.partner_equity_splits {
        if !(0.0..=1.0).contains(&pct) {
            return Err(VentureError::invalid_parameter(format!(
                "partner {} equity fraction must be between 0 and 1",
                partner
            )));
        }
        let equity_value = post * pct;
        partner_returns.insert(
            partner.clone(),
            PartnerReturn {
                equity_percentage: pct * 100.0,
                equity_value,
                return_amount: equity_value,
                return_percentage: equity_value / post * 100.0,
            },
        );
    }

    let allocated: f64 = input.partner_equity_splits.values().sum();
    let (investor_equity_pct, investor_equity_value, investor_total_return) = if allocated < 1.0 {
        let pct = 1.0 - allocated;
        let value = post * pct;
        let ret = if pct > 0.0 { value - total_investment } else { 0.0 };
        (pct, value, ret)
    } else {
        // Investors are among the partners; attribute everything above cost to them
        let partner_value: f64 = partner_returns.values().map(|p| p.equity_value).sum();
        (0.0, post - partner_value, post - total_investment)
    };
    let investor_roi_percentage = if total_investment > 0.0 {
        investor_total_return / total_investment * 100.0
    } else {
        0.0
    };

    Ok(ValuationComparison {
        pre_money_valuation: pre,
        post_money_valuation: post,
        total_investment,
        valuation_multiple: post / pre,
        investor_roi_multiple,
        investor_roi_percentage,
        investor_total_return,
        investor_equity_value,
        investor_equity_percentage: investor_equity_pct * 100.0,
        partner_returns,
        investment_rounds: input.investment_rounds.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(splits: &[(&str, f64)]) -> ValuationComparisonInput {
        ValuationComparisonInput {
            pre_money: 1000.0,
            post_money: 2000.0,
            investment_rounds: vec![Round::new("Seed", 500.0), Round::new("A", 500.0)],
            partner_equity_splits: splits.iter().map(|(n, p)| (n.to_string(), *p)).collect(),
        }
    }

    #[test]
    fn test_partial_allocation() {
        let result = compare_valuations(&input(&[("Alice", 0.3), ("Bob", 0.2)])).unwrap();
        assert!((result.total_investment - 1000.0).abs() < 1e-12);
        assert!((result.valuation_multiple - 2.0).abs() < 1e-12);
        assert!((result.investor_roi_multiple - 1.0).abs() < 1e-12);
        assert!((result.investor_equity_percentage - 50.0).abs() < 1e-9);
        assert!((result.investor_equity_value - 1000.0).abs() < 1e-9);
        assert!(result.investor_total_return.abs() < 1e-9);
        let alice = result.partner_returns["Alice"];
        assert!((alice.equity_value - 600.0).abs() < 1e-9);
        assert!((alice.return_percentage - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_full_allocation() {
        let result = compare_valuations(&input(&[("Alice", 0.5), ("Fund", 0.5)])).unwrap();
        assert_eq!(result.investor_equity_percentage, 0.0);
        assert!((result.investor_total_return - 1000.0).abs() < 1e-9);
        assert!((result.investor_roi_percentage - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_post_below_pre_rejected() {
        let mut inp = input(&[]);
        inp.post_money = 500.0;
        assert!(compare_valuations(&inp).is_err());
    }

    #[test]
    fn test_split_out_of_range_rejected() {
        assert!(compare_valuations(&input(&[("Alice", 1.2)])).is_err());
    }
}

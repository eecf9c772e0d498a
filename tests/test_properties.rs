//! Property tests for ventureval engine invariants.

use proptest::prelude::*;
use ventureval::captable::{CapTableEngine, JvCapTableEngine};
use ventureval::core::random::Xoshiro256;
use ventureval::core::types::{ExitAssumptions, InitialInvestments, Round, RoundSequence};
use ventureval::simulation::MonteCarloSimulator;
use ventureval::valuation::DcfValuationEngine;

fn round_sequence() -> impl Strategy<Value = RoundSequence> {
    prop::collection::vec(0.0f64..1e7, 0..20).prop_map(|amounts| {
        let rounds = amounts
            .into_iter()
            .enumerate()
            .map(|(i, a)| Round::new(format!("R{}", i + 1), a))
            .collect();
        RoundSequence::new(rounds).unwrap()
    })
}

proptest! {
    #[test]
    fn founders_pct_non_increasing_and_bounded(pre_money in 0.0f64..1e7, rounds in round_sequence()) {
        let out = CapTableEngine::new().run(pre_money, &rounds).unwrap();
        prop_assert_eq!(out.rows.len(), rounds.len());
        let mut previous = 1.0;
        for row in &out.rows {
            prop_assert!(row.founders_pct >= 0.0 && row.founders_pct <= 1.0);
            prop_assert!(row.founders_pct <= previous);
            previous = row.founders_pct;
        }
        prop_assert_eq!(out.final_dilution, previous);
    }

    #[test]
    fn jv_fractions_sum_to_one(
        ag_inno in 0.0f64..1e6,
        partner in 0.0f64..1e6,
        grant in 1.0f64..1e6,
        rounds in round_sequence(),
    ) {
        let out = JvCapTableEngine::new()
            .run(&InitialInvestments::new(ag_inno, partner, grant), &rounds)
            .unwrap();
        for row in &out.rows {
            prop_assert!((row.ownership.total() - 1.0).abs() < 1e-9);
            prop_assert!(row.ownership.external_fraction >= 0.0);
        }
    }

    #[test]
    fn dcf_is_deterministic(
        cash_flows in prop::collection::vec(-1e4f64..1e5, 1..12),
        discount_rate in 0.01f64..0.5,
        spread in 0.001f64..0.3,
    ) {
        let a = ExitAssumptions {
            cash_flows,
            discount_rate,
            growth_rate: discount_rate - spread,
            investor_share: 0.25,
            invested_amount: 1000.0,
        };
        let engine = DcfValuationEngine::new();
        prop_assert_eq!(engine.run(&a).unwrap(), engine.run(&a).unwrap());
    }

    #[test]
    fn montecarlo_echoes_trials(trials in 1usize..300, seed in any::<u64>()) {
        let a = ExitAssumptions {
            cash_flows: vec![100.0, 150.0],
            discount_rate: 0.1,
            growth_rate: 0.02,
            investor_share: 0.2,
            invested_amount: 100.0,
        };
        let mut rng = Xoshiro256::new(seed);
        let mc = MonteCarloSimulator::new().run(&a, trials, 0.3, &mut rng).unwrap();
        prop_assert_eq!(mc.trials_count, trials);
        prop_assert!(mc.p10_exit_value <= mc.median_exit_value + 1e-9);
        prop_assert!(mc.median_exit_value <= mc.p90_exit_value + 1e-9);
    }
}

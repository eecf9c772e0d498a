//! Integration tests for the ventureval JSON analysis contract.

use serde_json::{json, Value};
use ventureval::analysis::SubAnalysis;
use ventureval::{AnalysisOrchestrator, AnalyzerConfig};

fn analyze(request: Value) -> Value {
    let response = AnalysisOrchestrator::default().run_json(&request.to_string());
    serde_json::from_str(&response.to_json()).unwrap()
}

fn close(value: &Value, expected: f64, tol: f64) -> bool {
    (value.as_f64().unwrap() - expected).abs() < tol
}

#[test]
fn test_full_request_round_trip() {
    let response = analyze(json!({
        "parent_dilution": {"pre_money": 1000, "rounds": [{"round": "Seed", "amount": 500}]},
        "jv_dilution": {
            "initial_investments": {"ag_inno": 40, "partner": 30, "grant": 30},
            "rounds": [{"round": "A", "amount": 100}]
        },
        "exit_analysis": {
            "cash_flows": [100, 200, 300],
            "discount_rate": 0.12,
            "growth_rate": 0.03,
            "investor_share": 0.2,
            "invested_amount": 500
        },
        "run_montecarlo": true,
        "montecarlo_trials": 500,
        "cf_volatility": 0.2
    }));

    assert_eq!(response["success"], true);
    assert!(response.get("error").is_none());
    let results = &response["results"];

    let parent = &results["parent_dilution"];
    assert_eq!(parent["data"][0]["round"], "Seed");
    assert_eq!(parent["data"][0]["post_money"], 1500.0);
    assert!(close(&parent["data"][0]["founders_pct"], 2.0 / 3.0, 1e-12));
    // Wire value is a percentage
    assert!(close(&parent["final_dilution"], 200.0 / 3.0, 1e-9));

    let jv = &results["jv_dilution"];
    assert_eq!(jv["data"].as_array().unwrap().len(), 1);
    assert!(close(&jv["final_ownership"]["external_pct"], 0.5, 1e-12));
    assert!(close(&jv["final_ownership"]["ag_inno_pct"], 0.2, 1e-12));

    let exit = &results["exit_analysis"];
    for key in ["pv_cashflows", "terminal_value", "pv_terminal_value", "exit_valuation", "investor_roi"] {
        assert!(exit[key].is_number(), "missing {}", key);
    }

    let mc = &results["montecarlo"];
    assert_eq!(mc["trials_count"], 500);
    for key in [
        "mean_exit_value",
        "median_exit_value",
        "std_exit_value",
        "p10_exit_value",
        "p90_exit_value",
        "mean_roi",
        "median_roi",
        "p10_roi",
        "p90_roi",
    ] {
        assert!(mc[key].is_number(), "missing {}", key);
    }
}

#[test]
fn test_empty_parent_rounds_report_full_ownership() {
    let response = analyze(json!({"parent_dilution": {"pre_money": 1000, "rounds": []}}));
    assert_eq!(response["results"]["parent_dilution"]["final_dilution"], 100.0);
    assert_eq!(response["results"]["parent_dilution"]["data"], json!([]));
}

#[test]
fn test_jv_no_rounds_final_ownership() {
    let response = analyze(json!({
        "jv_dilution": {"initial_investments": {"ag_inno": 40, "partner": 30, "grant": 30}, "rounds": []}
    }));
    let final_ownership = &response["results"]["jv_dilution"]["final_ownership"];
    assert!(close(&final_ownership["ag_inno_pct"], 0.4, 1e-12));
    assert!(close(&final_ownership["partner_pct"], 0.3, 1e-12));
    assert!(close(&final_ownership["grant_pct"], 0.3, 1e-12));
    assert_eq!(final_ownership["external_pct"], 0.0);
}

#[test]
fn test_malformed_json_rejected() {
    let response = AnalysisOrchestrator::default().run_json("{not json");
    assert!(!response.success);
    assert!(response.results.is_none());
    assert!(response.error.unwrap().starts_with("Invalid request"));
}

#[test]
fn test_missing_subfield_rejects_whole_request() {
    let response = analyze(json!({
        "parent_dilution": {"pre_money": 1000, "rounds": []},
        "exit_analysis": {"cash_flows": [100], "discount_rate": 0.1}
    }));
    assert_eq!(response["success"], false);
    assert!(response.get("results").is_none());
    assert!(response["error"].as_str().unwrap().contains("growth_rate"));
}

#[test]
fn test_validation_failure_names_analysis() {
    let response = AnalysisOrchestrator::default().run_json(
        &json!({
            "parent_dilution": {"pre_money": 1000, "rounds": [{"round": "Seed", "amount": 500}]},
            "exit_analysis": {
                "cash_flows": [100],
                "discount_rate": 0.05,
                "growth_rate": 0.05,
                "investor_share": 0.2,
                "invested_amount": 100
            },
            "run_montecarlo": true,
            "montecarlo_trials": 100,
            "cf_volatility": 0.1
        })
        .to_string(),
    );

    assert!(!response.success);
    let error = response.error.as_deref().unwrap();
    assert!(error.starts_with("exit_analysis:"));
    assert!(response.failure(SubAnalysis::ExitAnalysis).is_some());
    // Monte Carlo is skipped, not reported twice
    assert!(response.failure(SubAnalysis::MonteCarlo).is_none());
    let results = response.results.unwrap();
    assert!(results.parent_dilution.is_some());
    assert!(results.exit_analysis.is_none());
    assert!(results.montecarlo.is_none());
}

#[test]
fn test_montecarlo_requires_volatility() {
    let response = analyze(json!({
        "exit_analysis": {
            "cash_flows": [100],
            "discount_rate": 0.1,
            "growth_rate": 0.0,
            "investor_share": 0.2,
            "invested_amount": 100
        },
        "run_montecarlo": true,
        "montecarlo_trials": 100
    }));
    assert_eq!(response["success"], false);
    assert!(response["results"]["exit_analysis"].is_object());
    assert!(response["error"].as_str().unwrap().contains("cf_volatility is required"));
}

#[test]
fn test_huge_trial_count_is_montecarlo_validation_failure() {
    let payload = |trials: i64| {
        json!({
            "exit_analysis": {
                "cash_flows": [100],
                "discount_rate": 0.1,
                "growth_rate": 0.0,
                "investor_share": 0.2,
                "invested_amount": 100
            },
            "run_montecarlo": true,
            "montecarlo_trials": trials,
            "cf_volatility": 0.2
        })
        .to_string()
    };
    let sequential_only = AnalyzerConfig {
        parallel_threshold: usize::MAX,
        ..Default::default()
    };

    for orchestrator in [
        AnalysisOrchestrator::default(),
        AnalysisOrchestrator::new(sequential_only),
    ] {
        for trials in [4_611_686_018_427_387_904, i64::MAX] {
            let response = orchestrator.run_json(&payload(trials));
            assert!(!response.success);
            let results = response.results.as_ref().unwrap();
            assert!(results.exit_analysis.is_some());
            assert!(results.montecarlo.is_none());
            let failure = response.failure(SubAnalysis::MonteCarlo).unwrap();
            assert!(failure.error.is_validation());
            assert!(response
                .error
                .as_deref()
                .unwrap()
                .starts_with("montecarlo: Invalid parameter: montecarlo_trials must be at most"));
        }
    }
}

#[test]
fn test_supplementary_analyses() {
    let response = analyze(json!({
        "valuation_comparison": {
            "pre_money": 1000,
            "post_money": 2000,
            "investment_rounds": [{"round": "Seed", "amount": 1000}],
            "partner_equity_splits": {"Alice": 0.3, "Bob": 0.2}
        },
        "equity_returns": {
            "initial_valuation": 1000,
            "investment_rounds": [{"round": "Seed", "amount": 1000}],
            "initial_partners": {"Alice": 0.6, "Bob": 0.4}
        }
    }));

    assert_eq!(response["success"], true);
    let comparison = &response["results"]["valuation_comparison"]["data"];
    assert_eq!(comparison["valuation_multiple"], 2.0);
    assert!(close(&comparison["partner_returns"]["Alice"]["equity_value"], 600.0, 1e-9));

    let equity = &response["results"]["equity_returns"]["data"];
    assert_eq!(equity["exit_valuation"], 2000.0);
    let last_round = &equity["simulation_data"][0]["equity"];
    assert_eq!(last_round[2]["participant"], "Investor-Seed");
    assert!(close(&last_round[2]["pct"], 0.5, 1e-12));
}

#[test]
fn test_seed_from_config_controls_simulation() {
    let request = json!({
        "exit_analysis": {
            "cash_flows": [100, 120],
            "discount_rate": 0.1,
            "growth_rate": 0.02,
            "investor_share": 0.3,
            "invested_amount": 100
        },
        "run_montecarlo": true,
        "montecarlo_trials": 300,
        "cf_volatility": 0.3
    })
    .to_string();

    let seeded = |seed| {
        let config = AnalyzerConfig { seed, ..Default::default() };
        AnalysisOrchestrator::new(config).run_json(&request).results.unwrap().montecarlo.unwrap()
    };
    assert_eq!(seeded(1), seeded(1));
    assert_ne!(seeded(1).mean_exit_value, seeded(2).mean_exit_value);
}

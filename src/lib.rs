// Suppress warning from PyO3 macro expansion (fixed in newer PyO3 versions)
#![allow(non_local_definitions)]

//! ventureval - venture-finance analysis engine.
//!
//! This crate provides:
//! - Single-founder and joint-venture cap-table dilution
//! - Named-participant equity returns and valuation comparison
//! - DCF exit valuation with perpetuity-growth terminal value
//! - Monte Carlo exit simulation with an injectable random source
//! - A request orchestrator speaking the JSON analysis contract

pub mod analysis;
pub mod captable;
pub mod core;
#[cfg(feature = "python")]
pub mod python;
pub mod simulation;
pub mod valuation;

pub use crate::analysis::{AnalysisOrchestrator, AnalysisRequest, AnalysisResponse};
pub use crate::core::{AnalyzerConfig, Result, VentureError};

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// Python module entry point
#[cfg(feature = "python")]
#[pymodule]
fn _ventureval(_py: Python<'_>, m: &PyModule) -> PyResult<()> {
    // Register config and result classes
    m.add_class::<python::bindings::PyAnalyzerConfig>()?;
    m.add_class::<python::bindings::PyExitResult>()?;
    m.add_class::<python::bindings::PyMonteCarloResult>()?;

    // Register analysis functions
    m.add_function(wrap_pyfunction!(python::bindings::analyze, m)?)?;
    m.add_function(wrap_pyfunction!(python::bindings::simulate_dilution, m)?)?;
    m.add_function(wrap_pyfunction!(python::bindings::simulate_jv_dilution, m)?)?;
    m.add_function(wrap_pyfunction!(python::bindings::dcf_exit, m)?)?;
    m.add_function(wrap_pyfunction!(python::bindings::monte_carlo_exit, m)?)?;

    Ok(())
}

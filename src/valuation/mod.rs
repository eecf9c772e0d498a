//! Exit valuation engines.

pub mod comparison;
pub mod dcf;

pub use comparison::{compare_valuations, ValuationComparison, ValuationComparisonInput};
pub use dcf::DcfValuationEngine;

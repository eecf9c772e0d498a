//! Core types and utilities for ventureval.

pub mod config;
pub mod error;
pub mod random;
pub mod types;

pub use config::AnalyzerConfig;
pub use error::{Result, VentureError};
pub use random::{JumpableSource, RandomSource, Xoshiro256};
pub use types::*;

//! Cap-table dilution engines.

pub mod equity_returns;
pub mod jv;
pub mod parent;

pub use equity_returns::{simulate_equity_returns, EquityReturnsInput, EquityReturnsResult};
pub use jv::{JvCapTableEngine, JvDilutionOutcome};
pub use parent::{CapTableEngine, DilutionOutcome};

//! Request orchestration across the analysis engines.

pub mod orchestrator;
pub mod request;
pub mod response;

pub use orchestrator::AnalysisOrchestrator;
pub use request::{AnalysisRequest, JvDilutionRequest, ParentDilutionRequest};
pub use response::{AnalysisFailure, AnalysisResponse, AnalysisResults, SubAnalysis};

//! Error types for ventureval.

use thiserror::Error;

/// Result type alias for ventureval operations.
pub type Result<T> = std::result::Result<T, VentureError>;

/// Error types for the analysis engines.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VentureError {
    /// Out-of-domain input value.
    #[error("Invalid parameter: {message}")]
    InvalidParameter { message: String },

    /// Empty data error.
    #[error("Empty data provided for {context}")]
    EmptyData { context: String },

    /// Division by zero error.
    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    /// Internal numeric invariant broken. Indicates a defect, not bad input.
    #[error("Invariant violation: {message}")]
    InvariantViolation { message: String },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Request envelope could not be interpreted.
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },
}

impl VentureError {
    /// Create an invalid parameter error.
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            message: message.into(),
        }
    }

    /// Create an empty data error.
    pub fn empty_data(context: impl Into<String>) -> Self {
        Self::EmptyData {
            context: context.into(),
        }
    }

    /// Create a division by zero error.
    pub fn division_by_zero(context: impl Into<String>) -> Self {
        Self::DivisionByZero {
            context: context.into(),
        }
    }

    /// Create an invariant violation error.
    pub fn invariant_violation(message: impl Into<String>) -> Self {
        Self::InvariantViolation {
            message: message.into(),
        }
    }

    /// Create an invalid config error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an invalid request error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// True for errors caused by caller input rather than an engine defect.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidParameter { .. } | Self::EmptyData { .. } | Self::DivisionByZero { .. }
        )
    }
}

impl From<serde_yaml::Error> for VentureError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::invalid_config(err.to_string())
    }
}

impl From<serde_json::Error> for VentureError {
    fn from(err: serde_json::Error) -> Self {
        Self::invalid_request(err.to_string())
    }
}

#[cfg(feature = "python")]
impl From<VentureError> for pyo3::PyErr {
    fn from(err: VentureError) -> pyo3::PyErr {
        pyo3::exceptions::PyValueError::new_err(err.to_string())
    }
}

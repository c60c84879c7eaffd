//! Error taxonomy for the calculation pipeline

use thiserror::Error;

/// Result type alias using `CalcError`
pub type CalcResult<T> = Result<T, CalcError>;

/// Failures raised inside the pipeline.
///
/// None of these escape `IrrCalculator::calculate`; they are folded into the
/// uniform failure response there.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    /// Malformed or inconsistent derived parameters (bad year range,
    /// zero denominators, missing mode payload)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Cash-flow series too short or lacking both signs
    #[error("Insufficient signal: {0}")]
    InsufficientSignal(String),

    /// Root finder did not produce a finite rate
    #[error("No convergence: {0}")]
    NoConvergence(String),

    /// Request file or body could not be read or parsed
    #[error("Input error: {0}")]
    Input(String),
}

impl CalcError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Stable code for API responses
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::InsufficientSignal(_) => "INSUFFICIENT_SIGNAL",
            Self::NoConvergence(_) => "NO_CONVERGENCE",
            Self::Input(_) => "INPUT_ERROR",
        }
    }

    /// HTTP status used by the boundary layer
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Configuration(_) | Self::Input(_) => 400,
            Self::InsufficientSignal(_) | Self::NoConvergence(_) => 422,
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(err: serde_json::Error) -> Self {
        Self::Input(err.to_string())
    }
}

impl From<std::io::Error> for CalcError {
    fn from(err: std::io::Error) -> Self {
        Self::Input(err.to_string())
    }
}

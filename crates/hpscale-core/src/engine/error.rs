use thiserror::Error;

use super::config::ConfigError;
use crate::core::io::error::IoError;
use crate::core::models::thresholds::ThresholdError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Validation phase requested before the pilot phase completed: {source}")]
    IncompletePhase {
        #[source]
        source: ThresholdError,
    },

    #[error("Threshold table error: {0}")]
    Threshold(#[from] ThresholdError),

    #[error("I/O failure: {0}")]
    Io(#[from] IoError),

    #[error("No problem instance is available for length {length}")]
    MissingInstance { length: usize },

    #[error("Internal logic error: {0}")]
    Internal(String),
}

impl EngineError {
    /// True for failures that a user fixes by editing their configuration
    /// or instance files rather than by rerunning a phase.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            EngineError::Config(_) | EngineError::MissingInstance { .. }
        )
    }

    pub fn is_incomplete_phase(&self) -> bool {
        matches!(self, EngineError::IncompletePhase { .. })
    }
}

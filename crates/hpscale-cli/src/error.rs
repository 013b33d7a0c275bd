use hpscale::engine::config::ConfigError;
use hpscale::engine::error::EngineError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] EngineError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse file '{path}': {source}", path = path.display())]
    FileParsing {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::Core(EngineError::Config(err))
    }
}

impl CliError {
    /// Process exit status: 2 for configuration problems, 3 when a phase
    /// prerequisite is missing, 1 for everything else.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Core(e) if e.is_configuration() => 2,
            CliError::Core(e) if e.is_incomplete_phase() => 3,
            CliError::Config(_) | CliError::FileParsing { .. } => 2,
            _ => 1,
        }
    }
}

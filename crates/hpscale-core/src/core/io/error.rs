use crate::core::models::sequence::SequenceError;
use crate::core::models::thresholds::ThresholdError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to parse TOML in '{path}': {source}", path = path.display())]
    TomlParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Invalid sequence in '{path}': {source}", path = path.display())]
    Sequence {
        path: PathBuf,
        #[source]
        source: SequenceError,
    },

    #[error("Inconsistent threshold artifact '{path}': {source}", path = path.display())]
    Threshold {
        path: PathBuf,
        #[source]
        source: ThresholdError,
    },
}

use super::error::IoError;
use crate::core::models::sequence::Sequence;
use std::path::{Path, PathBuf};

/// File name used for the instance of length `length` inside an instance directory.
pub fn instance_file_name(length: usize) -> String {
    format!("sequence_L{length}.txt")
}

pub fn instance_path(dir: &Path, length: usize) -> PathBuf {
    dir.join(instance_file_name(length))
}

pub fn read_sequence(path: &Path) -> Result<Sequence, IoError> {
    let content = std::fs::read_to_string(path)?;
    content.parse().map_err(|source| IoError::Sequence {
        path: path.to_path_buf(),
        source,
    })
}

pub fn write_sequence(path: &Path, sequence: &Sequence) -> Result<(), IoError> {
    std::fs::write(path, format!("{sequence}\n"))?;
    Ok(())
}

use super::error::IoError;
use super::traits::TrialSink;
use crate::core::models::trial::Trial;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

pub const TRIAL_COLUMNS: [&str; 9] = [
    "length",
    "algorithm",
    "trial_id",
    "seed",
    "final_energy",
    "success_flag",
    "iterations",
    "runtime_ms",
    "paradox_activity",
];

/// Appends trial records to a CSV stream, one row per trial.
pub struct CsvTrialWriter<W: Write> {
    writer: csv::Writer<W>,
    written: usize,
}

impl CsvTrialWriter<File> {
    /// Creates (or truncates) `path` and writes the header row.
    pub fn create(path: &Path) -> Result<Self, IoError> {
        Self::new(File::create(path)?)
    }
}

impl<W: Write> CsvTrialWriter<W> {
    pub fn new(inner: W) -> Result<Self, IoError> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(inner);
        writer.write_record(TRIAL_COLUMNS)?;
        Ok(Self { writer, written: 0 })
    }

    pub fn written(&self) -> usize {
        self.written
    }

    pub fn into_inner(self) -> Result<W, IoError> {
        self.writer
            .into_inner()
            .map_err(|e| IoError::Io(e.into_error()))
    }
}

impl<W: Write> TrialSink for CsvTrialWriter<W> {
    fn record(&mut self, trial: &Trial) -> Result<(), IoError> {
        self.writer.serialize(trial)?;
        self.written += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), IoError> {
        self.writer.flush()?;
        Ok(())
    }
}

pub fn read_trials(reader: impl Read) -> Result<Vec<Trial>, IoError> {
    let mut reader = csv::Reader::from_reader(reader);
    let mut trials = Vec::new();
    for record in reader.deserialize() {
        trials.push(record?);
    }
    Ok(trials)
}

pub fn read_trials_from_path(path: &Path) -> Result<Vec<Trial>, IoError> {
    read_trials(File::open(path)?)
}

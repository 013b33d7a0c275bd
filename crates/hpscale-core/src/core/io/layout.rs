use super::error::IoError;
use crate::analysis::report::{SCALING_TABLE_FILE, SUMMARY_FILE};
use crate::core::models::trial::Phase;
use std::path::{Path, PathBuf};

pub const THRESHOLDS_FILE: &str = "thresholds.toml";
pub const INSTANCES_DIR: &str = "instances";

/// File layout of one study's results directory.
///
/// ```text
/// <root>/thresholds.toml
/// <root>/instances/sequence_L{L}.txt
/// <root>/phase_a_L{L}.csv      pilot trials
/// <root>/phase_b_L{L}.csv      validation trials
/// <root>/scaling_table.csv   analysis of phase B
/// <root>/stats_summary.toml
/// <root>/phase_a_scaling_table.csv   analysis of phase A
/// <root>/phase_a_stats_summary.toml
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsLayout {
    root: PathBuf,
}

impl ResultsLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn ensure_dirs(&self) -> Result<(), IoError> {
        std::fs::create_dir_all(self.instances_dir())?;
        Ok(())
    }

    pub fn thresholds_path(&self) -> PathBuf {
        self.root.join(THRESHOLDS_FILE)
    }

    pub fn instances_dir(&self) -> PathBuf {
        self.root.join(INSTANCES_DIR)
    }

    pub fn instance_path(&self, length: usize) -> PathBuf {
        super::instances::instance_path(&self.instances_dir(), length)
    }

    pub fn trial_log_path(&self, phase: Phase, length: usize) -> PathBuf {
        self.root.join(format!(
            "phase_{}_L{length}.csv",
            phase.label().to_ascii_lowercase()
        ))
    }

    pub fn scaling_table_path(&self, phase: Phase) -> PathBuf {
        self.report_path(phase, SCALING_TABLE_FILE)
    }

    pub fn summary_path(&self, phase: Phase) -> PathBuf {
        self.report_path(phase, SUMMARY_FILE)
    }

    /// Validation reports keep the bare file name; pilot reports are prefixed.
    fn report_path(&self, phase: Phase, file: &str) -> PathBuf {
        match phase {
            Phase::Validation => self.root.join(file),
            Phase::Pilot => self.root.join(format!("phase_a_{file}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_follow_the_documented_layout() {
        let layout = ResultsLayout::new("/tmp/study");
        assert_eq!(layout.thresholds_path(), Path::new("/tmp/study/thresholds.toml"));
        assert_eq!(
            layout.trial_log_path(Phase::Pilot, 20),
            Path::new("/tmp/study/phase_a_L20.csv")
        );
        assert_eq!(
            layout.trial_log_path(Phase::Validation, 30),
            Path::new("/tmp/study/phase_b_L30.csv")
        );
        assert_eq!(
            layout.scaling_table_path(Phase::Validation),
            Path::new("/tmp/study/scaling_table.csv")
        );
        assert_eq!(
            layout.summary_path(Phase::Pilot),
            Path::new("/tmp/study/phase_a_stats_summary.toml")
        );
        assert_eq!(
            layout.instance_path(40),
            Path::new("/tmp/study/instances/sequence_L40.txt")
        );
    }

    #[test]
    fn ensure_dirs_creates_the_instance_directory() {
        let dir = tempfile::tempdir().unwrap();
        let layout = ResultsLayout::new(dir.path().join("nested"));
        layout.ensure_dirs().unwrap();
        assert!(layout.instances_dir().is_dir());
    }
}

use crate::core::io::instances::read_sequence;
use crate::core::io::layout::ResultsLayout;
use crate::core::io::thresholds::read_thresholds;
use crate::core::io::traits::Tee;
use crate::core::io::trials::CsvTrialWriter;
use crate::core::models::instance::InstanceSet;
use crate::core::models::thresholds::{ThresholdError, ThresholdTable};
use crate::core::models::trial::{Algorithm, Phase, Trial};
use crate::engine::config::{ConfigError, ExperimentConfig};
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::trial::{TrialSpec, run_batch};
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuccessCounts {
    pub length: usize,
    pub baseline: usize,
    pub elimination: usize,
    pub trials_per_algorithm: usize,
}

#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub counts: Vec<SuccessCounts>,
    pub trials: Vec<Trial>,
}

/// Rejects validation unless the table is locked and covers every length.
pub fn ensure_ready(table: &ThresholdTable, lengths: &[usize]) -> Result<(), EngineError> {
    table
        .ensure_covers(lengths)
        .map_err(|source| EngineError::IncompletePhase { source })
}

/// Reads the pilot's threshold artifact; a missing file means the pilot
/// never completed.
pub fn load_thresholds(layout: &ResultsLayout) -> Result<ThresholdTable, EngineError> {
    let path = layout.thresholds_path();
    if !path.exists() {
        return Err(EngineError::IncompletePhase {
            source: ThresholdError::NotLocked,
        });
    }
    Ok(read_thresholds(&path)?)
}

/// Phase B: runs the validation trials of every configured length and
/// scores each against the locked E*(L).
///
/// Fails with [`EngineError::IncompletePhase`] before running anything if the
/// pilot phase has not locked a threshold for every length. An instance that
/// differs from the one the pilot calibrated on is a configuration error.
#[instrument(skip_all, name = "validation_workflow")]
pub fn run(
    config: &ExperimentConfig,
    instances: &InstanceSet,
    thresholds: &ThresholdTable,
    layout: &ResultsLayout,
    reporter: &ProgressReporter,
) -> Result<ValidationResult, EngineError> {
    config.validate()?;
    let harness = &config.harness;
    ensure_ready(thresholds, &harness.lengths)?;
    layout.ensure_dirs()?;

    let per_length = harness.main_trials_per_length;
    reporter.report(Progress::PhaseStart { name: "Validation" });
    reporter.report(Progress::TaskStart {
        total_steps: (harness.lengths.len() * 2 * per_length) as u64,
    });
    info!(
        lengths = ?harness.lengths,
        trials_per_algorithm = per_length,
        "Starting validation phase."
    );

    let mut counts = Vec::with_capacity(harness.lengths.len());
    let mut all_trials = Vec::new();

    for &length in &harness.lengths {
        let sequence = instances
            .get(length)
            .ok_or(EngineError::MissingInstance { length })?;
        let calibrated_path = layout.instance_path(length);
        if calibrated_path.exists() && &read_sequence(&calibrated_path)? != sequence {
            return Err(ConfigError::Invalid(format!(
                "instance for length {length} differs from the one used to calibrate its threshold"
            ))
            .into());
        }

        let threshold = thresholds.locked_entry(length)?;
        if threshold.status.is_degenerate() {
            warn!(length, "Validating against a degenerate threshold.");
        }
        reporter.report(Progress::Message(format!(
            "Validation L={length} (E* = {})",
            threshold.energy
        )));

        let specs = TrialSpec::matrix(Phase::Validation, length, per_length);
        let mut log = CsvTrialWriter::create(&layout.trial_log_path(Phase::Validation, length))?;
        let mut trials: Vec<Trial> = Vec::with_capacity(specs.len());
        run_batch(
            &specs,
            sequence,
            config,
            Some(threshold),
            &mut Tee(&mut log, &mut trials),
            reporter,
        )?;
        debug!(length, rows = log.written(), "Validation log written.");

        let successes = |algorithm: Algorithm| {
            trials
                .iter()
                .filter(|t| t.algorithm == algorithm && t.is_success())
                .count()
        };
        let tally = SuccessCounts {
            length,
            baseline: successes(Algorithm::Baseline),
            elimination: successes(Algorithm::Elimination),
            trials_per_algorithm: per_length,
        };
        info!(
            length,
            mc_successes = tally.baseline,
            fe_successes = tally.elimination,
            "Validation complete for length."
        );
        counts.push(tally);
        all_trials.extend(trials);
    }

    reporter.report(Progress::TaskFinish);
    reporter.report(Progress::PhaseFinish);
    Ok(ValidationResult {
        counts,
        trials: all_trials,
    })
}

use crate::core::io::instances::write_sequence;
use crate::core::io::layout::ResultsLayout;
use crate::core::io::thresholds::write_thresholds;
use crate::core::io::traits::Tee;
use crate::core::io::trials::CsvTrialWriter;
use crate::core::models::instance::InstanceSet;
use crate::core::models::thresholds::ThresholdTable;
use crate::core::models::trial::{Phase, Trial};
use crate::engine::config::ExperimentConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::thresholds::calibrate;
use crate::engine::trial::{TrialSpec, run_batch};
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone)]
pub struct PilotResult {
    /// The locked table, also written to `thresholds.toml`.
    pub thresholds: ThresholdTable,
    /// Lengths calibrated by this invocation, in configuration order.
    pub calibrated: Vec<usize>,
    /// Pilot trials of the calibrated lengths only.
    pub trials: Vec<Trial>,
}

/// Phase A: runs the pilot trials of every configured length, calibrates
/// E*(L) from the pooled energies of both algorithms, then locks and
/// persists the threshold table.
pub fn run(
    config: &ExperimentConfig,
    instances: &InstanceSet,
    layout: &ResultsLayout,
    reporter: &ProgressReporter,
) -> Result<PilotResult, EngineError> {
    extend(config, instances, &ThresholdTable::new(), layout, reporter)
}

/// Phase A for the configured lengths that `existing` does not cover.
///
/// Entries of `existing` are copied unchanged into a fresh table, the
/// missing lengths are calibrated into it, and the new table is locked and
/// persisted. `existing` itself is never reopened.
#[instrument(skip_all, name = "pilot_workflow")]
pub fn extend(
    config: &ExperimentConfig,
    instances: &InstanceSet,
    existing: &ThresholdTable,
    layout: &ResultsLayout,
    reporter: &ProgressReporter,
) -> Result<PilotResult, EngineError> {
    config.validate()?;
    layout.ensure_dirs()?;

    let harness = &config.harness;
    let pending: Vec<usize> = harness
        .lengths
        .iter()
        .copied()
        .filter(|&length| existing.get(length).is_none())
        .collect();
    let per_length = harness.pilot_trials_per_length;
    reporter.report(Progress::PhaseStart { name: "Pilot" });
    reporter.report(Progress::TaskStart {
        total_steps: (pending.len() * 2 * per_length) as u64,
    });
    info!(
        lengths = ?pending,
        kept = existing.len(),
        trials_per_algorithm = per_length,
        "Starting pilot phase."
    );

    let mut table = existing.successor();
    let mut all_trials = Vec::new();

    for &length in &pending {
        let sequence = instances
            .get(length)
            .ok_or(EngineError::MissingInstance { length })?;
        write_sequence(&layout.instance_path(length), sequence)?;
        reporter.report(Progress::Message(format!("Pilot L={length}")));

        let specs = TrialSpec::matrix(Phase::Pilot, length, per_length);
        let mut log = CsvTrialWriter::create(&layout.trial_log_path(Phase::Pilot, length))?;
        let mut trials: Vec<Trial> = Vec::with_capacity(specs.len());
        run_batch(
            &specs,
            sequence,
            config,
            None,
            &mut Tee(&mut log, &mut trials),
            reporter,
        )?;
        debug!(length, rows = log.written(), "Pilot log written.");

        let energies: Vec<i32> = trials.iter().map(|t| t.final_energy).collect();
        let entry = calibrate(length, &energies, harness.threshold_criterion);
        if entry.status.is_degenerate() {
            warn!(length, "Pilot distribution is degenerate; validation results at this length will be flagged.");
        }
        info!(length, threshold = entry.energy, "Calibrated threshold.");
        table.insert(entry)?;
        all_trials.extend(trials);
    }

    table.lock();
    write_thresholds(&layout.thresholds_path(), &table)?;
    reporter.report(Progress::TaskFinish);
    reporter.report(Progress::PhaseFinish);
    info!(lengths = table.len(), calibrated = pending.len(), "Threshold table locked.");

    Ok(PilotResult {
        thresholds: table,
        calibrated: pending,
        trials: all_trials,
    })
}

use crate::analysis::report::write_reports;
use crate::analysis::summary::LengthSummary;
use crate::analysis::trend::TrendFit;
use crate::core::io::layout::ResultsLayout;
use crate::core::io::trials::read_trials_from_path;
use crate::core::models::thresholds::{ThresholdError, ThresholdTable};
use crate::core::models::trial::{Phase, Trial};
use crate::engine::config::StatisticsConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use tracing::{info, instrument};

#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub summaries: Vec<LengthSummary>,
    pub trend: TrendFit,
}

/// Computes every statistic from an in-memory set of trials. Success is
/// scored against `thresholds`, so pilot trials can be analysed as well.
pub fn analyze(
    trials: &[Trial],
    thresholds: &ThresholdTable,
    lengths: &[usize],
    config: &StatisticsConfig,
) -> Result<AnalysisResult, EngineError> {
    config.validate()?;
    let mut summaries = Vec::with_capacity(lengths.len());
    for &length in lengths {
        let threshold = thresholds
            .locked_entry(length)
            .map_err(|source| EngineError::IncompletePhase { source })?;
        summaries.push(LengthSummary::from_trials(length, trials, threshold, config));
    }
    let trend = TrendFit::from_summaries(&summaries, config);
    Ok(AnalysisResult { summaries, trend })
}

/// Loads the locked thresholds and the `phase` trial logs of `lengths` from
/// `layout`, analyses them, and writes the phase's scaling table and
/// summary next to them.
#[instrument(skip_all, name = "analysis_workflow", fields(phase = phase.label()))]
pub fn run(
    config: &StatisticsConfig,
    phase: Phase,
    lengths: &[usize],
    layout: &ResultsLayout,
    reporter: &ProgressReporter,
) -> Result<AnalysisResult, EngineError> {
    reporter.report(Progress::PhaseStart { name: "Analysis" });
    let thresholds = super::validate::load_thresholds(layout)?;

    let mut trials = Vec::new();
    for &length in lengths {
        let path = layout.trial_log_path(phase, length);
        if !path.exists() {
            return Err(EngineError::IncompletePhase {
                source: ThresholdError::MissingLength(length),
            });
        }
        trials.extend(read_trials_from_path(&path)?);
    }
    info!(
        phase = phase.label(),
        lengths = lengths.len(),
        trials = trials.len(),
        "Loaded trial logs."
    );

    let result = analyze(&trials, &thresholds, lengths, config)?;
    write_reports(
        &layout.scaling_table_path(phase),
        &layout.summary_path(phase),
        &result.summaries,
        &result.trend,
    )?;
    reporter.report(Progress::PhaseFinish);
    Ok(result)
}

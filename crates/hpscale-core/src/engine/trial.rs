use super::config::ExperimentConfig;
use super::error::EngineError;
use super::progress::ProgressReporter;
use super::rng::{derive_seed, trial_rng};
use super::search::{self, NoopObserver, SearchOutcome};
use crate::core::io::traits::TrialSink;
use crate::core::models::sequence::Sequence;
use crate::core::models::thresholds::ThresholdEntry;
use crate::core::models::trial::{Algorithm, Phase, Trial};
use std::time::Instant;
use tracing::{debug, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Trials per parallel chunk; each chunk is handed to the sink in index
/// order before the next one starts.
const CHUNK_SIZE: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrialSpec {
    pub phase: Phase,
    pub length: usize,
    pub algorithm: Algorithm,
    pub index: usize,
}

impl TrialSpec {
    pub fn seed(&self) -> u64 {
        derive_seed(self.phase, self.length, self.algorithm, self.index)
    }

    /// All trials of one phase at one length: every algorithm, indices
    /// `0..count`, in that order.
    pub fn matrix(phase: Phase, length: usize, count: usize) -> Vec<TrialSpec> {
        Algorithm::ALL
            .into_iter()
            .flat_map(|algorithm| {
                (0..count).map(move |index| TrialSpec {
                    phase,
                    length,
                    algorithm,
                    index,
                })
            })
            .collect()
    }
}

/// Runs one search on its own freshly seeded stream and records it.
///
/// With a `threshold`, the trial carries a success flag; pilot trials pass
/// `None`.
pub fn run_trial(
    spec: &TrialSpec,
    sequence: &Sequence,
    config: &ExperimentConfig,
    threshold: Option<&ThresholdEntry>,
) -> Result<Trial, EngineError> {
    if sequence.len() != spec.length {
        return Err(EngineError::Internal(format!(
            "trial for length {} was given a sequence of length {}",
            spec.length,
            sequence.len()
        )));
    }

    let seed = spec.seed();
    let mut rng = trial_rng(seed);
    let started = Instant::now();
    let outcome: SearchOutcome = match spec.algorithm {
        Algorithm::Baseline => {
            search::baseline::run(sequence, &config.baseline, &mut rng, NoopObserver)?
        }
        Algorithm::Elimination => {
            search::elimination::run(sequence, &config.elimination, &mut rng, NoopObserver)?
        }
    };
    let runtime_ms = started.elapsed().as_secs_f64() * 1000.0;

    Ok(Trial {
        length: spec.length,
        algorithm: spec.algorithm,
        trial_index: spec.index,
        seed,
        final_energy: outcome.best_energy,
        success: threshold.map(|entry| entry.is_success(outcome.best_energy)),
        iterations: outcome.iterations,
        runtime_ms,
        paradox_activity: outcome.paradox_retained,
    })
}

/// Runs `specs` and hands each completed trial to `sink` in the order the
/// specs were given, whatever the worker count.
#[instrument(skip_all, name = "trial_batch", fields(trials = specs.len()))]
pub fn run_batch<S: TrialSink + ?Sized>(
    specs: &[TrialSpec],
    sequence: &Sequence,
    config: &ExperimentConfig,
    threshold: Option<&ThresholdEntry>,
    sink: &mut S,
    reporter: &ProgressReporter,
) -> Result<usize, EngineError> {
    let mut recorded = 0;
    for chunk in specs.chunks(CHUNK_SIZE) {
        #[cfg(not(feature = "parallel"))]
        let iterator = chunk.iter();

        #[cfg(feature = "parallel")]
        let iterator = chunk.par_iter();

        let trials: Vec<Trial> = iterator
            .map(|spec| run_trial(spec, sequence, config, threshold))
            .collect::<Result<_, _>>()?;

        for trial in &trials {
            sink.record(trial)?;
        }
        recorded += trials.len();
        reporter.advance(trials.len());
    }
    sink.flush()?;
    debug!(recorded, "Trial batch complete.");
    Ok(recorded)
}

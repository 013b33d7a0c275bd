use super::statistics::{
    MannWhitney, Statistic, cohens_d, mann_whitney_greater, mean, std_dev, wilson_interval,
};
use crate::core::models::thresholds::ThresholdEntry;
use crate::core::models::trial::{Algorithm, Trial};
use crate::engine::config::StatisticsConfig;
use serde::Serialize;
use std::fmt;
use tracing::warn;

/// FE rate over MC rate, with the zero-denominator cases kept explicit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Ratio {
    Finite(f64),
    /// Positive numerator over a zero denominator.
    Infinite,
    /// Zero over zero, or a rate that could not be computed.
    Undefined,
}

impl Ratio {
    pub fn of(numerator: f64, denominator: f64) -> Self {
        if denominator > 0.0 {
            Ratio::Finite(numerator / denominator)
        } else if numerator > 0.0 {
            Ratio::Infinite
        } else {
            Ratio::Undefined
        }
    }

    pub fn finite(&self) -> Option<f64> {
        match self {
            Ratio::Finite(r) => Some(*r),
            _ => None,
        }
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ratio::Finite(r) => write!(f, "{r:.4}"),
            Ratio::Infinite => f.write_str("inf"),
            Ratio::Undefined => f.write_str("undefined"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlgorithmSummary {
    pub algorithm: Algorithm,
    pub trials: usize,
    pub successes: usize,
    pub success_rate: Statistic<f64>,
    pub wilson: Statistic<(f64, f64)>,
    pub mean_energy: Statistic<f64>,
    pub sd_energy: Statistic<f64>,
    pub mean_runtime_ms: Statistic<f64>,
}

impl AlgorithmSummary {
    /// Success is re-derived from each trial's energy and the locked
    /// threshold, so a summary never trusts a stale flag.
    pub fn from_trials(
        algorithm: Algorithm,
        trials: &[&Trial],
        threshold: &ThresholdEntry,
        ci_level: f64,
    ) -> Self {
        let energies = energies_of(trials);
        let runtimes: Vec<f64> = trials.iter().map(|t| t.runtime_ms).collect();
        let successes = trials
            .iter()
            .filter(|t| threshold.is_success(t.final_energy))
            .count();

        let success_rate = if trials.is_empty() {
            Statistic::not_computable("no trials")
        } else {
            Statistic::Value(successes as f64 / trials.len() as f64)
        };

        Self {
            algorithm,
            trials: trials.len(),
            successes,
            success_rate,
            wilson: wilson_interval(successes, trials.len(), ci_level),
            mean_energy: mean(&energies).map_or_else(
                || Statistic::not_computable("no trials"),
                Statistic::Value,
            ),
            sd_energy: std_dev(&energies).map_or_else(
                || Statistic::not_computable("fewer than two trials"),
                Statistic::Value,
            ),
            mean_runtime_ms: mean(&runtimes).map_or_else(
                || Statistic::not_computable("no trials"),
                Statistic::Value,
            ),
        }
    }
}

/// Every per-length metric of the validation phase.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LengthSummary {
    pub length: usize,
    pub threshold: ThresholdEntry,
    pub baseline: AlgorithmSummary,
    pub elimination: AlgorithmSummary,
    /// FE success rate minus MC success rate.
    pub delta: Statistic<f64>,
    pub ratio: Ratio,
    /// (mean FE energy − mean MC energy) / pooled SD.
    pub cohens_d: Statistic<f64>,
    /// H1: MC energies are stochastically greater (worse) than FE.
    pub mann_whitney: Statistic<MannWhitney>,
    pub significant: Option<bool>,
}

impl LengthSummary {
    /// Summarises the trials of one length. Trials of other lengths in
    /// `trials` are ignored.
    pub fn from_trials(
        length: usize,
        trials: &[Trial],
        threshold: &ThresholdEntry,
        config: &StatisticsConfig,
    ) -> Self {
        let select = |algorithm: Algorithm| {
            trials
                .iter()
                .filter(|t| t.length == length && t.algorithm == algorithm)
                .collect::<Vec<_>>()
        };
        let mc_trials = select(Algorithm::Baseline);
        let fe_trials = select(Algorithm::Elimination);

        let mismatched = mc_trials
            .iter()
            .chain(&fe_trials)
            .filter(|t| matches!(t.success, Some(flag) if flag != threshold.is_success(t.final_energy)))
            .count();
        if mismatched > 0 {
            warn!(
                length,
                mismatched, "Recorded success flags disagree with the locked threshold."
            );
        }

        let baseline =
            AlgorithmSummary::from_trials(Algorithm::Baseline, &mc_trials, threshold, config.ci_level);
        let elimination = AlgorithmSummary::from_trials(
            Algorithm::Elimination,
            &fe_trials,
            threshold,
            config.ci_level,
        );

        let (delta, ratio) = match (baseline.success_rate.value(), elimination.success_rate.value()) {
            (Some(&mc), Some(&fe)) => (Statistic::Value(fe - mc), Ratio::of(fe, mc)),
            _ => (
                Statistic::not_computable("missing trials for one algorithm"),
                Ratio::Undefined,
            ),
        };

        let mc_energies = energies_of(&mc_trials);
        let fe_energies = energies_of(&fe_trials);
        let cohens_d = cohens_d(&fe_energies, &mc_energies);
        let mann_whitney = mann_whitney_greater(
            &raw_energies(&mc_trials),
            &raw_energies(&fe_trials),
        );
        let significant = mann_whitney
            .value()
            .map(|mw| mw.p_value < config.significance_level);

        for (name, reason) in [
            ("cohens_d", cohens_d.reason()),
            ("mann_whitney", mann_whitney.reason()),
        ] {
            if let Some(reason) = reason {
                warn!(length, statistic = name, reason, "Statistic is not computable.");
            }
        }

        Self {
            length,
            threshold: threshold.clone(),
            baseline,
            elimination,
            delta,
            ratio,
            cohens_d,
            mann_whitney,
            significant,
        }
    }
}

fn energies_of(trials: &[&Trial]) -> Vec<f64> {
    trials.iter().map(|t| t.final_energy as f64).collect()
}

fn raw_energies(trials: &[&Trial]) -> Vec<i32> {
    trials.iter().map(|t| t.final_energy).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::thresholds::ThresholdStatus;

    fn trial(algorithm: Algorithm, index: usize, energy: i32) -> Trial {
        Trial {
            length: 20,
            algorithm,
            trial_index: index,
            seed: index as u64,
            final_energy: energy,
            success: None,
            iterations: 1,
            runtime_ms: 2.0,
            paradox_activity: 0,
        }
    }

    fn threshold(energy: i32) -> ThresholdEntry {
        ThresholdEntry {
            length: 20,
            energy,
            status: ThresholdStatus::Calibrated,
        }
    }

    fn trials(mc: &[i32], fe: &[i32]) -> Vec<Trial> {
        mc.iter()
            .enumerate()
            .map(|(i, &e)| trial(Algorithm::Baseline, i, e))
            .chain(fe.iter().enumerate().map(|(i, &e)| trial(Algorithm::Elimination, i, e)))
            .collect()
    }

    #[test]
    fn ratio_markers() {
        assert_eq!(Ratio::of(0.5, 0.25), Ratio::Finite(2.0));
        assert_eq!(Ratio::of(0.3, 0.0), Ratio::Infinite);
        assert_eq!(Ratio::of(0.0, 0.0), Ratio::Undefined);
        assert_eq!(Ratio::Infinite.to_string(), "inf");
    }

    #[test]
    fn zero_baseline_successes_yield_infinite_ratio() {
        let set = trials(&[-3, -4, -2, -3], &[-9, -4, -8, -3]);
        let summary = LengthSummary::from_trials(20, &set, &threshold(-8), &StatisticsConfig::default());
        assert_eq!(summary.baseline.successes, 0);
        assert_eq!(summary.elimination.successes, 2);
        assert_eq!(summary.ratio, Ratio::Infinite);
        assert_eq!(summary.delta, Statistic::Value(0.5));
    }

    #[test]
    fn relaxing_the_threshold_never_lowers_success_rates() {
        let set = trials(&[-3, -7, -5, -6, -2, -8], &[-9, -4, -8, -6, -7, -10]);
        let config = StatisticsConfig::default();
        let mut previous = (0.0, 0.0);
        for e in -12..=0 {
            let s = LengthSummary::from_trials(20, &set, &threshold(e), &config);
            let rates = (
                *s.baseline.success_rate.value().unwrap(),
                *s.elimination.success_rate.value().unwrap(),
            );
            assert!(rates.0 >= previous.0 && rates.1 >= previous.1);
            previous = rates;
        }
        assert_eq!(previous, (1.0, 1.0));
    }

    #[test]
    fn degenerate_energies_are_marked_not_computable() {
        let set = trials(&[-3, -3, -3], &[-3, -3, -3]);
        let summary = LengthSummary::from_trials(20, &set, &threshold(-5), &StatisticsConfig::default());
        assert!(!summary.cohens_d.is_computable());
        assert!(!summary.mann_whitney.is_computable());
        assert_eq!(summary.significant, None);
        assert_eq!(summary.ratio, Ratio::Undefined);
    }

    #[test]
    fn missing_algorithm_leaves_delta_undefined() {
        let set = trials(&[-3, -4], &[]);
        let summary = LengthSummary::from_trials(20, &set, &threshold(-3), &StatisticsConfig::default());
        assert!(!summary.delta.is_computable());
        assert_eq!(summary.ratio, Ratio::Undefined);
        assert_eq!(summary.elimination.trials, 0);
    }

    #[test]
    fn better_elimination_energies_are_significant() {
        let mc: Vec<i32> = (0..30).map(|i| -2 - (i % 3)).collect();
        let fe: Vec<i32> = (0..30).map(|i| -7 - (i % 3)).collect();
        let set = trials(&mc, &fe);
        let summary = LengthSummary::from_trials(20, &set, &threshold(-7), &StatisticsConfig::default());
        assert_eq!(summary.significant, Some(true));
        assert!(*summary.cohens_d.value().unwrap() < 0.0);
    }
}

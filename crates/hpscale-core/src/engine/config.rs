use crate::core::models::sequence::SequenceError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Parameter '{name}' = {value} is out of range: expected {expected}")]
    OutOfRange {
        name: &'static str,
        value: f64,
        expected: &'static str,
    },

    #[error("Invalid instance: {0}")]
    InvalidSequence(#[from] SequenceError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InitStrategy {
    /// Extended chain along +x.
    #[default]
    Straight,
    /// Seeded self-avoiding random walk, drawn from the trial's stream. The
    /// elimination search uses it by default so its first population is
    /// diverse.
    RandomWalk,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BaselineConfig {
    pub max_steps: usize,
    pub temperature: f64,
    pub init: InitStrategy,
}

impl BaselineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.temperature.is_finite() && self.temperature > 0.0) {
            return Err(ConfigError::OutOfRange {
                name: "temperature",
                value: self.temperature,
                expected: "a finite value > 0",
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EliminationConfig {
    pub pop_size: usize,
    pub forget_rate: f64,
    pub max_gen: usize,
    pub paradox_retention_rate: f64,
    /// Probability that a refill slot is taken from the paradox buffer
    /// instead of a mutated survivor.
    pub reinsertion_rate: f64,
    pub init: InitStrategy,
}

impl EliminationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pop_size == 0 {
            return Err(ConfigError::OutOfRange {
                name: "pop_size",
                value: 0.0,
                expected: "at least 1",
            });
        }
        if !(self.forget_rate > 0.0 && self.forget_rate < 1.0) {
            return Err(ConfigError::OutOfRange {
                name: "forget_rate",
                value: self.forget_rate,
                expected: "a value in (0, 1)",
            });
        }
        check_probability("paradox_retention_rate", self.paradox_retention_rate)?;
        check_probability("reinsertion_rate", self.reinsertion_rate)?;
        Ok(())
    }

    /// Members removed per generation: `round(forget_rate * pop_size)`,
    /// capped so at least one survivor remains to breed from.
    pub fn cull_count(&self) -> usize {
        let raw = (self.forget_rate * self.pop_size as f64).round() as usize;
        raw.min(self.pop_size.saturating_sub(1))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThresholdCriterion {
    /// Best (lowest) pooled pilot energy.
    Minimum,
    /// Nearest-rank percentile of the pooled pilot energies, in (0, 100].
    Percentile(f64),
}

impl Default for ThresholdCriterion {
    fn default() -> Self {
        ThresholdCriterion::Minimum
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HarnessConfig {
    pub lengths: Vec<usize>,
    pub pilot_trials_per_length: usize,
    pub main_trials_per_length: usize,
    pub sequence_seed_base: u64,
    pub threshold_criterion: ThresholdCriterion,
}

impl HarnessConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lengths.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one chain length is required".to_string(),
            ));
        }
        if let Some(&bad) = self.lengths.iter().find(|&&l| l < 2) {
            return Err(ConfigError::OutOfRange {
                name: "lengths",
                value: bad as f64,
                expected: "every length >= 2",
            });
        }
        let mut sorted = self.lengths.clone();
        sorted.sort_unstable();
        sorted.dedup();
        if sorted.len() != self.lengths.len() {
            return Err(ConfigError::Invalid(
                "chain lengths must be unique".to_string(),
            ));
        }
        if self.pilot_trials_per_length == 0 {
            return Err(ConfigError::OutOfRange {
                name: "pilot_trials_per_length",
                value: 0.0,
                expected: "at least 1",
            });
        }
        if self.main_trials_per_length == 0 {
            return Err(ConfigError::OutOfRange {
                name: "main_trials_per_length",
                value: 0.0,
                expected: "at least 1",
            });
        }
        if let ThresholdCriterion::Percentile(p) = self.threshold_criterion {
            if !(p > 0.0 && p <= 100.0) {
                return Err(ConfigError::OutOfRange {
                    name: "threshold_criterion.percentile",
                    value: p,
                    expected: "a value in (0, 100]",
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatisticsConfig {
    pub significance_level: f64,
    pub ci_level: f64,
    pub permutation_count: usize,
    pub permutation_seed: u64,
}

impl StatisticsConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.significance_level > 0.0 && self.significance_level < 1.0) {
            return Err(ConfigError::OutOfRange {
                name: "significance_level",
                value: self.significance_level,
                expected: "a value in (0, 1)",
            });
        }
        if !(self.ci_level > 0.0 && self.ci_level < 1.0) {
            return Err(ConfigError::OutOfRange {
                name: "ci_level",
                value: self.ci_level,
                expected: "a value in (0, 1)",
            });
        }
        Ok(())
    }
}

impl Default for StatisticsConfig {
    fn default() -> Self {
        Self {
            significance_level: 0.05,
            ci_level: 0.95,
            permutation_count: 10_000,
            permutation_seed: 42,
        }
    }
}

/// The locked parameters of one study.
#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentConfig {
    pub baseline: BaselineConfig,
    pub elimination: EliminationConfig,
    pub harness: HarnessConfig,
    pub statistics: StatisticsConfig,
}

impl ExperimentConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.baseline.validate()?;
        self.elimination.validate()?;
        self.harness.validate()?;
        self.statistics.validate()
    }
}

fn check_probability(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            name,
            value,
            expected: "a probability in [0, 1]",
        })
    }
}

#[derive(Default)]
pub struct ExperimentConfigBuilder {
    max_steps: Option<usize>,
    temperature: Option<f64>,
    baseline_init: Option<InitStrategy>,
    pop_size: Option<usize>,
    forget_rate: Option<f64>,
    max_gen: Option<usize>,
    paradox_retention_rate: Option<f64>,
    reinsertion_rate: Option<f64>,
    elimination_init: Option<InitStrategy>,
    lengths: Option<Vec<usize>>,
    pilot_trials_per_length: Option<usize>,
    main_trials_per_length: Option<usize>,
    sequence_seed_base: Option<u64>,
    threshold_criterion: Option<ThresholdCriterion>,
    significance_level: Option<f64>,
    ci_level: Option<f64>,
    permutation_count: Option<usize>,
    permutation_seed: Option<u64>,
}

impl ExperimentConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_steps(mut self, steps: usize) -> Self {
        self.max_steps = Some(steps);
        self
    }
    pub fn temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }
    pub fn baseline_init(mut self, init: InitStrategy) -> Self {
        self.baseline_init = Some(init);
        self
    }
    pub fn pop_size(mut self, size: usize) -> Self {
        self.pop_size = Some(size);
        self
    }
    pub fn forget_rate(mut self, rate: f64) -> Self {
        self.forget_rate = Some(rate);
        self
    }
    pub fn max_gen(mut self, generations: usize) -> Self {
        self.max_gen = Some(generations);
        self
    }
    pub fn paradox_retention_rate(mut self, rate: f64) -> Self {
        self.paradox_retention_rate = Some(rate);
        self
    }
    pub fn reinsertion_rate(mut self, rate: f64) -> Self {
        self.reinsertion_rate = Some(rate);
        self
    }
    pub fn elimination_init(mut self, init: InitStrategy) -> Self {
        self.elimination_init = Some(init);
        self
    }
    pub fn lengths(mut self, lengths: Vec<usize>) -> Self {
        self.lengths = Some(lengths);
        self
    }
    pub fn pilot_trials_per_length(mut self, n: usize) -> Self {
        self.pilot_trials_per_length = Some(n);
        self
    }
    pub fn main_trials_per_length(mut self, n: usize) -> Self {
        self.main_trials_per_length = Some(n);
        self
    }
    pub fn sequence_seed_base(mut self, seed: u64) -> Self {
        self.sequence_seed_base = Some(seed);
        self
    }
    pub fn threshold_criterion(mut self, criterion: ThresholdCriterion) -> Self {
        self.threshold_criterion = Some(criterion);
        self
    }
    pub fn significance_level(mut self, alpha: f64) -> Self {
        self.significance_level = Some(alpha);
        self
    }
    pub fn ci_level(mut self, level: f64) -> Self {
        self.ci_level = Some(level);
        self
    }
    pub fn permutation_count(mut self, n: usize) -> Self {
        self.permutation_count = Some(n);
        self
    }
    pub fn permutation_seed(mut self, seed: u64) -> Self {
        self.permutation_seed = Some(seed);
        self
    }

    /// Assembles and validates the configuration. Search and harness
    /// parameters are required; statistics parameters fall back to the
    /// conventional 0.05 / 0.95 / 10 000 permutations / seed 42.
    pub fn build(self) -> Result<ExperimentConfig, ConfigError> {
        let stats_defaults = StatisticsConfig::default();
        let config = ExperimentConfig {
            baseline: BaselineConfig {
                max_steps: self
                    .max_steps
                    .ok_or(ConfigError::MissingParameter("max_steps"))?,
                temperature: self
                    .temperature
                    .ok_or(ConfigError::MissingParameter("temperature"))?,
                init: self.baseline_init.unwrap_or_default(),
            },
            elimination: EliminationConfig {
                pop_size: self
                    .pop_size
                    .ok_or(ConfigError::MissingParameter("pop_size"))?,
                forget_rate: self
                    .forget_rate
                    .ok_or(ConfigError::MissingParameter("forget_rate"))?,
                max_gen: self
                    .max_gen
                    .ok_or(ConfigError::MissingParameter("max_gen"))?,
                paradox_retention_rate: self
                    .paradox_retention_rate
                    .ok_or(ConfigError::MissingParameter("paradox_retention_rate"))?,
                reinsertion_rate: self.reinsertion_rate.unwrap_or(0.0),
                init: self
                    .elimination_init
                    .unwrap_or(InitStrategy::RandomWalk),
            },
            harness: HarnessConfig {
                lengths: self
                    .lengths
                    .ok_or(ConfigError::MissingParameter("lengths"))?,
                pilot_trials_per_length: self
                    .pilot_trials_per_length
                    .ok_or(ConfigError::MissingParameter("pilot_trials_per_length"))?,
                main_trials_per_length: self
                    .main_trials_per_length
                    .ok_or(ConfigError::MissingParameter("main_trials_per_length"))?,
                sequence_seed_base: self.sequence_seed_base.unwrap_or(1337),
                threshold_criterion: self.threshold_criterion.unwrap_or_default(),
            },
            statistics: StatisticsConfig {
                significance_level: self
                    .significance_level
                    .unwrap_or(stats_defaults.significance_level),
                ci_level: self.ci_level.unwrap_or(stats_defaults.ci_level),
                permutation_count: self
                    .permutation_count
                    .unwrap_or(stats_defaults.permutation_count),
                permutation_seed: self
                    .permutation_seed
                    .unwrap_or(stats_defaults.permutation_seed),
            },
        };
        config.validate()?;
        Ok(config)
    }
}

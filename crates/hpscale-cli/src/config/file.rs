use crate::error::{CliError, Result};
use hpscale::engine::config as core_config;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum FileInitStrategy {
    Straight,
    RandomWalk,
}

impl From<FileInitStrategy> for core_config::InitStrategy {
    fn from(p: FileInitStrategy) -> Self {
        match p {
            FileInitStrategy::Straight => core_config::InitStrategy::Straight,
            FileInitStrategy::RandomWalk => core_config::InitStrategy::RandomWalk,
        }
    }
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "kebab-case", tag = "type")]
pub enum FileThresholdCriterion {
    Minimum,
    Percentile { value: f64 },
}

impl From<FileThresholdCriterion> for core_config::ThresholdCriterion {
    fn from(p: FileThresholdCriterion) -> Self {
        match p {
            FileThresholdCriterion::Minimum => core_config::ThresholdCriterion::Minimum,
            FileThresholdCriterion::Percentile { value } => {
                core_config::ThresholdCriterion::Percentile(value)
            }
        }
    }
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileBaselineConfig {
    pub max_steps: Option<usize>,
    pub temperature: Option<f64>,
    pub init: Option<FileInitStrategy>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileEliminationConfig {
    pub pop_size: Option<usize>,
    pub forget_rate: Option<f64>,
    pub max_gen: Option<usize>,
    pub paradox_retention_rate: Option<f64>,
    pub reinsertion_rate: Option<f64>,
    pub init: Option<FileInitStrategy>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileStatisticsConfig {
    pub significance_level: Option<f64>,
    pub ci_level: Option<f64>,
    pub permutation_count: Option<usize>,
    pub permutation_seed: Option<u64>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileInstance {
    pub sequence: String,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConfig {
    pub lengths: Option<Vec<usize>>,
    pub pilot_trials_per_length: Option<usize>,
    pub main_trials_per_length: Option<usize>,
    pub sequence_seed_base: Option<u64>,
    pub threshold_criterion: Option<FileThresholdCriterion>,
    pub baseline: Option<FileBaselineConfig>,
    pub elimination: Option<FileEliminationConfig>,
    pub statistics: Option<FileStatisticsConfig>,
    #[serde(default)]
    pub instances: Vec<FileInstance>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading study configuration from {:?}", path);
        let content = std::fs::read_to_string(path).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
        Self::from_toml_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

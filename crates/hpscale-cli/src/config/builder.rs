use super::defaults::DefaultsConfig;
use super::file::{FileConfig, FileInitStrategy, FileThresholdCriterion};
use super::models::AppConfig;
use crate::cli::StudyArgs;
use crate::error::{CliError, Result};
use hpscale::core::io::layout::ResultsLayout;
use hpscale::core::models::instance::InstanceSet;
use hpscale::core::models::sequence::Sequence;
use hpscale::engine::config::{self as core_config, ConfigError};
use std::str::FromStr;
use tracing::{debug, warn};

pub fn build_config(args: &StudyArgs) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };

    let file_config = apply_set_values(file_config, &args.set_values)?;

    let lengths = if args.lengths.is_empty() {
        file_config.lengths.clone().unwrap_or(defaults.lengths)
    } else {
        args.lengths.clone()
    };
    let pilot_trials = args
        .pilot_trials
        .or(file_config.pilot_trials_per_length)
        .unwrap_or(defaults.pilot_trials_per_length);
    let main_trials = args
        .main_trials
        .or(file_config.main_trials_per_length)
        .unwrap_or(defaults.main_trials_per_length);

    let baseline = file_config.baseline.clone().unwrap_or_default();
    let elimination = file_config.elimination.clone().unwrap_or_default();
    let statistics = file_config.statistics.clone().unwrap_or_default();
    let statistics_defaults = core_config::StatisticsConfig::default();

    let mut builder = core_config::ExperimentConfigBuilder::new()
        .max_steps(baseline.max_steps.unwrap_or(defaults.max_steps))
        .temperature(baseline.temperature.unwrap_or(defaults.temperature))
        .pop_size(elimination.pop_size.unwrap_or(defaults.pop_size))
        .forget_rate(elimination.forget_rate.unwrap_or(defaults.forget_rate))
        .max_gen(elimination.max_gen.unwrap_or(defaults.max_gen))
        .paradox_retention_rate(
            elimination
                .paradox_retention_rate
                .unwrap_or(defaults.paradox_retention_rate),
        )
        .lengths(lengths.clone())
        .pilot_trials_per_length(pilot_trials)
        .main_trials_per_length(main_trials)
        .significance_level(
            statistics
                .significance_level
                .unwrap_or(statistics_defaults.significance_level),
        )
        .ci_level(statistics.ci_level.unwrap_or(statistics_defaults.ci_level))
        .permutation_count(
            statistics
                .permutation_count
                .unwrap_or(statistics_defaults.permutation_count),
        )
        .permutation_seed(
            statistics
                .permutation_seed
                .unwrap_or(statistics_defaults.permutation_seed),
        );
    if let Some(rate) = elimination.reinsertion_rate {
        builder = builder.reinsertion_rate(rate);
    }
    if let Some(init) = baseline.init {
        builder = builder.baseline_init(init.into());
    }
    if let Some(init) = elimination.init {
        builder = builder.elimination_init(init.into());
    }
    if let Some(seed) = file_config.sequence_seed_base {
        builder = builder.sequence_seed_base(seed);
    }
    if let Some(criterion) = file_config.threshold_criterion {
        builder = builder.threshold_criterion(criterion.into());
    }
    let experiment = builder.build()?;

    let explicit = file_config
        .instances
        .iter()
        .map(|instance| Sequence::parse(&instance.sequence))
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(ConfigError::from)?;
    let lengths_from_flags = !args.lengths.is_empty();
    for sequence in explicit.iter().filter(|s| !lengths.contains(&s.len())) {
        if lengths_from_flags {
            debug!(
                length = sequence.len(),
                "Configured instance is outside the lengths selected with -L and will be ignored."
            );
        } else {
            warn!(
                length = sequence.len(),
                "Configured instance is outside the selected lengths and will be ignored."
            );
        }
    }
    let instances = InstanceSet::resolve(
        &experiment.harness.lengths,
        &explicit,
        experiment.harness.sequence_seed_base,
    )
    .map_err(ConfigError::from)?;

    Ok(AppConfig {
        experiment,
        instances,
        layout: ResultsLayout::new(args.output.clone()),
    })
}

fn parse_value<T: FromStr>(key: &str, value: &str, kind: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value)))
}

fn parse_init(key: &str, value: &str) -> Result<FileInitStrategy> {
    match value.trim() {
        "straight" => Ok(FileInitStrategy::Straight),
        "random-walk" => Ok(FileInitStrategy::RandomWalk),
        _ => Err(CliError::Config(format!(
            "Invalid value for {}: '{}'. Expected 'straight' or 'random-walk'.",
            key, value
        ))),
    }
}

/// `minimum` or `percentile:<value>`.
fn parse_criterion(key: &str, value: &str) -> Result<FileThresholdCriterion> {
    let value = value.trim();
    if value == "minimum" {
        return Ok(FileThresholdCriterion::Minimum);
    }
    match value.split_once(':') {
        Some(("percentile", pct)) => Ok(FileThresholdCriterion::Percentile {
            value: parse_value(key, pct, "float")?,
        }),
        _ => Err(CliError::Config(format!(
            "Invalid value for {}: '{}'. Expected 'minimum' or 'percentile:<value>'.",
            key, value
        ))),
    }
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };
        let key = key.trim();

        match key {
            "lengths" => {
                config.lengths = Some(
                    value_str
                        .split(',')
                        .map(|l| parse_value(key, l, "integer"))
                        .collect::<Result<Vec<usize>>>()?,
                );
            }
            "pilot-trials-per-length" => {
                config.pilot_trials_per_length = Some(parse_value(key, value_str, "integer")?);
            }
            "main-trials-per-length" => {
                config.main_trials_per_length = Some(parse_value(key, value_str, "integer")?);
            }
            "sequence-seed-base" => {
                config.sequence_seed_base = Some(parse_value(key, value_str, "integer")?);
            }
            "threshold-criterion" => {
                config.threshold_criterion = Some(parse_criterion(key, value_str)?);
            }
            "baseline.max-steps" => {
                config.baseline.get_or_insert_with(Default::default).max_steps =
                    Some(parse_value(key, value_str, "integer")?);
            }
            "baseline.temperature" => {
                config.baseline.get_or_insert_with(Default::default).temperature =
                    Some(parse_value(key, value_str, "float")?);
            }
            "baseline.init" => {
                config.baseline.get_or_insert_with(Default::default).init =
                    Some(parse_init(key, value_str)?);
            }
            "elimination.pop-size" => {
                config.elimination.get_or_insert_with(Default::default).pop_size =
                    Some(parse_value(key, value_str, "integer")?);
            }
            "elimination.forget-rate" => {
                config.elimination.get_or_insert_with(Default::default).forget_rate =
                    Some(parse_value(key, value_str, "float")?);
            }
            "elimination.max-gen" => {
                config.elimination.get_or_insert_with(Default::default).max_gen =
                    Some(parse_value(key, value_str, "integer")?);
            }
            "elimination.paradox-retention-rate" => {
                config
                    .elimination
                    .get_or_insert_with(Default::default)
                    .paradox_retention_rate = Some(parse_value(key, value_str, "float")?);
            }
            "elimination.reinsertion-rate" => {
                config
                    .elimination
                    .get_or_insert_with(Default::default)
                    .reinsertion_rate = Some(parse_value(key, value_str, "float")?);
            }
            "elimination.init" => {
                config.elimination.get_or_insert_with(Default::default).init =
                    Some(parse_init(key, value_str)?);
            }
            "statistics.significance-level" => {
                config
                    .statistics
                    .get_or_insert_with(Default::default)
                    .significance_level = Some(parse_value(key, value_str, "float")?);
            }
            "statistics.ci-level" => {
                config.statistics.get_or_insert_with(Default::default).ci_level =
                    Some(parse_value(key, value_str, "float")?);
            }
            "statistics.permutation-count" => {
                config
                    .statistics
                    .get_or_insert_with(Default::default)
                    .permutation_count = Some(parse_value(key, value_str, "integer")?);
            }
            "statistics.permutation-seed" => {
                config
                    .statistics
                    .get_or_insert_with(Default::default)
                    .permutation_seed = Some(parse_value(key, value_str, "integer")?);
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hpscale::core::models::sequence::SequenceError;
    use hpscale::engine::config::{InitStrategy, ThresholdCriterion};
    use hpscale::engine::error::EngineError;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn base_args() -> StudyArgs {
        StudyArgs {
            output: PathBuf::from("results"),
            ..Default::default()
        }
    }

    #[test]
    fn defaults_reproduce_locked_parameters() {
        let app = build_config(&base_args()).expect("build ok");
        let cfg = app.experiment;
        assert_eq!(cfg.baseline.max_steps, 10_000);
        assert_eq!(cfg.baseline.temperature, 1.0);
        assert_eq!(cfg.elimination.pop_size, 50);
        assert_eq!(cfg.elimination.forget_rate, 0.3);
        assert_eq!(cfg.elimination.max_gen, 100);
        assert_eq!(cfg.elimination.paradox_retention_rate, 0.1);
        assert_eq!(cfg.elimination.init, InitStrategy::RandomWalk);
        assert_eq!(cfg.harness.pilot_trials_per_length, 200);
        assert_eq!(cfg.harness.main_trials_per_length, 2000);
        assert_eq!(cfg.harness.sequence_seed_base, 1337);
        assert_eq!(app.instances.lengths(), cfg.harness.lengths);
        assert_eq!(app.layout.root(), PathBuf::from("results").as_path());
    }

    #[test]
    fn file_values_and_instances_are_used() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("study.toml");
        fs::write(
            &path,
            r#"
lengths = [20, 24]
threshold-criterion = { type = "percentile", value = 5.0 }

[baseline]
max-steps = 500

[[instances]]
sequence = "HPHPPHHPHPPHPHHPPHPH"
"#,
        )
        .unwrap();

        let mut args = base_args();
        args.config = Some(path);
        let app = build_config(&args).unwrap();
        assert_eq!(app.experiment.harness.lengths, vec![20, 24]);
        assert_eq!(app.experiment.baseline.max_steps, 500);
        assert_eq!(
            app.experiment.harness.threshold_criterion,
            ThresholdCriterion::Percentile(5.0)
        );
        assert_eq!(
            app.instances.get(20).unwrap().to_string(),
            "HPHPPHHPHPPHPHHPPHPH"
        );
        assert_eq!(app.instances.get(24).map(Sequence::len), Some(24));
    }

    #[test]
    fn cli_flags_override_set_values_and_file() {
        let mut args = base_args();
        args.set_values = vec![
            "pilot-trials-per-length=7".to_string(),
            "lengths=10,12,14".to_string(),
            "elimination.pop-size=12".to_string(),
            "threshold-criterion=percentile:25".to_string(),
        ];
        args.pilot_trials = Some(3);
        args.lengths = vec![12];
        let app = build_config(&args).unwrap();
        let harness = &app.experiment.harness;
        assert_eq!(harness.pilot_trials_per_length, 3);
        assert_eq!(harness.lengths, vec![12]);
        assert_eq!(harness.threshold_criterion, ThresholdCriterion::Percentile(25.0));
        assert_eq!(app.experiment.elimination.pop_size, 12);
    }

    #[test]
    fn unsupported_set_key_is_a_config_error() {
        let mut args = base_args();
        args.set_values = vec!["elimination.mutation-rate=0.1".to_string()];
        let err = build_config(&args).err().unwrap();
        assert!(matches!(err, CliError::Config(_)));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn malformed_set_pair_is_rejected() {
        let mut args = base_args();
        args.set_values = vec!["baseline.max-steps".to_string()];
        assert!(matches!(build_config(&args), Err(CliError::Config(_))));
    }

    #[test]
    fn out_of_range_parameter_exits_with_two() {
        let mut args = base_args();
        args.set_values = vec!["elimination.forget-rate=1.5".to_string()];
        let err = build_config(&args).err().unwrap();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn duplicate_instance_lengths_exit_with_two() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("study.toml");
        fs::write(
            &path,
            "lengths = [5]\n[[instances]]\nsequence = \"HHHHH\"\n[[instances]]\nsequence = \"PPPPP\"\n",
        )
        .unwrap();
        let mut args = base_args();
        args.config = Some(path);
        let err = build_config(&args).err().unwrap();
        assert!(matches!(
            err,
            CliError::Core(EngineError::Config(ConfigError::InvalidSequence(
                SequenceError::DuplicateLength { length: 5 }
            )))
        ));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn invalid_monomer_exits_with_two() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("study.toml");
        fs::write(&path, "lengths = [4]\n[[instances]]\nsequence = \"HPXH\"\n").unwrap();
        let mut args = base_args();
        args.config = Some(path);
        let err = build_config(&args).err().unwrap();
        assert_eq!(err.exit_code(), 2);
    }
}

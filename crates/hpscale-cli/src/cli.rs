use clap::{Args, Parser, Subcommand, ValueEnum};
use hpscale::core::models::trial::Phase;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "HP-Scale CLI - Runs the two-phase HP lattice folding scaling study: pilot calibration, locked validation, and statistical analysis.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for parallel trials.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Phase A: run pilot trials, calibrate E*(L) and lock the threshold table.
    Pilot(StudyArgs),
    /// Phase B: run validation trials against the locked thresholds.
    Validate(StudyArgs),
    /// Compute per-length statistics and the scaling trend from trial logs.
    Analyze(AnalyzeArgs),
    /// Run pilot, validation and analysis back to back.
    Run(StudyArgs),
}

/// Arguments shared by every study subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct StudyArgs {
    /// Path to the study configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory holding instances, thresholds, trial logs and reports.
    #[arg(short, long, value_name = "DIR", default_value = "results")]
    pub output: PathBuf,

    /// Restrict the study to these chain lengths. Can be used multiple times.
    #[arg(short = 'L', long = "length", value_name = "INT")]
    pub lengths: Vec<usize>,

    /// Override the number of pilot trials per algorithm and length.
    #[arg(long, value_name = "INT")]
    pub pilot_trials: Option<usize>,

    /// Override the number of validation trials per algorithm and length.
    #[arg(long, value_name = "INT")]
    pub main_trials: Option<usize>,

    /// Recalibrate even if a locked threshold table already exists.
    #[arg(long)]
    pub force: bool,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S elimination.pop-size=80
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub study: StudyArgs,

    /// Which phase's trial logs to analyse.
    #[arg(long, value_enum, default_value_t = PhaseArg::B)]
    pub phase: PhaseArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PhaseArg {
    /// Pilot trials.
    A,
    /// Validation trials.
    #[default]
    B,
}

impl From<PhaseArg> for Phase {
    fn from(arg: PhaseArg) -> Self {
        match arg {
            PhaseArg::A => Phase::Pilot,
            PhaseArg::B => Phase::Validation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::parse_from(["hpscale", "pilot", "-vv", "-j", "4", "-c", "study.toml"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.threads, Some(4));
        let Commands::Pilot(args) = cli.command else {
            panic!("expected pilot subcommand");
        };
        assert_eq!(args.config, Some(PathBuf::from("study.toml")));
        assert_eq!(args.output, PathBuf::from("results"));
        assert!(!args.force);
    }

    #[test]
    fn repeated_lengths_and_set_values_accumulate() {
        let cli = Cli::parse_from([
            "hpscale",
            "run",
            "-L",
            "20",
            "--length",
            "30",
            "-S",
            "baseline.max-steps=500",
            "-S",
            "statistics.permutation-count=100",
        ]);
        let Commands::Run(args) = cli.command else {
            panic!("expected run subcommand");
        };
        assert_eq!(args.lengths, vec![20, 30]);
        assert_eq!(args.set_values.len(), 2);
    }

    #[test]
    fn analyze_defaults_to_validation_logs() {
        let cli = Cli::parse_from(["hpscale", "analyze", "-o", "out"]);
        let Commands::Analyze(args) = cli.command else {
            panic!("expected analyze subcommand");
        };
        assert_eq!(Phase::from(args.phase), Phase::Validation);
        assert_eq!(args.study.output, PathBuf::from("out"));

        let cli = Cli::parse_from(["hpscale", "analyze", "--phase", "a"]);
        let Commands::Analyze(args) = cli.command else {
            panic!("expected analyze subcommand");
        };
        assert_eq!(Phase::from(args.phase), Phase::Pilot);
        assert!(Cli::try_parse_from(["hpscale", "analyze", "--phase", "c"]).is_err());
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["hpscale", "analyze", "-q", "-v"]);
        assert!(result.is_err());
    }
}

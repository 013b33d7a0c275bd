use super::{analyze, pilot, validate};
use crate::cli::StudyArgs;
use crate::config::build_config;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use hpscale::core::models::trial::Phase;
use tracing::info;

/// Pilot, validation and analysis against one resolved configuration.
pub fn run(args: StudyArgs, progress: &CliProgressHandler) -> Result<()> {
    let app = build_config(&args)?;

    info!("Phase A: pilot calibration.");
    let thresholds = pilot::execute(&app, args.force, progress)?;

    info!("Phase B: validation against locked thresholds.");
    validate::execute(&app, &thresholds, progress)?;

    info!("Analysis of validation trials.");
    analyze::execute(&app, Phase::Validation, progress)
}

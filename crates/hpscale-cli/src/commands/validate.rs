use crate::cli::StudyArgs;
use crate::config::{AppConfig, build_config};
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use crate::utils::table::render_success_counts;
use hpscale::core::models::thresholds::ThresholdTable;
use hpscale::engine::progress::ProgressReporter;
use hpscale::workflows;
use tracing::info;

pub fn run(args: StudyArgs, progress: &CliProgressHandler) -> Result<()> {
    let app = build_config(&args)?;
    let thresholds = workflows::validate::load_thresholds(&app.layout)?;
    execute(&app, &thresholds, progress)
}

pub fn execute(app: &AppConfig, thresholds: &ThresholdTable, progress: &CliProgressHandler) -> Result<()> {
    let reporter = ProgressReporter::with_callback(progress.get_callback());
    println!(
        "Starting validation phase: {} length(s), {} trial(s) per algorithm...",
        app.experiment.harness.lengths.len(),
        app.experiment.harness.main_trials_per_length
    );
    info!("Invoking the core validation workflow...");
    let result = workflows::validate::run(
        &app.experiment,
        &app.instances,
        thresholds,
        &app.layout,
        &reporter,
    )?;
    info!(trials = result.trials.len(), "Validation workflow finished.");

    println!("✓ Validation logs written to {}:", app.layout.root().display());
    print!("{}", render_success_counts(&result.counts));
    Ok(())
}

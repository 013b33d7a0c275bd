use crate::cli::StudyArgs;
use crate::config::{AppConfig, build_config};
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use crate::utils::table::render_thresholds;
use hpscale::core::models::thresholds::ThresholdTable;
use hpscale::engine::progress::ProgressReporter;
use hpscale::workflows;
use tracing::{info, warn};

pub fn run(args: StudyArgs, progress: &CliProgressHandler) -> Result<()> {
    let app = build_config(&args)?;
    execute(&app, args.force, progress)?;
    Ok(())
}

/// Calibrates and locks the thresholds of `app`.
///
/// A locked table that already covers every selected length is reused. One
/// that covers only some of them is extended: the missing lengths are
/// calibrated and every existing entry is kept unchanged. `force` discards
/// the existing table and recalibrates every selected length.
pub fn execute(app: &AppConfig, force: bool, progress: &CliProgressHandler) -> Result<ThresholdTable> {
    let lengths = &app.experiment.harness.lengths;
    let thresholds_path = app.layout.thresholds_path();

    let existing = if thresholds_path.exists() && !force {
        let existing = workflows::validate::load_thresholds(&app.layout)?;
        if existing.ensure_covers(lengths).is_ok() {
            warn!(
                "Thresholds in {:?} are already locked; skipping the pilot phase.",
                &thresholds_path
            );
            println!("Thresholds already locked in {}:", thresholds_path.display());
            print!("{}", render_thresholds(&existing));
            return Ok(existing);
        }
        info!(
            kept = existing.len(),
            "Locked thresholds cover only some lengths; calibrating the rest."
        );
        existing
    } else {
        if force && thresholds_path.exists() {
            warn!("--force given; recalibrating every selected length.");
        }
        ThresholdTable::new()
    };

    let pending = lengths.iter().filter(|&&l| existing.get(l).is_none()).count();
    let reporter = ProgressReporter::with_callback(progress.get_callback());
    println!(
        "Starting pilot phase: {} length(s), {} trial(s) per algorithm...",
        pending,
        app.experiment.harness.pilot_trials_per_length
    );
    info!("Invoking the core pilot workflow...");
    let result = workflows::pilot::extend(
        &app.experiment,
        &app.instances,
        &existing,
        &app.layout,
        &reporter,
    )?;
    info!(
        calibrated = ?result.calibrated,
        trials = result.trials.len(),
        "Pilot workflow finished."
    );

    println!("✓ Thresholds locked in {}:", thresholds_path.display());
    print!("{}", render_thresholds(&result.thresholds));
    Ok(result.thresholds)
}

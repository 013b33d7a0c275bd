use crate::cli::AnalyzeArgs;
use crate::config::{AppConfig, build_config};
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use crate::utils::table::render_scaling;
use hpscale::core::models::trial::Phase;
use hpscale::engine::progress::ProgressReporter;
use hpscale::workflows;
use tracing::info;

pub fn run(args: AnalyzeArgs, progress: &CliProgressHandler) -> Result<()> {
    let app = build_config(&args.study)?;
    execute(&app, args.phase.into(), progress)
}

pub fn execute(app: &AppConfig, phase: Phase, progress: &CliProgressHandler) -> Result<()> {
    let reporter = ProgressReporter::with_callback(progress.get_callback());
    info!(phase = phase.label(), "Invoking the core analysis workflow...");
    let result = workflows::analyze::run(
        &app.experiment.statistics,
        phase,
        &app.experiment.harness.lengths,
        &app.layout,
        &reporter,
    )?;

    print!("{}", render_scaling(&result.summaries, &result.trend));
    println!(
        "✓ Reports written to {} and {}",
        app.layout.scaling_table_path(phase).display(),
        app.layout.summary_path(phase).display()
    );
    Ok(())
}

use crate::error::{CliError, Result};
use std::fs::File;
use std::path::Path;
use tracing::Subscriber;
use tracing_subscriber::{
    Layer, filter::LevelFilter, fmt, prelude::*, registry::LookupSpan,
};

/// Console level for the global `-v`/`-q` flags. Warnings are shown by default.
pub fn console_level(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::OFF;
    }
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// The `--log-file` record keeps per-length debug detail (log row counts,
/// calibrated thresholds) even when the console is quiet.
pub fn file_level(verbosity: u8) -> LevelFilter {
    console_level(verbosity, false).max(LevelFilter::DEBUG)
}

fn console_layer<S>() -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
}

fn file_layer<S>(path: &Path) -> Result<impl Layer<S>>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let file = File::create(path)?;
    Ok(fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_thread_ids(true)
        .with_target(true))
}

/// Installs the global subscriber: stderr at the console level, plus an
/// optional plain-text file with its own, more detailed level.
pub fn setup_logging(verbosity: u8, quiet: bool, log_file: Option<&Path>) -> Result<()> {
    let file = log_file
        .map(|path| file_layer(path).map(|layer| layer.with_filter(file_level(verbosity))))
        .transpose()?;

    tracing_subscriber::registry()
        .with(console_layer().with_filter(console_level(verbosity, quiet)))
        .with(file)
        .try_init()
        .map_err(|e| CliError::Other(anyhow::anyhow!("Failed to install logger: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::sync::Once;
    use tracing::{debug, trace};

    static INIT: Once = Once::new();

    #[test]
    fn console_follows_verbosity_flags() {
        assert_eq!(console_level(0, false), LevelFilter::WARN);
        assert_eq!(console_level(1, false), LevelFilter::INFO);
        assert_eq!(console_level(2, false), LevelFilter::DEBUG);
        assert_eq!(console_level(9, false), LevelFilter::TRACE);
        assert_eq!(console_level(2, true), LevelFilter::OFF);
    }

    #[test]
    fn file_level_never_drops_below_debug() {
        assert_eq!(file_level(0), LevelFilter::DEBUG);
        assert_eq!(file_level(2), LevelFilter::DEBUG);
        assert_eq!(file_level(3), LevelFilter::TRACE);
    }

    #[test]
    #[serial]
    fn study_log_keeps_debug_detail_with_thread_ids() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("study.log");
        let subscriber =
            tracing_subscriber::registry().with(file_layer(&path).unwrap().with_filter(file_level(0)));

        tracing::subscriber::with_default(subscriber, || {
            debug!(length = 20, rows = 400, "Pilot log written.");
            trace!("Metropolis step accepted.");
        });

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("Pilot log written."));
        assert!(content.contains("rows=400"));
        assert!(content.contains("ThreadId"));
        assert!(!content.contains("Metropolis step accepted."));
    }

    #[test]
    #[serial]
    fn unwritable_log_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = setup_logging(0, false, Some(dir.path()));
        assert!(matches!(result, Err(CliError::Io(_))));
    }

    #[test]
    #[serial]
    fn second_installation_is_reported() {
        INIT.call_once(|| {
            let _ = setup_logging(0, true, None);
        });
        let result = setup_logging(1, false, None);
        assert!(matches!(result, Err(CliError::Other(_))));
    }
}

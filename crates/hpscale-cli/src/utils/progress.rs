use hpscale::engine::progress::{Progress, ProgressCallback};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressState, ProgressStyle};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

const SPINNER_TICK_MS: u64 = 80;

/// Renders core progress events as one reusable indicatif bar: a spinner
/// while a phase sets up, a trial counter once its batch starts.
#[derive(Clone)]
pub struct CliProgressHandler {
    pb: Arc<Mutex<ProgressBar>>,
}

impl CliProgressHandler {
    pub fn new(visible: bool) -> Self {
        let target = if visible {
            ProgressDrawTarget::stderr()
        } else {
            ProgressDrawTarget::hidden()
        };
        let pb = ProgressBar::with_draw_target(Some(0), target)
            .with_style(Self::spinner_style())
            .with_message("Waiting for trials...");
        pb.finish_and_clear();

        Self {
            pb: Arc::new(Mutex::new(pb)),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let pb_clone = self.pb.clone();

        Box::new(move |progress: Progress| {
            let Ok(mut pb_guard) = pb_clone.lock() else {
                warn!("Progress bar mutex was poisoned. Cannot update progress.");
                return;
            };

            match progress {
                Progress::PhaseStart { name } => {
                    pb_guard.reset();
                    pb_guard.set_length(0);
                    pb_guard.set_style(Self::spinner_style());
                    pb_guard.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
                    pb_guard.set_message(name.to_string());
                }
                Progress::TaskStart { total_steps } => {
                    pb_guard.disable_steady_tick();
                    pb_guard.set_length(total_steps);
                    pb_guard.set_position(0);
                    pb_guard.set_style(Self::trial_style());
                }
                Progress::TaskIncrement => pb_guard.inc(1),
                Progress::TaskFinish => {
                    let total = pb_guard.length().unwrap_or(0);
                    if pb_guard.position() < total {
                        pb_guard.set_position(total);
                    }
                }
                Progress::PhaseFinish => {
                    pb_guard.disable_steady_tick();
                    let phase = pb_guard.message();
                    pb_guard.finish_with_message(format!("✓ {phase} done"));
                }
                Progress::Message(msg) => pb_guard.set_message(msg),
            }
        })
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn trial_style() -> ProgressStyle {
        ProgressStyle::with_template("{msg:<24} [{bar:40.cyan/blue}] {pos}/{len} trials ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .with_key(
                "eta",
                |state: &ProgressState, w: &mut dyn std::fmt::Write| {
                    let _ = write!(w, "{:.1}s", state.eta().as_secs_f64());
                },
            )
            .progress_chars("##-")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn handler_initializes_in_a_clean_state() {
        let handler = CliProgressHandler::new(false);
        let pb = handler.pb.lock().unwrap();
        assert_eq!(pb.length(), Some(0));
        assert!(pb.is_finished());
    }

    #[test]
    fn callback_tracks_a_trial_batch() {
        let handler = CliProgressHandler::new(false);
        let callback = handler.get_callback();

        callback(Progress::PhaseStart { name: "Pilot" });
        {
            let pb = handler.pb.lock().unwrap();
            assert_eq!(pb.message(), "Pilot");
            assert!(!pb.is_finished());
        }

        callback(Progress::TaskStart { total_steps: 40 });
        callback(Progress::Message("Pilot L=20".to_string()));
        for _ in 0..3 {
            callback(Progress::TaskIncrement);
        }
        {
            let pb = handler.pb.lock().unwrap();
            assert_eq!(pb.length(), Some(40));
            assert_eq!(pb.position(), 3);
            assert_eq!(pb.message(), "Pilot L=20");
        }

        callback(Progress::TaskFinish);
        assert_eq!(handler.pb.lock().unwrap().position(), 40);

        callback(Progress::PhaseFinish);
        let pb = handler.pb.lock().unwrap();
        assert!(pb.is_finished());
        assert_eq!(pb.message(), "✓ Pilot L=20 done");
    }

    #[test]
    fn callback_is_thread_safe() {
        let handler = CliProgressHandler::new(false);
        let callback = handler.get_callback();

        thread::spawn(move || {
            callback(Progress::PhaseStart { name: "Validation" });
            callback(Progress::TaskIncrement);
            callback(Progress::PhaseFinish);
        })
        .join()
        .unwrap();

        let pb = handler.pb.lock().unwrap();
        assert!(pb.is_finished());
        assert_eq!(pb.message(), "✓ Validation done");
    }
}

use super::error::IoError;
use crate::core::models::trial::Trial;

/// Destination for completed trial records.
///
/// Records arrive in deterministic order and are never revisited, so an
/// implementor may append them to durable storage immediately.
pub trait TrialSink {
    /// Appends one completed trial.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be persisted.
    fn record(&mut self, trial: &Trial) -> Result<(), IoError>;

    /// Makes every recorded trial durable. The default does nothing.
    fn flush(&mut self) -> Result<(), IoError> {
        Ok(())
    }
}

impl TrialSink for Vec<Trial> {
    fn record(&mut self, trial: &Trial) -> Result<(), IoError> {
        self.push(trial.clone());
        Ok(())
    }
}

impl<S: TrialSink + ?Sized> TrialSink for &mut S {
    fn record(&mut self, trial: &Trial) -> Result<(), IoError> {
        (**self).record(trial)
    }

    fn flush(&mut self) -> Result<(), IoError> {
        (**self).flush()
    }
}

/// Forwards every record to two sinks, first `.0` then `.1`.
pub struct Tee<A, B>(pub A, pub B);

impl<A: TrialSink, B: TrialSink> TrialSink for Tee<A, B> {
    fn record(&mut self, trial: &Trial) -> Result<(), IoError> {
        self.0.record(trial)?;
        self.1.record(trial)
    }

    fn flush(&mut self) -> Result<(), IoError> {
        self.0.flush()?;
        self.1.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::trial::Algorithm;

    fn trial(index: usize) -> Trial {
        Trial {
            length: 8,
            algorithm: Algorithm::Baseline,
            trial_index: index,
            seed: 1,
            final_energy: -2,
            success: None,
            iterations: 10,
            runtime_ms: 0.5,
            paradox_activity: 0,
        }
    }

    #[test]
    fn tee_forwards_to_both_sinks() {
        let mut left: Vec<Trial> = Vec::new();
        let mut right: Vec<Trial> = Vec::new();
        let mut tee = Tee(&mut left, &mut right);
        tee.record(&trial(0)).unwrap();
        tee.record(&trial(1)).unwrap();
        tee.flush().unwrap();
        assert_eq!(left.len(), 2);
        assert_eq!(left, right);
    }
}

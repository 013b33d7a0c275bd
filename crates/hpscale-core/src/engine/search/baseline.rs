use super::{SearchObserver, SearchOutcome, initial_conformation};
use crate::core::lattice::{MoveSet, energy};
use crate::core::models::sequence::Sequence;
use crate::engine::config::{BaselineConfig, ConfigError};
use rand::Rng;
use tracing::{debug, instrument};

/// Fixed-temperature Metropolis search over local moves.
///
/// Runs exactly `max_steps` proposals. A proposal that lowers or keeps the
/// energy is always accepted; a worse one with probability `exp(-ΔE / T)`.
/// A chain with no movable residue spends the step on a null move.
#[instrument(skip_all, name = "baseline_search", fields(length = sequence.len()))]
pub fn run<R, O>(
    sequence: &Sequence,
    config: &BaselineConfig,
    rng: &mut R,
    mut observer: O,
) -> Result<SearchOutcome, ConfigError>
where
    R: Rng + ?Sized,
    O: SearchObserver,
{
    config.validate()?;

    let mut current = initial_conformation(sequence, config.init, rng);
    let mut current_energy = energy(sequence, &current);
    observer.on_move(&current);

    let mut best_energy = current_energy;
    let mut best_conformation = current.clone();
    let mut accepted_moves = 0;

    for step in 0..config.max_steps {
        let proposal = MoveSet::new(&current).propose(rng);
        if let Some(candidate) = proposal {
            let candidate_energy = energy(sequence, &candidate);
            let delta_e = (candidate_energy - current_energy) as f64;
            if delta_e <= 0.0 || rng.r#gen::<f64>() < (-delta_e / config.temperature).exp() {
                current = candidate;
                current_energy = candidate_energy;
                accepted_moves += 1;
                observer.on_move(&current);

                if current_energy < best_energy {
                    best_energy = current_energy;
                    best_conformation = current.clone();
                }
            }
        }
        observer.on_iteration(step, best_energy);
    }

    debug!(best_energy, accepted_moves, "Baseline search finished.");
    Ok(SearchOutcome {
        best_energy,
        best_conformation,
        iterations: config.max_steps,
        accepted_moves,
        paradox_retained: 0,
        paradox_reinserted: 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::conformation::Conformation;
    use crate::engine::config::InitStrategy;
    use crate::engine::rng::trial_rng;
    use crate::engine::search::NoopObserver;

    fn config(max_steps: usize) -> BaselineConfig {
        BaselineConfig {
            max_steps,
            temperature: 1.0,
            init: InitStrategy::Straight,
        }
    }

    #[derive(Default)]
    struct Recorder {
        moves: usize,
        invalid: usize,
        trace: Vec<i32>,
    }

    impl SearchObserver for Recorder {
        fn on_move(&mut self, conformation: &Conformation) {
            self.moves += 1;
            if !conformation.is_valid() {
                self.invalid += 1;
            }
        }

        fn on_iteration(&mut self, _iteration: usize, best_energy: i32) {
            self.trace.push(best_energy);
        }
    }

    fn sequence() -> Sequence {
        "HPHPPHHPHPPHPHHPPHPH".parse().unwrap()
    }

    #[test]
    fn same_seed_reproduces_the_outcome() {
        let a = run(&sequence(), &config(2000), &mut trial_rng(11), NoopObserver).unwrap();
        let b = run(&sequence(), &config(2000), &mut trial_rng(11), NoopObserver).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn every_accepted_state_is_valid_and_best_never_rises() {
        let mut recorder = Recorder::default();
        let outcome = run(&sequence(), &config(3000), &mut trial_rng(3), &mut recorder).unwrap();

        assert_eq!(recorder.invalid, 0);
        assert_eq!(recorder.moves, outcome.accepted_moves + 1);
        assert_eq!(recorder.trace.len(), 3000);
        assert!(recorder.trace.windows(2).all(|w| w[1] <= w[0]));
        assert_eq!(recorder.trace.last().copied(), Some(outcome.best_energy));
        assert!(outcome.best_energy < 0);
        assert_eq!(energy(&sequence(), &outcome.best_conformation), outcome.best_energy);
    }

    #[test]
    fn zero_budget_returns_the_initial_fold() {
        let outcome = run(&sequence(), &config(0), &mut trial_rng(1), NoopObserver).unwrap();
        assert_eq!(outcome.best_energy, 0);
        assert_eq!(outcome.iterations, 0);
        assert_eq!(outcome.best_conformation, Conformation::straight(20));
    }

    #[test]
    fn single_monomer_spends_steps_on_null_moves() {
        let seq: Sequence = "H".parse().unwrap();
        let outcome = run(&seq, &config(10), &mut trial_rng(1), NoopObserver).unwrap();
        assert_eq!(outcome.iterations, 10);
        assert_eq!(outcome.accepted_moves, 0);
    }

    #[test]
    fn invalid_temperature_is_rejected_before_searching() {
        let mut bad = config(10);
        bad.temperature = -1.0;
        assert!(run(&sequence(), &bad, &mut trial_rng(1), NoopObserver).is_err());
    }
}

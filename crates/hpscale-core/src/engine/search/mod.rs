//! The two competing folding searches.
//!
//! Both take their random stream as an explicit `&mut R` and report every
//! accepted conformation to a [`SearchObserver`], which is how the validity
//! and monotonicity properties are checked move by move.

pub mod baseline;
pub mod elimination;

use super::config::InitStrategy;
use crate::core::models::conformation::Conformation;
use crate::core::models::sequence::Sequence;
use rand::Rng;

/// Hooks into a running search. Both methods default to no-ops.
pub trait SearchObserver {
    /// Called with every conformation that enters the search state: each
    /// accepted baseline move and each new population member.
    fn on_move(&mut self, _conformation: &Conformation) {}

    /// Called after each step (baseline) or generation (elimination) with
    /// the best energy seen so far.
    fn on_iteration(&mut self, _iteration: usize, _best_energy: i32) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl SearchObserver for NoopObserver {}

impl<O: SearchObserver + ?Sized> SearchObserver for &mut O {
    fn on_move(&mut self, conformation: &Conformation) {
        (**self).on_move(conformation);
    }

    fn on_iteration(&mut self, iteration: usize, best_energy: i32) {
        (**self).on_iteration(iteration, best_energy);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    /// Lowest energy seen over the whole run.
    pub best_energy: i32,
    pub best_conformation: Conformation,
    /// Steps (baseline) or generations (elimination) executed.
    pub iterations: usize,
    pub accepted_moves: usize,
    /// Culled members copied into the paradox buffer.
    pub paradox_retained: usize,
    /// Refill slots served from the paradox buffer.
    pub paradox_reinserted: usize,
}

pub(crate) fn initial_conformation<R: Rng + ?Sized>(
    sequence: &Sequence,
    init: InitStrategy,
    rng: &mut R,
) -> Conformation {
    match init {
        InitStrategy::Straight => crate::core::lattice::initialize(sequence),
        InitStrategy::RandomWalk => Conformation::random_walk(sequence.len(), rng),
    }
}

//! The HP lattice model: contact energy and the local move set.
//!
//! Moves are generated so that every candidate already satisfies the bond and
//! self-avoidance invariants; searches never need to reject an invalid proposal.

pub mod energy;
pub mod moves;

pub use energy::energy;
pub use moves::{MoveSet, local_moves, random_move};

use crate::core::models::conformation::Conformation;
use crate::core::models::sequence::Sequence;

/// Deterministic starting placement: the extended chain along +x.
pub fn initialize(sequence: &Sequence) -> Conformation {
    Conformation::straight(sequence.len())
}

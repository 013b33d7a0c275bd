//! Per-trial random streams.
//!
//! Every trial owns a fresh generator seeded from the tuple
//! `(phase, length, algorithm, trial index)`, so a trial's outcome never
//! depends on which worker ran it or on what ran before it.

use crate::core::models::trial::{Algorithm, Phase};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

pub type TrialRng = Xoshiro256PlusPlus;

const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

/// One SplitMix64 output step.
#[inline]
pub fn splitmix64(mut z: u64) -> u64 {
    z = z.wrapping_add(GOLDEN_GAMMA);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

pub fn derive_seed(phase: Phase, length: usize, algorithm: Algorithm, index: usize) -> u64 {
    [length as u64, algorithm.seed_tag(), index as u64]
        .into_iter()
        .fold(splitmix64(phase.seed_tag()), |acc, field| {
            splitmix64(acc ^ field)
        })
}

pub fn trial_rng(seed: u64) -> TrialRng {
    TrialRng::seed_from_u64(seed)
}

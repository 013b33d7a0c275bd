use super::sequence::{Sequence, SequenceError};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use std::collections::BTreeMap;

/// One problem instance per chain length.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstanceSet {
    by_length: BTreeMap<usize, Sequence>,
}

impl InstanceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the instance set for `lengths`, taking explicit sequences where
    /// given and otherwise generating one from seed `seed_base + L`.
    ///
    /// Two explicit sequences of the same length are rejected, even when
    /// that length is not requested.
    pub fn resolve(
        lengths: &[usize],
        explicit: &[Sequence],
        seed_base: u64,
    ) -> Result<Self, SequenceError> {
        let mut set = Self::new();
        for sequence in explicit {
            if set.by_length.insert(sequence.len(), sequence.clone()).is_some() {
                return Err(SequenceError::DuplicateLength {
                    length: sequence.len(),
                });
            }
        }
        for &length in lengths {
            if !set.by_length.contains_key(&length) {
                set.by_length
                    .insert(length, generated_sequence(length, seed_base)?);
            }
        }
        set.by_length.retain(|length, _| lengths.contains(length));
        Ok(set)
    }

    pub fn insert(&mut self, sequence: Sequence) -> Option<Sequence> {
        self.by_length.insert(sequence.len(), sequence)
    }

    pub fn get(&self, length: usize) -> Option<&Sequence> {
        self.by_length.get(&length)
    }

    pub fn lengths(&self) -> Vec<usize> {
        self.by_length.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &Sequence)> {
        self.by_length.iter().map(|(&l, s)| (l, s))
    }

    pub fn len(&self) -> usize {
        self.by_length.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_length.is_empty()
    }
}

pub fn generated_sequence(length: usize, seed_base: u64) -> Result<Sequence, SequenceError> {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed_base.wrapping_add(length as u64));
    Sequence::generate(length, &mut rng)
}

use nalgebra::{Point3, Vector3};
use rand::Rng;
use std::collections::HashSet;
use tracing::warn;

pub type Coord = Point3<i32>;

const UNIT_STEPS: [[i32; 3]; 6] = [
    [1, 0, 0],
    [-1, 0, 0],
    [0, 1, 0],
    [0, -1, 0],
    [0, 0, 1],
    [0, 0, -1],
];

const MAX_WALK_RESTARTS: usize = 100;

/// The six unit steps of the simple cubic lattice.
pub fn unit_steps() -> impl Iterator<Item = Vector3<i32>> {
    UNIT_STEPS.iter().map(|s| Vector3::from(*s))
}

#[inline]
pub fn manhattan(a: &Coord, b: &Coord) -> i32 {
    (a - b).iter().map(|c| c.abs()).sum()
}

/// A placement of a chain on the 3-D integer lattice, index-aligned with its sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Conformation {
    positions: Vec<Coord>,
}

impl Conformation {
    /// Extended chain along +x starting at the origin.
    pub fn straight(length: usize) -> Self {
        let positions = (0..length as i32).map(|x| Coord::new(x, 0, 0)).collect();
        Self { positions }
    }

    /// Grows a self-avoiding walk by choosing uniformly among the free
    /// neighbours of the chain end. A walk that traps itself is restarted;
    /// after too many restarts the straight chain is returned.
    pub fn random_walk<R: Rng + ?Sized>(length: usize, rng: &mut R) -> Self {
        for _ in 0..MAX_WALK_RESTARTS {
            if let Some(conformation) = Self::try_grow(length, rng) {
                return conformation;
            }
        }
        warn!(
            length,
            "Random walk trapped repeatedly; falling back to the straight chain."
        );
        Self::straight(length)
    }

    fn try_grow<R: Rng + ?Sized>(length: usize, rng: &mut R) -> Option<Self> {
        let mut positions = Vec::with_capacity(length);
        let mut occupied = HashSet::with_capacity(length);
        if length == 0 {
            return Some(Self { positions });
        }
        positions.push(Coord::origin());
        occupied.insert(Coord::origin());

        for _ in 1..length {
            let tail = *positions.last()?;
            let free: Vec<Coord> = unit_steps()
                .map(|step| tail + step)
                .filter(|c| !occupied.contains(c))
                .collect();
            if free.is_empty() {
                return None;
            }
            let next = free[rng.gen_range(0..free.len())];
            occupied.insert(next);
            positions.push(next);
        }
        Some(Self { positions })
    }

    /// Builds a conformation from raw coordinates without checking it.
    /// Use [`Conformation::is_valid`] when the source is untrusted.
    pub fn from_positions(positions: Vec<Coord>) -> Self {
        Self { positions }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    #[inline]
    pub fn positions(&self) -> &[Coord] {
        &self.positions
    }

    #[inline]
    pub fn position(&self, index: usize) -> Coord {
        self.positions[index]
    }

    pub(crate) fn with_replaced(&self, replacements: &[(usize, Coord)]) -> Self {
        let mut positions = self.positions.clone();
        for &(index, coord) in replacements {
            positions[index] = coord;
        }
        Self { positions }
    }

    pub fn occupancy(&self) -> HashSet<Coord> {
        self.positions.iter().copied().collect()
    }

    pub fn is_self_avoiding(&self) -> bool {
        self.occupancy().len() == self.positions.len()
    }

    pub fn has_unit_bonds(&self) -> bool {
        self.positions
            .windows(2)
            .all(|pair| manhattan(&pair[0], &pair[1]) == 1)
    }

    /// Both lattice invariants: pairwise distinct sites and unit bonds.
    pub fn is_valid(&self) -> bool {
        self.is_self_avoiding() && self.has_unit_bonds()
    }
}

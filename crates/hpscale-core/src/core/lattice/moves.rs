use crate::core::models::conformation::{Conformation, Coord, manhattan, unit_steps};
use rand::Rng;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKind {
    End,
    Corner,
    Crankshaft,
}

/// Generates validity-preserving local moves for one conformation.
///
/// The occupancy set is built once and shared by every query, so scanning
/// several residues costs a single O(L) setup.
pub struct MoveSet<'a> {
    conformation: &'a Conformation,
    occupied: HashSet<Coord>,
}

impl<'a> MoveSet<'a> {
    pub fn new(conformation: &'a Conformation) -> Self {
        Self {
            conformation,
            occupied: conformation.occupancy(),
        }
    }

    #[inline]
    fn is_free(&self, site: &Coord) -> bool {
        !self.occupied.contains(site)
    }

    /// Every candidate reachable by moving `residue` (and, for a crankshaft,
    /// `residue + 1`). Each candidate keeps unit bonds and self-avoidance.
    pub fn moves_for(&self, residue: usize) -> Vec<(MoveKind, Conformation)> {
        let len = self.conformation.len();
        if residue >= len || len < 2 {
            return Vec::new();
        }

        let mut candidates = Vec::new();
        if residue == 0 || residue == len - 1 {
            self.end_moves(residue, &mut candidates);
        } else {
            self.corner_move(residue, &mut candidates);
        }
        if residue >= 1 && residue + 2 < len {
            self.crankshaft_moves(residue, &mut candidates);
        }
        candidates
    }

    fn end_moves(&self, residue: usize, out: &mut Vec<(MoveKind, Conformation)>) {
        let anchor_index = if residue == 0 { 1 } else { residue - 1 };
        let anchor = self.conformation.position(anchor_index);
        for step in unit_steps() {
            let site = anchor + step;
            if self.is_free(&site) {
                out.push((
                    MoveKind::End,
                    self.conformation.with_replaced(&[(residue, site)]),
                ));
            }
        }
    }

    fn corner_move(&self, residue: usize, out: &mut Vec<(MoveKind, Conformation)>) {
        let prev = self.conformation.position(residue - 1);
        let current = self.conformation.position(residue);
        let next = self.conformation.position(residue + 1);

        let span = next - prev;
        let bent = manhattan(&prev, &next) == 2 && span.iter().all(|c| c.abs() <= 1);
        if !bent {
            return;
        }
        let site = prev + (next - current);
        if self.is_free(&site) {
            out.push((
                MoveKind::Corner,
                self.conformation.with_replaced(&[(residue, site)]),
            ));
        }
    }

    fn crankshaft_moves(&self, residue: usize, out: &mut Vec<(MoveKind, Conformation)>) {
        let a0 = self.conformation.position(residue - 1);
        let p1 = self.conformation.position(residue);
        let p2 = self.conformation.position(residue + 1);
        let a3 = self.conformation.position(residue + 2);

        if manhattan(&a0, &a3) != 1 {
            return;
        }
        let axis = a3 - a0;
        let arm = p1 - a0;
        if p2 - a3 != arm || arm.dot(&axis) != 0 {
            return;
        }

        for step in unit_steps() {
            if step == arm || step.dot(&axis) != 0 {
                continue;
            }
            let s1 = a0 + step;
            let s2 = a3 + step;
            if self.is_free(&s1) && self.is_free(&s2) {
                out.push((
                    MoveKind::Crankshaft,
                    self.conformation
                        .with_replaced(&[(residue, s1), (residue + 1, s2)]),
                ));
            }
        }
    }

    /// Picks a residue uniformly, then a candidate uniformly among its moves.
    /// A residue without moves hands over to the next one cyclically, so the
    /// call is bounded by `L` queries; `None` means no residue can move.
    pub fn propose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Conformation> {
        let len = self.conformation.len();
        if len < 2 {
            return None;
        }
        let start = rng.gen_range(0..len);
        for offset in 0..len {
            let residue = (start + offset) % len;
            let mut candidates = self.moves_for(residue);
            if !candidates.is_empty() {
                let pick = rng.gen_range(0..candidates.len());
                return Some(candidates.swap_remove(pick).1);
            }
        }
        None
    }
}

/// All structurally valid local perturbations of `residue`.
pub fn local_moves(conformation: &Conformation, residue: usize) -> Vec<Conformation> {
    MoveSet::new(conformation)
        .moves_for(residue)
        .into_iter()
        .map(|(_, c)| c)
        .collect()
}

/// One random valid local move, or `None` if the chain is frozen.
pub fn random_move<R: Rng + ?Sized>(conformation: &Conformation, rng: &mut R) -> Option<Conformation> {
    MoveSet::new(conformation).propose(rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn conf(points: &[(i32, i32, i32)]) -> Conformation {
        Conformation::from_positions(points.iter().map(|&(x, y, z)| Coord::new(x, y, z)).collect())
    }

    fn kinds(c: &Conformation, residue: usize) -> Vec<MoveKind> {
        MoveSet::new(c).moves_for(residue).into_iter().map(|(k, _)| k).collect()
    }

    #[test]
    fn end_residue_of_straight_chain_has_four_moves() {
        let c = Conformation::straight(4);
        let moves = local_moves(&c, 0);
        assert_eq!(moves.len(), 4);
        assert!(moves.iter().all(Conformation::is_valid));
        assert!(moves.iter().all(|m| m.position(1) == c.position(1)));
    }

    #[test]
    fn interior_of_straight_chain_is_frozen() {
        let c = Conformation::straight(5);
        assert!(local_moves(&c, 2).is_empty());
    }

    #[test]
    fn corner_flips_across_the_square() {
        let c = conf(&[(0, 0, 0), (1, 0, 0), (1, 1, 0)]);
        let moves: Vec<_> = MoveSet::new(&c)
            .moves_for(1)
            .into_iter()
            .filter(|(k, _)| *k == MoveKind::Corner)
            .collect();
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].1.position(1), Coord::new(0, 1, 0));
        assert!(moves[0].1.is_valid());
    }

    #[test]
    fn corner_move_is_blocked_by_occupied_site() {
        // Residue 5 sits on the opposite corner of residue 1.
        let c = conf(&[
            (0, 0, 0),
            (1, 0, 0),
            (1, 1, 0),
            (1, 1, 1),
            (0, 1, 1),
            (0, 1, 0),
        ]);
        assert!(c.is_valid());
        assert!(!kinds(&c, 1).contains(&MoveKind::Corner));
    }

    #[test]
    fn crankshaft_rotates_u_turn() {
        let c = conf(&[(0, 0, 0), (0, 1, 0), (1, 1, 0), (1, 0, 0)]);
        let cranks: Vec<_> = MoveSet::new(&c)
            .moves_for(1)
            .into_iter()
            .filter(|(k, _)| *k == MoveKind::Crankshaft)
            .map(|(_, c)| c)
            .collect();
        // Arm +y; remaining perpendiculars to axis +x are -y, +z, -z.
        assert_eq!(cranks.len(), 3);
        for m in &cranks {
            assert!(m.is_valid());
            assert_eq!(m.position(0), c.position(0));
            assert_eq!(m.position(3), c.position(3));
        }
    }

    #[test]
    fn every_generated_move_is_valid_on_random_walks() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(2024);
        for _ in 0..20 {
            let c = Conformation::random_walk(25, &mut rng);
            for residue in 0..c.len() {
                for m in local_moves(&c, residue) {
                    assert!(m.is_valid());
                    assert_ne!(m, c);
                }
            }
        }
    }

    #[test]
    fn propose_is_deterministic_and_valid() {
        let c = Conformation::straight(10);
        let a = random_move(&c, &mut Xoshiro256PlusPlus::seed_from_u64(5)).unwrap();
        let b = random_move(&c, &mut Xoshiro256PlusPlus::seed_from_u64(5)).unwrap();
        assert_eq!(a, b);
        assert!(a.is_valid());
    }

    #[test]
    fn single_residue_chain_cannot_move() {
        let c = Conformation::straight(1);
        assert!(local_moves(&c, 0).is_empty());
        assert!(random_move(&c, &mut Xoshiro256PlusPlus::seed_from_u64(1)).is_none());
    }
}

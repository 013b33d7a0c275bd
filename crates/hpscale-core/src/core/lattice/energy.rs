use crate::core::models::conformation::{Conformation, Coord, unit_steps};
use crate::core::models::sequence::Sequence;
use std::collections::HashMap;

/// HP contact energy: minus the number of non-bonded H–H pairs on adjacent sites.
///
/// Pairs with `|i - j| <= 1` are chain neighbours and never count.
pub fn energy(sequence: &Sequence, conformation: &Conformation) -> i32 {
    debug_assert_eq!(sequence.len(), conformation.len());

    let index: HashMap<Coord, usize> = conformation
        .positions()
        .iter()
        .enumerate()
        .filter(|&(i, _)| sequence.is_hydrophobic(i))
        .map(|(i, &c)| (c, i))
        .collect();

    let mut contacts = 0;
    for (&site, &i) in &index {
        for step in unit_steps() {
            if let Some(&j) = index.get(&(site + step)) {
                if j > i + 1 {
                    contacts += 1;
                }
            }
        }
    }
    -contacts
}

/// All H–H topological contacts `(i, j)` with `i < j`, sorted.
pub fn contacts(sequence: &Sequence, conformation: &Conformation) -> Vec<(usize, usize)> {
    let positions = conformation.positions();
    let mut pairs = Vec::new();
    for i in 0..positions.len() {
        if !sequence.is_hydrophobic(i) {
            continue;
        }
        for j in (i + 2)..positions.len() {
            if sequence.is_hydrophobic(j)
                && crate::core::models::conformation::manhattan(&positions[i], &positions[j]) == 1
            {
                pairs.push((i, j));
            }
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conf(points: &[(i32, i32, i32)]) -> Conformation {
        Conformation::from_positions(points.iter().map(|&(x, y, z)| Coord::new(x, y, z)).collect())
    }

    #[test]
    fn straight_chain_has_no_contacts() {
        let seq: Sequence = "HHHHHH".parse().unwrap();
        assert_eq!(energy(&seq, &Conformation::straight(6)), 0);
    }

    #[test]
    fn square_fold_counts_one_contact() {
        // 0 and 3 meet across the square.
        let seq: Sequence = "HPPH".parse().unwrap();
        let c = conf(&[(0, 0, 0), (1, 0, 0), (1, 1, 0), (0, 1, 0)]);
        assert_eq!(energy(&seq, &c), -1);
        assert_eq!(contacts(&seq, &c), vec![(0, 3)]);
    }

    #[test]
    fn polar_ends_do_not_contribute() {
        let seq: Sequence = "PHHP".parse().unwrap();
        let c = conf(&[(0, 0, 0), (1, 0, 0), (1, 1, 0), (0, 1, 0)]);
        assert_eq!(energy(&seq, &c), 0);
    }

    #[test]
    fn bonded_neighbours_are_excluded() {
        let seq: Sequence = "HH".parse().unwrap();
        assert_eq!(energy(&seq, &Conformation::straight(2)), 0);
    }

    #[test]
    fn cube_fold_matches_pairwise_count() {
        // A compact 2x2x2 cube walk.
        let seq: Sequence = "HHHHHHHH".parse().unwrap();
        let c = conf(&[
            (0, 0, 0),
            (1, 0, 0),
            (1, 1, 0),
            (0, 1, 0),
            (0, 1, 1),
            (1, 1, 1),
            (1, 0, 1),
            (0, 0, 1),
        ]);
        assert!(c.is_valid());
        assert_eq!(energy(&seq, &c), -(contacts(&seq, &c).len() as i32));
        assert_eq!(energy(&seq, &c), -5);
    }
}

use super::config::ThresholdCriterion;
use crate::core::models::thresholds::{ThresholdEntry, ThresholdStatus};
use tracing::warn;

/// Derives E*(L) from the pooled pilot energies of every algorithm.
///
/// A length whose pilot produced no trial at all, or no trial below zero
/// energy, gets a `Degenerate` entry so the condition travels with the
/// threshold into every downstream report.
pub fn calibrate(length: usize, energies: &[i32], criterion: ThresholdCriterion) -> ThresholdEntry {
    let mut sorted = energies.to_vec();
    sorted.sort_unstable();

    let Some(&best) = sorted.first() else {
        warn!(length, "No pilot trials recorded; threshold is degenerate.");
        return ThresholdEntry {
            length,
            energy: 0,
            status: ThresholdStatus::Degenerate {
                reason: "no pilot trials".to_string(),
            },
        };
    };

    let energy = match criterion {
        ThresholdCriterion::Minimum => best,
        ThresholdCriterion::Percentile(p) => sorted[nearest_rank(p, sorted.len()) - 1],
    };

    let status = if best >= 0 {
        warn!(
            length,
            trials = sorted.len(),
            "No pilot trial found a contact; threshold is degenerate."
        );
        ThresholdStatus::Degenerate {
            reason: format!("none of {} pilot trials reached a negative energy", sorted.len()),
        }
    } else {
        ThresholdStatus::Calibrated
    };

    ThresholdEntry {
        length,
        energy,
        status,
    }
}

/// 1-based nearest-rank index of percentile `p` in a sample of `n`.
fn nearest_rank(p: f64, n: usize) -> usize {
    let rank = (p / 100.0 * n as f64).ceil() as usize;
    rank.clamp(1, n)
}

use hpscale::analysis::report::ScalingRow;
use hpscale::analysis::summary::LengthSummary;
use hpscale::analysis::trend::TrendFit;
use hpscale::core::models::thresholds::{ThresholdStatus, ThresholdTable};
use hpscale::workflows::validate::SuccessCounts;
use std::fmt::Write;

pub fn render_thresholds(table: &ThresholdTable) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:>6}  {:>6}  {}", "L", "E*(L)", "status");
    for entry in table.entries() {
        let status = match &entry.status {
            ThresholdStatus::Calibrated => "calibrated".to_string(),
            ThresholdStatus::Degenerate { reason } => format!("degenerate ({reason})"),
        };
        let _ = writeln!(out, "{:>6}  {:>6}  {}", entry.length, entry.energy, status);
    }
    out
}

pub fn render_success_counts(counts: &[SuccessCounts]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:>6}  {:>14}  {:>14}", "L", "MC successes", "FE successes");
    for c in counts {
        let _ = writeln!(
            out,
            "{:>6}  {:>8}/{:<5}  {:>8}/{:<5}",
            c.length, c.baseline, c.trials_per_algorithm, c.elimination, c.trials_per_algorithm
        );
    }
    out
}

pub fn render_scaling(summaries: &[LengthSummary], trend: &TrendFit) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>6}  {:>6}  {:>8}  {:>8}  {:>9}  {:>9}  {:>9}  {:>10}",
        "L", "E*(L)", "MC %", "FE %", "Δ(L)", "R(L)", "d", "MW p"
    );
    for summary in summaries {
        let row = ScalingRow::from(summary);
        let _ = writeln!(
            out,
            "{:>6}  {:>6}  {:>8}  {:>8}  {:>9}  {:>9}  {:>9}  {:>10}",
            row.length,
            row.threshold,
            row.mc_success_pct,
            row.fe_success_pct,
            row.delta,
            row.ratio,
            row.cohens_d,
            row.mann_whitney_p
        );
    }

    match (trend.fit.value(), trend.permutation_p.value()) {
        (Some(fit), Some(p)) => {
            let _ = writeln!(
                out,
                "\nTrend: Δ(L) = {:.4} + {:.6}·L (R² = {:.3}), permutation p = {:.4}",
                fit.intercept, fit.slope, fit.r_squared, p
            );
            if let (Some(se), Some(ols_p)) = (fit.std_err, fit.p_value) {
                let _ = writeln!(out, "       slope SE = {se:.6}, OLS p = {ols_p:.4}");
            }
        }
        _ => {
            let reason = trend
                .fit
                .reason()
                .or_else(|| trend.permutation_p.reason())
                .unwrap_or("not computable");
            let _ = writeln!(out, "\nTrend: not computable ({reason})");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use hpscale::core::models::thresholds::ThresholdEntry;

    #[test]
    fn thresholds_render_one_line_per_length() {
        let mut table = ThresholdTable::new();
        table
            .insert(ThresholdEntry {
                length: 20,
                energy: -9,
                status: ThresholdStatus::Calibrated,
            })
            .unwrap();
        table
            .insert(ThresholdEntry {
                length: 30,
                energy: 0,
                status: ThresholdStatus::Degenerate {
                    reason: "no contact".into(),
                },
            })
            .unwrap();
        let text = render_thresholds(&table);
        assert_eq!(text.lines().count(), 3);
        assert!(text.contains("-9"));
        assert!(text.contains("degenerate (no contact)"));
    }

    #[test]
    fn success_counts_show_totals() {
        let text = render_success_counts(&[SuccessCounts {
            length: 20,
            baseline: 12,
            elimination: 340,
            trials_per_algorithm: 2000,
        }]);
        let row = text.lines().nth(1).unwrap();
        assert!(row.contains("12/2000"));
        assert!(row.contains("340/2000"));
    }
}

//! The aggregated outputs consumed by external reporting: `scaling_table.csv`
//! (one row per length) and `stats_summary.toml` (the trend fit plus the
//! headline numbers of each length). Analyses of pilot logs write the same
//! files with a `phase_a_` prefix.
//!
//! Non-computable values are written as `NA` in the CSV and listed under
//! `not-computable` in the TOML summary; they are never replaced by zero.

use super::statistics::Statistic;
use super::summary::{LengthSummary, Ratio};
use super::trend::TrendFit;
use crate::core::io::error::IoError;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Report file names of the validation phase.
pub const SCALING_TABLE_FILE: &str = "scaling_table.csv";
pub const SUMMARY_FILE: &str = "stats_summary.toml";

const MISSING: &str = "NA";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScalingRow {
    pub length: usize,
    pub threshold: i32,
    pub threshold_status: String,
    pub mc_trials: usize,
    pub mc_success_pct: String,
    pub mc_ci_low_pct: String,
    pub mc_ci_high_pct: String,
    pub fe_trials: usize,
    pub fe_success_pct: String,
    pub fe_ci_low_pct: String,
    pub fe_ci_high_pct: String,
    pub delta: String,
    pub ratio: String,
    pub cohens_d: String,
    pub mann_whitney_p: String,
    pub significant: String,
}

fn fmt_stat(stat: &Statistic<f64>, scale: f64, precision: usize) -> String {
    stat.value()
        .map_or_else(|| MISSING.to_string(), |v| format!("{:.*}", precision, v * scale))
}

fn fmt_interval(stat: &Statistic<(f64, f64)>) -> (String, String) {
    match stat.value() {
        Some(&(lo, hi)) => (format!("{:.2}", lo * 100.0), format!("{:.2}", hi * 100.0)),
        None => (MISSING.to_string(), MISSING.to_string()),
    }
}

fn status_label(summary: &LengthSummary) -> String {
    if summary.threshold.status.is_degenerate() {
        "degenerate".to_string()
    } else {
        "calibrated".to_string()
    }
}

impl From<&LengthSummary> for ScalingRow {
    fn from(s: &LengthSummary) -> Self {
        let (mc_ci_low_pct, mc_ci_high_pct) = fmt_interval(&s.baseline.wilson);
        let (fe_ci_low_pct, fe_ci_high_pct) = fmt_interval(&s.elimination.wilson);
        Self {
            length: s.length,
            threshold: s.threshold.energy,
            threshold_status: status_label(s),
            mc_trials: s.baseline.trials,
            mc_success_pct: fmt_stat(&s.baseline.success_rate, 100.0, 2),
            mc_ci_low_pct,
            mc_ci_high_pct,
            fe_trials: s.elimination.trials,
            fe_success_pct: fmt_stat(&s.elimination.success_rate, 100.0, 2),
            fe_ci_low_pct,
            fe_ci_high_pct,
            delta: fmt_stat(&s.delta, 1.0, 4),
            ratio: s.ratio.to_string(),
            cohens_d: fmt_stat(&s.cohens_d, 1.0, 4),
            mann_whitney_p: s
                .mann_whitney
                .value()
                .map_or_else(|| MISSING.to_string(), |mw| format!("{:.3e}", mw.p_value)),
            significant: s
                .significant
                .map_or_else(|| MISSING.to_string(), |flag| flag.to_string()),
        }
    }
}

pub fn write_scaling_table<W: Write>(writer: W, summaries: &[LengthSummary]) -> Result<(), IoError> {
    let mut csv = csv::Writer::from_writer(writer);
    for summary in summaries {
        csv.serialize(ScalingRow::from(summary))?;
    }
    csv.flush()?;
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct LengthRecord {
    pub length: usize,
    pub threshold: i32,
    pub threshold_status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mc_success_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fe_success_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta: Option<f64>,
    pub ratio: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cohens_d: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mann_whitney_p: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub not_computable: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct TrendRecord {
    pub lengths_used: Vec<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slope: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intercept: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r_squared: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slope_std_err: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ols_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permutation_p: Option<f64>,
    pub permutation_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub significant: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub not_computable: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct StudySummary {
    pub trend: TrendRecord,
    pub lengths: Vec<LengthRecord>,
}

fn note<T>(notes: &mut Vec<String>, name: &str, stat: &Statistic<T>) {
    if let Some(reason) = stat.reason() {
        notes.push(format!("{name}: {reason}"));
    }
}

impl StudySummary {
    pub fn new(summaries: &[LengthSummary], trend: &TrendFit) -> Self {
        let lengths = summaries
            .iter()
            .map(|s| {
                let mut not_computable = Vec::new();
                note(&mut not_computable, "delta", &s.delta);
                note(&mut not_computable, "cohens-d", &s.cohens_d);
                note(&mut not_computable, "mann-whitney", &s.mann_whitney);
                if s.ratio != Ratio::Undefined && s.ratio.finite().is_none() {
                    not_computable.push("ratio: zero baseline success rate".to_string());
                }
                LengthRecord {
                    length: s.length,
                    threshold: s.threshold.energy,
                    threshold_status: status_label(s),
                    mc_success_rate: s.baseline.success_rate.value().copied(),
                    fe_success_rate: s.elimination.success_rate.value().copied(),
                    delta: s.delta.value().copied(),
                    ratio: s.ratio.to_string(),
                    cohens_d: s.cohens_d.value().copied(),
                    mann_whitney_p: s.mann_whitney.value().map(|mw| mw.p_value),
                    not_computable,
                }
            })
            .collect();

        let mut not_computable = Vec::new();
        note(&mut not_computable, "fit", &trend.fit);
        note(&mut not_computable, "permutation-p", &trend.permutation_p);
        let fit = trend.fit.value();
        let trend = TrendRecord {
            lengths_used: trend.points.iter().map(|&(l, _)| l).collect(),
            slope: fit.map(|f| f.slope),
            intercept: fit.map(|f| f.intercept),
            r_squared: fit.map(|f| f.r_squared),
            slope_std_err: fit.and_then(|f| f.std_err),
            ols_p: fit.and_then(|f| f.p_value),
            permutation_p: trend.permutation_p.value().copied(),
            permutation_count: trend.permutation_count,
            significant: trend.significant,
            not_computable,
        };

        Self { trend, lengths }
    }

    pub fn to_toml_string(&self) -> Result<String, IoError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Writes both aggregated artifacts.
pub fn write_reports(
    table_path: &Path,
    summary_path: &Path,
    summaries: &[LengthSummary],
    trend: &TrendFit,
) -> Result<(), IoError> {
    write_scaling_table(std::fs::File::create(table_path)?, summaries)?;
    std::fs::write(summary_path, StudySummary::new(summaries, trend).to_toml_string()?)?;

    debug!(
        table = %table_path.display(),
        summary = %summary_path.display(),
        "Wrote analysis reports."
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::statistics::linear_fit;
    use crate::analysis::summary::LengthSummary;
    use crate::core::models::thresholds::{ThresholdEntry, ThresholdStatus};
    use crate::core::models::trial::{Algorithm, Trial};
    use crate::engine::config::StatisticsConfig;
    use tempfile::tempdir;

    fn trial(algorithm: Algorithm, index: usize, energy: i32) -> Trial {
        Trial {
            length: 20,
            algorithm,
            trial_index: index,
            seed: 0,
            final_energy: energy,
            success: None,
            iterations: 1,
            runtime_ms: 1.0,
            paradox_activity: 0,
        }
    }

    fn summary() -> LengthSummary {
        let trials: Vec<Trial> = [-3, -4, -5, -3]
            .into_iter()
            .enumerate()
            .map(|(i, e)| trial(Algorithm::Baseline, i, e))
            .chain(
                [-9, -8, -6, -9]
                    .into_iter()
                    .enumerate()
                    .map(|(i, e)| trial(Algorithm::Elimination, i, e)),
            )
            .collect();
        let threshold = ThresholdEntry {
            length: 20,
            energy: -8,
            status: ThresholdStatus::Calibrated,
        };
        LengthSummary::from_trials(20, &trials, &threshold, &StatisticsConfig::default())
    }

    #[test]
    fn scaling_row_marks_infinite_ratio() {
        let row = ScalingRow::from(&summary());
        assert_eq!(row.mc_success_pct, "0.00");
        assert_eq!(row.fe_success_pct, "75.00");
        assert_eq!(row.ratio, "inf");
        assert_eq!(row.delta, "0.7500");
        assert_eq!(row.threshold_status, "calibrated");
    }

    #[test]
    fn table_has_header_and_one_row_per_length() {
        let mut buffer = Vec::new();
        write_scaling_table(&mut buffer, &[summary()]).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("length,threshold,threshold_status,mc_trials"));
        assert!(lines[1].starts_with("20,-8,calibrated,4,0.00"));
    }

    #[test]
    fn summary_lists_what_could_not_be_computed() {
        let summaries = vec![summary()];
        let trend = TrendFit::from_summaries(&summaries, &StatisticsConfig::default());
        let text = StudySummary::new(&summaries, &trend).to_toml_string().unwrap();
        assert!(text.contains("ratio = \"inf\""));
        assert!(text.contains("fit: trend fit needs at least 3 lengths"));
        assert!(!text.contains("slope"));
    }

    #[test]
    fn summary_carries_slope_error_and_ols_p() {
        let xs = [20.0, 30.0, 40.0, 50.0, 60.0];
        let ys = [0.02, 0.04, 0.05, 0.04, 0.05];
        let trend = TrendFit {
            points: vec![(20, 0.02), (30, 0.04), (40, 0.05), (50, 0.04), (60, 0.05)],
            fit: Statistic::Value(linear_fit(&xs, &ys).unwrap()),
            permutation_p: Statistic::Value(0.1),
            permutation_count: 100,
            significant: Some(false),
        };
        let summary = StudySummary::new(&[], &trend);
        let std_err = summary.trend.slope_std_err.unwrap();
        assert!((std_err - 0.08f64.sqrt() / 1000.0).abs() < 1e-12);
        assert!((summary.trend.ols_p.unwrap() - 0.124_027).abs() < 1e-5);

        let text = summary.to_toml_string().unwrap();
        assert!(text.contains("slope-std-err = "));
        assert!(text.contains("ols-p = "));
    }

    #[test]
    fn reports_are_written_to_the_directory() {
        let dir = tempdir().unwrap();
        let summaries = vec![summary()];
        let trend = TrendFit::from_summaries(&summaries, &StatisticsConfig::default());
        let (table, summary) = (dir.path().join(SCALING_TABLE_FILE), dir.path().join(SUMMARY_FILE));
        write_reports(&table, &summary, &summaries, &trend).unwrap();
        assert!(table.exists());
        assert!(summary.exists());
    }
}

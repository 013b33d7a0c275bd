use super::statistics::{LinearFit, Statistic, linear_fit, permutation_slope_test};
use super::summary::LengthSummary;
use crate::engine::config::StatisticsConfig;
use serde::Serialize;
use tracing::{info, warn};

const MIN_LENGTHS: usize = 3;

/// Cross-length scaling of Δ(L): an OLS fit and a permutation test for b > 0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendFit {
    /// `(L, Δ(L))` for every length whose Δ was computable.
    pub points: Vec<(usize, f64)>,
    pub fit: Statistic<LinearFit>,
    pub permutation_p: Statistic<f64>,
    pub permutation_count: usize,
    pub significant: Option<bool>,
}

impl TrendFit {
    pub fn from_summaries(summaries: &[LengthSummary], config: &StatisticsConfig) -> Self {
        let points: Vec<(usize, f64)> = summaries
            .iter()
            .filter_map(|s| s.delta.value().map(|&d| (s.length, d)))
            .collect();
        let skipped = summaries.len() - points.len();
        if skipped > 0 {
            warn!(skipped, "Lengths without a computable gap are left out of the trend fit.");
        }

        if points.len() < MIN_LENGTHS {
            let reason = format!(
                "trend fit needs at least {MIN_LENGTHS} lengths, got {}",
                points.len()
            );
            return Self {
                points,
                fit: Statistic::not_computable(reason.clone()),
                permutation_p: Statistic::not_computable(reason),
                permutation_count: config.permutation_count,
                significant: None,
            };
        }

        let xs: Vec<f64> = points.iter().map(|&(l, _)| l as f64).collect();
        let ys: Vec<f64> = points.iter().map(|&(_, d)| d).collect();

        let fit = linear_fit(&xs, &ys).map_or_else(
            || Statistic::not_computable("lengths have zero variance"),
            Statistic::Value,
        );
        let permutation_p = match permutation_slope_test(
            &xs,
            &ys,
            config.permutation_count,
            config.permutation_seed,
        ) {
            Some(p) => Statistic::Value(p),
            None if config.permutation_count == 0 => {
                Statistic::not_computable("permutation count is zero")
            }
            None => Statistic::not_computable("lengths have zero variance"),
        };
        let significant = permutation_p
            .value()
            .map(|&p| p < config.significance_level);

        if let Some(fit) = fit.value() {
            info!(
                slope = fit.slope,
                intercept = fit.intercept,
                r_squared = fit.r_squared,
                std_err = ?fit.std_err,
                ols_p = ?fit.p_value,
                "Fitted scaling trend."
            );
        }

        Self {
            points,
            fit,
            permutation_p,
            permutation_count: config.permutation_count,
            significant,
        }
    }
}

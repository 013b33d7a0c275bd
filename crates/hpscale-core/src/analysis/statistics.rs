//! Statistical primitives used by the per-length summaries and the trend fit.
//!
//! Everything here is a pure function. Degenerate inputs produce
//! [`Statistic::NotComputable`] with a reason instead of NaN or a panic.

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::Serialize;
use std::f64::consts::SQRT_2;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Statistic<T> {
    Value(T),
    NotComputable(String),
}

impl<T> Statistic<T> {
    pub fn not_computable(reason: impl Into<String>) -> Self {
        Statistic::NotComputable(reason.into())
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Statistic::Value(v) => Some(v),
            Statistic::NotComputable(_) => None,
        }
    }

    pub fn is_computable(&self) -> bool {
        matches!(self, Statistic::Value(_))
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Statistic::Value(_) => None,
            Statistic::NotComputable(reason) => Some(reason),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Statistic<U> {
        match self {
            Statistic::Value(v) => Statistic::Value(f(v)),
            Statistic::NotComputable(reason) => Statistic::NotComputable(reason),
        }
    }
}

/// Complementary error function (Chebyshev fit, fractional error < 1.2e-7).
pub fn erfc(x: f64) -> f64 {
    let z = x.abs();
    let t = 1.0 / (1.0 + 0.5 * z);
    let poly = -z * z - 1.265_512_23
        + t * (1.000_023_68
            + t * (0.374_091_96
                + t * (0.096_784_18
                    + t * (-0.186_288_06
                        + t * (0.278_868_07
                            + t * (-1.135_203_98
                                + t * (1.488_515_87
                                    + t * (-0.822_152_23 + t * 0.170_872_77))))))));
    let ans = t * poly.exp();
    if x >= 0.0 { ans } else { 2.0 - ans }
}

pub fn normal_cdf(x: f64) -> f64 {
    0.5 * erfc(-x / SQRT_2)
}

/// Inverse of [`normal_cdf`] by bisection; `p` is clamped into (0, 1).
pub fn normal_quantile(p: f64) -> f64 {
    let p = p.clamp(1e-12, 1.0 - 1e-12);
    let (mut lo, mut hi) = (-10.0_f64, 10.0_f64);
    for _ in 0..100 {
        let mid = 0.5 * (lo + hi);
        if normal_cdf(mid) < p {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    0.5 * (lo + hi)
}

/// Wilson score interval for `successes` out of `trials` at two-sided
/// confidence `level`.
pub fn wilson_interval(successes: usize, trials: usize, level: f64) -> Statistic<(f64, f64)> {
    if trials == 0 {
        return Statistic::not_computable("no trials");
    }
    let n = trials as f64;
    let p = successes as f64 / n;
    let z = normal_quantile(1.0 - (1.0 - level) / 2.0);
    let z2 = z * z;
    let denom = 1.0 + z2 / n;
    let center = (p + z2 / (2.0 * n)) / denom;
    let half = z / denom * (p * (1.0 - p) / n + z2 / (4.0 * n * n)).sqrt();
    Statistic::Value(((center - half).max(0.0), (center + half).min(1.0)))
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

fn sum_of_squares(values: &[f64], mean: f64) -> f64 {
    values.iter().map(|v| (v - mean).powi(2)).sum()
}

/// Sample standard deviation (n − 1 denominator).
pub fn std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    Some((sum_of_squares(values, m) / (values.len() - 1) as f64).sqrt())
}

/// Cohen's d of `treatment` against `control` with the pooled standard
/// deviation `sqrt(((n1-1)s1² + (n2-1)s2²) / (n1+n2-2))`.
pub fn cohens_d(treatment: &[f64], control: &[f64]) -> Statistic<f64> {
    let (n1, n2) = (treatment.len(), control.len());
    if n1 == 0 || n2 == 0 {
        return Statistic::not_computable("empty sample");
    }
    if n1 + n2 < 3 {
        return Statistic::not_computable("fewer than three observations");
    }
    let (Some(m1), Some(m2)) = (mean(treatment), mean(control)) else {
        return Statistic::not_computable("empty sample");
    };
    let pooled_var =
        (sum_of_squares(treatment, m1) + sum_of_squares(control, m2)) / (n1 + n2 - 2) as f64;
    if pooled_var <= 0.0 {
        return Statistic::not_computable("zero pooled variance");
    }
    Statistic::Value((m1 - m2) / pooled_var.sqrt())
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MannWhitney {
    /// U statistic of the first sample.
    pub u: f64,
    pub z: f64,
    pub p_value: f64,
}

/// One-sided Mann-Whitney U test of H1: `first` is stochastically greater
/// than `second`.
///
/// Uses the normal approximation with midranks, the tie-corrected variance
/// and a continuity correction of 0.5.
pub fn mann_whitney_greater(first: &[i32], second: &[i32]) -> Statistic<MannWhitney> {
    let (n1, n2) = (first.len(), second.len());
    if n1 == 0 || n2 == 0 {
        return Statistic::not_computable("empty sample");
    }

    let mut pooled: Vec<(i32, bool)> = first
        .iter()
        .map(|&v| (v, true))
        .chain(second.iter().map(|&v| (v, false)))
        .collect();
    pooled.sort_unstable_by_key(|&(v, _)| v);

    let total = pooled.len();
    let mut rank_sum_first = 0.0;
    let mut tie_term = 0.0;
    let mut i = 0;
    while i < total {
        let mut j = i;
        while j < total && pooled[j].0 == pooled[i].0 {
            j += 1;
        }
        let midrank = (i + 1 + j) as f64 / 2.0;
        let tied = (j - i) as f64;
        tie_term += tied.powi(3) - tied;
        rank_sum_first += midrank * pooled[i..j].iter().filter(|(_, a)| *a).count() as f64;
        i = j;
    }

    let (n1f, n2f, nf) = (n1 as f64, n2 as f64, total as f64);
    let u = rank_sum_first - n1f * (n1f + 1.0) / 2.0;
    let mu = n1f * n2f / 2.0;
    let variance = n1f * n2f / 12.0 * ((nf + 1.0) - tie_term / (nf * (nf - 1.0)));
    if variance <= 0.0 {
        return Statistic::not_computable("all observations tied");
    }
    let z = (u - mu - 0.5) / variance.sqrt();
    let p_value = (0.5 * erfc(z / SQRT_2)).clamp(0.0, 1.0);
    Statistic::Value(MannWhitney { u, z, p_value })
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearFit {
    pub intercept: f64,
    pub slope: f64,
    pub r_squared: f64,
    /// Standard error of the slope; `None` with fewer than three points.
    pub std_err: Option<f64>,
    /// Two-sided p-value of `slope != 0` from Student's t with `n - 2` df.
    pub p_value: Option<f64>,
}

fn ln_gamma(x: f64) -> f64 {
    // Lanczos, g = 7.
    const C: [f64; 9] = [
        0.999_999_999_999_809_9,
        676.520_368_121_885_1,
        -1_259.139_216_722_402_8,
        771.323_428_777_653_1,
        -176.615_029_162_140_6,
        12.507_343_278_686_905,
        -0.138_571_095_265_720_12,
        9.984_369_578_019_572e-6,
        1.505_632_735_149_311_6e-7,
    ];
    if x < 0.5 {
        let pi = std::f64::consts::PI;
        return (pi / (pi * x).sin()).ln() - ln_gamma(1.0 - x);
    }
    let x = x - 1.0;
    let t = x + 7.5;
    let a = C[0]
        + C[1..]
            .iter()
            .enumerate()
            .map(|(i, c)| c / (x + i as f64 + 1.0))
            .sum::<f64>();
    0.5 * (2.0 * std::f64::consts::PI).ln() + (x + 0.5) * t.ln() - t + a.ln()
}

/// Continued fraction for the incomplete beta function (modified Lentz).
fn beta_continued_fraction(a: f64, b: f64, x: f64) -> f64 {
    const TINY: f64 = 1e-300;
    let (qab, qap, qam) = (a + b, a + 1.0, a - 1.0);
    let mut c = 1.0;
    let mut d = 1.0 - qab * x / qap;
    if d.abs() < TINY {
        d = TINY;
    }
    d = 1.0 / d;
    let mut h = d;
    for m in 1..300 {
        let m = m as f64;
        let m2 = 2.0 * m;
        let aa = m * (b - m) * x / ((qam + m2) * (a + m2));
        d = 1.0 + aa * d;
        if d.abs() < TINY {
            d = TINY;
        }
        c = 1.0 + aa / c;
        if c.abs() < TINY {
            c = TINY;
        }
        d = 1.0 / d;
        h *= d * c;
        let aa = -(a + m) * (qab + m) * x / ((a + m2) * (qap + m2));
        d = 1.0 + aa * d;
        if d.abs() < TINY {
            d = TINY;
        }
        c = 1.0 + aa / c;
        if c.abs() < TINY {
            c = TINY;
        }
        d = 1.0 / d;
        let delta = d * c;
        h *= delta;
        if (delta - 1.0).abs() < 1e-14 {
            break;
        }
    }
    h
}

/// Regularized incomplete beta `I_x(a, b)`.
fn incomplete_beta(a: f64, b: f64, x: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }
    let front = (ln_gamma(a + b) - ln_gamma(a) - ln_gamma(b) + a * x.ln() + b * (1.0 - x).ln()).exp();
    if x < (a + 1.0) / (a + b + 2.0) {
        front * beta_continued_fraction(a, b, x) / a
    } else {
        1.0 - front * beta_continued_fraction(b, a, 1.0 - x) / b
    }
}

/// `P(|T| >= |t|)` for Student's t with `df` degrees of freedom.
pub fn student_t_two_sided(t: f64, df: f64) -> f64 {
    if t.is_infinite() {
        return 0.0;
    }
    incomplete_beta(df / 2.0, 0.5, df / (df + t * t)).clamp(0.0, 1.0)
}

/// Ordinary least squares `y = a + b·x`.
pub fn linear_fit(xs: &[f64], ys: &[f64]) -> Option<LinearFit> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    let mx = mean(xs)?;
    let my = mean(ys)?;
    let sxx = sum_of_squares(xs, mx);
    if sxx <= 0.0 {
        return None;
    }
    let sxy: f64 = xs.iter().zip(ys).map(|(x, y)| (x - mx) * (y - my)).sum();
    let slope = sxy / sxx;
    let intercept = my - slope * mx;

    let ss_tot = sum_of_squares(ys, my);
    let ss_res: f64 = xs
        .iter()
        .zip(ys)
        .map(|(x, y)| (y - (intercept + slope * x)).powi(2))
        .sum();
    let r_squared = if ss_tot > 0.0 { 1.0 - ss_res / ss_tot } else { 1.0 };

    let df = xs.len() as f64 - 2.0;
    let (std_err, p_value) = if df >= 1.0 {
        let std_err = (ss_res / df / sxx).sqrt();
        let p_value = if std_err > 0.0 {
            student_t_two_sided(slope / std_err, df)
        } else if slope == 0.0 {
            1.0
        } else {
            0.0
        };
        (Some(std_err), Some(p_value))
    } else {
        (None, None)
    };

    Some(LinearFit {
        intercept,
        slope,
        r_squared,
        std_err,
        p_value,
    })
}

/// One-sided permutation p-value for a positive slope: the fraction of
/// `count` shuffles of `ys` whose refitted slope is at least the observed one.
pub fn permutation_slope_test(xs: &[f64], ys: &[f64], count: usize, seed: u64) -> Option<f64> {
    if count == 0 {
        return None;
    }
    let observed = linear_fit(xs, ys)?.slope;
    let tolerance = 1e-12 * observed.abs().max(1.0);

    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let mut shuffled = ys.to_vec();
    let mut at_least = 0usize;
    for _ in 0..count {
        shuffled.shuffle(&mut rng);
        let slope = linear_fit(xs, &shuffled)?.slope;
        if slope >= observed - tolerance {
            at_least += 1;
        }
    }
    Some(at_least as f64 / count as f64)
}

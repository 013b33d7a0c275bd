//! # Analysis Module
//!
//! Pure functions from completed validation trials to the aggregated study
//! results: per-length success rates, gap, ratio, effect size and rank test
//! ([`summary`]), the cross-length trend ([`trend`]), the primitives behind
//! them ([`statistics`]) and the on-disk report ([`report`]).

pub mod report;
pub mod statistics;
pub mod summary;
pub mod trend;

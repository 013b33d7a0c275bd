//! # Workflows Module
//!
//! The three entry points of a study, each one a complete phase:
//!
//! - **Pilot** ([`pilot`]) - Phase A: pilot trials, threshold calibration, lock
//! - **Validation** ([`validate`]) - Phase B: validation trials scored against the locked table
//! - **Analysis** ([`analyze`]) - Statistics and the aggregated reports
//!
//! Phases communicate only through the results directory described by
//! [`crate::core::io::layout::ResultsLayout`], so each can be rerun on its own.

pub mod analyze;
pub mod pilot;
pub mod validate;

//! # Engine Module
//!
//! The stateful layer: the two folding searches and the machinery that runs
//! them as independent, deterministically seeded trials.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Search, harness and statistics parameters with validation
//! - **Searches** ([`search`]) - Metropolis baseline and the elimination search with its paradox buffer
//! - **Trials** ([`trial`]) - Seeded single trials and ordered parallel batches
//! - **Thresholds** ([`thresholds`]) - Calibration of E*(L) from pilot energies
//! - **Randomness** ([`rng`]) - Per-trial seed derivation
//! - **Progress Monitoring** ([`progress`]) - Progress reporting callbacks
//! - **Error Handling** ([`error`]) - Engine-level error taxonomy

pub mod config;
pub mod error;
pub mod progress;
pub mod rng;
pub mod search;
pub mod thresholds;
pub mod trial;

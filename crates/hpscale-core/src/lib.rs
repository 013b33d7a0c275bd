//! # HP-Scale Core Library
//!
//! A deterministic scaling study of two stochastic folding searches on the
//! 3-D hydrophobic-polar (HP) lattice model: a fixed-temperature Metropolis
//! search ("MC") and a population search with truncation selection and a
//! paradox buffer ("FE").
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict layering, leaf first:
//!
//! - **[`core`]: The Foundation.** Sequences, conformations, the contact
//!   energy and the validity-preserving move set, trial records, the
//!   threshold table state machine, and their file formats.
//!
//! - **[`engine`]: The Logic Core.** The two searches, with their random
//!   streams threaded explicitly, and the machinery that runs them as
//!   independent seeded trials, in parallel when the `parallel` feature is on.
//!
//! - **[`analysis`]: The Statistics.** Wilson intervals, gap and ratio,
//!   Cohen's d, the one-sided Mann-Whitney test, and the permutation-tested
//!   trend of the gap across chain lengths.
//!
//! - **[`workflows`]: The Public API.** Pilot, validation and analysis, the
//!   three phases of a study. Validation refuses to start until the pilot has
//!   locked a threshold for every length.

pub mod analysis;
pub mod core;
pub mod engine;
pub mod workflows;

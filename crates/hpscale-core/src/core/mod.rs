//! # Core Module
//!
//! The foundation layer: stateless data models, the HP lattice energy model and
//! its move set, and persistence of trial records and thresholds.
//!
//! ## Architecture
//!
//! - **Models** ([`models`]) - Sequences, conformations, trial records, threshold table
//! - **Lattice** ([`lattice`]) - Contact energy and validity-preserving local moves
//! - **File I/O** ([`io`]) - CSV trial logs, TOML threshold artifacts, instance files

pub mod io;
pub mod lattice;
pub mod models;

//! # Core Models Module
//!
//! Plain data structures of the HP lattice study. Nothing in here runs a search;
//! these types are produced and consumed by the [`crate::engine`] and
//! [`crate::analysis`] layers.
//!
//! ## Key Components
//!
//! - [`sequence`] - Monomer alphabet (`H`/`P`) and immutable chains
//! - [`conformation`] - Placements of a chain on the cubic lattice and their invariants
//! - [`instance`] - One sequence per chain length
//! - [`trial`] - Completed-trial records and algorithm/phase identifiers
//! - [`thresholds`] - The pilot-calibrated success thresholds and their lock state
//!
//! ```ignore
//! use hpscale::core::models::{conformation::Conformation, sequence::Sequence};
//!
//! let sequence: Sequence = "HPPHPH".parse()?;
//! let conformation = Conformation::straight(sequence.len());
//! assert!(conformation.is_valid());
//! ```

pub mod conformation;
pub mod instance;
pub mod sequence;
pub mod thresholds;
pub mod trial;

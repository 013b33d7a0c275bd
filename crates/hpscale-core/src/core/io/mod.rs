//! Persistence of study artifacts.
//!
//! Trial records are appended to CSV files as trials complete; the locked
//! threshold table round-trips through TOML; instance sequences are stored as
//! one plain-text `H`/`P` string per file.

pub mod error;
pub mod instances;
pub mod layout;
pub mod thresholds;
pub mod traits;
pub mod trials;

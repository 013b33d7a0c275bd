use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Algorithm {
    /// Metropolis local search, the reference strategy.
    #[serde(rename = "MC")]
    Baseline,
    /// Population search with truncation selection and paradox retention.
    #[serde(rename = "FE")]
    Elimination,
}

impl Algorithm {
    pub const ALL: [Algorithm; 2] = [Algorithm::Baseline, Algorithm::Elimination];

    pub fn label(self) -> &'static str {
        match self {
            Algorithm::Baseline => "MC",
            Algorithm::Elimination => "FE",
        }
    }

    pub(crate) fn seed_tag(self) -> u64 {
        match self {
            Algorithm::Baseline => 0x4D43,
            Algorithm::Elimination => 0x4645,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    Pilot,
    Validation,
}

impl Phase {
    pub fn label(self) -> &'static str {
        match self {
            Phase::Pilot => "A",
            Phase::Validation => "B",
        }
    }

    pub(crate) fn seed_tag(self) -> u64 {
        match self {
            Phase::Pilot => 0xA,
            Phase::Validation => 0xB,
        }
    }
}

/// The immutable record of one completed search invocation.
///
/// `success` is `None` for pilot trials, which run before any threshold exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trial {
    pub length: usize,
    pub algorithm: Algorithm,
    #[serde(rename = "trial_id")]
    pub trial_index: usize,
    pub seed: u64,
    pub final_energy: i32,
    #[serde(rename = "success_flag", with = "success_flag")]
    pub success: Option<bool>,
    pub iterations: usize,
    pub runtime_ms: f64,
    pub paradox_activity: usize,
}

/// `success_flag` is written as `1`/`0`, empty for pilot rows.
mod success_flag {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(flag: &Option<bool>, serializer: S) -> Result<S::Ok, S::Error> {
        match flag {
            Some(flag) => serializer.serialize_some(&u8::from(*flag)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
        match Option::<u8>::deserialize(deserializer)? {
            None => Ok(None),
            Some(0) => Ok(Some(false)),
            Some(1) => Ok(Some(true)),
            Some(other) => Err(D::Error::custom(format!(
                "success_flag must be 0 or 1, got {other}"
            ))),
        }
    }
}

impl Trial {
    /// Everything except wall time, which is the only non-reproducible field.
    pub fn outcome_key(&self) -> (usize, Algorithm, usize, u64, i32, Option<bool>, usize, usize) {
        (
            self.length,
            self.algorithm,
            self.trial_index,
            self.seed,
            self.final_energy,
            self.success,
            self.iterations,
            self.paradox_activity,
        )
    }

    pub fn is_success(&self) -> bool {
        self.success.unwrap_or(false)
    }
}

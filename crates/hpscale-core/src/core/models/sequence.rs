use rand::Rng;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum SequenceError {
    #[error("Invalid monomer token '{token}' at position {position}. Expected 'H' or 'P'")]
    InvalidMonomer { token: String, position: usize },

    #[error("Sequence is empty")]
    Empty,

    #[error("More than one instance given for length {length}")]
    DuplicateLength { length: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Monomer {
    Hydrophobic, // H
    Polar,       // P
}

impl Monomer {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "H" | "h" => Some(Monomer::Hydrophobic),
            "P" | "p" => Some(Monomer::Polar),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Monomer::Hydrophobic => 'H',
            Monomer::Polar => 'P',
        }
    }

    #[inline]
    pub fn is_hydrophobic(self) -> bool {
        matches!(self, Monomer::Hydrophobic)
    }
}

/// An immutable chain of monomers. Its length defines the problem size `L`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sequence {
    monomers: Vec<Monomer>,
}

impl Sequence {
    pub fn new(monomers: Vec<Monomer>) -> Result<Self, SequenceError> {
        if monomers.is_empty() {
            return Err(SequenceError::Empty);
        }
        Ok(Self { monomers })
    }

    /// Parses a sequence from text.
    ///
    /// Accepts a compact form (`"HPPH"`) as well as tokens separated by
    /// whitespace or commas (`"H, P, P, H"`).
    pub fn parse(text: &str) -> Result<Self, SequenceError> {
        let tokens: Vec<&str> = if text.contains(|c: char| c.is_whitespace() || c == ',') {
            text.split(|c: char| c.is_whitespace() || c == ',')
                .filter(|t| !t.is_empty())
                .collect()
        } else {
            text.char_indices()
                .map(|(i, c)| &text[i..i + c.len_utf8()])
                .collect()
        };

        let monomers = tokens
            .iter()
            .enumerate()
            .map(|(position, token)| {
                Monomer::from_token(token).ok_or_else(|| SequenceError::InvalidMonomer {
                    token: token.to_string(),
                    position,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(monomers)
    }

    /// Draws a random sequence with each monomer hydrophobic with probability 0.5.
    pub fn generate<R: Rng + ?Sized>(length: usize, rng: &mut R) -> Result<Self, SequenceError> {
        let monomers = (0..length)
            .map(|_| {
                if rng.gen_bool(0.5) {
                    Monomer::Hydrophobic
                } else {
                    Monomer::Polar
                }
            })
            .collect();
        Self::new(monomers)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.monomers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.monomers.is_empty()
    }

    #[inline]
    pub fn monomers(&self) -> &[Monomer] {
        &self.monomers
    }

    #[inline]
    pub fn is_hydrophobic(&self, index: usize) -> bool {
        self.monomers[index].is_hydrophobic()
    }

    pub fn hydrophobic_count(&self) -> usize {
        self.monomers.iter().filter(|m| m.is_hydrophobic()).count()
    }
}

impl FromStr for Sequence {
    type Err = SequenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s.trim())
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for monomer in &self.monomers {
            write!(f, "{}", monomer.to_char())?;
        }
        Ok(())
    }
}

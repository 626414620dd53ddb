use std::fmt::{Display, Formatter};

use derive_more::Deref;
use serde::{Deserialize, Serialize};

/// Number of nucleotides making up a single codon.
pub const CODON_LEN: usize = 3;

/// A single codon, i.e. a token of [`CODON_LEN`] characters.
///
/// The contents are opaque: no case normalization or alphabet validation is
/// done, so `"AAA"` and `"aaa"` are two distinct codons.
#[derive(Deref, Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Codon(String);

impl Codon {
    /// Creates a new `Codon`.
    ///
    /// # Examples
    /// ```
    /// use minmax::codon::Codon;
    ///
    /// let codon = Codon::new("ATG");
    /// assert_eq!(codon.str(), "ATG");
    /// ```
    #[must_use]
    pub fn new<T: Into<String>>(value: T) -> Self {
        Self(value.into())
    }

    /// Returns this codon as string.
    #[inline]
    #[must_use]
    pub fn str(&self) -> &str {
        &self.0
    }
}

impl Display for Codon {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Codon {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for Codon {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Identifier of an amino acid, as used in a codon usage table (e.g. `Lys`,
/// `K`, or `*` for stop codons).
#[derive(Deref, Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AminoAcid(String);

impl AminoAcid {
    #[must_use]
    pub fn new<T: Into<String>>(value: T) -> Self {
        Self(value.into())
    }

    #[inline]
    #[must_use]
    pub fn str(&self) -> &str {
        &self.0
    }
}

impl Display for AminoAcid {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AminoAcid {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for AminoAcid {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[cfg(test)]
mod tests {
    use crate::codon::{AminoAcid, Codon};

    #[test]
    fn test_codon_display() {
        assert_eq!(format!("{}", Codon::from("ATG")), "ATG");
        assert_eq!(format!("{}", AminoAcid::from("Met")), "Met");
    }

    #[test]
    fn codon_is_case_sensitive() {
        assert_ne!(Codon::from("aaa"), Codon::from("AAA"));
    }

    #[test]
    fn codon_derefs_to_str() {
        let codon = Codon::new(String::from("GGC"));

        assert_eq!(codon.len(), 3);
        assert!(codon.starts_with("GG"));
    }
}

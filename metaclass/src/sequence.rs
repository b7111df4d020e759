use std::fmt::{Display, Formatter};
use std::hash::Hash;

use serde::{Deserialize, Serialize};

pub trait Symbol: PartialEq + Eq + Hash + Copy {
    const SIZE: usize;

    fn to_usize(&self) -> usize;
    fn from_usize(value: usize) -> Self;

    fn values() -> Vec<Self> {
        (0..Self::SIZE).map(|value| Self::from_usize(value)).collect()
    }
}

/// Identifier (title/name) of a nucleotide sequence.
///
/// Identifiers are opaque: two sequences may share the same identifier and
/// are still treated as independent entries.
#[derive(Debug, Eq, PartialEq, Hash, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NucleotideSequenceIdentifier(pub String);

impl NucleotideSequenceIdentifier {
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns this identifier as string.
    #[inline]
    #[must_use]
    pub fn str(&self) -> &str {
        &self.0
    }
}

impl Display for NucleotideSequenceIdentifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NucleotideSequenceIdentifier {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for NucleotideSequenceIdentifier {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Nucleotide sequence: an identifier and the list of its acids.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NucleotideSequence {
    identifier: NucleotideSequenceIdentifier,
    acids: Vec<Acid>,
}

impl NucleotideSequence {
    /// Creates a new instance of `NucleotideSequence`.
    ///
    /// # Examples
    /// ```
    /// use metaclass::sequence::{Acid, NucleotideSequence};
    ///
    /// let seq = NucleotideSequence::new("SEQ_1", [Acid::A, Acid::C, Acid::G]);
    /// assert_eq!(seq.len(), 3);
    /// ```
    #[must_use]
    pub fn new<T, U>(identifier: T, acids: U) -> Self
    where
        T: Into<NucleotideSequenceIdentifier>,
        U: Into<Vec<Acid>>,
    {
        Self {
            identifier: identifier.into(),
            acids: acids.into(),
        }
    }

    /// Returns the identifier of this sequence.
    ///
    /// # Examples
    /// ```
    /// use metaclass::sequence::{NucleotideSequence, NucleotideSequenceIdentifier};
    ///
    /// let seq = NucleotideSequence::new("SEQ_1", []);
    /// assert_eq!(
    ///     seq.identifier(),
    ///     &NucleotideSequenceIdentifier::from("SEQ_1")
    /// );
    /// ```
    #[must_use]
    pub fn identifier(&self) -> &NucleotideSequenceIdentifier {
        &self.identifier
    }

    /// Returns the list of acids of this sequence.
    ///
    /// # Examples
    /// ```
    /// use metaclass::sequence::{Acid, NucleotideSequence};
    ///
    /// let seq = NucleotideSequence::new("", [Acid::A]);
    /// assert_eq!(seq.acids(), &[Acid::A]);
    /// ```
    #[must_use]
    pub fn acids(&self) -> &[Acid] {
        &self.acids
    }

    /// Consumes this sequence and returns its identifier and acids.
    #[must_use]
    pub fn into_data(self) -> (NucleotideSequenceIdentifier, Vec<Acid>) {
        (self.identifier, self.acids)
    }

    /// Returns the length (i.e. number of acids) of the sequence.
    #[must_use]
    pub fn len(&self) -> usize {
        self.acids.len()
    }

    /// Returns `true` if the sequence contains no acids.
    ///
    /// # Examples
    /// ```
    /// use metaclass::sequence::{Acid, NucleotideSequence};
    ///
    /// let seq = NucleotideSequence::new("", []);
    /// assert_eq!(seq.is_empty(), true);
    /// let seq = NucleotideSequence::new("", [Acid::A]);
    /// assert_eq!(seq.is_empty(), false);
    /// ```
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.acids.is_empty()
    }
}

/// Nucleic acid, including the IUPAC ambiguity codes.
///
/// The four canonical DNA bases come first, so that their symbol codes are
/// `0..4`.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[repr(u8)]
pub enum Acid {
    /// Adenine.
    A,
    /// Cytosine.
    C,
    /// Guanine.
    G,
    /// Thymine.
    T,
    /// Uracil.
    U,
    /// Purine (A or G).
    R,
    /// Pyrimidine (C or T).
    Y,
    /// Strong (C or G).
    S,
    /// Weak (A or T).
    W,
    /// Keto (G or T).
    K,
    /// Amino (A or C).
    M,
    /// Not A.
    B,
    /// Not C.
    D,
    /// Not G.
    H,
    /// Not T.
    V,
    #[default]
    /// Any nucleic acid.
    N,
}

impl Acid {
    pub(crate) const VALUES: [Acid; 16] = [
        Acid::A,
        Acid::C,
        Acid::G,
        Acid::T,
        Acid::U,
        Acid::R,
        Acid::Y,
        Acid::S,
        Acid::W,
        Acid::K,
        Acid::M,
        Acid::B,
        Acid::D,
        Acid::H,
        Acid::V,
        Acid::N,
    ];

    /// Returns whether this is one of the four canonical DNA bases.
    ///
    /// # Examples
    /// ```
    /// use metaclass::sequence::Acid;
    ///
    /// assert!(Acid::G.is_canonical());
    /// assert!(!Acid::N.is_canonical());
    /// ```
    #[inline]
    #[must_use]
    pub fn is_canonical(&self) -> bool {
        matches!(self, Acid::A | Acid::C | Acid::G | Acid::T)
    }

    #[must_use]
    pub fn as_char(&self) -> char {
        match self {
            Acid::A => 'A',
            Acid::C => 'C',
            Acid::G => 'G',
            Acid::T => 'T',
            Acid::U => 'U',
            Acid::R => 'R',
            Acid::Y => 'Y',
            Acid::S => 'S',
            Acid::W => 'W',
            Acid::K => 'K',
            Acid::M => 'M',
            Acid::B => 'B',
            Acid::D => 'D',
            Acid::H => 'H',
            Acid::V => 'V',
            Acid::N => 'N',
        }
    }
}

impl Symbol for Acid {
    const SIZE: usize = 16;

    #[inline]
    fn to_usize(&self) -> usize {
        *self as usize
    }

    #[inline]
    fn from_usize(value: usize) -> Self {
        Self::VALUES[value]
    }
}

impl Display for Acid {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

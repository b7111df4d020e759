use std::cmp::Ordering;
use std::error::Error;
use std::fmt::{Display, Formatter};

use derive_more::Deref;
use serde::{Deserialize, Serialize};

use crate::model::ContextModel;
use crate::sequence::{Acid, NucleotideSequenceIdentifier};

/// Number of bits per acid of a uniform four-letter code (`log2(4)`).
const BITS_PER_NUCLEOTIDE: f64 = 2.0;

/// Error occurring when scoring a single sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum ScoreError {
    /// The computed NRC is not a finite number.
    NonFiniteNrc(f64),
}

impl Display for ScoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoreError::NonFiniteNrc(value) => {
                write!(f, "Computed NRC is not a finite number: {}", value)
            }
        }
    }
}

impl Error for ScoreError {}

/// Normalized Relative Compression: the number of bits a model needs to
/// encode a sequence, relative to a plain two-bit-per-acid encoding.
///
/// Lower value means the sequence is more similar to the model's training
/// text. Values above `1.0` are possible when the model is actively
/// misleading.
#[derive(Deref, Copy, Clone, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Nrc(f64);

impl Nrc {
    /// NRC given to sequences too short to have any position scored.
    pub const CEILING: Nrc = Nrc(1.0);

    /// Creates a new `Nrc` value.
    ///
    /// # Panics
    /// This function panics if the value is not finite or negative.
    #[must_use]
    pub fn new(value: f64) -> Self {
        assert!(value.is_finite());
        assert!(value >= 0.0);

        Self(value)
    }

    #[inline]
    #[must_use]
    pub fn get(&self) -> f64 {
        self.0
    }
}

impl Display for Nrc {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6}", self.0)
    }
}

impl PartialEq for Nrc {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Nrc {}

impl PartialOrd for Nrc {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Nrc {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Computes the NRC of given sequence with given (trained) model.
///
/// Sequences not longer than the model order have no scored position and get
/// [`Nrc::CEILING`].
///
/// # Examples
/// ```
/// use metaclass::model::{ContextModel, ModelParams};
/// use metaclass::score::{compute_nrc, Nrc};
/// use metaclass::sequence::Acid::{A, C, G, T};
///
/// let params = ModelParams::new(2, 1.0).unwrap();
/// let model = ContextModel::trained(params, &[A, C, G, T, A, C, G, T, A, C, G, T]);
///
/// let similar = compute_nrc(&model, &[A, C, G, T, A, C, G, T]).unwrap();
/// let different = compute_nrc(&model, &[T, T, T, T, T, T, T, T]).unwrap();
/// assert!(similar < different);
/// assert_eq!(compute_nrc(&model, &[A, C]).unwrap(), Nrc::CEILING);
/// ```
pub fn compute_nrc(model: &ContextModel, sequence: &[Acid]) -> Result<Nrc, ScoreError> {
    let order = model.order();
    if sequence.len() <= order {
        return Ok(Nrc::CEILING);
    }

    let bits = model.compression_bits(sequence);
    let value = bits / (BITS_PER_NUCLEOTIDE * (sequence.len() - order) as f64);
    if !value.is_finite() {
        return Err(ScoreError::NonFiniteNrc(value));
    }

    Ok(Nrc::new(value))
}

/// Per-position cost (in bits) of encoding a sequence with a model.
#[derive(Deref, Clone, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ComplexityProfile(Vec<f64>);

impl ComplexityProfile {
    #[must_use]
    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }

    /// Sum of costs of all positions.
    #[must_use]
    pub fn total_bits(&self) -> f64 {
        self.0.iter().sum()
    }
}

/// Computes the complexity profile of given sequence: the number of bits
/// needed to encode each of its positions. The first `k` positions are zero.
#[must_use]
pub fn compute_complexity_profile(model: &ContextModel, sequence: &[Acid]) -> ComplexityProfile {
    ComplexityProfile(model.complexity_profile(sequence))
}

/// NRC of a single sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreResult {
    identifier: NucleotideSequenceIdentifier,
    nrc: Nrc,
    #[serde(skip)]
    index: usize,
}

impl ScoreResult {
    /// Creates a new `ScoreResult`. `index` is the position of the scored
    /// sequence in its collection.
    #[must_use]
    pub fn new<T: Into<NucleotideSequenceIdentifier>>(identifier: T, nrc: Nrc, index: usize) -> Self {
        Self {
            identifier: identifier.into(),
            nrc,
            index,
        }
    }

    #[must_use]
    pub fn identifier(&self) -> &NucleotideSequenceIdentifier {
        &self.identifier
    }

    #[must_use]
    pub fn nrc(&self) -> Nrc {
        self.nrc
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }
}

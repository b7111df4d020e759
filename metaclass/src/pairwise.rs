use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

use log::{debug, info};

use crate::model::{ContextModel, ModelParams};
use crate::progress::{DummyProgressNotifier, ProgressNotifier};
use crate::score::{compute_nrc, Nrc, ScoreError};
use crate::sequence::{NucleotideSequence, NucleotideSequenceIdentifier};

/// Error occurring when computing a similarity matrix.
#[derive(Debug, Clone, PartialEq)]
pub enum PairwiseError {
    /// Scoring the column sequence with the row sequence model failed.
    ScoreError {
        row: NucleotideSequenceIdentifier,
        column: NucleotideSequenceIdentifier,
        error: ScoreError,
    },
}

impl Display for PairwiseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PairwiseError::ScoreError { row, column, error } => write!(
                f,
                "Could not score `{}` with the model of `{}`: {}",
                column, row, error
            ),
        }
    }
}

impl Error for PairwiseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PairwiseError::ScoreError { error, .. } => Some(error),
        }
    }
}

/// Square matrix of NRC values. Entry `(i, j)` is the NRC of sequence `j`
/// scored with the model trained on sequence `i`; the matrix is generally not
/// symmetric.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    identifiers: Vec<NucleotideSequenceIdentifier>,
    values: Vec<Vec<Nrc>>,
}

impl SimilarityMatrix {
    #[must_use]
    pub fn identifiers(&self) -> &[NucleotideSequenceIdentifier] {
        &self.identifiers
    }

    #[must_use]
    pub fn get(&self, row: usize, column: usize) -> Nrc {
        self.values[row][column]
    }

    #[must_use]
    pub fn row(&self, row: usize) -> &[Nrc] {
        &self.values[row]
    }

    pub fn rows(&self) -> impl Iterator<Item = (&NucleotideSequenceIdentifier, &[Nrc])> {
        self.identifiers
            .iter()
            .zip(self.values.iter().map(Vec::as_slice))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.identifiers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty()
    }
}

/// Computes cross NRC values between sequences: one model is trained per
/// sequence and used to score every sequence, including itself.
#[derive(Debug, Clone)]
pub struct PairwiseComparator {
    params: ModelParams,
    progress_notifier: Arc<dyn ProgressNotifier>,
}

impl PairwiseComparator {
    #[must_use]
    pub fn new(params: ModelParams) -> Self {
        Self {
            params,
            progress_notifier: Arc::new(DummyProgressNotifier),
        }
    }

    #[must_use]
    pub fn with_progress_notifier(self, progress_notifier: Arc<dyn ProgressNotifier>) -> Self {
        Self {
            progress_notifier,
            ..self
        }
    }

    /// Computes the similarity matrix of given sequences.
    ///
    /// # Examples
    /// ```
    /// use metaclass::model::ModelParams;
    /// use metaclass::pairwise::PairwiseComparator;
    /// use metaclass::sequence::Acid::{A, C, G, T};
    /// use metaclass::sequence::NucleotideSequence;
    ///
    /// let first = NucleotideSequence::new("first", [A, C, A, C, A, C]);
    /// let second = NucleotideSequence::new("second", [G, T, G, T, G, T]);
    ///
    /// let comparator = PairwiseComparator::new(ModelParams::new(1, 1.0).unwrap());
    /// let matrix = comparator.compare(&[&first, &second]).unwrap();
    /// assert_eq!(matrix.len(), 2);
    /// assert!(matrix.get(0, 0) < matrix.get(0, 1));
    /// ```
    pub fn compare(
        &self,
        sequences: &[&NucleotideSequence],
    ) -> Result<SimilarityMatrix, PairwiseError> {
        info!(
            "Computing {0}x{0} similarity matrix ({1})",
            sequences.len(),
            self.params
        );
        self.progress_notifier.set_iter_num(sequences.len() as u64);

        let mut model = ContextModel::new(self.params);
        let mut values = Vec::with_capacity(sequences.len());
        for row in sequences {
            model.train(row.acids());
            values.push(self.score_row(&model, row, sequences)?);
            debug!("Similarity matrix row `{}` done", row.identifier());
            self.progress_notifier.inc_iter();
        }

        Ok(SimilarityMatrix {
            identifiers: sequences
                .iter()
                .map(|sequence| sequence.identifier().clone())
                .collect(),
            values,
        })
    }

    fn score_row(
        &self,
        model: &ContextModel,
        row: &NucleotideSequence,
        sequences: &[&NucleotideSequence],
    ) -> Result<Vec<Nrc>, PairwiseError> {
        sequences
            .iter()
            .map(|column| {
                compute_nrc(model, column.acids()).map_err(|error| PairwiseError::ScoreError {
                    row: row.identifier().clone(),
                    column: column.identifier().clone(),
                    error,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::_internal_test_data::SIMPLE_DATABASE;
    use crate::model::{ContextModel, ModelParams};
    use crate::pairwise::{PairwiseComparator, PairwiseError};
    use crate::score::{compute_nrc, Nrc, ScoreError};

    #[test]
    fn test_diagonal_is_self_compression() {
        let params = ModelParams::new(2, 0.5).unwrap();
        let sequences: Vec<_> = SIMPLE_DATABASE.iter().collect();

        let matrix = PairwiseComparator::new(params).compare(&sequences).unwrap();

        assert_eq!(matrix.len(), sequences.len());
        for (i, sequence) in sequences.iter().enumerate() {
            let model = ContextModel::trained(params, sequence.acids());
            assert_eq!(matrix.get(i, i), compute_nrc(&model, sequence.acids()).unwrap());
            assert_eq!(matrix.identifiers()[i], *sequence.identifier());
        }
    }

    #[test]
    fn test_cells_match_direct_scoring() {
        let params = ModelParams::new(1, 1.0).unwrap();
        let sequences: Vec<_> = SIMPLE_DATABASE.iter().take(3).collect();

        let matrix = PairwiseComparator::new(params).compare(&sequences).unwrap();

        for (i, (identifier, row)) in matrix.rows().enumerate() {
            assert_eq!(identifier, sequences[i].identifier());
            let model = ContextModel::trained(params, sequences[i].acids());
            for (j, &value) in row.iter().enumerate() {
                assert_eq!(value, compute_nrc(&model, sequences[j].acids()).unwrap());
            }
        }
    }

    #[test]
    fn test_short_sequences_get_ceiling() {
        let params = ModelParams::new(16, 1.0).unwrap();
        let sequences: Vec<_> = SIMPLE_DATABASE.iter().collect();

        let matrix = PairwiseComparator::new(params).compare(&sequences).unwrap();

        let short = SIMPLE_DATABASE
            .iter()
            .position(|sequence| sequence.len() <= 16)
            .unwrap();
        assert!(matrix.row(0).iter().any(|&value| value < Nrc::CEILING));
        for row in 0..matrix.len() {
            assert_eq!(matrix.get(row, short), Nrc::CEILING);
        }
    }

    #[test]
    fn test_empty_input() {
        let params = ModelParams::new(3, 1.0).unwrap();

        let matrix = PairwiseComparator::new(params).compare(&[]).unwrap();

        assert!(matrix.is_empty());
    }

    #[test]
    fn test_error_display() {
        let error = PairwiseError::ScoreError {
            row: "ROW".into(),
            column: "COL".into(),
            error: ScoreError::NonFiniteNrc(f64::NAN),
        };

        assert_eq!(
            error.to_string(),
            "Could not score `COL` with the model of `ROW`: Computed NRC is not a finite number: NaN"
        );
    }
}

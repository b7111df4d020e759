use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

use log::{debug, info, warn};
use serde::Serialize;

use crate::model::{ContextModel, ModelParams};
use crate::progress::{DummyProgressNotifier, ProgressNotifier};
use crate::score::{compute_nrc, ScoreError, ScoreResult};
use crate::sequence::{Acid, NucleotideSequence, NucleotideSequenceIdentifier};

/// Error returned when trying to rank with invalid parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RankingError {
    /// Requested to select zero best sequences.
    ZeroTopN,
}

impl Display for RankingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RankingError::ZeroTopN => write!(f, "Number of top sequences must be positive"),
        }
    }
}

impl Error for RankingError {}

#[derive(Debug, Clone)]
pub struct RankingParams {
    top_n: usize,
    progress_notifier: Arc<dyn ProgressNotifier>,
}

impl RankingParams {
    pub fn builder() -> RankingParamsBuilder {
        RankingParamsBuilder::new()
    }

    #[must_use]
    pub fn top_n(&self) -> usize {
        self.top_n
    }
}

#[derive(Debug, Clone)]
pub struct RankingParamsBuilder {
    top_n: usize,
    progress_notifier: Arc<dyn ProgressNotifier>,
}

impl RankingParamsBuilder {
    pub fn new() -> Self {
        Self {
            top_n: 10,
            progress_notifier: Arc::new(DummyProgressNotifier),
        }
    }

    pub fn top_n(&mut self, top_n: usize) -> &mut Self {
        let mut new = self;
        new.top_n = top_n;
        new
    }

    pub fn progress_notifier(&mut self, progress_notifier: Arc<dyn ProgressNotifier>) -> &mut Self {
        let mut new = self;
        new.progress_notifier = progress_notifier;
        new
    }

    pub fn build(&mut self) -> Result<RankingParams, RankingError> {
        if self.top_n == 0 {
            return Err(RankingError::ZeroTopN);
        }

        Ok(RankingParams {
            top_n: self.top_n,
            progress_notifier: self.progress_notifier.clone(),
        })
    }
}

impl Default for RankingParamsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Database sequence that could not be scored and was left out of the
/// ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct ExcludedSequence {
    identifier: NucleotideSequenceIdentifier,
    reason: ScoreError,
}

impl ExcludedSequence {
    #[must_use]
    pub fn identifier(&self) -> &NucleotideSequenceIdentifier {
        &self.identifier
    }

    #[must_use]
    pub fn reason(&self) -> &ScoreError {
        &self.reason
    }
}

impl Display for ExcludedSequence {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.identifier, self.reason)
    }
}

/// Mean, minimum and maximum of a list of NRC values.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct NrcSummary {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

impl NrcSummary {
    /// Summarizes given results. Returns `None` if there are none.
    ///
    /// # Examples
    /// ```
    /// use metaclass::ranking::NrcSummary;
    /// use metaclass::score::{Nrc, ScoreResult};
    ///
    /// let results = [
    ///     ScoreResult::new("a", Nrc::new(0.5), 0),
    ///     ScoreResult::new("b", Nrc::new(1.0), 1),
    /// ];
    /// let summary = NrcSummary::from_results(&results).unwrap();
    /// assert_eq!(summary.mean, 0.75);
    /// assert_eq!(summary.min, 0.5);
    /// assert_eq!(summary.max, 1.0);
    /// assert_eq!(summary.count, 2);
    ///
    /// assert_eq!(NrcSummary::from_results(&[]), None);
    /// ```
    #[must_use]
    pub fn from_results(results: &[ScoreResult]) -> Option<Self> {
        if results.is_empty() {
            return None;
        }

        let values = results.iter().map(|result| result.nrc().get());
        let sum: f64 = values.clone().sum();
        let min = values.clone().fold(f64::INFINITY, f64::min);
        let max = values.fold(f64::NEG_INFINITY, f64::max);

        Some(Self {
            mean: sum / results.len() as f64,
            min,
            max,
            count: results.len(),
        })
    }
}

/// Database sequences sorted by their NRC, ascending (most similar first).
#[derive(Debug, Clone)]
pub struct Ranking {
    scored: Vec<ScoreResult>,
    excluded: Vec<ExcludedSequence>,
    top_n: usize,
}

impl Ranking {
    fn new(mut scored: Vec<ScoreResult>, excluded: Vec<ExcludedSequence>, top_n: usize) -> Self {
        // stable: equal NRC keep database order
        scored.sort_by_key(ScoreResult::nrc);

        Self {
            scored,
            excluded,
            top_n,
        }
    }

    /// Returns at most `top_n` best results.
    #[must_use]
    pub fn top(&self) -> &[ScoreResult] {
        &self.scored[..self.top_n.min(self.scored.len())]
    }

    /// Returns all scored results.
    #[must_use]
    pub fn all(&self) -> &[ScoreResult] {
        &self.scored
    }

    #[must_use]
    pub fn excluded(&self) -> &[ExcludedSequence] {
        &self.excluded
    }

    #[must_use]
    pub fn top_n(&self) -> usize {
        self.top_n
    }

    /// Returns the summary of all scored results (not only the top ones).
    #[must_use]
    pub fn summary(&self) -> Option<NrcSummary> {
        NrcSummary::from_results(&self.scored)
    }

    /// Returns the sequences of the top results, looked up in the database
    /// the ranking was created from.
    ///
    /// # Panics
    /// This function panics if given database is not the one this ranking
    /// was created from.
    #[must_use]
    pub fn top_sequences<'a>(&self, database: &'a [NucleotideSequence]) -> Vec<&'a NucleotideSequence> {
        self.top()
            .iter()
            .map(|result| {
                let sequence = &database[result.index()];
                assert_eq!(sequence.identifier(), result.identifier());
                sequence
            })
            .collect()
    }
}

/// Scores every sequence of the database with given model.
///
/// Sequences whose score cannot be computed are returned separately instead
/// of failing the whole batch.
pub fn score_database(
    model: &ContextModel,
    database: &[NucleotideSequence],
    progress_notifier: &dyn ProgressNotifier,
) -> (Vec<ScoreResult>, Vec<ExcludedSequence>) {
    let mut scored = Vec::with_capacity(database.len());
    let mut excluded = Vec::new();

    progress_notifier.set_iter_num(database.len() as u64);
    for (index, sequence) in database.iter().enumerate() {
        if sequence.len() <= model.order() {
            debug!(
                "Sequence `{}` not longer than the context order ({} <= {}), using NRC ceiling",
                sequence.identifier(),
                sequence.len(),
                model.order()
            );
        }

        match compute_nrc(model, sequence.acids()) {
            Ok(nrc) => scored.push(ScoreResult::new(sequence.identifier().clone(), nrc, index)),
            Err(reason) => {
                warn!("Excluding sequence `{}`: {}", sequence.identifier(), reason);
                excluded.push(ExcludedSequence {
                    identifier: sequence.identifier().clone(),
                    reason,
                });
            }
        }
        progress_notifier.inc_iter();
    }

    (scored, excluded)
}

/// Scores every database sequence with given model and ranks them.
///
/// # Examples
/// ```
/// use metaclass::model::{ContextModel, ModelParams};
/// use metaclass::ranking::rank;
/// use metaclass::sequence::Acid::{A, C, G, T};
/// use metaclass::sequence::NucleotideSequence;
///
/// let params = ModelParams::new(1, 1.0).unwrap();
/// let model = ContextModel::trained(params, &[A, C, A, C, A, C, A, C]);
/// let database = [
///     NucleotideSequence::new("far", [G, T, G, T, G, T]),
///     NucleotideSequence::new("close", [A, C, A, C, A, C]),
/// ];
///
/// let ranking = rank(&model, &database, 1).unwrap();
/// assert_eq!(ranking.top().len(), 1);
/// assert_eq!(ranking.top()[0].identifier().str(), "close");
/// ```
pub fn rank(
    model: &ContextModel,
    database: &[NucleotideSequence],
    top_n: usize,
) -> Result<Ranking, RankingError> {
    if top_n == 0 {
        return Err(RankingError::ZeroTopN);
    }

    let (scored, excluded) = score_database(model, database, &DummyProgressNotifier);
    Ok(Ranking::new(scored, excluded, top_n))
}

/// Trains the sample model and ranks database sequences against it.
#[derive(Debug, Clone)]
pub struct RankingOrchestrator {
    model_params: ModelParams,
    params: RankingParams,
}

impl RankingOrchestrator {
    #[must_use]
    pub fn new(model_params: ModelParams, params: RankingParams) -> Self {
        Self {
            model_params,
            params,
        }
    }

    #[must_use]
    pub fn model_params(&self) -> ModelParams {
        self.model_params
    }

    #[must_use]
    pub fn params(&self) -> &RankingParams {
        &self.params
    }

    /// Builds the sample model.
    #[must_use]
    pub fn train(&self, sample: &[Acid]) -> ContextModel {
        info!(
            "Training sample model ({}) on {} acids",
            self.model_params,
            sample.len()
        );
        ContextModel::trained(self.model_params, sample)
    }

    /// Scores every database sequence with given (sample) model and ranks
    /// the results.
    #[must_use]
    pub fn rank_with(&self, model: &ContextModel, database: &[NucleotideSequence]) -> Ranking {
        info!("Scoring {} database sequences", database.len());
        let (scored, excluded) =
            score_database(model, database, self.params.progress_notifier.as_ref());

        if !excluded.is_empty() {
            warn!(
                "{} of {} sequences excluded from the ranking",
                excluded.len(),
                database.len()
            );
        }

        Ranking::new(scored, excluded, self.params.top_n)
    }

    /// Trains the sample model, scores and ranks the database.
    #[must_use]
    pub fn rank(&self, sample: &[Acid], database: &[NucleotideSequence]) -> Ranking {
        let model = self.train(sample);
        self.rank_with(&model, database)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::_internal_test_data::{acids_from_str, PERIODIC_SAMPLE, SIMPLE_DATABASE};
    use crate::model::{ContextModel, ModelParams};
    use crate::progress::DummyProgressNotifier;
    use crate::ranking::{rank, RankingError, RankingOrchestrator, RankingParams};
    use crate::score::{compute_nrc, Nrc};
    use crate::sequence::NucleotideSequence;

    fn periodic_model() -> ContextModel {
        ContextModel::trained(ModelParams::new(2, 1.0).unwrap(), &PERIODIC_SAMPLE)
    }

    #[test]
    fn test_rank_is_ascending() {
        let ranking = rank(&periodic_model(), &SIMPLE_DATABASE, 10).unwrap();

        assert_eq!(ranking.top().len(), SIMPLE_DATABASE.len());
        assert!(ranking.top().windows(2).all(|w| w[0].nrc() <= w[1].nrc()));
        assert_eq!(ranking.top()[0].identifier().str(), "PERIODIC");
        assert!(ranking.excluded().is_empty());
    }

    #[test]
    fn test_rank_caps_length() {
        let model = periodic_model();
        let full = rank(&model, &SIMPLE_DATABASE, 10).unwrap();
        let capped = rank(&model, &SIMPLE_DATABASE, 2).unwrap();

        assert_eq!(SIMPLE_DATABASE.len(), 5);
        assert_eq!(capped.top().len(), 2);
        assert_eq!(capped.top(), &full.top()[..2]);
        assert_eq!(capped.all().len(), 5);
    }

    #[test]
    fn test_rank_keeps_input_order_for_ties() {
        let database = [
            NucleotideSequence::new("first", acids_from_str("ACGTA")),
            NucleotideSequence::new("short", acids_from_str("A")),
            NucleotideSequence::new("second", acids_from_str("ACGTA")),
            NucleotideSequence::new("third", acids_from_str("ACGTA")),
        ];

        let ranking = rank(&periodic_model(), &database, 4).unwrap();
        let ids: Vec<_> = ranking
            .top()
            .iter()
            .map(|result| result.identifier().str())
            .collect();

        assert_eq!(ranking.top()[3].nrc(), Nrc::CEILING);
        assert_eq!(ids, ["first", "second", "third", "short"]);
    }

    #[test]
    fn test_rank_zero_top_n() {
        assert_eq!(
            rank(&periodic_model(), &SIMPLE_DATABASE, 0).unwrap_err(),
            RankingError::ZeroTopN
        );
        assert_eq!(
            RankingParams::builder().top_n(0).build().unwrap_err(),
            RankingError::ZeroTopN
        );
    }

    #[test]
    fn test_rank_empty_database() {
        let ranking = rank(&periodic_model(), &[], 3).unwrap();

        assert!(ranking.top().is_empty());
        assert_eq!(ranking.summary(), None);
    }

    #[test]
    fn test_degenerate_sequences_stay_in_ranking() {
        let database = [
            NucleotideSequence::new("empty", []),
            NucleotideSequence::new("ok", acids_from_str("ACGTACGT")),
        ];

        let ranking = rank(&periodic_model(), &database, 5).unwrap();

        assert_eq!(ranking.top().len(), 2);
        assert_eq!(ranking.top()[1].identifier().str(), "empty");
        assert_eq!(ranking.top()[1].nrc(), Nrc::CEILING);
    }

    #[test]
    fn test_orchestrator() {
        let params = RankingParams::builder()
            .top_n(3)
            .progress_notifier(Arc::new(DummyProgressNotifier))
            .build()
            .unwrap();
        let model_params = ModelParams::new(2, 1.0).unwrap();
        let orchestrator = RankingOrchestrator::new(model_params, params);

        let ranking = orchestrator.rank(&PERIODIC_SAMPLE, &SIMPLE_DATABASE);

        assert_eq!(ranking.top_n(), 3);
        assert_eq!(ranking.top().len(), 3);
        let model = orchestrator.train(&PERIODIC_SAMPLE);
        for result in ranking.all() {
            let sequence = &SIMPLE_DATABASE[result.index()];
            assert_eq!(result.nrc(), compute_nrc(&model, sequence.acids()).unwrap());
        }

        let top_sequences = ranking.top_sequences(&SIMPLE_DATABASE);
        assert_eq!(top_sequences.len(), 3);
        assert_eq!(top_sequences[0].identifier(), ranking.top()[0].identifier());
    }

    #[test]
    fn test_summary() {
        let ranking = rank(&periodic_model(), &SIMPLE_DATABASE, 1).unwrap();
        let summary = ranking.summary().unwrap();

        assert_eq!(summary.count, 5);
        assert_eq!(summary.min, ranking.all()[0].nrc().get());
        assert_eq!(summary.max, ranking.all()[4].nrc().get());
        assert!(summary.min <= summary.mean && summary.mean <= summary.max);
    }
}

use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

use log::debug;

use crate::context::{ContextCounter, Probability};
use crate::context_spec::{scored_positions, ContextSpec, MAX_ORDER};
use crate::sequence::Acid;

/// Lower bound of the effective alphabet size used for smoothing.
///
/// A sample that is too short (or degenerate) to contain all four canonical
/// nucleotides is still treated as DNA.
pub const MIN_EFFECTIVE_ALPHABET_SIZE: usize = 4;

/// Error returned when trying to create a model with invalid parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelParamsError {
    /// Context order is zero.
    ZeroOrder,
    /// Context order exceeds the maximum supported one.
    OrderTooLarge(usize),
    /// Smoothing constant is not a positive, finite number.
    InvalidAlpha(f64),
}

impl Display for ModelParamsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelParamsError::ZeroOrder => write!(f, "Context order must be positive"),
            ModelParamsError::OrderTooLarge(order) => write!(
                f,
                "Context order too large (order: {}, limit: {})",
                order, MAX_ORDER
            ),
            ModelParamsError::InvalidAlpha(alpha) => write!(
                f,
                "Smoothing constant must be a positive number (alpha: {})",
                alpha
            ),
        }
    }
}

impl Error for ModelParamsError {}

/// Parameters of a [`ContextModel`]: the context order `k` and the smoothing
/// constant `alpha`. Both are validated on construction and fixed afterwards.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ModelParams {
    order: usize,
    alpha: f64,
}

impl ModelParams {
    /// Creates new, validated `ModelParams`.
    ///
    /// # Examples
    /// ```
    /// use metaclass::model::{ModelParams, ModelParamsError};
    ///
    /// let params = ModelParams::new(3, 0.5).unwrap();
    /// assert_eq!(params.order(), 3);
    /// assert_eq!(params.alpha(), 0.5);
    ///
    /// assert_eq!(ModelParams::new(0, 0.5), Err(ModelParamsError::ZeroOrder));
    /// assert_eq!(
    ///     ModelParams::new(3, 0.0),
    ///     Err(ModelParamsError::InvalidAlpha(0.0))
    /// );
    /// ```
    pub fn new(order: usize, alpha: f64) -> Result<Self, ModelParamsError> {
        if order == 0 {
            return Err(ModelParamsError::ZeroOrder);
        }
        if order > MAX_ORDER {
            return Err(ModelParamsError::OrderTooLarge(order));
        }
        if !alpha.is_finite() || alpha <= 0.0 {
            return Err(ModelParamsError::InvalidAlpha(alpha));
        }

        Ok(Self { order, alpha })
    }

    #[inline]
    #[must_use]
    pub fn order(&self) -> usize {
        self.order
    }

    #[inline]
    #[must_use]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}

impl Display for ModelParams {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "k={}, alpha={}", self.order, self.alpha)
    }
}

/// Finite-context model: predicts the next acid from the `k` acids preceding
/// it.
///
/// The model keeps, for every context observed during training, how many
/// times each acid followed it. Probabilities are estimated with additive
/// smoothing:
///
/// `P(s | c) = (count(c, s) + alpha) / (total(c) + alpha * A)`
///
/// where `A` is the effective alphabet size: the number of distinct acids
/// observed during training, but not less than
/// [`MIN_EFFECTIVE_ALPHABET_SIZE`]. Contexts never observed have
/// `count = total = 0`.
#[derive(Debug, Clone)]
pub struct ContextModel {
    params: ModelParams,
    map: HashMap<ContextSpec, ContextCounter<Acid>>,
    alphabet: ContextCounter<Acid>,
    alphabet_size: usize,
}

impl ContextModel {
    /// Creates a new, untrained model. An untrained model assigns the
    /// probability `1 / 4` to every acid.
    #[must_use]
    pub fn new(params: ModelParams) -> Self {
        Self {
            params,
            map: HashMap::new(),
            alphabet: ContextCounter::new(),
            alphabet_size: MIN_EFFECTIVE_ALPHABET_SIZE,
        }
    }

    /// Creates a new model and trains it on given text.
    ///
    /// # Examples
    /// ```
    /// use metaclass::model::{ContextModel, ModelParams};
    /// use metaclass::sequence::Acid::{A, C, G, T};
    ///
    /// let params = ModelParams::new(2, 1.0).unwrap();
    /// let model = ContextModel::trained(params, &[A, C, G, T, A, C, G, T]);
    /// assert_eq!(model.context_num(), 4);
    /// assert_eq!(model.effective_alphabet_size(), 4);
    /// ```
    #[must_use]
    pub fn trained(params: ModelParams, text: &[Acid]) -> Self {
        let mut model = Self::new(params);
        model.train(text);
        model
    }

    /// Trains the model on given text, discarding everything learned before.
    pub fn train(&mut self, text: &[Acid]) {
        self.map.clear();
        self.alphabet = ContextCounter::new();

        for (_, context, acid) in scored_positions(self.params.order, text) {
            self.map.entry(context).or_default().add(acid);
            self.alphabet.add(acid);
        }
        self.alphabet_size = self
            .observed_alphabet()
            .len()
            .max(MIN_EFFECTIVE_ALPHABET_SIZE);

        debug!(
            "Trained model with {}: alphabet size: {}, unique contexts: {}",
            self.params,
            self.alphabet_size,
            self.context_num()
        );
    }

    #[inline]
    #[must_use]
    pub fn params(&self) -> ModelParams {
        self.params
    }

    #[inline]
    #[must_use]
    pub fn order(&self) -> usize {
        self.params.order
    }

    #[inline]
    #[must_use]
    pub fn alpha(&self) -> f64 {
        self.params.alpha
    }

    /// Returns the number of distinct contexts observed during training.
    #[inline]
    #[must_use]
    pub fn context_num(&self) -> usize {
        self.map.len()
    }

    /// Returns the acids observed as prediction targets during training.
    #[must_use]
    pub fn observed_alphabet(&self) -> Vec<Acid> {
        self.alphabet.observed()
    }

    /// Returns the total number of positions the model was trained on.
    #[must_use]
    pub fn trained_positions(&self) -> u64 {
        self.alphabet.total()
    }

    /// Returns the alphabet size `A` used in the smoothing denominator.
    #[inline]
    #[must_use]
    pub fn effective_alphabet_size(&self) -> usize {
        self.alphabet_size
    }

    /// Returns the acid counter of given context, if that context was
    /// observed during training.
    #[must_use]
    pub fn counter_for(&self, context: ContextSpec) -> Option<&ContextCounter<Acid>> {
        self.map.get(&context)
    }

    /// Iterates over all observed contexts and their acid counters.
    pub fn counters(&self) -> impl Iterator<Item = (&ContextSpec, &ContextCounter<Acid>)> {
        self.map.iter()
    }

    /// Returns the smoothed probability of `acid` following `context`.
    ///
    /// # Examples
    /// ```
    /// use metaclass::context_spec::ContextSpec;
    /// use metaclass::model::{ContextModel, ModelParams};
    /// use metaclass::sequence::Acid::{A, C, G, T};
    ///
    /// let params = ModelParams::new(1, 1.0).unwrap();
    /// let model = ContextModel::trained(params, &[A, C, A, C, A, G, T]);
    ///
    /// // Context `A` was followed by `C` twice and by `G` once.
    /// let prob = model.probability(ContextSpec::from_acids(&[A]), C);
    /// assert_eq!(prob.get(), (2.0 + 1.0) / (3.0 + 4.0));
    /// // Context `T` was never observed.
    /// let prob = model.probability(ContextSpec::from_acids(&[T]), A);
    /// assert_eq!(prob.get(), 0.25);
    /// ```
    #[must_use]
    pub fn probability(&self, context: ContextSpec, acid: Acid) -> Probability {
        let (count, total) = self
            .counter_for(context)
            .map(|counter| (counter.count(acid), counter.total()))
            .unwrap_or((0, 0));
        let alpha = self.params.alpha;
        let alphabet_size = self.alphabet_size as f64;

        Probability::new((count as f64 + alpha) / (total as f64 + alpha * alphabet_size))
    }

    /// Returns the smoothed probability of `acid` following given acids.
    ///
    /// # Panics
    /// This function panics if the number of acids is not equal to the model
    /// order.
    #[must_use]
    pub fn probability_after(&self, context: &[Acid], acid: Acid) -> Probability {
        assert_eq!(context.len(), self.params.order);

        self.probability(ContextSpec::from_acids(context), acid)
    }

    /// Computes the number of bits needed to encode given sequence with this
    /// model. The first `k` acids have no full context and cost nothing.
    #[must_use]
    pub fn compression_bits(&self, sequence: &[Acid]) -> f64 {
        scored_positions(self.params.order, sequence)
            .map(|(_, context, acid)| self.probability(context, acid).bits())
            .sum()
    }

    /// Computes the cost (in bits) of each position of given sequence. The
    /// first `k` positions are zero.
    #[must_use]
    pub fn complexity_profile(&self, sequence: &[Acid]) -> Vec<f64> {
        let mut profile = vec![0.0; sequence.len()];

        for (i, context, acid) in scored_positions(self.params.order, sequence) {
            profile[i] = self.probability(context, acid).bits();
        }

        profile
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use itertools::Itertools;

    use crate::_internal_test_data::{acids_from_str, PERIODIC_SAMPLE};
    use crate::context_spec::{ContextSpec, MAX_ORDER};
    use crate::model::{ContextModel, ModelParams, ModelParamsError};
    use crate::sequence::Acid::{self, A, C, G, N, T};
    use crate::sequence::Symbol;

    fn params(order: usize, alpha: f64) -> ModelParams {
        ModelParams::new(order, alpha).unwrap()
    }

    #[test]
    fn test_invalid_params() {
        assert_eq!(ModelParams::new(0, 1.0), Err(ModelParamsError::ZeroOrder));
        assert_eq!(
            ModelParams::new(MAX_ORDER + 1, 1.0),
            Err(ModelParamsError::OrderTooLarge(MAX_ORDER + 1))
        );
        assert_eq!(
            ModelParams::new(2, -1.0),
            Err(ModelParamsError::InvalidAlpha(-1.0))
        );
        assert!(ModelParams::new(2, f64::NAN).is_err());
        assert!(ModelParams::new(2, f64::INFINITY).is_err());
        assert!(ModelParams::new(MAX_ORDER, 1e-9).is_ok());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            ModelParamsError::ZeroOrder.to_string(),
            "Context order must be positive"
        );
        assert_eq!(
            ModelParamsError::OrderTooLarge(20).to_string(),
            "Context order too large (order: 20, limit: 16)"
        );
        assert_eq!(
            ModelParamsError::InvalidAlpha(0.0).to_string(),
            "Smoothing constant must be a positive number (alpha: 0)"
        );
    }

    #[test]
    fn test_train_counts() {
        let model = ContextModel::trained(params(2, 1.0), &PERIODIC_SAMPLE);

        // ACGTACGTACGT: AC->G, CG->T, GT->A, TA->C
        assert_eq!(model.context_num(), 4);
        assert_eq!(model.trained_positions(), 10);
        for (context, next) in [([A, C], G), ([C, G], T), ([G, T], A), ([T, A], C)] {
            let counter = model.counter_for(ContextSpec::from_acids(&context)).unwrap();
            assert_eq!(counter.observed(), [next]);
            assert_eq!(counter.count(next), counter.total());
        }
    }

    #[test]
    fn test_totals_match_counts() {
        let text = acids_from_str("GATTTGGGGTTCAAAGCAGTATCGATCAAATAGTAAATCCATTTGTTCAACTCACAGTTT");
        let model = ContextModel::trained(params(3, 0.5), &text);

        assert!(model.context_num() > 0);
        for (_, counter) in model.counters() {
            assert_eq!(counter.total(), counter.counts().iter().sum::<u64>());
        }
        let total: u64 = model.counters().map(|(_, counter)| counter.total()).sum();
        assert_eq!(total as usize, text.len() - 3);
    }

    #[test]
    fn test_retrain_discards_previous_state() {
        let mut model = ContextModel::trained(params(1, 1.0), &[A, A, A, A]);
        model.train(&[C, G, C, G]);

        assert_eq!(model.counter_for(ContextSpec::from_acids(&[A])), None);
        assert_eq!(model.observed_alphabet(), [C, G]);
        assert_eq!(model.context_num(), 2);
    }

    #[test]
    fn test_retrain_updates_effective_alphabet_size() {
        let text = acids_from_str("ACGTNRYACGTNRY");
        let mut model = ContextModel::trained(params(1, 1.0), &text);
        assert_eq!(model.effective_alphabet_size(), 7);

        model.train(&[C, G, C, G]);

        assert_eq!(model.effective_alphabet_size(), 4);
        assert_abs_diff_eq!(model.probability_after(&[A], N).get(), 0.25);
    }

    #[test]
    fn test_costs_match_probability() {
        let text = acids_from_str("ACGTTGCAACGGTNNACGT");
        let model = ContextModel::trained(params(2, 0.5), &text);
        let sequence = acids_from_str("ACGNTTAGCA");

        let profile = model.complexity_profile(&sequence);
        for i in 2..sequence.len() {
            let prob = model.probability_after(&sequence[i - 2..i], sequence[i]);
            assert_abs_diff_eq!(profile[i], -prob.get().log2(), epsilon = 1e-12);
        }
        assert_abs_diff_eq!(
            model.compression_bits(&sequence),
            profile.iter().sum::<f64>(),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_too_short_text_trains_nothing() {
        let model = ContextModel::trained(params(4, 1.0), &[A, C, G, T]);

        assert_eq!(model.context_num(), 0);
        assert!(model.observed_alphabet().is_empty());
        assert_eq!(model.effective_alphabet_size(), 4);
        assert_abs_diff_eq!(model.probability_after(&[A, C, G, T], A).get(), 0.25);
    }

    #[test]
    fn test_effective_alphabet_size() {
        let model = ContextModel::trained(params(1, 1.0), &[A, A, A, A]);
        assert_eq!(model.effective_alphabet_size(), 4);

        let text = acids_from_str("ACGTNRYACGTNRY");
        let model = ContextModel::trained(params(1, 1.0), &text);
        assert_eq!(model.effective_alphabet_size(), 7);
    }

    #[test]
    fn test_probability_bounds() {
        let text = acids_from_str("ACGTTGCAACGGTNNACGT");
        let model = ContextModel::trained(params(2, 0.01), &text);

        for context in Acid::values().into_iter().permutations(2) {
            for acid in Acid::values() {
                let prob = model.probability_after(&context, acid).get();
                assert!(prob > 0.0 && prob <= 1.0, "{:?} {} -> {}", context, acid, prob);
            }
        }
    }

    #[test]
    fn test_probability_sums_to_one_over_observed_alphabet() {
        let model = ContextModel::trained(params(1, 0.5), &PERIODIC_SAMPLE);

        let sum: f64 = [A, C, G, T]
            .iter()
            .map(|&acid| model.probability_after(&[A], acid).get())
            .sum();
        assert_abs_diff_eq!(sum, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_compression_bits() {
        let model = ContextModel::trained(params(2, 1.0), &PERIODIC_SAMPLE);

        // Every context was seen with a single successor:
        // P(hit) = (c + 1) / (c + 4), P(miss) = 1 / (c + 4)
        let bits = model.compression_bits(&[A, C, G]);
        assert_abs_diff_eq!(bits, -(4.0_f64 / 7.0).log2(), epsilon = 1e-12);

        let bits = model.compression_bits(&[A, C, T]);
        assert_abs_diff_eq!(bits, -(1.0_f64 / 7.0).log2(), epsilon = 1e-12);
    }

    #[test]
    fn test_compression_bits_short_sequence() {
        let model = ContextModel::trained(params(3, 1.0), &PERIODIC_SAMPLE);

        assert_eq!(model.compression_bits(&[]), 0.0);
        assert_eq!(model.compression_bits(&[A, C, G]), 0.0);
    }

    #[test]
    fn test_complexity_profile() {
        let model = ContextModel::trained(params(2, 1.0), &PERIODIC_SAMPLE);
        let sequence = acids_from_str("ACGTTN");

        let profile = model.complexity_profile(&sequence);

        assert_eq!(profile.len(), sequence.len());
        assert_eq!(profile[0], 0.0);
        assert_eq!(profile[1], 0.0);
        assert!(profile[2..].iter().all(|&bits| bits > 0.0));
        assert_abs_diff_eq!(
            profile.iter().sum::<f64>(),
            model.compression_bits(&sequence),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_unseen_symbol_probability() {
        let model = ContextModel::trained(params(1, 2.0), &[A, C, A, C, A]);

        // N never observed anywhere: the smoothing term alone decides
        assert_abs_diff_eq!(
            model.probability_after(&[A], N).get(),
            2.0 / (2.0 + 2.0 * 4.0)
        );
    }
}

use std::cmp::Ordering;
use std::marker::PhantomData;

use derive_more::Deref;
use serde::{Deserialize, Serialize};

use crate::sequence::Symbol;

/// Probability, as a float between 0.0 and 1.0.
#[derive(Deref, Copy, Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Probability(f64);

impl Probability {
    const EQ_THRESHOLD: f64 = 1e-12;

    /// Creates a new `Probability` object.
    ///
    /// # Examples
    /// ```
    /// use metaclass::context::Probability;
    ///
    /// let prob = Probability::new(0.5);
    /// assert_eq!(prob.get(), 0.5);
    /// ```
    ///
    /// # Panics
    /// This function panics if the value is not finite or is outside of the
    /// `[0.0, 1.0]` range.
    #[must_use]
    pub fn new(value: f64) -> Self {
        assert!(value.is_finite());
        assert!(value == 0.0 || value.is_sign_positive());
        assert!(value <= 1.0);

        Self(value)
    }

    /// Value of this `Probability` object, as a float.
    #[must_use]
    pub fn get(&self) -> f64 {
        self.0
    }

    /// Number of bits needed to encode an event with this probability
    /// (`-log2(p)`).
    ///
    /// # Examples
    /// ```
    /// use metaclass::context::Probability;
    ///
    /// assert_eq!(Probability::new(0.25).bits(), 2.0);
    /// assert_eq!(Probability::new(1.0).bits(), 0.0);
    /// assert!(Probability::new(0.0).bits().is_infinite());
    /// ```
    #[must_use]
    pub fn bits(&self) -> f64 {
        -self.0.log2()
    }
}

impl PartialEq for Probability {
    fn eq(&self, other: &Self) -> bool {
        (self.get() - other.get()).abs() <= Self::EQ_THRESHOLD
    }
}

impl Eq for Probability {}

impl From<f64> for Probability {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl PartialOrd for Probability {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Probability {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// A counter for symbols seen in a single context. Keeps the count of each
/// symbol, as well as the total count, so that normalizing is `O(1)`.
/// Counts are 64-bit, so training on arbitrarily large samples cannot overflow
/// them in practice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextCounter<T> {
    counts: Vec<u64>,
    total: u64,
    _phantom: PhantomData<T>,
}

impl<T: Symbol> ContextCounter<T> {
    /// Crates a new `ContextCounter` instance.
    ///
    /// # Examples
    /// ```
    /// use metaclass::context::ContextCounter;
    /// use metaclass::sequence::Acid;
    ///
    /// let counter = ContextCounter::<Acid>::new();
    /// assert_eq!(counter.total(), 0);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self {
            counts: vec![0; T::SIZE],
            total: 0,
            _phantom: PhantomData,
        }
    }

    /// Adds a symbol to the counter.
    ///
    /// # Examples
    /// ```
    /// use metaclass::context::ContextCounter;
    /// use metaclass::sequence::Acid;
    ///
    /// let mut counter = ContextCounter::<Acid>::new();
    /// counter.add(Acid::A);
    /// assert_eq!(counter.count(Acid::A), 1);
    /// ```
    #[inline]
    pub fn add(&mut self, value: T) {
        self.counts[value.to_usize()] += 1;
        self.total += 1;
    }

    /// Returns how many times given symbol has been added.
    #[inline]
    #[must_use]
    pub fn count(&self, value: T) -> u64 {
        self.counts[value.to_usize()]
    }

    /// Returns the total number of symbols added so far.
    ///
    /// # Examples
    /// ```
    /// use metaclass::context::ContextCounter;
    /// use metaclass::sequence::Acid;
    ///
    /// let mut counter = ContextCounter::<Acid>::new();
    /// counter.add(Acid::A);
    /// counter.add(Acid::A);
    /// counter.add(Acid::C);
    /// assert_eq!(counter.total(), 3);
    /// ```
    #[inline]
    #[must_use]
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Returns the per-symbol counts, indexed by symbol code.
    #[must_use]
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Gets the percentage probability of a certain symbol occurring after
    /// this context (unsmoothed maximum likelihood estimate).
    ///
    /// # Examples
    /// ```
    /// use approx::assert_abs_diff_eq;
    /// use metaclass::context::ContextCounter;
    /// use metaclass::sequence::Acid;
    ///
    /// let mut counter = ContextCounter::<Acid>::new();
    /// counter.add(Acid::A);
    /// counter.add(Acid::A);
    /// counter.add(Acid::C);
    /// assert_abs_diff_eq!(counter.percentage(Acid::A), 0.66666667, epsilon = 1e-6);
    /// assert_abs_diff_eq!(counter.percentage(Acid::C), 0.33333333, epsilon = 1e-6);
    /// ```
    #[must_use]
    pub fn percentage(&self, value: T) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.count(value) as f64 / self.total as f64
    }

    /// Returns the symbols that were added at least once, in symbol code
    /// order.
    #[must_use]
    pub fn observed(&self) -> Vec<T> {
        self.counts
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count > 0)
            .map(|(i, _)| T::from_usize(i))
            .collect()
    }
}

impl<T: Symbol> Default for ContextCounter<T> {
    fn default() -> Self {
        Self::new()
    }
}

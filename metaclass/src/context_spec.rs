use std::fmt::{Display, Formatter};

use crate::sequence::{Acid, Symbol};

const SYMBOL_BITS: usize = 4;

/// Maximum context order a [`ContextSpec`] can represent.
pub const MAX_ORDER: usize = u64::BITS as usize / SYMBOL_BITS;

/// Context "specification", as a single number.
///
/// Context specification is the window of `k` acids seen just before the
/// current position, packed into an integer (4 bits per acid, the oldest acid
/// in the most significant position). It is only meaningful together with the
/// order it was created with, and is used for rapid lookup in the model
/// context table.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[repr(transparent)]
pub struct ContextSpec(u64);

impl ContextSpec {
    /// Packs given acids into a context specifier.
    ///
    /// # Examples
    /// ```
    /// use metaclass::context_spec::ContextSpec;
    /// use metaclass::sequence::Acid;
    ///
    /// let spec = ContextSpec::from_acids(&[Acid::C, Acid::G]);
    /// assert_eq!(spec.get(), 0x12);
    /// ```
    ///
    /// # Panics
    /// This function panics if more than [`MAX_ORDER`] acids are given.
    #[must_use]
    pub fn from_acids(acids: &[Acid]) -> Self {
        assert!(acids.len() <= MAX_ORDER);

        let mut generator = ContextSpecGenerator::new(acids.len().max(1));
        for &acid in acids {
            generator.update(acid);
        }
        generator.current_context()
    }

    /// Gets the integer value for this `ContextSpec`.
    #[inline]
    #[must_use]
    pub fn get(&self) -> u64 {
        self.0
    }

    /// Unpacks this specifier back into the list of acids, assuming it was
    /// created with given order.
    ///
    /// # Examples
    /// ```
    /// use metaclass::context_spec::ContextSpec;
    /// use metaclass::sequence::Acid;
    ///
    /// let acids = [Acid::T, Acid::A, Acid::N];
    /// assert_eq!(ContextSpec::from_acids(&acids).to_acids(3), acids);
    /// ```
    #[must_use]
    pub fn to_acids(&self, order: usize) -> Vec<Acid> {
        (0..order)
            .rev()
            .map(|i| {
                let value = (self.0 >> (i * SYMBOL_BITS)) & symbol_mask();
                Acid::from_usize(value as usize)
            })
            .collect()
    }
}

impl Display for ContextSpec {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016X}", self.0)
    }
}

#[inline(always)]
const fn symbol_mask() -> u64 {
    (1 << SYMBOL_BITS) - 1
}

/// Rolling window over the last `order` acids of a sequence.
///
/// This is intended to be used in hot paths: updating the window is a single
/// shift and mask.
#[derive(Debug, Clone)]
pub struct ContextSpecGenerator {
    state: u64,
    mask: u64,
    order: usize,
    filled: usize,
}

impl ContextSpecGenerator {
    /// Creates a new, empty generator for contexts of given order.
    ///
    /// # Panics
    /// This function panics if the order is zero or exceeds [`MAX_ORDER`].
    #[must_use]
    pub fn new(order: usize) -> Self {
        assert!(order > 0);
        assert!(order <= MAX_ORDER);

        Self {
            state: 0,
            mask: u64::MAX >> (u64::BITS as usize - order * SYMBOL_BITS),
            order,
            filled: 0,
        }
    }

    #[inline]
    #[must_use]
    pub fn order(&self) -> usize {
        self.order
    }

    /// Returns whether at least `order` acids were pushed, i.e. whether
    /// [`Self::current_context`] describes a complete window.
    #[inline]
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.filled >= self.order
    }

    #[inline]
    #[must_use]
    pub fn current_context(&self) -> ContextSpec {
        ContextSpec(self.state)
    }

    #[inline]
    pub fn update(&mut self, acid: Acid) {
        self.state = ((self.state << SYMBOL_BITS) | acid.to_usize() as u64) & self.mask;
        if self.filled < self.order {
            self.filled += 1;
        }
    }
}

/// Iterates over all positions of `acids` that have a complete context of
/// given order preceding them, i.e. positions `order..acids.len()`.
///
/// Yields the position, the context made of the `order` acids before it, and
/// the acid at that position.
///
/// # Examples
/// ```
/// use metaclass::context_spec::{scored_positions, ContextSpec};
/// use metaclass::sequence::Acid;
///
/// let acids = [Acid::A, Acid::C, Acid::G];
/// let positions: Vec<_> = scored_positions(2, &acids).collect();
/// assert_eq!(
///     positions,
///     [(2, ContextSpec::from_acids(&[Acid::A, Acid::C]), Acid::G)]
/// );
/// ```
pub fn scored_positions(
    order: usize,
    acids: &[Acid],
) -> impl Iterator<Item = (usize, ContextSpec, Acid)> + '_ {
    let mut generator = ContextSpecGenerator::new(order);

    acids.iter().enumerate().filter_map(move |(i, &acid)| {
        let item = generator
            .is_full()
            .then(|| (i, generator.current_context(), acid));
        generator.update(acid);
        item
    })
}
